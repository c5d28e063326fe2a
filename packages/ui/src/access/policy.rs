//! # Route access policy
//!
//! One declarative table decides which roles may enter which part of the
//! app, instead of every protected page carrying its own allow-list.
//!
//! A rule applies to its prefix and everything below it, matched on whole
//! path segments (`/dashboard/admin` covers `/dashboard/admin/users` but not
//! `/dashboard/administrator`). When several rules match, the longest prefix
//! wins. A path no rule covers is public.

use store::Role;

#[derive(Clone, Debug, PartialEq)]
pub struct AccessRule {
    pub prefix: String,
    pub allowed: Vec<Role>,
}

impl AccessRule {
    fn covers(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return true;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    /// A policy with no rules; every path is public.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Builder method to add a rule.
    pub fn rule(mut self, prefix: &str, allowed: &[Role]) -> Self {
        self.rules.push(AccessRule {
            prefix: normalize(prefix).to_string(),
            allowed: allowed.to_vec(),
        });
        self
    }

    /// The most specific rule covering `path`, if any.
    pub fn rule_for(&self, path: &str) -> Option<&AccessRule> {
        let path = normalize(strip_query(path));
        self.rules
            .iter()
            .filter(|rule| rule.covers(path))
            .max_by_key(|rule| rule.prefix.len())
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::empty()
            .rule("/dashboard/admin", &[Role::Admin])
            .rule("/dashboard/doctor", &[Role::Doctor])
            .rule("/dashboard/user", &[Role::User])
            .rule("/consultation", &[Role::User])
            .rule("/community", &[Role::User, Role::Doctor, Role::Admin])
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
