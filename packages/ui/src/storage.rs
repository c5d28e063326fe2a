//! Platform storage selection.
//!
//! - **Web** (WASM + `web` feature): `window.localStorage` via [`store::LocalStore`]
//! - **Everything else** (server render, native tests): [`store::MemoryStore`]

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type AppStorage = store::LocalStore;

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type AppStorage = store::MemoryStore;

pub fn make_storage() -> AppStorage {
    AppStorage::new()
}
