pub mod cart;
pub mod kv;
pub mod models;
pub mod session;
pub mod versioned;

mod memory;
pub use memory::MemoryStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStore;

pub use cart::{CartError, CartStore};
pub use kv::{KeyValueStore, StorageError};
pub use models::{cart_count, cart_total, CartItem, ProductSnapshot, Role, Session, SessionUser};
pub use session::{SessionSnapshot, SessionStore};
