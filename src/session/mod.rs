//! Session state: token model, storage, refresh and the facade over them

pub mod facade;
pub mod refresh;
pub mod store;
pub mod token;

pub use facade::Session;
#[allow(unused_imports)]
pub use refresh::{CommandRefresher, NoRefresh, RefreshFn, TokenRefresher};
#[allow(unused_imports)]
pub use store::{FilePersistence, MemoryPersistence, TokenPersistence, TokenStore};
pub use token::AuthToken;
