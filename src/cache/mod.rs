pub mod policy;
mod refresher;
pub mod token_cache;

pub use policy::RefreshPolicy;
pub use token_cache::{CacheState, TokenCache, TokenSnapshot};
