pub mod http_response_cache;
pub mod types;

// Re-export cache types
pub use http_response_cache::ResponseCache;
pub use types::{CachePolicy, CachedHttpResponse};
