mod fetch_utils;
pub mod http_client;
pub mod session_api;
pub mod urls;

// Re-export URL utilities
pub use urls::*;
// Re-export HTTP client utilities
pub use http_client::create_http_client_with_timeout;
pub use session_api::OpenF1Provider;
