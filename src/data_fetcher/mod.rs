pub mod api;
pub mod cache;
pub mod models;
pub mod processors;
pub mod provider;

pub use api::OpenF1Provider;
pub use cache::ResponseCache;
pub use models::{Session, SessionId, SessionKind, SessionLap};
pub use provider::SessionProvider;
