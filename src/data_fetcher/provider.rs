//! Provider seam between the collection pipeline and the session data source

use async_trait::async_trait;

use crate::data_fetcher::models::{Session, SessionId};
use crate::error::AppError;

/// Source of session lap data.
///
/// Implementations may cache however they like, but a session they cannot
/// resolve or that has no laps must surface as an error
/// (`AppError::is_data_unavailable`) rather than an empty session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn fetch_session(&self, id: &SessionId) -> Result<Session, AppError>;
}
