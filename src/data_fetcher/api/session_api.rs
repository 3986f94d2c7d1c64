//! OpenF1-backed session provider

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::fetch_utils::fetch;
use super::http_client::create_http_client_with_timeout;
use super::urls::{build_meetings_url, build_session_data_url, build_sessions_url};
use crate::config::Config;
use crate::constants::cache_ttl;
use crate::data_fetcher::cache::{CachePolicy, ResponseCache};
use crate::data_fetcher::models::{
    ApiDriver, ApiLap, ApiMeeting, ApiRaceControl, ApiSession, ApiStint, Session, SessionId,
};
use crate::data_fetcher::processors::{SessionPayload, assemble_session_laps, resolve_meeting};
use crate::data_fetcher::provider::SessionProvider;
use crate::error::AppError;

/// Session provider reading an OpenF1 compatible JSON API.
///
/// Every request goes through the response cache. Schedule listings expire
/// after an hour; per-session data is kept for good once the session has
/// settled, and is not cached before that.
#[derive(Debug)]
pub struct OpenF1Provider {
    client: Client,
    api_domain: String,
    cache: ResponseCache,
}

impl OpenF1Provider {
    pub fn new(client: Client, api_domain: impl Into<String>, cache: ResponseCache) -> Self {
        let api_domain = api_domain.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_domain,
            cache,
        }
    }

    /// Builds a provider from configuration: API domain, timeout and cache
    /// directory all come from `config`.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
        let cache = ResponseCache::new(config.cache_dir());
        info!(
            "Using provider {} with cache directory {}",
            config.api_domain,
            cache.dir().display()
        );
        Ok(Self::new(client, config.api_domain.clone(), cache))
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    async fn find_meeting(&self, id: &SessionId) -> Result<ApiMeeting, AppError> {
        let url = build_meetings_url(&self.api_domain, id.season);
        let meetings: Vec<ApiMeeting> = fetch(&self.client, &self.cache, &url, SCHEDULE_POLICY)
            .await
            .map_err(|e| unavailable_if_missing(e, id, "no meetings listed for season"))?;

        let meeting = resolve_meeting(&meetings, &id.event).cloned().ok_or_else(|| {
            AppError::data_unavailable(
                id,
                format!("event not found among {} meetings", meetings.len()),
            )
        })?;

        debug!(
            "Event '{}' resolved to meeting {} ({})",
            id.event, meeting.meeting_key, meeting.meeting_name
        );
        Ok(meeting)
    }

    async fn find_session(
        &self,
        id: &SessionId,
        meeting: &ApiMeeting,
    ) -> Result<ApiSession, AppError> {
        let url = build_sessions_url(&self.api_domain, meeting.meeting_key);
        let sessions: Vec<ApiSession> = fetch(&self.client, &self.cache, &url, SCHEDULE_POLICY)
            .await
            .map_err(|e| unavailable_if_missing(e, id, "no sessions listed for meeting"))?;

        sessions
            .into_iter()
            .find(|s| s.session_name.eq_ignore_ascii_case(id.kind.provider_name()))
            .ok_or_else(|| {
                AppError::data_unavailable(
                    id,
                    format!("{} has no {} session", meeting.meeting_name, id.kind),
                )
            })
    }

    /// Fetches a supplementary per-session resource. The provider answers 404
    /// for empty result sets, which here just means there is nothing to join.
    async fn fetch_supplement<T: DeserializeOwned>(
        &self,
        resource: &str,
        session_key: i64,
        policy: CachePolicy,
    ) -> Result<Vec<T>, AppError> {
        let url = build_session_data_url(&self.api_domain, resource, session_key);
        match fetch(&self.client, &self.cache, &url, policy).await {
            Ok(rows) => Ok(rows),
            Err(AppError::ApiNotFound { .. }) => {
                warn!("No {} data for session {}", resource, session_key);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl SessionProvider for OpenF1Provider {
    #[instrument(skip(self), fields(session = %id))]
    async fn fetch_session(&self, id: &SessionId) -> Result<Session, AppError> {
        let meeting = self.find_meeting(id).await?;
        let session = self.find_session(id, &meeting).await?;
        let policy = session_data_policy(&session, Utc::now());
        if policy == CachePolicy::NoStore {
            warn!(
                "{} has not settled yet (ends {}), its data will not be cached",
                id,
                session.date_end.as_deref().unwrap_or("unknown")
            );
        }

        let laps_url = build_session_data_url(&self.api_domain, "laps", session.session_key);
        let laps: Vec<ApiLap> = fetch(&self.client, &self.cache, &laps_url, policy)
            .await
            .map_err(|e| unavailable_if_missing(e, id, "session has no lap data"))?;
        if laps.is_empty() {
            return Err(AppError::data_unavailable(id, "session has no lap data"));
        }

        let payload = SessionPayload {
            laps,
            stints: self
                .fetch_supplement::<ApiStint>("stints", session.session_key, policy)
                .await?,
            drivers: self
                .fetch_supplement::<ApiDriver>("drivers", session.session_key, policy)
                .await?,
            race_control: self
                .fetch_supplement::<ApiRaceControl>("race_control", session.session_key, policy)
                .await?,
        };

        let laps = assemble_session_laps(&payload);
        info!(
            "Loaded {} laps for {} (session_key={})",
            laps.len(),
            id,
            session.session_key
        );

        Ok(Session {
            id: id.clone(),
            session_key: session.session_key,
            meeting_name: meeting.meeting_name,
            laps,
        })
    }
}

const SCHEDULE_POLICY: CachePolicy = CachePolicy::Expires(cache_ttl::SCHEDULE_SECONDS);

/// Per-session data is final only some time after the session ended. A
/// missing or unreadable end time is treated as a session still running.
fn session_data_policy(session: &ApiSession, now: DateTime<Utc>) -> CachePolicy {
    let Some(end) = session
        .date_end
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    else {
        return CachePolicy::NoStore;
    };

    let settled_at = end.with_timezone(&Utc) + TimeDelta::seconds(cache_ttl::SESSION_SETTLE_SECONDS);
    if now >= settled_at {
        CachePolicy::Permanent
    } else {
        CachePolicy::NoStore
    }
}

fn unavailable_if_missing(error: AppError, id: &SessionId, reason: &str) -> AppError {
    if error.is_data_unavailable() {
        AppError::data_unavailable(id, reason)
    } else {
        error
    }
}
