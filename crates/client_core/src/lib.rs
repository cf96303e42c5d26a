use reqwest::Client;
use shared::{
    error::ApiError,
    protocol::{ScoreResponse, UpdateScoreRequest},
};
use thiserror::Error;
use tracing::warn;

/// User-facing message shown when the initial fetch fails.
pub const LOAD_ERROR_MESSAGE: &str = "Could not load the score.";
/// User-facing message shown when a save fails.
pub const SAVE_ERROR_MESSAGE: &str = "Could not save the score.";

/// Session phases of the score view.
///
/// `Saving` and `SaveFailed` keep the last server-confirmed score; the
/// optimistic candidate sent while saving is never displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    LoadingInitial,
    Ready { score: i64 },
    InitialLoadFailed { message: String },
    Saving { score: i64 },
    SaveFailed { score: i64, message: String },
}

impl SessionState {
    /// The score a frontend should display, if one is known.
    pub fn score(&self) -> Option<i64> {
        match self {
            Self::Ready { score } | Self::Saving { score } | Self::SaveFailed { score, .. } => {
                Some(*score)
            }
            Self::Uninitialized | Self::LoadingInitial | Self::InitialLoadFailed { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::InitialLoadFailed { message } | Self::SaveFailed { message, .. } => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    /// Increment/decrement are only actionable with a confirmed score and no
    /// save in flight.
    pub fn controls_enabled(&self) -> bool {
        matches!(self, Self::Ready { .. } | Self::SaveFailed { .. })
    }

    pub fn is_saving(&self) -> bool {
        matches!(self, Self::Saving { .. })
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {status}: {message}")]
    Api { status: u16, message: String },
}

/// Outcome of an increment/decrement action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// Server confirmed the update; the confirmed value is now displayed.
    Saved(i64),
    /// Guard rejected the action: a save was in flight or no score is loaded.
    Skipped,
}

pub struct ScoreClient {
    http: Client,
    server_url: String,
    state: SessionState,
}

impl ScoreClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
            state: SessionState::Uninitialized,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn score(&self) -> Option<i64> {
        self.state.score()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.state.error_message()
    }

    pub fn controls_enabled(&self) -> bool {
        self.state.controls_enabled()
    }

    pub fn is_saving(&self) -> bool {
        self.state.is_saving()
    }

    /// Fetches the current score. Entering `LoadingInitial` clears any
    /// displayed error; on failure the score stays unset and controls stay
    /// hidden.
    pub async fn load_score(&mut self) -> Result<i64, ClientError> {
        self.state = SessionState::LoadingInitial;
        match self.fetch_remote_score().await {
            Ok(score) => {
                self.state = SessionState::Ready { score };
                Ok(score)
            }
            Err(err) => {
                warn!(%err, "initial score fetch failed");
                self.state = SessionState::InitialLoadFailed {
                    message: LOAD_ERROR_MESSAGE.to_string(),
                };
                Err(err)
            }
        }
    }

    pub async fn increment(&mut self) -> Result<AdjustOutcome, ClientError> {
        self.adjust(1).await
    }

    pub async fn decrement(&mut self) -> Result<AdjustOutcome, ClientError> {
        self.adjust(-1).await
    }

    async fn adjust(&mut self, delta: i64) -> Result<AdjustOutcome, ClientError> {
        let current = match self.state {
            SessionState::Ready { score } | SessionState::SaveFailed { score, .. } => score,
            _ => return Ok(AdjustOutcome::Skipped),
        };

        let candidate = current + delta;
        // Clears any displayed error; the prior value stays visible while the
        // save is in flight.
        self.state = SessionState::Saving { score: current };

        match self.put_remote_score(candidate).await {
            Ok(confirmed) => {
                // The server-confirmed value wins over the local candidate.
                self.state = SessionState::Ready { score: confirmed };
                Ok(AdjustOutcome::Saved(confirmed))
            }
            Err(err) => {
                warn!(%err, candidate, "score update failed");
                self.state = SessionState::SaveFailed {
                    score: current,
                    message: SAVE_ERROR_MESSAGE.to_string(),
                };
                Err(err)
            }
        }
    }

    async fn fetch_remote_score(&self) -> Result<i64, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/score", self.server_url))
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: ScoreResponse = response.json().await?;
        Ok(body.score)
    }

    async fn put_remote_score(&self, new_score: i64) -> Result<i64, ClientError> {
        let response = self
            .http
            .put(format!("{}/api/score", self.server_url))
            .json(&UpdateScoreRequest { new_score })
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: ScoreResponse = response.json().await?;
        Ok(body.score)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ApiError>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| status.to_string());
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
