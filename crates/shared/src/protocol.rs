use serde::{Deserialize, Serialize};

/// Successful body of both `GET /api/score` and `PUT /api/score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: i64,
}

/// Request body of `PUT /api/score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateScoreRequest {
    #[serde(rename = "newScore")]
    pub new_score: i64,
}
