use shared::{
    error::{ApiException, ErrorCode},
    protocol::ScoreResponse,
};
use storage::Storage;
use tracing::info;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn fetch_score(ctx: &ApiContext) -> Result<ScoreResponse, ApiException> {
    let score = ctx
        .storage
        .fetch_score()
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiException::new(ErrorCode::NotFound, "score record is missing"))?;
    Ok(ScoreResponse { score })
}

pub async fn update_score(ctx: &ApiContext, new_score: i64) -> Result<ScoreResponse, ApiException> {
    let score = ctx
        .storage
        .update_score(new_score)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiException::new(ErrorCode::NotFound, "score record is missing"))?;
    info!(score, "score updated");
    Ok(ScoreResponse { score })
}

fn internal(err: anyhow::Error) -> ApiException {
    ApiException::new(ErrorCode::Internal, err.to_string())
}
