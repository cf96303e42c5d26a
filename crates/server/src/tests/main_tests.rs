use super::*;
use axum::{body, body::Body, http::Request};
use tower::ServiceExt;

async fn test_app() -> (Router, Storage) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let api = ApiContext {
        storage: storage.clone(),
    };
    let app = build_router(Arc::new(AppState { api }));
    (app, storage)
}

fn get_score() -> Request<Body> {
    Request::get("/api/score")
        .body(Body::empty())
        .expect("request")
}

fn put_score(body: serde_json::Value) -> Request<Body> {
    Request::put("/api/score")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(
            Request::get("/healthz")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn fresh_store_serves_zero() {
    let (app, _storage) = test_app().await;
    let response = app.oneshot(get_score()).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        serde_json::json!({ "score": 0 })
    );
}

#[tokio::test]
async fn put_then_get_round_trips() {
    let (app, _storage) = test_app().await;

    let response = app
        .clone()
        .oneshot(put_score(serde_json::json!({ "newScore": 42 })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        serde_json::json!({ "score": 42 })
    );

    let response = app.oneshot(get_score()).await.expect("response");
    assert_eq!(
        response_json(response).await,
        serde_json::json!({ "score": 42 })
    );
}

#[tokio::test]
async fn negative_scores_round_trip() {
    let (app, _storage) = test_app().await;

    let response = app
        .clone()
        .oneshot(put_score(serde_json::json!({ "newScore": -12 })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_score()).await.expect("response");
    assert_eq!(
        response_json(response).await,
        serde_json::json!({ "score": -12 })
    );
}

#[tokio::test]
async fn non_integer_score_is_rejected_and_value_unchanged() {
    let (app, _storage) = test_app().await;

    let response = app
        .clone()
        .oneshot(put_score(serde_json::json!({ "newScore": 5 })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    for bad_body in [
        serde_json::json!({ "newScore": "abc" }),
        serde_json::json!({ "newScore": 3.5 }),
        serde_json::json!({ "newScore": null }),
        serde_json::json!({}),
    ] {
        let response = app
            .clone()
            .oneshot(put_score(bad_body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response_json(response).await,
            serde_json::json!({ "message": "Invalid score value provided." })
        );
    }

    let response = app.oneshot(get_score()).await.expect("response");
    assert_eq!(
        response_json(response).await,
        serde_json::json!({ "score": 5 })
    );
}

#[tokio::test]
async fn missing_record_yields_not_found_messages() {
    let (app, storage) = test_app().await;
    sqlx::query("DELETE FROM game_state")
        .execute(storage.pool())
        .await
        .expect("delete row");

    let response = app.clone().oneshot(get_score()).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response_json(response).await,
        serde_json::json!({ "message": "Score not found" })
    );

    let response = app
        .oneshot(put_score(serde_json::json!({ "newScore": 9 })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response_json(response).await,
        serde_json::json!({ "message": "Score record not found to update." })
    );
}
