use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use storage::services::aggregation::{RetryPolicy, ScoreAggregator};
use storage::store::MemoryStore;
use tower::ServiceExt;
use uuid::Uuid;
use web::{app, middleware::auth::ApiKeys, state::AppState};

const API_KEY: &str = "test-key";

fn build_router() -> Router {
    let store = Arc::new(MemoryStore::new());
    let (aggregator, worker) = ScoreAggregator::new(store.clone(), RetryPolicy::default());
    tokio::spawn(worker.run());
    let state = AppState::new(store.clone(), store, aggregator);

    app(state, ApiKeys::from_comma_separated(API_KEY))
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    authorized: bool,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if authorized {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {API_KEY}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router dispatch");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json payload")
    };

    (status, payload)
}

async fn register(router: &Router, slug: &str) -> Value {
    let (status, company) = send(
        router,
        "POST",
        "/api/companies",
        Some(json!({ "name": "Acme Robotics", "slug": slug })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    company
}

fn score(payload: &Value, field: &str) -> f64 {
    let value = &payload["scores"][field];
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .expect("numeric score")
}

#[tokio::test]
async fn registering_requires_an_api_key() {
    let router = build_router();

    let (status, payload) = send(
        &router,
        "POST",
        "/api/companies",
        Some(json!({ "name": "Acme", "slug": "acme" })),
        false,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(payload["error"], json!("Unauthorized"));
}

#[tokio::test]
async fn new_company_has_neutral_scores() {
    let router = build_router();
    register(&router, "acme").await;

    let (status, company) = send(&router, "GET", "/api/companies/acme", None, false).await;

    assert_eq!(status, StatusCode::OK);
    for field in ["ethics", "credibility", "delivery", "security", "innovation", "overall"] {
        assert_eq!(score(&company, field), 5.0, "{field}");
    }
    assert_eq!(company["scores_stale"], json!(false));
}

#[tokio::test]
async fn duplicate_slug_conflicts() {
    let router = build_router();
    register(&router, "acme").await;

    let (status, _) = send(
        &router,
        "POST",
        "/api/companies",
        Some(json!({ "name": "Other", "slug": "acme" })),
        true,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn votes_update_scores_and_history() {
    let router = build_router();
    register(&router, "acme").await;

    for (user, value) in [(Uuid::new_v4(), 9), (Uuid::new_v4(), 7)] {
        let (status, receipt) = send(
            &router,
            "PUT",
            "/api/companies/acme/votes",
            Some(json!({ "user_id": user, "dimension": "ethics", "score": value })),
            false,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(receipt["score_status"], json!("updated"));
        assert_eq!(receipt["reputation"], json!(1));
    }

    let (_, company) = send(&router, "GET", "/api/companies/acme", None, false).await;
    assert_eq!(score(&company, "ethics"), 8.0);
    assert_eq!(score(&company, "overall"), 5.6);

    let (status, history) = send(
        &router,
        "GET",
        "/api/companies/acme/history?order=asc",
        None,
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = history.as_array().expect("history array");
    assert_eq!(entries.len(), 2);
    assert_eq!(score(&entries[0], "overall"), 5.8);
    assert_eq!(score(&entries[1], "overall"), 5.6);

    let (_, newest_first) = send(&router, "GET", "/api/companies/acme/history", None, false).await;
    assert_eq!(score(&newest_first[0], "overall"), 5.6);
}

#[tokio::test]
async fn out_of_range_vote_is_rejected() {
    let router = build_router();
    register(&router, "acme").await;

    let (status, payload) = send(
        &router,
        "PUT",
        "/api/companies/acme/votes",
        Some(json!({ "user_id": Uuid::new_v4(), "dimension": "delivery", "score": 14 })),
        false,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["error"], json!("Validation failed"));
}

#[tokio::test]
async fn deleting_a_vote_restores_neutral_score() {
    let router = build_router();
    register(&router, "acme").await;
    let user = Uuid::new_v4();

    send(
        &router,
        "PUT",
        "/api/companies/acme/votes",
        Some(json!({ "user_id": user, "dimension": "security", "score": 2 })),
        false,
    )
    .await;

    let (status, receipt) = send(
        &router,
        "DELETE",
        &format!("/api/companies/acme/votes/security?user_id={user}"),
        None,
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["reputation"], json!(0));

    let (_, company) = send(&router, "GET", "/api/companies/acme", None, false).await;
    assert_eq!(score(&company, "security"), 5.0);

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/companies/acme/votes/security?user_id={user}"),
        None,
        false,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn approved_review_moves_scores() {
    let router = build_router();
    register(&router, "acme").await;

    let (status, review) = send(
        &router,
        "POST",
        "/api/companies/acme/reviews",
        Some(json!({
            "user_id": Uuid::new_v4(),
            "rating": 5,
            "title": "Great to work with",
            "body": "Delivered every milestone early.",
            "ratings": [{ "dimension": "delivery", "score": 10 }]
        })),
        false,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["status"], json!("pending"));

    let review_id = review["review_id"].as_str().expect("review id").to_string();
    let uri = format!("/api/reviews/{review_id}/status");

    let (status, _) = send(
        &router,
        "PUT",
        &uri,
        Some(json!({ "status": "approved" })),
        false,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, moderation) =
        send(&router, "PUT", &uri, Some(json!({ "status": "approved" })), true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moderation["previous_status"], json!("pending"));
    assert_eq!(moderation["score_status"], json!("updated"));

    let (_, company) = send(&router, "GET", "/api/companies/acme", None, false).await;
    assert_eq!(score(&company, "delivery"), 10.0);
    assert_eq!(score(&company, "overall"), 6.0);
}

#[tokio::test]
async fn promise_votes_feed_reputation() {
    let router = build_router();
    register(&router, "acme").await;
    let user = Uuid::new_v4();

    let (status, receipt) = send(
        &router,
        "PUT",
        "/api/companies/acme/promise-votes",
        Some(json!({ "user_id": user, "promise": "Carbon neutral by 2030", "kept": false })),
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["reputation"], json!(3));

    let (status, profile) = send(
        &router,
        "GET",
        &format!("/api/users/{user}/reputation"),
        None,
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["reputation"], json!(3));

    let (status, receipt) = send(
        &router,
        "DELETE",
        &format!("/api/companies/acme/promise-votes?user_id={user}&promise=Carbon%20neutral%20by%202030"),
        None,
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["reputation"], json!(0));
}

#[tokio::test]
async fn engagement_and_trending_sweep() {
    let router = build_router();
    register(&router, "acme").await;

    let (status, company) = send(&router, "POST", "/api/companies/acme/views", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(company["view_count"], json!(1));

    let (_, company) = send(
        &router,
        "POST",
        "/api/companies/acme/followers",
        Some(json!({ "delta": -5 })),
        false,
    )
    .await;
    assert_eq!(company["follower_count"], json!(0));

    let (status, report) = send(&router, "POST", "/api/admin/trending/recompute", None, true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["updated"], json!(1));

    let (_, company) = send(&router, "GET", "/api/companies/acme", None, false).await;
    let trending = company["trending_score"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| company["trending_score"].as_f64())
        .expect("trending score");
    assert!((0.0..=100.0).contains(&trending));
    assert!(trending >= 30.0);
}

#[tokio::test]
async fn page_beyond_the_last_is_empty() {
    let router = build_router();
    register(&router, "acme").await;

    let (status, page) = send(
        &router,
        "GET",
        "/api/companies?page=4294967295&page_size=100",
        None,
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"], json!([]));
    assert_eq!(page["pagination"]["total_items"], json!(1));
}

#[tokio::test]
async fn growth_rate_outside_bounds_is_rejected() {
    let router = build_router();
    register(&router, "acme").await;

    let (status, _) = send(
        &router,
        "PUT",
        "/api/companies/acme/growth-rate",
        Some(json!({ "growth_rate": 99999999 })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        "POST",
        "/api/companies",
        Some(json!({ "name": "Beta", "slug": "beta", "growth_rate": -2000 })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, company) = send(
        &router,
        "PUT",
        "/api/companies/acme/growth-rate",
        Some(json!({ "growth_rate": 12.5 })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let growth_rate = company["growth_rate"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| company["growth_rate"].as_f64())
        .expect("growth rate");
    assert_eq!(growth_rate, 12.5);
}

#[tokio::test]
async fn manual_recompute_appends_history() {
    let router = build_router();
    register(&router, "acme").await;

    let (status, _) = send(
        &router,
        "POST",
        "/api/admin/companies/acme/recompute",
        None,
        true,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, history) = send(&router, "GET", "/api/companies/acme/history", None, false).await;
    assert_eq!(history.as_array().map(Vec::len), Some(1));
    assert_eq!(history[0]["reason"], json!("manual recompute"));

    let (status, _) = send(
        &router,
        "POST",
        "/api/admin/companies/ghost/recompute",
        None,
        true,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn text_analysis_scores_marketing_copy() {
    let router = build_router();

    let (status, analysis) = send(
        &router,
        "POST",
        "/api/analysis/text",
        Some(json!({ "text": "" })),
        false,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(analysis["hype_score"], json!(0.0));
    assert_eq!(analysis["ethics"]["score"], json!(5.0));
    assert_eq!(analysis["sentiment"], Value::Null);
}
