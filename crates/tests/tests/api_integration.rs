use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use dottie_api::{build_app, ApiConfig};
use dottie_core::{recommendations_for, Pattern};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    build_app(&ApiConfig::default())
        .await
        .expect("app should build")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, parsed)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_storage_and_metrics() {
    let app = app().await;
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
    assert!(body["metrics"].get("classifications_total").is_some());
}

#[tokio::test]
async fn classify_returns_pattern_with_trace() {
    let app = app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/v1/assessments/classify",
            json!({
                "age": "18-24",
                "cycleLength": "26-30",
                "flowLevel": "heavy",
                "painLevel": "debilitating"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["pattern"], "heavy");
    assert_eq!(body["title"], "Heavy or Prolonged Flow Pattern");
    assert_eq!(body["classification"]["decided_by"], "flow_heaviness");
    assert_eq!(
        body["result"]["recommendations"].as_array().map(Vec::len),
        Some(recommendations_for(Pattern::Heavy).len())
    );
}

#[tokio::test]
async fn classify_empty_answers_defaults_to_regular() {
    let app = app().await;
    let (status, body) = send(
        &app,
        json_request("POST", "/v1/assessments/classify", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["pattern"], "regular");

    let (_, health) = send(&app, get("/health")).await;
    assert_eq!(health["metrics"]["empty_defaults_total"], 1);
}

#[tokio::test]
async fn patterns_are_listed_in_authored_order() {
    let app = app().await;
    let (status, body) = send(&app, get("/v1/patterns")).await;

    assert_eq!(status, StatusCode::OK);
    let patterns = body
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["pattern"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        patterns,
        ["regular", "irregular", "heavy", "pain", "developing"]
    );

    let (status, body) = send(&app, get("/v1/patterns/pain")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendations"][0]["title"], "Heat Therapy");

    let (status, body) = send(&app, get("/v1/patterns/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown_pattern");
}

#[tokio::test]
async fn assessment_lifecycle() {
    let app = app().await;

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            "/v1/assessments",
            json!({
                "user_id": "user-42",
                "answers": {
                    "age": "15-17",
                    "cycleLength": "26-30",
                    "periodDuration": "4-5",
                    "symptoms": ["cramps"]
                }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["result"]["pattern"], "developing");
    let id = created["id"].as_str().unwrap().to_string();
    assert!(created.get("created_at").is_some());

    let (status, fetched) = send(&app, get(&format!("/v1/assessments/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["result"], created["result"]);

    let (status, history) = send(&app, get("/v1/assessments?user_id=user-42")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().map(Vec::len), Some(1));

    let (status, replaced) = send(
        &app,
        json_request(
            "PUT",
            &format!("/v1/assessments/{id}"),
            json!({
                "answers": {
                    "age": "15-17",
                    "cycleLength": "Irregular (varies month to month)"
                }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], created["id"]);
    assert_eq!(replaced["created_at"], created["created_at"]);
    assert_eq!(replaced["result"]["pattern"], "irregular");
    assert_eq!(
        replaced["result"]["answers"]["cycle_length"],
        "irregular (varies month to month)"
    );

    let (status, seed) = send(&app, get(&format!("/v1/assessments/{id}/chat_seed"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(seed["message"]
        .as_str()
        .unwrap()
        .contains("Irregular Timing Pattern"));

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/assessments/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get(&format!("/v1/assessments/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn save_requires_age_and_cycle_length() {
    let app = app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/v1/assessments",
            json!({
                "user_id": "user-7",
                "answers": { "age": "18-24" }
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_assessment");
}

#[tokio::test]
async fn blank_user_id_is_rejected() {
    let app = app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/v1/assessments",
            json!({
                "user_id": "   ",
                "answers": { "age": "18-24", "cycleLength": "26-30" }
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_user_id");
}

#[tokio::test]
async fn classify_accepts_null_fields() {
    let app = app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/v1/assessments/classify",
            json!({
                "age": null,
                "cycleLength": null,
                "periodDuration": null,
                "flowHeaviness": null,
                "painLevel": null,
                "symptoms": null,
                "cyclePredictable": null
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["pattern"], "regular");
    assert_eq!(body["result"]["answers"]["symptoms"]["physical"], json!([]));
}
