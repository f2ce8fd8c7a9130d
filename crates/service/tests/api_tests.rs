//! Integration tests for the prediction API endpoints
//!
//! The router is driven in-process with mock artifacts standing in for the
//! tract-backed ones, so every status code and body shape is exercised
//! without serialized model files.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use inference_lib::{
    ArtifactFailure, ArtifactKind, ArtifactSet, ArtifactState, Classifier, Scaler, ServiceMetrics,
    StructuredLogger, NUM_FEATURES,
};
use risk_service::api::{create_router, AppState};
use std::sync::Arc;
use tower::ServiceExt;

struct IdentityScaler;

impl Scaler for IdentityScaler {
    fn transform(&self, features: &[f32; NUM_FEATURES]) -> anyhow::Result<[f32; NUM_FEATURES]> {
        Ok(*features)
    }
}

struct FixedClassifier([f32; 2]);

impl Classifier for FixedClassifier {
    fn predict_proba(&self, _features: &[f32; NUM_FEATURES]) -> anyhow::Result<[f32; 2]> {
        Ok(self.0)
    }
}

/// Class-1 probability proportional to age, so distinct inputs give
/// distinct outputs and batch ordering is observable.
struct AgeRatioClassifier {
    denom: f32,
}

impl Classifier for AgeRatioClassifier {
    fn predict_proba(&self, features: &[f32; NUM_FEATURES]) -> anyhow::Result<[f32; 2]> {
        let p1 = (features[0] / self.denom).clamp(0.0, 1.0);
        Ok([1.0 - p1, p1])
    }
}

struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict_proba(&self, _features: &[f32; NUM_FEATURES]) -> anyhow::Result<[f32; 2]> {
        anyhow::bail!("corrupt internal state")
    }
}

fn ready_state() -> ArtifactState {
    ArtifactState::Ready(ArtifactSet::new(
        Box::new(IdentityScaler),
        Box::new(FixedClassifier([0.2, 0.8])),
        Box::new(AgeRatioClassifier { denom: 200.0 }),
    ))
}

fn not_ready_state() -> ArtifactState {
    ArtifactState::NotReady {
        failures: vec![ArtifactFailure {
            artifact: ArtifactKind::Scaler,
            reason: "file not found".to_string(),
        }],
    }
}

fn app_with(artifacts: ArtifactState) -> Router {
    // Mirror the startup sequence in main.rs: populate artifact-load gauges
    // before the state is wired up, so the /metrics family is non-empty.
    let metrics = ServiceMetrics::new();
    metrics.set_artifact_status(&artifacts);
    let state = Arc::new(AppState::new(
        artifacts,
        metrics,
        StructuredLogger::new("test-service"),
    ));
    create_router(state)
}

fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "age": 29, "glucose": 85, "bp": 66, "skin_thickness": 29,
        "insulin": 0, "bmi": 26.6, "diabetes_pedigree": 0.351, "pregnancies": 0
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let app = app_with(ready_state());

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let info = body_json(response).await;
    assert_eq!(info["name"], "Medical Risk Prediction API");
    assert!(info["endpoints"]["/predict"].is_string());
    assert!(info["endpoints"]["/predict/batch"].is_string());
    assert!(info["endpoints"]["/health"].is_string());
}

#[tokio::test]
async fn test_health_ok_when_ready() {
    let app = app_with(ready_state());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health = body_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["models_loaded"], true);
    assert_eq!(health["scaler"], true);
    assert_eq!(health["logistic_regression"], true);
    assert_eq!(health["decision_tree"], true);
}

#[tokio::test]
async fn test_health_503_when_artifacts_missing() {
    let app = app_with(not_ready_state());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let health = body_json(response).await;
    assert_eq!(health["status"], "models_not_loaded");
    assert_eq!(health["models_loaded"], false);
    assert_eq!(health["scaler"], false);
    // The classifier slots loaded; only the scaler failed.
    assert_eq!(health["logistic_regression"], true);
    assert_eq!(health["decision_tree"], true);
}

#[tokio::test]
async fn test_predict_returns_both_models() {
    let app = app_with(ready_state());

    let response = app.oneshot(post_json("/predict", &valid_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["logistic_regression"]["prediction"], 1);
    assert_eq!(body["logistic_regression"]["probability"], 0.8);
    assert_eq!(body["logistic_regression"]["model_name"], "Logistic Regression");
    // age 29 / 200 = 0.145 for class 1, so class 0 wins with 0.855.
    assert_eq!(body["decision_tree"]["prediction"], 0);
    assert_eq!(body["decision_tree"]["probability"], 0.855);
    assert_eq!(body["decision_tree"]["model_name"], "Decision Tree");
    assert_eq!(body["input_features"]["age"], 29.0);
    assert_eq!(body["input_features"]["diabetes_pedigree"], 0.351);
}

#[tokio::test]
async fn test_predict_probabilities_in_unit_interval() {
    let app = app_with(ready_state());

    let response = app.oneshot(post_json("/predict", &valid_body())).await.unwrap();
    let body = body_json(response).await;

    for model in ["logistic_regression", "decision_tree"] {
        let prediction = body[model]["prediction"].as_u64().unwrap();
        assert!(prediction == 0 || prediction == 1);
        let probability = body[model]["probability"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&probability));
    }
}

#[tokio::test]
async fn test_predict_is_idempotent() {
    let app = app_with(ready_state());

    let first = body_json(
        app.clone()
            .oneshot(post_json("/predict", &valid_body()))
            .await
            .unwrap(),
    )
    .await;
    let second = body_json(
        app.oneshot(post_json("/predict", &valid_body()))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_predict_503_when_not_ready() {
    let app = app_with(not_ready_state());

    let response = app.oneshot(post_json("/predict", &valid_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["error"], "models_not_loaded");
    assert_eq!(body["failures"][0]["artifact"], "scaler");
}

#[tokio::test]
async fn test_predict_422_reports_every_violation() {
    let app = app_with(ready_state());

    let mut body = valid_body();
    body["age"] = serde_json::json!(121);
    body["glucose"] = serde_json::json!(-5);

    let response = app.oneshot(post_json("/predict", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error = body_json(response).await;
    assert_eq!(error["error"], "validation_failed");
    let violations = error["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0]["field"], "age");
    assert_eq!(violations[0]["max"], 120.0);
    assert_eq!(violations[1]["field"], "glucose");
}

#[tokio::test]
async fn test_predict_boundary_values_accepted() {
    let app = app_with(ready_state());

    let mut body = valid_body();
    body["age"] = serde_json::json!(0);
    let response = app
        .clone()
        .oneshot(post_json("/predict", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    body["age"] = serde_json::json!(120);
    let response = app.oneshot(post_json("/predict", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_missing_field_rejected() {
    let app = app_with(ready_state());

    let body = serde_json::json!({"age": 29, "glucose": 85});
    let response = app.oneshot(post_json("/predict", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_predict_wrong_type_rejected() {
    let app = app_with(ready_state());

    let mut body = valid_body();
    body["bmi"] = serde_json::json!("high");
    let response = app.oneshot(post_json("/predict", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_predict_500_on_model_failure() {
    let app = app_with(ArtifactState::Ready(ArtifactSet::new(
        Box::new(IdentityScaler),
        Box::new(FailingClassifier),
        Box::new(FixedClassifier([0.5, 0.5])),
    )));

    let response = app.oneshot(post_json("/predict", &valid_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["error"], "inference_failed");
    // Internal detail is logged, never leaked to the caller.
    assert!(body["detail"].as_str().unwrap().contains("Prediction error"));
}

#[tokio::test]
async fn test_batch_preserves_input_order() {
    let app = app_with(ready_state());

    let mut items = Vec::new();
    for age in [20, 40, 60] {
        let mut item = valid_body();
        item["age"] = serde_json::json!(age);
        items.push(item);
    }

    let response = app
        .oneshot(post_json("/predict/batch", &serde_json::json!(items)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["count"], 3);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    // Tree class-0 probability is 1 - age/200: 0.9, 0.8, 0.7 in input order.
    assert_eq!(results[0]["decision_tree"]["probability"], 0.9);
    assert_eq!(results[1]["decision_tree"]["probability"], 0.8);
    assert_eq!(results[2]["decision_tree"]["probability"], 0.7);
    assert_eq!(results[0]["input_features"]["age"], 20.0);
    assert_eq!(results[2]["input_features"]["age"], 60.0);
}

#[tokio::test]
async fn test_batch_single_item_matches_single_predict() {
    let app = app_with(ready_state());

    let single = body_json(
        app.clone()
            .oneshot(post_json("/predict", &valid_body()))
            .await
            .unwrap(),
    )
    .await;

    let batch = body_json(
        app.oneshot(post_json(
            "/predict/batch",
            &serde_json::json!([valid_body()]),
        ))
        .await
        .unwrap(),
    )
    .await;

    assert_eq!(batch["count"], 1);
    assert_eq!(batch["results"][0], single);
}

#[tokio::test]
async fn test_batch_invalid_item_rejects_whole_batch() {
    let app = app_with(ready_state());

    let mut bad = valid_body();
    bad["insulin"] = serde_json::json!(1001);
    let items = serde_json::json!([valid_body(), bad]);

    let response = app.oneshot(post_json("/predict/batch", &items)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_failed");
    assert_eq!(body["items"][0]["index"], 1);
    assert_eq!(body["items"][0]["violations"][0]["field"], "insulin");
}

#[tokio::test]
async fn test_batch_503_when_not_ready() {
    let app = app_with(not_ready_state());

    let response = app
        .oneshot(post_json("/predict/batch", &serde_json::json!([valid_body()])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_batch_empty_array_returns_zero_count() {
    let app = app_with(ready_state());

    let response = app
        .oneshot(post_json("/predict/batch", &serde_json::json!([])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["results"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let app = app_with(ready_state());

    // Serve one prediction so counters exist.
    app.clone()
        .oneshot(post_json("/predict", &valid_body()))
        .await
        .unwrap();

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(metrics_text.contains("risk_service_prediction_latency_seconds"));
    assert!(metrics_text.contains("risk_service_predictions_total"));
    assert!(metrics_text.contains("risk_service_artifact_loaded"));
}
