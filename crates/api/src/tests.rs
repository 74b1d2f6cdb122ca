use super::*;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
};
use data_validator::StandardScaler;
use feature_engine::{FeatureEncoder, FeatureVector};
use inference_engine::{Classification, InferenceEngine, InferenceError, LoanClassifier};
use serde_json::Value;
use tower::ServiceExt;

/// Answers with the same label for every application
struct FixedLabel(i64);

impl LoanClassifier for FixedLabel {
    fn classify(&self, _features: &FeatureVector) -> Result<Classification, InferenceError> {
        Ok(Classification {
            label: self.0,
            approval_probability: None,
        })
    }

    fn backend(&self) -> &'static str {
        "fixed"
    }
}

const VALID_FORM: &str = "gender=Male&married=Yes&dependents=3%2B&education=Not+Graduate\
&self_employed=No&applicant_income=5849&coapplicant_income=0&loan_amount=128\
&loan_term=360&credit_history=1&property_area=Urban";

fn ready_models(label: i64) -> ModelBundle {
    let scaler = StandardScaler::from_parameters(vec![0.0; 12], vec![1.0; 12]).unwrap();
    ModelBundle::new(
        FeatureEncoder::new(scaler).unwrap(),
        InferenceEngine::with_classifier(FixedLabel(label)),
    )
}

async fn app_with(models: ModelBundle) -> (Router, SharedState) {
    let repository = Repository::in_memory().await.unwrap();
    let state = Arc::new(AppState::new(repository, models, ModelMetrics::default()));
    (create_router(state.clone(), None), state)
}

async fn submit(app: &Router, body: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/add_request")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_submission_persists_prediction_and_redirects() {
    let (app, state) = app_with(ready_models(1)).await;

    let response = submit(&app, VALID_FORM).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/view_requests");

    let records = state.repository.list().await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.prediction, "Approved");
    assert_eq!(record.dependents, "3+");
    assert_eq!(record.education, "Not Graduate");
    assert_eq!(record.loan_term, 360);
    assert_eq!(record.applicant_income, 5849.0);
}

#[tokio::test]
async fn test_rejected_label_is_stored() {
    let (app, state) = app_with(ready_models(0)).await;

    submit(&app, VALID_FORM).await;
    let records = state.repository.list().await.unwrap();
    assert_eq!(records[0].prediction, "Rejected");
}

#[tokio::test]
async fn test_invalid_input_is_bad_request_and_not_persisted() {
    let (app, state) = app_with(ready_models(1)).await;

    let body = VALID_FORM.replace("applicant_income=5849", "applicant_income=abc");
    let response = submit(&app, &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error = json(response).await;
    assert!(error["error"].as_str().unwrap().contains("applicant_income"));
    assert_eq!(state.repository.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_fractional_loan_term_not_persisted() {
    let (app, state) = app_with(ready_models(1)).await;

    let body = VALID_FORM.replace("loan_term=360", "loan_term=360.5");
    let response = submit(&app, &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.repository.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_non_finite_numbers_are_bad_request() {
    let (app, state) = app_with(ready_models(1)).await;

    for raw in ["NaN", "inf", "-inf"] {
        let body = VALID_FORM.replace("applicant_income=5849", &format!("applicant_income={}", raw));
        let response = submit(&app, &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "applicant_income={}", raw);

        let error = json(response).await;
        assert!(error["error"].as_str().unwrap().contains("finite"));
    }
    assert_eq!(state.repository.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_fractional_loan_term_rejected_before_prediction() {
    let mut models = ready_models(1);
    models.engine = InferenceEngine::unavailable();
    let (app, state) = app_with(models).await;

    let body = VALID_FORM.replace("loan_term=360", "loan_term=360.5");
    let response = submit(&app, &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.repository.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unavailable_scaler_is_service_unavailable() {
    let models = ModelBundle::new(
        FeatureEncoder::unavailable(),
        InferenceEngine::with_classifier(FixedLabel(1)),
    );
    let (app, state) = app_with(models).await;

    let response = submit(&app, VALID_FORM).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(state.repository.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unavailable_model_is_service_unavailable() {
    let mut models = ready_models(1);
    models.engine = InferenceEngine::unavailable();
    let (app, state) = app_with(models).await;

    let response = submit(&app, VALID_FORM).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(state.repository.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_view_requests_lists_in_id_order() {
    let (app, _state) = app_with(ready_models(1)).await;
    submit(&app, VALID_FORM).await;
    submit(&app, &VALID_FORM.replace("gender=Male", "gender=Female")).await;

    let response = get(&app, "/view_requests").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["id"], 1);
    assert_eq!(body["data"][1]["gender"], "Female");
}

#[tokio::test]
async fn test_delete_request() {
    let (app, state) = app_with(ready_models(1)).await;
    submit(&app, VALID_FORM).await;

    let response = get(&app, "/delete_request/1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.repository.count().await.unwrap(), 0);

    let response = get(&app, "/delete_request/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_eda_without_data() {
    let (app, _state) = app_with(ready_models(1)).await;

    let body = json(get(&app, "/eda").await).await;
    assert_eq!(body["error"], analytics::NO_DATA_MESSAGE);
    assert_eq!(body["plots"], serde_json::json!({}));
}

#[tokio::test]
async fn test_eda_with_data() {
    let (app, _state) = app_with(ready_models(1)).await;
    submit(&app, VALID_FORM).await;
    submit(&app, VALID_FORM).await;

    let body = json(get(&app, "/eda").await).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["plots"]["gender"]["data"][0]["labels"], serde_json::json!(["Male"]));
    assert_eq!(body["plots"]["approval"]["data"][0]["values"], serde_json::json!([2]));
    assert_eq!(body["plots"]["income"]["data"][0]["type"], "histogram");
}

#[tokio::test]
async fn test_model_metrics() {
    let (app, _state) = app_with(ready_models(1)).await;

    let body = json(get(&app, "/model_metrics").await).await;
    assert_eq!(body["accuracy"], 0.87);
    assert_eq!(body["f1"], 0.86);
}

#[tokio::test]
async fn test_health_reports_components() {
    let (app, _state) = app_with(ready_models(1)).await;
    let body = json(get(&app, "/api/v1/health").await).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["components"]["model"]["detail"], "fixed");
    assert_eq!(body["request_count"], 0);

    let (degraded, _state) = app_with(ModelBundle::new(
        FeatureEncoder::unavailable(),
        InferenceEngine::unavailable(),
    ))
    .await;
    let body = json(get(&degraded, "/api/v1/health").await).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["scaler"]["status"], "unavailable");
    assert_eq!(body["components"]["database"]["status"], "ok");
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let (app, _state) = app_with(ready_models(1)).await;
    let response = get(&app, "/metrics").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
