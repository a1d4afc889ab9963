//! HTTP tests for the form page and the JSON prediction endpoint.
//!
//! The router is driven in-process with `oneshot`; the model is a stub so the
//! expected percentages are exact.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use stroke_risk::{
    config::Config,
    features::FeatureRow,
    http::{HttpState, router},
    locale::Locale,
    model::RiskModel,
    risk::RiskEvaluator,
};
use tower::ServiceExt;

struct FixedModel(f64);

impl RiskModel for FixedModel {
    fn predict_proba(&self, _row: &FeatureRow) -> anyhow::Result<[f64; 2]> {
        Ok([1.0 - self.0, self.0])
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct FailingModel;

impl RiskModel for FailingModel {
    fn predict_proba(&self, _row: &FeatureRow) -> anyhow::Result<[f64; 2]> {
        anyhow::bail!("feature names mismatch")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn app(model: Arc<dyn RiskModel>, locale: Locale) -> Router {
    let state = HttpState {
        evaluator: RiskEvaluator::new(model),
        locale,
    };
    router(state, &Config::default())
}

const ALL_RISKS_FORM: &str = "age=70&avg_glucose_level=150&bmi=32&gender=Female&hypertension=1&heart_disease=1&ever_married=Yes&work_type=Self-employed&residence_type=Rural&smoking_status=smokes";

const HEALTHY_FORM: &str = "age=30&avg_glucose_level=100&bmi=22&gender=Male&hypertension=0&heart_disease=0&ever_married=No&work_type=Private&residence_type=Urban&smoking_status=never+smoked";

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_post(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let resp = app(Arc::new(FixedModel(0.1)), Locale::En)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "ok");
}

#[tokio::test]
async fn test_get_renders_empty_form() {
    let resp = app(Arc::new(FixedModel(0.1)), Locale::Fr)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("<form method=\"post\""));
    assert!(html.contains("name=\"smoking_status\""));
    assert!(!html.contains("<h2"));
}

#[tokio::test]
async fn test_submit_renders_high_risk_and_all_advice() {
    let resp = app(Arc::new(FixedModel(0.62)), Locale::En)
        .oneshot(form_post(ALL_RISKS_FORM))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("color:red"));
    assert!(html.contains("62.00% (High)"));
    assert_eq!(html.matches("<li>").count(), 5);
    assert!(html.contains("Manage your weight"));
    assert!(!html.contains("Maintain a healthy weight"));
    // submitted values stay in the form
    assert!(html.contains(r#"<option value="Self-employed" selected>"#));
}

#[tokio::test]
async fn test_submit_healthy_gets_congratulation() {
    let resp = app(Arc::new(FixedModel(0.05)), Locale::En)
        .oneshot(form_post(HEALTHY_FORM))
        .await
        .unwrap();
    let html = body_string(resp).await;
    assert!(html.contains("color:green"));
    assert!(html.contains("5.00% (Low)"));
    assert!(html.contains("Congratulations!"));
    assert!(!html.contains("<li>"));
}

#[tokio::test]
async fn test_model_failure_shows_generic_error_only() {
    let resp = app(Arc::new(FailingModel), Locale::Fr)
        .oneshot(form_post(HEALTHY_FORM))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Une erreur est survenue lors de la prédiction"));
    assert!(!html.contains("mismatch"));
    assert!(!html.contains("<h2"));
}

#[tokio::test]
async fn test_out_of_range_form_value_fails_generically() {
    let resp = app(Arc::new(FixedModel(0.1)), Locale::En)
        .oneshot(form_post(
            "age=17&avg_glucose_level=100&bmi=22&gender=Male&hypertension=0&heart_disease=0&ever_married=No&work_type=Private&residence_type=Urban&smoking_status=smokes",
        ))
        .await
        .unwrap();
    let html = body_string(resp).await;
    assert!(html.contains("An error occurred during prediction"));
    assert!(!html.contains("<h2"));
}

#[tokio::test]
async fn test_json_predict() {
    let body = json!({
        "age": 70,
        "avg_glucose_level": 150.0,
        "bmi": 29.9,
        "gender": "Male",
        "hypertension": 0,
        "heart_disease": 0,
        "ever_married": "Yes",
        "work_type": "Private",
        "Residence_type": "Urban",
        "smoking_status": "formerly smoked"
    });
    let resp = app(Arc::new(FixedModel(0.2)), Locale::En)
        .oneshot(
            Request::post("/api/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(v["tier"], "moderate");
    assert_eq!(v["color"], "orange");
    assert_eq!(v["no_major_risk_factors"], false);
    let codes: Vec<&str> = v["advice"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["code"].as_str().unwrap())
        .collect();
    assert_eq!(
        codes,
        ["glucose_control", "weight_moderate", "smoking_cessation"]
    );
}

#[tokio::test]
async fn test_json_predict_failure_is_422() {
    let body = json!({ "age": 50, "work_type": "Astronaut" });
    let resp = app(Arc::new(FixedModel(0.2)), Locale::En)
        .oneshot(
            Request::post("/api/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let v: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(
        v["error"],
        "An error occurred during prediction. Please check your inputs and try again."
    );
}

fn json_post(body: impl Into<Body>) -> Request<Body> {
    Request::post("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn assert_generic_json_error(resp: axum::response::Response) {
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let v: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(
        v,
        json!({
            "error": "An error occurred during prediction. Please check your inputs and try again."
        })
    );
}

#[tokio::test]
async fn test_json_predict_model_failure_is_generic_422() {
    let body = json!({
        "age": 50,
        "avg_glucose_level": 100,
        "bmi": 22,
        "gender": "Female",
        "hypertension": 0,
        "heart_disease": 0,
        "ever_married": "Yes",
        "work_type": "Govt_job",
        "Residence_type": "Rural",
        "smoking_status": "never smoked"
    });
    let resp = app(Arc::new(FailingModel), Locale::En)
        .oneshot(json_post(body.to_string()))
        .await
        .unwrap();
    assert_generic_json_error(resp).await;
}

#[tokio::test]
async fn test_json_predict_unreadable_body_is_generic_422() {
    for body in [r#"{"age":[50]}"#, "not json", r#"["age", 50]"#] {
        let resp = app(Arc::new(FixedModel(0.2)), Locale::En)
            .oneshot(json_post(body))
            .await
            .unwrap();
        assert_generic_json_error(resp).await;
    }
}

#[tokio::test]
async fn test_json_predict_missing_content_type_is_generic_422() {
    let resp = app(Arc::new(FixedModel(0.2)), Locale::En)
        .oneshot(
            Request::post("/api/predict")
                .body(Body::from(r#"{"age": 50}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_generic_json_error(resp).await;
}

#[tokio::test]
async fn test_unreadable_form_body_renders_page_with_generic_error() {
    let resp = app(Arc::new(FixedModel(0.62)), Locale::En)
        .oneshot(form_post(
            "age=50&age=60&avg_glucose_level=100&bmi=22&gender=Male&hypertension=0&heart_disease=0&ever_married=No&work_type=Private&residence_type=Urban&smoking_status=smokes",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("<form method=\"post\""));
    assert!(html.contains("An error occurred during prediction"));
    assert!(!html.contains("duplicate"));
    assert!(!html.contains("<h2"));
}
