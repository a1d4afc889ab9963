//! HTTP transport for the stroke-risk form
//!
//! Serves the HTML form, renders results in place on submission and exposes
//! the same evaluation as JSON. Health is plain text.

use axum::{
    Form, Json, Router,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    error::{Result, StrokeRiskError},
    features::RawFeatureForm,
    form::render_page,
    locale::Locale,
    report::{Submission, assess_form, fail, render_html},
    risk::{PredictionError, RiskEvaluator},
};

/// Shared state for HTTP server; read-only after startup
#[derive(Clone)]
pub struct HttpState {
    pub evaluator: RiskEvaluator,
    pub locale: Locale,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Empty form with default values
pub async fn form_handler(State(state): State<HttpState>) -> Html<String> {
    Html(render_page(&RawFeatureForm::defaults(), None, state.locale))
}

/// An unreadable body is an input failure like any other
fn rejected(body_text: String) -> Submission {
    fail(StrokeRiskError::Validation {
        message: format!("unreadable request body: {body_text}"),
    })
}

/// Form submission; the result (or the generic error) is shown under the form
pub async fn submit_handler(
    State(state): State<HttpState>,
    form: std::result::Result<Form<RawFeatureForm>, FormRejection>,
) -> Html<String> {
    let (raw, submission) = match form {
        Ok(Form(raw)) => {
            let submission = assess_form(&state.evaluator, &raw);
            (raw, submission)
        }
        Err(rejection) => (RawFeatureForm::defaults(), rejected(rejection.body_text())),
    };
    let result = render_html(&submission, state.locale);
    Html(render_page(&raw, Some(&result), state.locale))
}

/// JSON prediction endpoint
pub async fn predict_handler(
    State(state): State<HttpState>,
    body: std::result::Result<Json<RawFeatureForm>, JsonRejection>,
) -> Response {
    let submission = match body {
        Ok(Json(raw)) => assess_form(&state.evaluator, &raw),
        Err(rejection) => rejected(rejection.body_text()),
    };
    match submission {
        Submission::Assessed { risk, advice } => {
            let locale = state.locale;
            let advice_json: Vec<_> = advice
                .advisories()
                .iter()
                .map(|a| {
                    json!({
                        "code": a,
                        "title": a.title(locale),
                        "detail": a.detail(locale),
                    })
                })
                .collect();
            (
                StatusCode::OK,
                Json(json!({
                    "percentage": risk.percentage,
                    "tier": risk.tier,
                    "label": risk.tier.label(locale),
                    "color": risk.tier.color(),
                    "icon": risk.tier.icon(),
                    "advice": advice_json,
                    "no_major_risk_factors": advice.advisories().is_empty(),
                })),
            )
                .into_response()
        }
        Submission::Failed => (
            StatusCode::UNPROCESSABLE_ENTITY,
            [(header::CONTENT_TYPE, "application/json")],
            json!({ "error": PredictionError::user_message(state.locale) }).to_string(),
        )
            .into_response(),
    }
}

/// Build the router; separated from [`start_http_server`] so tests can drive it
pub fn router(state: HttpState, config: &Config) -> Router {
    let api = Router::new().route("/api/predict", post(predict_handler));
    let api = if config.http.cors_any {
        api.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
    } else {
        api
    };

    Router::new()
        .route("/", get(form_handler).post(submit_handler))
        .route("/health", get(health_handler))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_millis(
                    config.http.request_timeout_ms,
                ))),
        )
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(evaluator: RiskEvaluator, config: Arc<Config>) -> Result<()> {
    let state = HttpState {
        evaluator,
        locale: config.system.locale,
    };
    let app = router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.http.bind)
        .await
        .map_err(|e| StrokeRiskError::Internal {
            message: format!("Failed to bind HTTP listener on {}: {}", config.http.bind, e),
        })?;

    tracing::info!(
        "Starting HTTP server on http://{} (locale {})",
        config.http.bind,
        config.system.locale.as_str()
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| StrokeRiskError::Internal {
            message: format!("HTTP server error: {}", e),
        })?;

    Ok(())
}
