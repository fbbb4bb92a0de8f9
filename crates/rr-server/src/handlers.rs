//! Request handlers and wire DTOs.
//!
//! All rounding happens here, at serialization time. The model output is
//! carried unrounded up to this point so display precision can never
//! change the accident/safe decision.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use rr_model::{classify, Feature, Observation, Prediction};
use rr_model::{ACCIDENT_RECORDS, SAFE_RECORDS, TRAINING_RECORDS};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::routes::AppState;

/// Client-facing request errors. The model itself is total; the only
/// failure surface is a body the extractor cannot parse.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MalformedBody(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
    }
}

/// Human-readable verdict strings returned in the `prediction` field.
pub const ACCIDENT_LIKELY: &str = "YES - Accident Likely ⚠️";
pub const SAFE_TO_DRIVE: &str = "NO - Safe to Drive ✅";

/// `POST /predict` body. Every field is optional; unknown categories are
/// valid input and resolve through the model's smoothing fallback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRequest {
    pub weather: Option<String>,
    pub road: Option<String>,
    pub traffic: Option<String>,
    pub engine: Option<String>,
}

impl From<PredictRequest> for Observation {
    fn from(req: PredictRequest) -> Self {
        Observation {
            weather: req.weather,
            road: req.road,
            traffic: req.traffic,
            engine: req.engine,
        }
    }
}

/// Per-feature entry of the response breakdown, rounded to 4 decimals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureBreakdown {
    pub value: Option<String>,
    pub p_yes: f64,
    pub p_no: f64,
}

/// Breakdown keyed by feature wire name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Breakdown {
    pub weather: FeatureBreakdown,
    pub road: FeatureBreakdown,
    pub traffic: FeatureBreakdown,
    pub engine: FeatureBreakdown,
}

/// `POST /predict` success response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub prediction: String,
    pub is_accident: bool,
    pub prob_yes_raw: f64,
    pub prob_no_raw: f64,
    pub prob_yes_percent: f64,
    pub prob_no_percent: f64,
    pub confidence: f64,
    pub breakdown: Breakdown,
}

impl PredictResponse {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        let verdict = if prediction.is_accident {
            ACCIDENT_LIKELY
        } else {
            SAFE_TO_DRIVE
        };

        let entry = |feature: Feature| -> FeatureBreakdown {
            let term = prediction
                .terms
                .iter()
                .find(|t| t.feature == feature)
                .expect("classifier emits one term per feature");
            FeatureBreakdown {
                value: term.value.clone(),
                p_yes: round_to(term.likelihood.p_accident, 4),
                p_no: round_to(term.likelihood.p_safe, 4),
            }
        };

        Self {
            prediction: verdict.to_string(),
            is_accident: prediction.is_accident,
            prob_yes_raw: round_to(prediction.scores.accident, 8),
            prob_no_raw: round_to(prediction.scores.safe, 8),
            prob_yes_percent: round_to(prediction.percent.accident, 2),
            prob_no_percent: round_to(prediction.percent.safe, 2),
            confidence: round_to(prediction.confidence, 2),
            breakdown: Breakdown {
                weather: entry(Feature::Weather),
                road: entry(Feature::Road),
                traffic: entry(Feature::Traffic),
                engine: entry(Feature::Engine),
            },
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `POST /predict`: score one observation.
///
/// Malformed bodies (non-JSON, wrong content type, mistyped fields) are
/// reported as `400 {"error": ...}`; a well-formed body never fails, the
/// model is total over its inputs.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "rejected /predict body");
        ApiError::from(rejection)
    })?;

    let observation = Observation::from(request);
    let prediction = classify(&state.priors, &observation);
    tracing::debug!(
        is_accident = prediction.is_accident,
        confidence = prediction.confidence,
        "scored observation"
    );

    Ok(Json(PredictResponse::from_prediction(&prediction)))
}

/// `GET /`: static informational page.
pub async fn home() -> Html<String> {
    Html(format!(
        "<h1>🚗 Accident Prediction API</h1>\n\
         <p>Backend is running successfully!</p>\n\
         <p>Dataset: {TRAINING_RECORDS} records ({ACCIDENT_RECORDS} accidents, {SAFE_RECORDS} safe)</p>\n"
    ))
}

/// `GET /health`: liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
