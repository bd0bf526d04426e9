//! Handlers for the advisory feature endpoints (PRD-17).
//!
//! Every feature handler takes the raw request body and runs the same check
//! sequence: feature kill-switch (410 before the body is even looked at),
//! JSON parsing (400), field validation (400, with 413/415 for image
//! payloads), API key presence (500), then the upstream call. Success
//! responses use the `{success: true, data}` envelope.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use canopy_advisory::AdvisoryApi;
use canopy_core::advisory::{Feature, ImagePayload};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AdvisoryError, AdvisoryResult};
use crate::response::AdvisoryResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /advisory/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Request body for `POST /advisory/diagnosis/disease`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseDiagnosisRequest {
    pub crop_type: String,
    #[serde(default)]
    pub symptoms: Option<String>,
    pub image: ImagePayload,
}

/// Request body for `POST /advisory/diagnosis/plant`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantDiagnosisRequest {
    pub plant_name: String,
    pub image: ImagePayload,
}

/// Request body for `POST /advisory/credit-score`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditScoreRequest {
    pub statement_content: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/advisory/chat
///
/// Free-form farming question; returns the model's reply.
pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> AdvisoryResult<Json<AdvisoryResponse<Value>>> {
    ensure_enabled(&state, Feature::Chat)?;

    let input: ChatRequest = parse_body(&body)?;
    if input.message.trim().is_empty() {
        return Err(AdvisoryError::Validation("Message is required".into()));
    }

    let api = advisory_api(&state)?;
    let reply = api.generate_text(&chat_prompt(&input.message)).await?;

    Ok(Json(AdvisoryResponse::new(json!({ "reply": reply }))))
}

/// GET /api/v1/advisory/chat/health
///
/// The one reserved GET probe on the advisory surface. Reports whether the
/// upstream client is configured; it does not call the upstream.
pub async fn chat_health(State(state): State<AppState>) -> Json<AdvisoryResponse<Value>> {
    Json(AdvisoryResponse::new(json!({
        "status": "ok",
        "configured": state.advisory.is_some(),
    })))
}

/// POST /api/v1/advisory/diagnosis/disease
///
/// Crop photo plus crop name (and optional observed symptoms); returns a
/// disease diagnosis with treatment advice.
pub async fn diagnose_disease(
    State(state): State<AppState>,
    body: Bytes,
) -> AdvisoryResult<Json<AdvisoryResponse<Value>>> {
    ensure_enabled(&state, Feature::DiseaseDiagnosis)?;

    let input: DiseaseDiagnosisRequest = parse_body(&body)?;
    if input.crop_type.trim().is_empty() {
        return Err(AdvisoryError::Validation("Crop type is required".into()));
    }
    input.image.decode(state.config.advisory.max_image_bytes)?;

    let api = advisory_api(&state)?;
    let prompt = disease_prompt(&input.crop_type, input.symptoms.as_deref());
    let diagnosis = api
        .generate_vision(&prompt, &input.image.mime_type, &input.image.data)
        .await?;

    Ok(Json(AdvisoryResponse::new(json!({ "diagnosis": diagnosis }))))
}

/// POST /api/v1/advisory/diagnosis/plant
///
/// Plant photo plus plant name; returns an identification and health report.
pub async fn diagnose_plant(
    State(state): State<AppState>,
    body: Bytes,
) -> AdvisoryResult<Json<AdvisoryResponse<Value>>> {
    ensure_enabled(&state, Feature::PlantDiagnosis)?;

    let input: PlantDiagnosisRequest = parse_body(&body)?;
    if input.plant_name.trim().is_empty() {
        return Err(AdvisoryError::Validation("Plant name is required".into()));
    }
    input.image.decode(state.config.advisory.max_image_bytes)?;

    let api = advisory_api(&state)?;
    let prompt = plant_prompt(&input.plant_name);
    let diagnosis = api
        .generate_vision(&prompt, &input.image.mime_type, &input.image.data)
        .await?;

    Ok(Json(AdvisoryResponse::new(json!({ "diagnosis": diagnosis }))))
}

/// POST /api/v1/advisory/credit-score
///
/// Bank-statement text; returns a creditworthiness analysis.
pub async fn credit_score(
    State(state): State<AppState>,
    body: Bytes,
) -> AdvisoryResult<Json<AdvisoryResponse<Value>>> {
    ensure_enabled(&state, Feature::CreditScoring)?;

    let input: CreditScoreRequest = parse_body(&body)?;
    if input.statement_content.trim().is_empty() {
        return Err(AdvisoryError::Validation(
            "Statement content is required".into(),
        ));
    }

    let api = advisory_api(&state)?;
    let analysis = api
        .generate_text(&credit_prompt(&input.statement_content))
        .await?;

    Ok(Json(AdvisoryResponse::new(json!({ "analysis": analysis }))))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject requests for features switched off by configuration.
///
/// Runs before body parsing so a disabled feature answers 410 for any input,
/// including an empty body.
fn ensure_enabled(state: &AppState, feature: Feature) -> Result<(), AdvisoryError> {
    if state.config.advisory.disabled_features.contains(&feature) {
        return Err(AdvisoryError::FeatureDisabled(feature));
    }
    Ok(())
}

/// Parse a JSON request body, collapsing serde detail into a 400.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AdvisoryError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected malformed advisory request body");
        AdvisoryError::Validation("Invalid request body".to_string())
    })
}

/// The upstream client, or the configuration error when no key is set.
fn advisory_api(state: &AppState) -> Result<&AdvisoryApi, AdvisoryError> {
    state.advisory.as_deref().ok_or(AdvisoryError::Configuration)
}

fn chat_prompt(message: &str) -> String {
    format!(
        "You are an agricultural advisor for smallholder farmers. \
         Answer practically, in plain language, and keep it brief.\n\n\
         Farmer's question: {message}"
    )
}

fn disease_prompt(crop_type: &str, symptoms: Option<&str>) -> String {
    let mut prompt = format!(
        "Diagnose the disease affecting this {crop_type} crop from the photo. \
         Name the likely disease, its cause, and practical treatment steps."
    );
    if let Some(symptoms) = symptoms.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str(&format!("\nObserved symptoms: {symptoms}"));
    }
    prompt
}

fn plant_prompt(plant_name: &str) -> String {
    format!(
        "Identify this plant (the grower calls it '{plant_name}') and assess \
         its health from the photo. Note any visible problems and care advice."
    )
}

fn credit_prompt(statement_content: &str) -> String {
    format!(
        "Assess the creditworthiness of a smallholder farmer from this bank \
         statement. Summarize income stability, spending patterns, and a \
         lending recommendation.\n\nStatement:\n{statement_content}"
    )
}
