//! Handlers for the `/creators` resource (signup, login, profile) (PRD-19).
//!
//! Login accepts *either* identifier -- phone or email -- in one request;
//! the lookup is a single OR-filtered query. A successful login stamps
//! `last_seen_at` and then re-reads the row, so the profile the client
//! caches under `currentCreator` is the refreshed copy.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use canopy_core::creator::validate_phone;
use canopy_core::error::CoreError;
use canopy_db::models::creator::{CreateCreator, CreatorResponse, UpdateCreator};
use canopy_db::repositories::CreatorRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, CREATOR_ROLE};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthCreator;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /creators/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    pub phone: String,
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
}

/// Request body for `POST /creators/login`. At least one identifier is
/// required; supplying both is allowed (either match wins).
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// Successful authentication response returned by signup and login.
///
/// `token` is what the client persists under `authToken`; `creator` is what
/// it caches under `currentCreator`.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub creator: CreatorResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/creators/signup
///
/// Create an account and log it in immediately. Phone and email are both
/// unique; a duplicate of either maps to 409 via the constraint name.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(first_validation_message(&e))))?;
    validate_phone(input.phone.trim())?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let created = CreatorRepo::create(
        &state.pool,
        &CreateCreator {
            name: input.name.trim().to_string(),
            phone: input.phone.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            password_hash,
            bio: input.bio,
        },
    )
    .await?;

    tracing::info!(creator_id = created.id, "Creator account created");

    let token = generate_access_token(created.id, CREATOR_ROLE, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AuthResponse {
                token,
                creator: created.into(),
            },
        }),
    ))
}

/// POST /api/v1/creators/login
///
/// Authenticate with phone *or* email plus password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let phone = input.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let email = input
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());

    // 1. At least one identifier is required.
    if phone.is_none() && email.is_none() {
        return Err(AppError::BadRequest(
            "Provide a phone number or an email address".into(),
        ));
    }

    // 2. Find the creator by either identifier. Unknown identifiers get the
    //    same message as a wrong password.
    let creator = CreatorRepo::find_by_phone_or_email(&state.pool, phone, email.as_deref())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    // 3. Deactivated accounts cannot log in.
    if !creator.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // 4. Verify password.
    let password_valid = verify_password(&input.password, &creator.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    // 5. Stamp the login, then re-read so the client caches the refreshed row.
    CreatorRepo::touch_last_seen(&state.pool, creator.id).await?;
    let refreshed = CreatorRepo::find_by_id(&state.pool, creator.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Creator row vanished during login".into()))?;

    let token = generate_access_token(refreshed.id, CREATOR_ROLE, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(DataResponse {
        data: AuthResponse {
            token,
            creator: refreshed.into(),
        },
    }))
}

/// GET /api/v1/creators/me
///
/// Fresh profile for the authenticated creator; clients refresh their
/// cached copy from this.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthCreator,
) -> AppResult<Json<DataResponse<CreatorResponse>>> {
    let creator = CreatorRepo::find_by_id(&state.pool, auth.creator_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Creator",
            id: auth.creator_id,
        }))?;

    Ok(Json(DataResponse {
        data: creator.into(),
    }))
}

/// PUT /api/v1/creators/me
///
/// Update the authenticated creator's profile (name, bio).
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthCreator,
    Json(input): Json<UpdateCreator>,
) -> AppResult<Json<DataResponse<CreatorResponse>>> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Name must not be empty".into(),
            )));
        }
    }

    let updated = CreatorRepo::update(&state.pool, auth.creator_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Creator",
            id: auth.creator_id,
        }))?;

    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// First human-readable message out of a validator error set.
fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Invalid input".to_string())
}
