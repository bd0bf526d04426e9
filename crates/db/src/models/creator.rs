//! Creator entity model and DTOs (PRD-20).

use canopy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `creators` table, password hash included.
///
/// Deliberately not `Serialize`: anything leaving the server goes
/// through [`CreatorResponse`], which drops the hash.
#[derive(Debug, Clone, FromRow)]
pub struct Creator {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub is_active: bool,
    pub last_seen_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The creator shape clients see; everything except the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct CreatorResponse {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub bio: Option<String>,
    pub created_at: Timestamp,
}

impl From<Creator> for CreatorResponse {
    fn from(creator: Creator) -> Self {
        Self {
            id: creator.id,
            name: creator.name,
            phone: creator.phone,
            email: creator.email,
            bio: creator.bio,
            created_at: creator.created_at,
        }
    }
}

/// Insert DTO for new creators.
///
/// Built internally by the signup handler after password hashing; never
/// deserialized from a request body.
#[derive(Debug, Clone)]
pub struct CreateCreator {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub bio: Option<String>,
}

/// Patch DTO for profile updates. Only non-`None` fields are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCreator {
    pub name: Option<String>,
    pub bio: Option<String>,
}
