//! Crowdfunding campaign records and client-side lifecycle checks.
//!
//! Campaigns are plain data as the ledger reports them. The only invariants
//! enforced here are the ones the client must check before going to the
//! network: a create needs a title and a positive goal, and a withdrawn
//! campaign never accepts further funding.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::token::TokenAmount;
use crate::types::{DbId, Timestamp};

/// A campaign record as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: DbId,
    /// Principal text of the identity that created the campaign.
    pub owner: String,
    pub title: String,
    pub description: String,
    pub goal: TokenAmount,
    pub raised: TokenAmount,
    pub created_at: Timestamp,
    pub milestones: Vec<Milestone>,
    /// Terminal once set; the ledger never un-withdraws.
    pub withdrawn: bool,
}

/// A funding milestone attached to a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Input for creating a campaign.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub goal: TokenAmount,
}

// ---------------------------------------------------------------------------
// Pre-flight validation
// ---------------------------------------------------------------------------

/// Validate a campaign before submitting it to the ledger.
pub fn validate_new_campaign(input: &NewCampaign) -> Result<(), CoreError> {
    if input.title.trim().is_empty() {
        return Err(CoreError::validation("Campaign title is required"));
    }
    if input.goal.e8s() == 0 {
        return Err(CoreError::validation(
            "Campaign goal must be greater than 0",
        ));
    }
    Ok(())
}

/// Check that a campaign can still receive funds.
///
/// Runs before the wallet transfer so a withdrawn campaign is rejected
/// without any external call.
pub fn validate_funding(campaign: &Campaign) -> Result<(), CoreError> {
    if campaign.withdrawn {
        return Err(CoreError::validation(
            "Campaign funds have already been withdrawn",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_campaign(withdrawn: bool) -> Campaign {
        Campaign {
            id: 1,
            owner: "aaaaa-aa".to_string(),
            title: "Irrigation upgrade".to_string(),
            description: "Drip lines for the north field".to_string(),
            goal: TokenAmount::from_e8s(500_000_000),
            raised: TokenAmount::from_e8s(120_000_000),
            created_at: chrono::Utc::now(),
            milestones: vec![],
            withdrawn,
        }
    }

    // -- validate_new_campaign --

    #[test]
    fn new_campaign_with_title_and_goal_accepted() {
        let input = NewCampaign {
            title: "Seed fund".to_string(),
            description: String::new(),
            goal: TokenAmount::from_e8s(100),
        };
        assert!(validate_new_campaign(&input).is_ok());
    }

    #[test]
    fn blank_title_rejected() {
        let input = NewCampaign {
            title: "   ".to_string(),
            description: "desc".to_string(),
            goal: TokenAmount::from_e8s(100),
        };
        let err = validate_new_campaign(&input).unwrap_err();
        assert!(err.to_string().contains("title is required"));
    }

    #[test]
    fn zero_goal_rejected() {
        let input = NewCampaign {
            title: "Seed fund".to_string(),
            description: String::new(),
            goal: TokenAmount::from_e8s(0),
        };
        assert!(validate_new_campaign(&input).is_err());
    }

    // -- validate_funding --

    #[test]
    fn active_campaign_accepts_funding() {
        assert!(validate_funding(&sample_campaign(false)).is_ok());
    }

    #[test]
    fn withdrawn_campaign_rejects_funding() {
        let err = validate_funding(&sample_campaign(true)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("already been withdrawn"));
    }
}
