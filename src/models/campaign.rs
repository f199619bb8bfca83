//! Campaign value object for the agency (buyer) side.

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use crate::error::{PatsError, Result};
use crate::models::validate_external_id;

/// An advertising campaign to create on the agency side.
///
/// A campaign carries either one aggregate budget or per-media budgets,
/// never both; the builder rejects the combination.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignDetails {
    pub campaign_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Advertiser code known to PATS, e.g. `"DEM"`.
    pub advertiser_code: String,
    pub external_id: Option<String>,
    /// Organisation (agency) id; falls back to the client default.
    pub organisation_id: Option<String>,
    pub person_id: Option<String>,
    pub company_id: Option<String>,
    pub campaign_budget: Option<f64>,
    pub print_budget: Option<f64>,
    pub digital_budget: Option<f64>,
    pub print_campaign: bool,
    pub digital_campaign: bool,
}

impl CampaignDetails {
    pub fn builder(
        campaign_name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        advertiser_code: impl Into<String>,
    ) -> CampaignDetailsBuilder {
        CampaignDetailsBuilder {
            details: CampaignDetails {
                campaign_name: campaign_name.into(),
                start_date,
                end_date,
                advertiser_code: advertiser_code.into(),
                external_id: None,
                organisation_id: None,
                person_id: None,
                company_id: None,
                campaign_budget: None,
                print_budget: None,
                digital_budget: None,
                print_campaign: false,
                digital_campaign: false,
            },
        }
    }

    /// Produce the wire mapping posted to `/campaigns`.
    ///
    /// The media list names each medium in play (`Print`, `Online`), each
    /// entry carrying its own `Budget` when a per-media budget was given;
    /// `CampaignBudget` appears only for an aggregate budget.
    pub fn to_wire(&self) -> Value {
        let mut dict = Map::new();
        dict.insert("CampaignName".into(), json!(self.campaign_name));
        dict.insert(
            "StartDate".into(),
            json!(self.start_date.format("%Y-%m-%d").to_string()),
        );
        dict.insert(
            "EndDate".into(),
            json!(self.end_date.format("%Y-%m-%d").to_string()),
        );
        dict.insert("Advertiser".into(), json!(self.advertiser_code));
        if let Some(external_id) = &self.external_id {
            dict.insert(
                "ExternalDetails".into(),
                json!({ "CampaignSourceID": external_id }),
            );
        }

        let mut media_budget = Map::new();
        if let Some(budget) = self.campaign_budget {
            media_budget.insert("CampaignBudget".into(), json!(budget));
        }
        let mut medias = Vec::new();
        if self.print_campaign || self.print_budget.is_some() {
            let mut media = Map::new();
            media.insert("MediaMix".into(), json!("Print"));
            if let Some(budget) = self.print_budget {
                media.insert("Budget".into(), json!(budget));
            }
            medias.push(Value::Object(media));
        }
        if self.digital_campaign || self.digital_budget.is_some() {
            let mut media = Map::new();
            media.insert("MediaMix".into(), json!("Online"));
            if let Some(budget) = self.digital_budget {
                media.insert("Budget".into(), json!(budget));
            }
            medias.push(Value::Object(media));
        }
        media_budget.insert("Medias".into(), json!({ "Media": medias }));
        dict.insert("MediaBudget".into(), Value::Object(media_budget));

        Value::Object(dict)
    }
}

/// Builder for [`CampaignDetails`].
pub struct CampaignDetailsBuilder {
    details: CampaignDetails,
}

impl CampaignDetailsBuilder {
    /// External tracking id, emitted as `ExternalDetails.CampaignSourceID`.
    pub fn external_id(mut self, id: impl Into<String>) -> Self {
        self.details.external_id = Some(id.into());
        self
    }

    pub fn organisation_id(mut self, id: impl Into<String>) -> Self {
        self.details.organisation_id = Some(id.into());
        self
    }

    pub fn person_id(mut self, id: impl Into<String>) -> Self {
        self.details.person_id = Some(id.into());
        self
    }

    pub fn company_id(mut self, id: impl Into<String>) -> Self {
        self.details.company_id = Some(id.into());
        self
    }

    /// One aggregate budget for the whole campaign. Mutually exclusive
    /// with the per-media budgets.
    pub fn campaign_budget(mut self, budget: f64) -> Self {
        self.details.campaign_budget = Some(budget);
        self
    }

    /// Include print media, with its own budget.
    pub fn print_budget(mut self, budget: f64) -> Self {
        self.details.print_budget = Some(budget);
        self.details.print_campaign = true;
        self
    }

    /// Include digital media, with its own budget.
    pub fn digital_budget(mut self, budget: f64) -> Self {
        self.details.digital_budget = Some(budget);
        self.details.digital_campaign = true;
        self
    }

    /// Include print media without a per-media budget.
    pub fn print_campaign(mut self) -> Self {
        self.details.print_campaign = true;
        self
    }

    /// Include digital media without a per-media budget.
    pub fn digital_campaign(mut self) -> Self {
        self.details.digital_campaign = true;
        self
    }

    pub fn build(self) -> Result<CampaignDetails> {
        let details = self.details;
        if let Some(external_id) = &details.external_id {
            validate_external_id("CampaignSourceID", external_id)?;
        }
        if details.end_date < details.start_date {
            return Err(PatsError::InvalidArgument(format!(
                "campaign end date {} precedes start date {}",
                details.end_date, details.start_date
            )));
        }
        let per_media = details.print_budget.is_some() || details.digital_budget.is_some();
        if details.campaign_budget.is_some() && per_media {
            return Err(PatsError::InvalidArgument(
                "a campaign carries either an aggregate budget or per-media budgets, not both"
                    .to_string(),
            ));
        }
        Ok(details)
    }
}
