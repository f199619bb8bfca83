//! Insertion-order value objects for the agency (buyer) side.

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::models::validate_external_id;

/// One named terms-and-conditions attachment on an order.
#[derive(Debug, Clone, PartialEq)]
pub struct TermsAndConditions {
    /// Display name, e.g. `"Extra Ts and Cs"`.
    pub name: String,
    /// The terms text itself.
    pub content: String,
}

impl TermsAndConditions {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    fn to_wire(&self) -> Value {
        json!({ "name": self.name, "content": self.content })
    }
}

/// Order-level metadata shared by print and digital orders.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionOrderDetails {
    pub campaign_id: Option<String>,
    pub external_order_id: String,
    /// Publisher-side order reference, also capped at 32 characters.
    pub external_publisher_order_id: Option<String>,
    pub publisher_id: String,
    pub agency_buyer_first_name: Option<String>,
    pub agency_buyer_last_name: Option<String>,
    pub agency_buyer_email: Option<String>,
    pub recipient_emails: Vec<String>,
    pub notify_emails: Vec<String>,
    pub terms_and_conditions: Vec<TermsAndConditions>,
    pub respond_by_date: Option<NaiveDate>,
    pub additional_info: Option<String>,
    pub message: Option<String>,
    /// ISO currency code, `"GBP"` unless overridden.
    pub currency_code: String,
}

impl InsertionOrderDetails {
    pub fn builder(
        external_order_id: impl Into<String>,
        publisher_id: impl Into<String>,
    ) -> InsertionOrderDetailsBuilder {
        InsertionOrderDetailsBuilder {
            details: InsertionOrderDetails {
                campaign_id: None,
                external_order_id: external_order_id.into(),
                external_publisher_order_id: None,
                publisher_id: publisher_id.into(),
                agency_buyer_first_name: None,
                agency_buyer_last_name: None,
                agency_buyer_email: None,
                recipient_emails: Vec::new(),
                notify_emails: Vec::new(),
                terms_and_conditions: Vec::new(),
                respond_by_date: None,
                additional_info: None,
                message: None,
                currency_code: "GBP".to_string(),
            },
        }
    }

    /// Produce the `insertionOrder` wire mapping.
    pub fn to_wire(&self) -> Value {
        let mut dict = Map::new();
        if let Some(campaign_id) = &self.campaign_id {
            dict.insert("campaignId".into(), json!(campaign_id));
        }
        dict.insert("orderId".into(), json!(self.external_order_id));
        if let Some(publisher_order_id) = &self.external_publisher_order_id {
            dict.insert("publisherOrderId".into(), json!(publisher_order_id));
        }
        dict.insert("publisherId".into(), json!(self.publisher_id));
        if let Some(first_name) = &self.agency_buyer_first_name {
            dict.insert("agencyBuyerFirstName".into(), json!(first_name));
        }
        if let Some(last_name) = &self.agency_buyer_last_name {
            dict.insert("agencyBuyerLastName".into(), json!(last_name));
        }
        if let Some(email) = &self.agency_buyer_email {
            dict.insert("agencyBuyerEmail".into(), json!(email));
        }
        dict.insert("recipientEmails".into(), json!(self.recipient_emails));
        dict.insert("notifyEmails".into(), json!(self.notify_emails));
        let terms: Vec<Value> = self
            .terms_and_conditions
            .iter()
            .map(TermsAndConditions::to_wire)
            .collect();
        dict.insert("termsAndConditions".into(), Value::Array(terms));
        if let Some(date) = self.respond_by_date {
            dict.insert(
                "respondByDate".into(),
                json!(date.format("%Y-%m-%d").to_string()),
            );
        }
        if let Some(info) = &self.additional_info {
            dict.insert("additionalInfo".into(), json!(info));
        }
        if let Some(message) = &self.message {
            dict.insert("message".into(), json!(message));
        }
        dict.insert("currencyCode".into(), json!(self.currency_code));
        Value::Object(dict)
    }
}

/// Builder for [`InsertionOrderDetails`].
pub struct InsertionOrderDetailsBuilder {
    details: InsertionOrderDetails,
}

impl InsertionOrderDetailsBuilder {
    pub fn campaign_id(mut self, id: impl Into<String>) -> Self {
        self.details.campaign_id = Some(id.into());
        self
    }

    pub fn external_publisher_order_id(mut self, id: impl Into<String>) -> Self {
        self.details.external_publisher_order_id = Some(id.into());
        self
    }

    pub fn agency_buyer(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.details.agency_buyer_first_name = Some(first_name.into());
        self.details.agency_buyer_last_name = Some(last_name.into());
        self.details.agency_buyer_email = Some(email.into());
        self
    }

    pub fn recipient_email(mut self, email: impl Into<String>) -> Self {
        self.details.recipient_emails.push(email.into());
        self
    }

    pub fn notify_email(mut self, email: impl Into<String>) -> Self {
        self.details.notify_emails.push(email.into());
        self
    }

    pub fn terms_and_conditions(mut self, terms: TermsAndConditions) -> Self {
        self.details.terms_and_conditions.push(terms);
        self
    }

    pub fn respond_by_date(mut self, date: NaiveDate) -> Self {
        self.details.respond_by_date = Some(date);
        self
    }

    pub fn additional_info(mut self, info: impl Into<String>) -> Self {
        self.details.additional_info = Some(info.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.details.message = Some(message.into());
        self
    }

    /// Override the default `"GBP"` currency.
    pub fn currency_code(mut self, code: impl Into<String>) -> Self {
        self.details.currency_code = code.into();
        self
    }

    pub fn build(self) -> Result<InsertionOrderDetails> {
        let details = self.details;
        validate_external_id("orderId", &details.external_order_id)?;
        if let Some(publisher_order_id) = &details.external_publisher_order_id {
            validate_external_id("publisherOrderId", publisher_order_id)?;
        }
        Ok(details)
    }
}
