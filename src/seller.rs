//! Publisher-side (seller) client.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Map, Value};
use url::form_urlencoded;

use crate::config;
use crate::error::{PatsError, Result};
use crate::models::{validate_external_id, LineItem, MediaKind, Role, WireProfile};
use crate::transport::{relay_validation_results, CaptureSink, RetryPolicy, Transport};

const ACCEPT_CATALOG: &str = "application/vnd.mediaocean.catalog-v1+json";
const ACCEPT_ORDERS: &str = "application/vnd.mediaocean.order-v1+json";
const ACCEPT_RFPS: &str = "application/vnd.mediaocean.rfps-v1+json";
const ACCEPT_PROPOSALS: &str = "application/vnd.mediaocean.proposals-v1+json";

// ---------------------------------------------------------------------------
// PatsSeller
// ---------------------------------------------------------------------------

/// Seller-side PATS client: product catalogue upkeep, received orders
/// and RFPs, and proposals sent back to buyers.
pub struct PatsSeller {
    vendor_id: String,
    base_url: String,
    profile: WireProfile,
    transport: Transport,
}

impl PatsSeller {
    /// Create a builder for a vendor identified by `vendor_id`,
    /// authenticated with `api_key`.
    pub fn builder(vendor_id: impl Into<String>, api_key: impl Into<String>) -> PatsSellerBuilder {
        PatsSellerBuilder {
            vendor_id: vendor_id.into(),
            api_key: api_key.into(),
            base_url: config::PUBLISHER_API_BASE.to_string(),
            profile: WireProfile::default(),
            timeout: None,
            connect_timeout: None,
            retry: None,
            debug: false,
            capture: None,
        }
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    /// Create or update products in this vendor's catalogue.
    ///
    /// `data` is the full catalog payload, already shaped per the catalog
    /// schema. Per-product rejections in `validationResults` are relayed
    /// as a validation error.
    pub fn save_product_data(&self, data: &Value) -> Result<Value> {
        let path = format!("/vendors/{}/products/", self.vendor_id);
        let body = data.to_string();
        let response = self.transport.send_request(
            Method::POST,
            &self.base_url,
            &path,
            &[("Accept", ACCEPT_CATALOG)],
            Some(&body),
        )?;
        let js = response.into_value();
        relay_validation_results(&js)?;
        Ok(js)
    }

    /// View orders received from buyers within a date window.
    pub fn view_orders(&self, start_date: NaiveDate, end_date: Option<NaiveDate>) -> Result<Value> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("startDate", &start_date.format("%Y-%m-%d").to_string());
        if let Some(end) = end_date {
            query.append_pair("endDate", &end.format("%Y-%m-%d").to_string());
        }
        let path = format!("/vendors/{}/orders?{}", self.vendor_id, query.finish());
        self.get(&path, ACCEPT_ORDERS)
    }

    /// View the revision history of one received order.
    pub fn view_order_history(&self, order_id: &str) -> Result<Value> {
        let path = format!("/vendors/{}/orders/{}/history", self.vendor_id, order_id);
        self.get(&path, ACCEPT_ORDERS)
    }

    /// View RFPs received from buyers, optionally within a date window.
    pub fn view_rfps(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Value> {
        let mut path = format!("/vendors/{}/rfps", self.vendor_id);
        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        if let Some(start) = start_date {
            query.append_pair("startDate", &start.format("%Y-%m-%d").to_string());
            any = true;
        }
        if let Some(end) = end_date {
            query.append_pair("endDate", &end.format("%Y-%m-%d").to_string());
            any = true;
        }
        if any {
            path.push('?');
            path.push_str(&query.finish());
        }
        self.get(&path, ACCEPT_RFPS)
    }

    /// View the proposals already sent in response to one RFP.
    pub fn view_proposals(&self, rfp_id: &str) -> Result<Value> {
        let path = format!("/vendors/{}/rfps/{}/proposals", self.vendor_id, rfp_id);
        self.get(&path, ACCEPT_PROPOSALS)
    }

    /// Send a proposal in response to a buyer's RFP.
    ///
    /// Line items are serialized in the seller-role wire form; an entry
    /// in the wrong media list is rejected before any request is made.
    pub fn send_proposal(
        &self,
        rfp_id: &str,
        proposal_external_id: &str,
        comments: Option<&str>,
        digital_line_items: &[LineItem],
        print_line_items: &[LineItem],
    ) -> Result<Value> {
        validate_external_id("proposalExternalId", proposal_external_id)?;
        check_media(digital_line_items, MediaKind::Digital)?;
        check_media(print_line_items, MediaKind::Print)?;

        let mut proposal = Map::new();
        proposal.insert("proposalExternalId".into(), json!(proposal_external_id));
        if let Some(comments) = comments {
            proposal.insert("comments".into(), json!(comments));
        }
        proposal.insert(
            "digitalLineItems".into(),
            self.wire_items(digital_line_items),
        );
        proposal.insert("printLineItems".into(), self.wire_items(print_line_items));

        // The external id appears at both levels; an upstream quirk.
        let data = json!({
            "rfpPublicId": rfp_id,
            "vendorPublicId": self.vendor_id,
            "proposalExternalId": proposal_external_id,
            "proposal": Value::Object(proposal),
        });
        let body = data.to_string();
        let path = format!("/vendors/{}/rfps/{}/proposals", self.vendor_id, rfp_id);

        let response = self.transport.send_request(
            Method::POST,
            &self.base_url,
            &path,
            &[("Accept", ACCEPT_PROPOSALS)],
            Some(&body),
        )?;
        Ok(response.into_value())
    }

    fn wire_items(&self, items: &[LineItem]) -> Value {
        Value::Array(
            items
                .iter()
                .map(|item| item.to_wire(Role::Seller, self.profile))
                .collect(),
        )
    }

    fn get(&self, path: &str, accept: &str) -> Result<Value> {
        let response = self.transport.send_request(
            Method::GET,
            &self.base_url,
            path,
            &[("Accept", accept)],
            None,
        )?;
        Ok(response.into_value())
    }
}

fn check_media(items: &[LineItem], expected: MediaKind) -> Result<()> {
    for item in items {
        if item.media_kind() != expected {
            return Err(PatsError::InvalidArgument(format!(
                "line item '{}' is {} but was passed in the {} list",
                item.external_id,
                item.media_kind(),
                expected
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// PatsSellerBuilder
// ---------------------------------------------------------------------------

/// Builder for [`PatsSeller`].
pub struct PatsSellerBuilder {
    vendor_id: String,
    api_key: String,
    base_url: String,
    profile: WireProfile,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<RetryPolicy>,
    debug: bool,
    capture: Option<CaptureSink>,
}

impl PatsSellerBuilder {
    /// Override the publisher API base URL. Defaults to the demo endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Numeric wire profile for money fields. Defaults to fixed-point
    /// strings.
    pub fn wire_profile(mut self, profile: WireProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn capture(mut self, sink: CaptureSink) -> Self {
        self.capture = Some(sink);
        self
    }

    pub fn build(self) -> Result<PatsSeller> {
        if self.vendor_id.is_empty() {
            return Err(PatsError::InvalidArgument(
                "vendor id is required".to_string(),
            ));
        }
        let mut transport = Transport::builder(self.api_key);
        if let Some(timeout) = self.timeout {
            transport = transport.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            transport = transport.connect_timeout(timeout);
        }
        if let Some(retry) = self.retry {
            transport = transport.retry(retry);
        }
        transport = transport.debug(self.debug);
        if let Some(sink) = self.capture {
            transport = transport.capture(sink);
        }
        Ok(PatsSeller {
            vendor_id: self.vendor_id,
            base_url: self.base_url,
            profile: self.profile,
            transport: transport.build()?,
        })
    }
}
