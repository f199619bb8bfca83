//! Agency-side (buyer) client.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Map, Value};
use url::form_urlencoded;

use crate::config;
use crate::error::{PatsError, Result};
use crate::models::{CampaignDetails, InsertionOrderDetails, LineItem, MediaKind, Role, WireProfile};
use crate::transport::{relay_validation_results, ApiResponse, CaptureSink, RetryPolicy, Transport};

// Versioned Accept media types per endpoint family, a vendor convention.
const ACCEPT_PRISMA: &str = "application/vnd.mediaocean.prisma-v1.0+json";
const ACCEPT_CATALOG: &str = "application/vnd.mediaocean.catalog-v1+json";
const ACCEPT_RFPS: &str = "application/vnd.mediaocean.rfps-v1+json";

// ---------------------------------------------------------------------------
// PatsBuyer
// ---------------------------------------------------------------------------

/// Buyer-side PATS client: campaigns, orders, RFPs and the vendor
/// product catalogue.
pub struct PatsBuyer {
    agency_id: String,
    company_id: Option<String>,
    person_id: Option<String>,
    base_url: String,
    profile: WireProfile,
    transport: Transport,
}

impl PatsBuyer {
    /// Create a builder for an agency identified by `agency_id` (e.g.
    /// `"35-IDSDKAD-7"`), authenticated with `api_key`.
    pub fn builder(agency_id: impl Into<String>, api_key: impl Into<String>) -> PatsBuyerBuilder {
        PatsBuyerBuilder {
            agency_id: agency_id.into(),
            api_key: api_key.into(),
            company_id: None,
            person_id: None,
            base_url: config::AGENCY_API_BASE.to_string(),
            profile: WireProfile::default(),
            timeout: None,
            connect_timeout: None,
            retry: None,
            debug: false,
            capture: None,
        }
    }

    pub fn agency_id(&self) -> &str {
        &self.agency_id
    }

    /// Create a campaign, the container that RFPs and orders hang off.
    ///
    /// Returns the new campaign's id, taken from the Location URI of a
    /// 201 or the `campaignId` field of a JSON body.
    pub fn create_campaign(&self, details: &CampaignDetails) -> Result<String> {
        let organisation = details
            .organisation_id
            .as_deref()
            .unwrap_or(self.agency_id.as_str());
        let company = details
            .company_id
            .as_deref()
            .or(self.company_id.as_deref())
            .ok_or_else(|| missing_default("company id"))?;
        let person = details
            .person_id
            .as_deref()
            .or(self.person_id.as_deref())
            .ok_or_else(|| missing_default("person id"))?;

        let headers = [
            ("Accept", ACCEPT_PRISMA),
            ("X-MO-Organization-ID", organisation),
            ("X-MO-Company-ID", company),
            ("X-MO-Person-ID", person),
        ];
        let body = details.to_wire().to_string();
        let response = self.transport.send_request(
            Method::POST,
            &self.base_url,
            "/campaigns",
            &headers,
            Some(&body),
        )?;

        match response {
            ApiResponse::Created(uri) => trailing_segment(&uri),
            ApiResponse::Json(js) => match js.get("campaignId").and_then(|v| v.as_str()) {
                Some(id) => Ok(id.to_string()),
                None => Err(PatsError::UnexpectedResponse(
                    "campaign response carried no campaignId".to_string(),
                )),
            },
            ApiResponse::Empty => Err(PatsError::UnexpectedResponse(
                "campaign response was empty".to_string(),
            )),
        }
    }

    /// Send a print or digital order to a publisher.
    ///
    /// Line items are serialized in the buyer-role wire form and must all
    /// match `media`; an empty slice omits the `lineItems` key entirely.
    /// Returns the order resource URI from the 201 Location header, or
    /// the `orderId` field of a JSON body.
    pub fn create_order(
        &self,
        external_campaign_id: Option<&str>,
        media: MediaKind,
        details: &InsertionOrderDetails,
        line_items: &[LineItem],
    ) -> Result<String> {
        for item in line_items {
            if item.media_kind() != media {
                return Err(PatsError::InvalidArgument(format!(
                    "line item '{}' is {} but the order is {}",
                    item.external_id,
                    item.media_kind(),
                    media
                )));
            }
        }

        let company = self
            .company_id
            .as_deref()
            .ok_or_else(|| missing_default("company id"))?;
        let mut headers = vec![
            ("Accept", ACCEPT_PRISMA),
            ("X-MO-Organization-ID", self.agency_id.as_str()),
            ("X-MO-Company-ID", company),
        ];
        if let Some(person) = self.person_id.as_deref() {
            headers.push(("X-MO-Person-ID", person));
        }

        let mut data = Map::new();
        if let Some(campaign_id) = external_campaign_id {
            data.insert("externalCampaignId".into(), json!(campaign_id));
        }
        data.insert("mediaType".into(), json!(media.as_str()));
        data.insert("insertionOrder".into(), details.to_wire());
        if !line_items.is_empty() {
            let items: Vec<Value> = line_items
                .iter()
                .map(|item| item.to_wire(Role::Buyer, self.profile))
                .collect();
            data.insert("lineItems".into(), Value::Array(items));
        }
        let body = Value::Object(data).to_string();

        let response = self.transport.send_request(
            Method::PUT,
            &self.base_url,
            "/order/send",
            &headers,
            Some(&body),
        )?;

        match response {
            ApiResponse::Created(uri) => Ok(uri),
            ApiResponse::Json(js) => match js.get("orderId").and_then(|v| v.as_str()) {
                Some(id) => Ok(id.to_string()),
                None => Err(PatsError::UnexpectedResponse(
                    "order response carried no orderId".to_string(),
                )),
            },
            ApiResponse::Empty => Err(PatsError::UnexpectedResponse(
                "order response was empty".to_string(),
            )),
        }
    }

    /// Invite publishers to respond to a campaign with proposals.
    pub fn send_rfp(
        &self,
        campaign_id: &str,
        vendor_ids: &[&str],
        budget: Option<f64>,
        respond_by_date: Option<NaiveDate>,
        comments: Option<&str>,
        media: MediaKind,
    ) -> Result<Value> {
        if vendor_ids.is_empty() {
            return Err(PatsError::InvalidArgument(
                "an RFP needs at least one vendor".to_string(),
            ));
        }
        let company = self
            .company_id
            .as_deref()
            .ok_or_else(|| missing_default("company id"))?;
        let headers = [
            ("Accept", ACCEPT_RFPS),
            ("X-MO-Organization-ID", self.agency_id.as_str()),
            ("X-MO-Company-ID", company),
        ];

        let mut data = Map::new();
        data.insert("vendorPublicIds".into(), json!(vendor_ids));
        data.insert("mediaType".into(), json!(media.as_str()));
        if let Some(budget) = budget {
            data.insert("budget".into(), json!(budget));
        }
        if let Some(date) = respond_by_date {
            data.insert(
                "respondByDate".into(),
                json!(date.format("%Y-%m-%d").to_string()),
            );
        }
        if let Some(comments) = comments {
            data.insert("comments".into(), json!(comments));
        }
        let body = Value::Object(data).to_string();
        let path = format!("/campaigns/{}/rfps", campaign_id);

        let response = self.transport.send_request(
            Method::POST,
            &self.base_url,
            &path,
            &headers,
            Some(&body),
        )?;
        Ok(response.into_value())
    }

    /// List a vendor's product catalogue, optionally paged.
    ///
    /// A non-empty `validationResults` list in the body is relayed as a
    /// validation error even though the transport status was a success.
    pub fn list_products(
        &self,
        vendor_id: &str,
        start_index: Option<u32>,
        max_results: Option<u32>,
        include_logo: bool,
    ) -> Result<Value> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(start) = start_index {
            query.append_pair("start_index", &start.to_string());
        }
        if let Some(max) = max_results {
            query.append_pair("max_results", &max.to_string());
        }
        if include_logo {
            query.append_pair("include_logo", "true");
        }
        let path = format!(
            "/agencies/{}/vendors/{}/products/?{}",
            self.agency_id,
            vendor_id,
            query.finish()
        );

        let response = self.transport.send_request(
            Method::GET,
            &self.base_url,
            &path,
            &[("Accept", ACCEPT_CATALOG)],
            None,
        )?;
        let js = response.into_value();
        relay_validation_results(&js)?;
        Ok(js)
    }
}

fn missing_default(what: &str) -> PatsError {
    PatsError::InvalidArgument(format!(
        "no {} was given and the client has no default",
        what
    ))
}

/// The last non-empty path segment of a resource URI.
fn trailing_segment(uri: &str) -> Result<String> {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            PatsError::UnexpectedResponse(format!("Location URI '{}' carried no resource id", uri))
        })
}

// ---------------------------------------------------------------------------
// PatsBuyerBuilder
// ---------------------------------------------------------------------------

/// Builder for [`PatsBuyer`].
pub struct PatsBuyerBuilder {
    agency_id: String,
    api_key: String,
    company_id: Option<String>,
    person_id: Option<String>,
    base_url: String,
    profile: WireProfile,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<RetryPolicy>,
    debug: bool,
    capture: Option<CaptureSink>,
}

impl PatsBuyerBuilder {
    /// Default company id used when a call does not name one.
    pub fn company_id(mut self, id: impl Into<String>) -> Self {
        self.company_id = Some(id.into());
        self
    }

    /// Default person id used when a call does not name one.
    pub fn person_id(mut self, id: impl Into<String>) -> Self {
        self.person_id = Some(id.into());
        self
    }

    /// Override the agency API base URL. Defaults to the demo endpoint.
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

    pub fn build(self) -> Result<PatsBuyer> {
        if self.agency_id.is_empty() {
            return Err(PatsError::InvalidArgument(
                "agency id is required".to_string(),
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
        Ok(PatsBuyer {
            agency_id: self.agency_id,
            company_id: self.company_id,
            person_id: self.person_id,
            base_url: self.base_url,
            profile: self.profile,
            transport: transport.build()?,
        })
    }
}
