//! HTTP transport shared by the buyer- and seller-side clients.
//!
//! Every façade method funnels through [`Transport::send_request`], which
//! assembles headers, performs one blocking HTTPS call with a bounded
//! gateway-timeout retry, and classifies the response uniformly. The vendor
//! hides some failures inside nominally successful responses (a 200 body
//! whose `status` is `"FAILED"`), so classification goes beyond the status
//! code alone.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, LOCATION, USER_AGENT};
use reqwest::{Method, StatusCode};

use crate::config;
use crate::error::{relay_error, PatsError, Result};

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// Bounded retry policy for gateway timeouts.
///
/// A 504 means the vendor gateway gave up waiting on its backend, which is
/// routinely transient; every other status is terminal after one attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of requests issued before the last 504 is surfaced.
    pub max_attempts: u32,
    /// Fixed delay slept between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn is_retryable(&self, status: StatusCode) -> bool {
        status == StatusCode::GATEWAY_TIMEOUT
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

// ---------------------------------------------------------------------------
// RawCapture
// ---------------------------------------------------------------------------

/// Diagnostic buffer written once per request when raw-capture mode is on.
///
/// Purely observational: the transport writes these three fields and never
/// reads them back. Callers typically stash the sink in their session
/// state to show "what did the SDK actually send" in support tooling.
#[derive(Debug, Clone, Default)]
pub struct RawCapture {
    /// Command-line reproduction of the request.
    pub curl: Option<String>,
    /// Raw status code of the last response.
    pub status: Option<u16>,
    /// Raw body text of the last response.
    pub body: Option<String>,
}

/// Shared handle to a [`RawCapture`] buffer supplied by the caller.
pub type CaptureSink = Arc<Mutex<RawCapture>>;

// ---------------------------------------------------------------------------
// ApiResponse
// ---------------------------------------------------------------------------

/// The three success shapes a PATS call can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 201 Created: the Location header value, a URI for the new resource.
    Created(String),
    /// Success with an empty body ("no content").
    Empty,
    /// Success with a decoded JSON body.
    Json(serde_json::Value),
}

impl ApiResponse {
    /// The Location URI, if this was a 201 Created.
    pub fn location(&self) -> Option<&str> {
        match self {
            ApiResponse::Created(uri) => Some(uri),
            _ => None,
        }
    }

    /// Collapse into a JSON value: the decoded body, the Location URI as a
    /// string, or the empty-string sentinel for an empty body.
    pub fn into_value(self) -> serde_json::Value {
        match self {
            ApiResponse::Created(uri) => serde_json::Value::String(uri),
            ApiResponse::Empty => serde_json::Value::String(String::new()),
            ApiResponse::Json(js) => js,
        }
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

type SleepFn = Box<dyn Fn(Duration) + Send + Sync>;

/// Builder for configuring and constructing a [`Transport`].
pub struct TransportBuilder {
    api_key: String,
    user_agent: String,
    timeout: Duration,
    connect_timeout: Duration,
    retry: RetryPolicy,
    debug: bool,
    capture: Option<CaptureSink>,
    sleep: SleepFn,
}

impl TransportBuilder {
    /// Set the read timeout for each request. Defaults to 60 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout. Defaults to 10 seconds.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the gateway-timeout retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable verbose request/response logging at debug level.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Supply a sink that receives the curl reproduction, raw status and
    /// raw body of every request.
    pub fn capture(mut self, sink: CaptureSink) -> Self {
        self.capture = Some(sink);
        self
    }

    /// Override the sleep used between retry attempts. Intended for tests,
    /// which should never sleep for real.
    pub fn sleep_fn(mut self, sleep: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    /// Build the transport, constructing the underlying HTTP client.
    pub fn build(self) -> Result<Transport> {
        let client = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?;
        Ok(Transport {
            client,
            api_key: self.api_key,
            user_agent: self.user_agent,
            retry: self.retry,
            debug: self.debug,
            capture: self.capture,
            sleep: self.sleep,
        })
    }
}

/// Executes one HTTP request against the vendor API and classifies the
/// outcome uniformly for all callers.
///
/// Stateless between calls apart from the configuration fixed at
/// construction; the only mutation it ever performs is writing the
/// diagnostic fields of an optional caller-supplied [`CaptureSink`].
pub struct Transport {
    client: Client,
    api_key: String,
    user_agent: String,
    retry: RetryPolicy,
    debug: bool,
    capture: Option<CaptureSink>,
    sleep: SleepFn,
}

impl Transport {
    /// Create a builder for a transport authenticated with `api_key`.
    pub fn builder(api_key: impl Into<String>) -> TransportBuilder {
        TransportBuilder {
            api_key: api_key.into(),
            user_agent: config::USER_AGENT.to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            debug: false,
            capture: None,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Perform one request and classify the response.
    ///
    /// `path` must already carry any query string, encoded by the caller.
    /// `extra_headers` are merged over the base set (user agent, JSON
    /// content type, API key); `body` is a pre-serialized JSON string.
    ///
    /// On success exactly one of the [`ApiResponse`] shapes is returned;
    /// every failure path produces a [`PatsError`].
    pub fn send_request(
        &self,
        method: Method,
        base_url: &str,
        path: &str,
        extra_headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", base_url, path);
        let headers = self.build_headers(extra_headers)?;

        if let Some(sink) = &self.capture {
            if let Ok(mut cap) = sink.lock() {
                cap.curl = Some(curl_command(&method, &url, &headers, body));
                cap.status = None;
                cap.body = None;
            }
        }

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            let mut request = self
                .client
                .request(method.clone(), &url)
                .headers(headers.clone());
            if let Some(body) = body {
                request = request.body(body.to_string());
            }
            if self.debug {
                log::debug!(
                    "{} {} attempt {}/{} body={:?}",
                    method,
                    url,
                    attempt,
                    self.retry.max_attempts,
                    body
                );
            }

            let response = request.send()?;
            if self.retry.is_retryable(response.status()) && attempt < self.retry.max_attempts {
                log::warn!(
                    "{} from {}, retrying in {:?} (attempt {}/{})",
                    response.status(),
                    url,
                    self.retry.delay,
                    attempt,
                    self.retry.max_attempts
                );
                (self.sleep)(self.retry.delay);
                continue;
            }
            break response;
        };

        self.classify(response)
    }

    /// Merge `extra` over the base header set.
    fn build_headers(&self, extra: &[(&str, &str)]) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|e| PatsError::InvalidHeader(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(config::API_KEY_HEADER),
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| PatsError::InvalidHeader(e.to_string()))?,
        );
        for (name, value) in extra {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| PatsError::InvalidHeader(e.to_string()))?,
                HeaderValue::from_str(value)
                    .map_err(|e| PatsError::InvalidHeader(e.to_string()))?,
            );
        }
        Ok(headers)
    }

    /// Classify a terminal (post-retry) response.
    fn classify(&self, response: reqwest::blocking::Response) -> Result<ApiResponse> {
        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = response.text()?;

        if let Some(sink) = &self.capture {
            if let Ok(mut cap) = sink.lock() {
                cap.status = Some(status.as_u16());
                cap.body = Some(text.clone());
            }
        }
        if self.debug {
            log::debug!("response {}: {}", status, text);
        }

        // A 400 body is plain text, not JSON; pass it through verbatim.
        if status == StatusCode::BAD_REQUEST {
            return Err(relay_error(400, &text, &self.api_key));
        }

        // 201: the result is the new resource's URI, not the body.
        if status == StatusCode::CREATED {
            return match location {
                Some(uri) => Ok(ApiResponse::Created(uri)),
                None => Err(PatsError::MissingLocation),
            };
        }

        // 422 carries details in the body, so it falls through to decoding.
        if status != StatusCode::OK && status != StatusCode::UNPROCESSABLE_ENTITY {
            let reason = match status.canonical_reason() {
                Some(phrase) if text.is_empty() => phrase.to_string(),
                Some(phrase) => format!("{}: {}", phrase, text),
                None => text.clone(),
            };
            return Err(relay_error(status.as_u16(), &reason, &self.api_key));
        }

        if text.is_empty() {
            return Ok(ApiResponse::Empty);
        }

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(self.relay_unprocessable(&text));
        }

        let js: serde_json::Value = serde_json::from_str(&text)?;

        // The call can return 200 and still carry a domain-level rejection.
        if js.get("status").and_then(|s| s.as_str()) == Some("FAILED") {
            let reason = field_validation_summary(&js);
            return Err(relay_error(422, &reason, &self.api_key));
        }

        Ok(ApiResponse::Json(js))
    }

    /// Build the error for a 422 body: use the embedded `message` (with its
    /// application `code` when present), else the raw body text.
    fn relay_unprocessable(&self, text: &str) -> PatsError {
        match serde_json::from_str::<ErrorBody>(text) {
            Ok(ErrorBody {
                message: Some(message),
                code,
            }) => relay_error(code.unwrap_or(422), &message, &self.api_key),
            _ => relay_error(422, text, &self.api_key),
        }
    }
}

/// The structured 422 body shape.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    code: Option<u16>,
    message: Option<String>,
}

/// One entry of a soft-failed body's `fieldValidations` list.
#[derive(Debug, serde::Deserialize)]
struct FieldValidation {
    #[serde(rename = "dataName")]
    data_name: Option<String>,
    message: Option<String>,
}

/// Join every `fieldValidations` entry of a soft-failed body as
/// `"<dataName>: <message>"`, comma-separated, dropping the name part when
/// the entry has none.
fn field_validation_summary(js: &serde_json::Value) -> String {
    let entries: Vec<FieldValidation> = js
        .get("fieldValidations")
        .cloned()
        .and_then(|list| serde_json::from_value(list).ok())
        .unwrap_or_default();
    let parts: Vec<String> = entries
        .iter()
        .map(|entry| {
            let message = entry.message.as_deref().unwrap_or_default();
            match entry.data_name.as_deref() {
                Some(name) => format!("{}: {}", name, message),
                None => message.to_string(),
            }
        })
        .collect();
    if parts.is_empty() {
        "FAILED".to_string()
    } else {
        parts.join(", ")
    }
}

/// Catalog endpoints report per-product rejections in a
/// `validationResults` list inside an otherwise successful body. A
/// non-empty list is a failure.
pub(crate) fn relay_validation_results(js: &serde_json::Value) -> Result<()> {
    let Some(results) = js.get("validationResults").and_then(|v| v.as_array()) else {
        return Ok(());
    };
    let Some(first) = results.first() else {
        return Ok(());
    };
    let product = first
        .get("productId")
        .and_then(|p| p.as_str())
        .unwrap_or("unknown");
    let message = first
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("validation failed");
    Err(PatsError::Validation {
        reason: format!("Product ID {}: {}", product, message),
    })
}

/// Synthesize a command-line reproduction of a request for the capture
/// sink. Single quotes inside the body close and reopen the shell quoting
/// (`'` becomes `'\''`) so the command can be pasted as-is.
fn curl_command(method: &Method, url: &str, headers: &HeaderMap, body: Option<&str>) -> String {
    let mut cmd = format!("curl -v -X {} \"{}\"", method, url);
    for (name, value) in headers {
        cmd.push_str(&format!(
            " -H '{}: {}'",
            name,
            value.to_str().unwrap_or_default()
        ));
    }
    if let Some(body) = body {
        cmd.push_str(&format!(" --data '{}'", body.replace('\'', "'\\''")));
    }
    cmd
}
