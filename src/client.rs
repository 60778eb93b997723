//! HTTP client for the email-fetch action

use crate::config::ProbeConfig;
use crate::error::{Error, Result};
use crate::report;
use crate::request::FetchEmailsRequest;
use reqwest::header::HeaderMap;
use serde_json::{Map, Value};
use std::io::Write;
use tracing::{debug, info, warn};

const NO_EMAILS: &[Value] = &[];

/// A captured response from the backend.
///
/// The body is kept as text; it is only decoded as JSON when it is
/// rendered, since error responses may be plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Header `(name, value)` pairs, names lowercased, one entry per
    /// name with repeated values joined by `", "`.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ProbeResponse {
    /// Whether the backend answered with exactly `200 OK`.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the body is not valid JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// The `emails` field of a success body.
    ///
    /// A missing `emails` key yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedShape`] if the body is not a JSON
    /// object, or if `emails` is `null`, a boolean or a number.
    pub fn emails(data: &Value) -> Result<Emails<'_>> {
        let object = data.as_object().ok_or_else(|| {
            Error::UnexpectedShape(format!("expected a JSON object, got {}", kind(data)))
        })?;

        match object.get("emails") {
            None => Ok(Emails::List(NO_EMAILS)),
            Some(Value::Array(emails)) => Ok(Emails::List(emails)),
            Some(Value::Object(emails)) => Ok(Emails::Map(emails)),
            Some(Value::String(emails)) => Ok(Emails::Text(emails)),
            Some(other) => Err(Error::UnexpectedShape(format!(
                "`emails` has no length, got {}",
                kind(other)
            ))),
        }
    }
}

/// Whatever container the backend put under `emails`.
///
/// Only `List` is the expected shape; the others are still counted so the
/// report shows what actually came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emails<'a> {
    List(&'a [Value]),
    /// Counted by key.
    Map(&'a Map<String, Value>),
    /// Counted by character.
    Text(&'a str),
}

impl Emails<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(emails) => emails.len(),
            Self::Map(emails) => emails.len(),
            Self::Text(emails) => emails.chars().count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first entry, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedShape`] for a non-empty object, which
    /// has no positional first entry.
    pub fn first(&self) -> Result<Option<Value>> {
        match self {
            Self::List(emails) => Ok(emails.first().cloned()),
            Self::Map(emails) if emails.is_empty() => Ok(None),
            Self::Map(emails) => Err(Error::UnexpectedShape(format!(
                "`emails` is an object with {} key(s), it has no first entry",
                emails.len()
            ))),
            Self::Text(emails) => Ok(emails.chars().next().map(|c| Value::String(c.to_string()))),
        }
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Flatten a header map, joining repeated names with `", "`.
fn collect_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .keys()
        .map(|name| {
            let values: Vec<String> = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect();
            (name.as_str().to_string(), values.join(", "))
        })
        .collect()
}

/// Client that posts a single [`FetchEmailsRequest`] to the backend
pub struct ProbeClient {
    config: ProbeConfig,
    http: reqwest::Client,
}

impl ProbeClient {
    #[must_use]
    pub fn new(config: ProbeConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Full URL the request is sent to.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    /// POST the payload and capture status, headers and body.
    ///
    /// Any HTTP status is a successful exchange here; only
    /// transport-level failures are errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the connection fails or the
    /// response cannot be read.
    pub async fn fetch_emails(&self, request: &FetchEmailsRequest) -> Result<ProbeResponse> {
        let url = self.endpoint();
        debug!("POST {} for user {} (limit {})", url, request.user_id, request.limit);

        let response = self.http.post(&url).json(request).send().await?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.text().await?;

        if status == 200 {
            info!("Backend answered {} ({} bytes)", status, body.len());
        } else {
            warn!("Backend answered {} ({} bytes)", status, body.len());
        }

        Ok(ProbeResponse {
            status,
            headers,
            body,
        })
    }

    /// Run one full probe: echo the request, send it, render the
    /// response into `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, a `200` body cannot be
    /// decoded, or writing to `out` fails. Non-`200` responses are not
    /// errors.
    pub async fn probe<W: Write>(&self, request: &FetchEmailsRequest, out: &mut W) -> Result<()> {
        report::write_request(out, &self.endpoint(), request)?;
        let response = self.fetch_emails(request).await?;
        report::write_response(out, &response)
    }
}
