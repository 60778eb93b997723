//! Human-readable rendering of a probe exchange
//!
//! Everything here writes to a caller-supplied [`Write`] so the CLI can
//! target stdout and tests can target a `Vec<u8>`.

use crate::client::ProbeResponse;
use crate::error::Result;
use crate::request::FetchEmailsRequest;
use serde_json::Value;
use std::error::Error as StdError;
use std::io::{self, Write};

const SEPARATOR: &str = "--------------------------------------------------";

/// Echo the request before it is sent.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized or `out`
/// cannot be written to.
pub fn write_request<W: Write>(out: &mut W, url: &str, request: &FetchEmailsRequest) -> Result<()> {
    writeln!(out, "Testing email fetch for user: {}", request.user_id)?;
    writeln!(out, "Request URL: {url}")?;
    writeln!(out, "Request payload: {}", serde_json::to_string_pretty(request)?)?;
    writeln!(out, "{SEPARATOR}")?;
    Ok(())
}

/// Render status, headers and body of a response.
///
/// A `200` body must be a JSON object. Its optional `emails` field is
/// counted whatever container it is (see [`crate::Emails`]). Any other status is printed as a JSON error object when
/// the body parses, or as raw text otherwise.
///
/// # Errors
///
/// Returns an error if a `200` body cannot be decoded or `out` cannot
/// be written to.
pub fn write_response<W: Write>(out: &mut W, response: &ProbeResponse) -> Result<()> {
    writeln!(out, "Status Code: {}", response.status)?;
    writeln!(out, "Response Headers: {}", format_headers(&response.headers))?;
    writeln!(out, "{SEPARATOR}")?;

    if response.is_ok() {
        let data = response.json()?;
        writeln!(out, "SUCCESS! Email data structure:")?;
        writeln!(out, "{}", pretty(&data)?)?;

        let emails = ProbeResponse::emails(&data)?;
        writeln!(out, "\nNumber of emails: {}", emails.len())?;

        if let Some(first) = emails.first()? {
            writeln!(out, "\nFirst email structure:")?;
            writeln!(out, "{}", pretty(&first)?)?;
        }
    } else {
        writeln!(out, "ERROR: {}", response.status)?;
        match response.json() {
            Ok(error_data) => {
                writeln!(out, "Error response:")?;
                writeln!(out, "{}", pretty(&error_data)?)?;
            }
            Err(_) => {
                writeln!(out, "Error response (text):")?;
                writeln!(out, "{}", response.body)?;
            }
        }
    }

    Ok(())
}

/// Report a failure that escaped the probe: a one-line summary, then
/// every cause in the source chain, outermost first.
///
/// # Errors
///
/// Returns an error if `out` cannot be written to.
pub fn write_failure<W: Write>(out: &mut W, err: &(dyn StdError + 'static)) -> io::Result<()> {
    writeln!(out, "Exception: {err}")?;
    writeln!(out, "Traceback (most recent cause last):")?;

    let mut cause = Some(err);
    let mut depth = 0;
    while let Some(current) = cause {
        writeln!(out, "  {depth}: {current}")?;
        writeln!(out, "     {current:?}")?;
        cause = current.source();
        depth += 1;
    }

    Ok(())
}

/// Render headers like a mapping: `{"name": "value", ...}`.
fn format_headers(headers: &[(String, String)]) -> String {
    let entries: Vec<String> = headers
        .iter()
        .map(|(name, value)| format!("{name:?}: {value:?}"))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
