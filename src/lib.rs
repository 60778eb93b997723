//! Email-fetch diagnostic probe
//!
//! Sends a single `POST /actions/fetch_emails` request to a locally
//! running backend and renders the exchange for a human: the request
//! echo, status, headers, the decoded body and the shape of the first
//! returned email.
//!
//! The library never prints on its own; [`ProbeClient::probe`] writes
//! to any [`std::io::Write`].

mod client;
mod config;
mod error;
pub mod report;
mod request;

pub use client::{Emails, ProbeClient, ProbeResponse};
pub use config::{DEFAULT_BACKEND_URL, FETCH_EMAILS_PATH, ProbeConfig};
pub use error::{Error, Result};
pub use request::{DEFAULT_LIMIT, FetchEmailsRequest};
