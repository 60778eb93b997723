//! Request payload for the email-fetch action

use serde::Serialize;

/// Number of emails requested when no limit is given.
pub const DEFAULT_LIMIT: i64 = 5;

/// JSON body sent to `/actions/fetch_emails`.
///
/// Serializes to exactly `{"user_id": ..., "limit": ...}`.
///
/// # Examples
///
/// ```
/// use email_fetch_probe::FetchEmailsRequest;
///
/// let request = FetchEmailsRequest::new("user@example.com", None);
/// assert_eq!(request.limit, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchEmailsRequest {
    pub user_id: String,
    pub limit: i64,
}

impl FetchEmailsRequest {
    #[must_use]
    pub fn new(user_id: impl Into<String>, limit: Option<i64>) -> Self {
        Self {
            user_id: user_id.into(),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        }
    }
}
