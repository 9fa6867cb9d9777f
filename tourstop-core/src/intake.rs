//! Request intake: validate, persist, hand off to the mail client.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::MailSettings;
use crate::error::TourResult;
use crate::request::{RequestForm, RequestLog, TourRequest};

/// Result of an accepted submission. The caller navigates to `mailto`.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub request: TourRequest,
    pub mailto: String,
}

/// Validate `form`, append it to `log` and build the mail handoff.
///
/// Rejected forms are neither stored nor handed off.
pub fn submit(
    form: &RequestForm,
    log: &RequestLog<'_>,
    mail: &MailSettings,
    now: DateTime<Utc>,
) -> TourResult<Submission> {
    let request = form.to_request(now)?;
    log.append(&request)?;
    let mailto = request.mailto(mail);

    Ok(Submission { request, mailto })
}
