//! Tour request records, the persisted request log and the mail handoff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::MailSettings;
use crate::error::{TourError, TourResult};
use crate::storage::Storage;

/// Fixed namespaced storage key of the request log.
pub const REQUEST_LOG_KEY: &str = "ug.tourRequests";

/// Raw request form input. Absent fields are treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestForm {
    pub name: String,
    pub email: String,
    pub university: String,
    #[serde(alias = "city_state")]
    pub city_state: String,
    pub window: String,
    pub message: String,
}

/// A captured request as stored in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourRequest {
    pub name: String,
    pub email: String,
    pub university: String,
    #[serde(default)]
    pub city_state: String,
    #[serde(default)]
    pub window: String,
    #[serde(default)]
    pub message: String,
    /// Capture time in epoch milliseconds
    pub ts: i64,
}

impl RequestForm {
    /// Names of required fields that are empty after trimming.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("university", &self.university),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Validate presence of the required fields and capture a request.
    pub fn to_request(&self, now: DateTime<Utc>) -> TourResult<TourRequest> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(TourError::MissingFields(missing));
        }

        Ok(TourRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            university: self.university.trim().to_string(),
            city_state: self.city_state.trim().to_string(),
            window: self.window.trim().to_string(),
            message: self.message.trim().to_string(),
            ts: now.timestamp_millis(),
        })
    }

    pub fn clear(&mut self) {
        *self = RequestForm::default();
    }
}

impl TourRequest {
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.ts)
    }

    /// Plain-text summary used as the mail body.
    pub fn mail_body(&self) -> String {
        format!(
            "Tour stop request\n\n\
             Name: {}\n\
             Email: {}\n\
             University: {}\n\
             City/State: {}\n\
             Preferred window: {}\n\
             Message: {}",
            self.name, self.email, self.university, self.city_state, self.window, self.message
        )
    }

    /// `mailto:` URI with percent-encoded subject and body.
    pub fn mailto(&self, mail: &MailSettings) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            mail.to,
            urlencoding::encode(&mail.subject),
            urlencoding::encode(&self.mail_body())
        )
    }
}

/// Append-only log of tour requests kept under [`REQUEST_LOG_KEY`].
pub struct RequestLog<'a> {
    storage: &'a dyn Storage,
}

impl<'a> RequestLog<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        RequestLog { storage }
    }

    /// All stored requests, oldest first. An unparseable log reads as empty
    /// and entries that do not fit the record shape are skipped.
    pub fn entries(&self) -> TourResult<Vec<TourRequest>> {
        let raw = parse_log(self.storage.get(REQUEST_LOG_KEY)?);
        Ok(raw
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(request) => Some(request),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable tour request entry");
                    None
                }
            })
            .collect())
    }

    /// Append one request (read-modify-write of the whole log). Existing
    /// entries are written back untouched, whatever their shape.
    pub fn append(&self, request: &TourRequest) -> TourResult<usize> {
        let entry = serde_json::to_value(request)?;
        let mut count = 0;
        self.storage.update(REQUEST_LOG_KEY, &mut |current| {
            let mut all = parse_log(current);
            all.push(entry.clone());
            count = all.len();
            Ok(serde_json::to_string(&all)?)
        })?;

        tracing::info!(university = %request.university, total = count, "Stored tour request");
        Ok(count)
    }
}

/// The stored array as raw JSON values. Only text that is not a JSON array
/// reads as an empty log.
fn parse_log(raw: Option<String>) -> Vec<serde_json::Value> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Stored request log is unreadable, starting a new one");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;

    fn make_form() -> RequestForm {
        RequestForm {
            name: "  Bobby ".to_string(),
            email: "b@u.edu".to_string(),
            university: "Indiana University".to_string(),
            city_state: "Bloomington, IN".to_string(),
            window: "Late October".to_string(),
            message: "Homecoming?".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_missing_fields_after_trim() {
        let mut form = make_form();
        form.name = "   ".to_string();
        form.university = String::new();

        assert_eq!(form.missing_fields(), vec!["name", "university"]);
        let err = form.to_request(now()).unwrap_err();
        assert_eq!(err.to_string(), "Please complete name, email, and university");
        assert_eq!(err.detail(), "Missing: name, university");
    }

    #[test]
    fn test_to_request_trims_and_stamps() {
        let request = make_form().to_request(now()).unwrap();
        assert_eq!(request.name, "Bobby");
        assert_eq!(request.ts, now().timestamp_millis());
        assert_eq!(request.captured_at(), Some(now()));
    }

    #[test]
    fn test_serialized_shape() {
        let request = make_form().to_request(now()).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["cityState"], "Bloomington, IN");
        assert_eq!(json["window"], "Late October");
        assert!(json["ts"].is_i64());
    }

    #[test]
    fn test_form_accepts_both_city_state_spellings() {
        let a: RequestForm = serde_json::from_str(r#"{"name":"A","cityState":"X, IN"}"#).unwrap();
        let b: RequestForm = serde_json::from_str(r#"{"name":"A","city_state":"X, IN"}"#).unwrap();
        assert_eq!(a.city_state, "X, IN");
        assert_eq!(a, b);
    }

    #[test]
    fn test_mailto() {
        let request = make_form().to_request(now()).unwrap();
        let uri = request.mailto(&MailSettings::default());

        assert!(uri.starts_with("mailto:hello@universitygolf.com?subject=Tour%20Stop%20Request&body="));
        assert!(uri.contains("Tour%20stop%20request%0A%0AName%3A%20Bobby%0A"), "{}", uri);
        assert!(uri.contains("Indiana%20University"));
        assert!(!uri.contains(' '));
    }

    #[test]
    fn test_log_appends_in_order() {
        let storage = MemoryStorage::new();
        let log = RequestLog::new(&storage);
        let first = make_form().to_request(now()).unwrap();
        let mut second = first.clone();
        second.university = "Purdue University".to_string();

        assert_eq!(log.append(&first).unwrap(), 1);
        assert_eq!(log.append(&second).unwrap(), 2);
        assert_eq!(log.entries().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_corrupt_log_is_treated_as_empty() {
        let storage = MemoryStorage::new();
        storage.set(REQUEST_LOG_KEY, "{not json").unwrap();
        let log = RequestLog::new(&storage);

        assert!(log.entries().unwrap().is_empty());
        let request = make_form().to_request(now()).unwrap();
        assert_eq!(log.append(&request).unwrap(), 1);
        assert_eq!(log.entries().unwrap(), vec![request]);
    }

    #[test]
    fn test_reads_entries_without_optional_fields() {
        let storage = MemoryStorage::new();
        storage
            .set(REQUEST_LOG_KEY, r#"[{"name":"A","email":"a@b.com","university":"X","ts":1}]"#)
            .unwrap();
        let entries = RequestLog::new(&storage).entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].city_state, "");
    }

    #[test]
    fn test_append_keeps_entries_of_another_shape() {
        let storage = MemoryStorage::new();
        storage
            .set(
                REQUEST_LOG_KEY,
                r#"[{"name":"A","email":"a@b.com","university":"X","cityState":null,"ts":1},{"legacy":true}]"#,
            )
            .unwrap();
        let log = RequestLog::new(&storage);
        let request = make_form().to_request(now()).unwrap();

        assert_eq!(log.append(&request).unwrap(), 3);

        let stored: Vec<serde_json::Value> =
            serde_json::from_str(&storage.get(REQUEST_LOG_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0]["name"], "A");
        assert!(stored[0]["cityState"].is_null());
        assert_eq!(stored[1]["legacy"], true);
        assert_eq!(stored[2]["university"], "Indiana University");

        assert_eq!(log.entries().unwrap(), vec![request]);
    }
}
