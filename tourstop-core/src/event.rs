//! Tour stop records.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix used for invite titles of tour stops.
pub const TITLE_PREFIX: &str = "University Swings at";

/// One scheduled appearance of the tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourEvent {
    pub id: u32,
    /// Calendar date without time component, serialized as YYYY-MM-DD
    pub date: NaiveDate,
    pub university: String,
    pub city: String,
    /// Two-letter state code, e.g. "IN"
    pub state: String,
    /// Free-text category such as "Tailgate Stop" or "Club Night"
    #[serde(rename = "type")]
    pub kind: String,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Past,
    Open,
    Hold,
}

impl TourEvent {
    /// Calendar month 1-12.
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// "City, ST"
    pub fn city_state(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }

    /// Title used for calendar invites.
    pub fn invite_title(&self) -> String {
        format!("{} {}", TITLE_PREFIX, self.university)
    }

    /// Text matched by free-text queries.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.university, self.city).to_lowercase()
    }
}

impl fmt::Display for TourEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.university, self.city_state())
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventStatus::Past => "past",
            EventStatus::Open => "open",
            EventStatus::Hold => "hold",
        };
        f.write_str(s)
    }
}
