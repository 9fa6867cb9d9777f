//! The ordered, immutable list of tour stops for a session.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{TourError, TourResult};
use crate::event::{EventStatus, TourEvent};

#[derive(Debug, Clone)]
pub struct Catalog {
    events: Vec<TourEvent>,
}

/// On-disk TOML catalogs wrap the list in an `events` table array.
#[derive(Deserialize)]
struct CatalogFile {
    events: Vec<TourEvent>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and malformed state codes.
    pub fn new(events: Vec<TourEvent>) -> TourResult<Self> {
        let mut seen = HashSet::new();
        for event in &events {
            if !seen.insert(event.id) {
                return Err(TourError::Catalog(format!("duplicate event id {}", event.id)));
            }
            if !is_state_code(&event.state) {
                return Err(TourError::Catalog(format!(
                    "event {} has invalid state code '{}'",
                    event.id, event.state
                )));
            }
        }
        Ok(Catalog { events })
    }

    /// The built-in tour schedule.
    pub fn demo() -> Self {
        let stop = |id, (y, m, d), university: &str, city: &str, state: &str, kind: &str, status| {
            TourEvent {
                id,
                date: NaiveDate::from_ymd_opt(y, m, d).expect("literal tour dates are valid"),
                university: university.to_string(),
                city: city.to_string(),
                state: state.to_string(),
                kind: kind.to_string(),
                status,
            }
        };

        Catalog {
            events: vec![
                stop(1, (2025, 9, 6), "Indiana University", "Bloomington", "IN", "Tailgate Stop", EventStatus::Past),
                stop(2, (2025, 10, 11), "Ohio State University", "Columbus", "OH", "Tailgate Stop", EventStatus::Past),
                stop(3, (2025, 10, 25), "University of Wisconsin", "Madison", "WI", "Tailgate Stop", EventStatus::Open),
                stop(4, (2025, 11, 8), "University of Michigan", "Ann Arbor", "MI", "Tailgate Stop", EventStatus::Open),
                stop(5, (2025, 11, 15), "Purdue University", "West Lafayette", "IN", "Club Night", EventStatus::Open),
                stop(6, (2025, 11, 22), "Penn State University", "State College", "PA", "Tailgate Stop", EventStatus::Hold),
            ],
        }
    }

    /// Load a catalog from a `.json` (array of events) or `.toml`
    /// (`[[events]]` tables) file.
    pub fn load(path: &Path) -> TourResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let events = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {
                toml::from_str::<CatalogFile>(&content)
                    .map_err(|e| TourError::Catalog(e.to_string()))?
                    .events
            }
            _ => serde_json::from_str::<Vec<TourEvent>>(&content)
                .map_err(|e| TourError::Catalog(e.to_string()))?,
        };

        tracing::debug!(path = %path.display(), count = events.len(), "Loaded catalog");
        Catalog::new(events)
    }

    pub fn events(&self) -> &[TourEvent] {
        &self.events
    }

    pub fn get(&self, id: u32) -> TourResult<&TourEvent> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .ok_or(TourError::EventNotFound(id))
    }

    /// Distinct state codes in catalog order (used for the state selector).
    pub fn states(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.events
            .iter()
            .map(|e| e.state.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn is_state_code(s: &str) -> bool {
    s.len() == 2 && s.chars().all(|c| c.is_ascii_uppercase())
}
