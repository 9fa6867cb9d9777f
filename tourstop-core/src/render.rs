//! Projection of filtered tour stops into display cards.
//!
//! Rendering is total-replace: every call builds the whole region content
//! from the given list, nothing is carried over from a previous render.

use serde::Serialize;

use crate::event::TourEvent;

/// Placeholder shown when no record passes the filter.
pub const NO_RESULTS: &str = "No events found. Try clearing filters.";

/// "Add to calendar" control of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarAction {
    pub event_id: u32,
    pub title: String,
    /// YYYY-MM-DD
    pub date: String,
}

/// "Request us here" control of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestAction {
    pub university: String,
    pub city_state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub date_label: String,
    pub university: String,
    pub badge: String,
    pub location: String,
    pub calendar: CalendarAction,
    pub request: RequestAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Rendered {
    Empty { message: String },
    Cards { cards: Vec<Card> },
}

impl Card {
    pub fn from_event(event: &TourEvent) -> Self {
        Card {
            date_label: format_date(event),
            university: event.university.clone(),
            badge: event.kind.clone(),
            location: event.city_state(),
            calendar: CalendarAction {
                event_id: event.id,
                title: event.invite_title(),
                date: event.date.format("%Y-%m-%d").to_string(),
            },
            request: RequestAction {
                university: event.university.clone(),
                city_state: event.city_state(),
            },
        }
    }
}

/// Human-readable date, e.g. "Nov 8, 2025".
pub fn format_date(event: &TourEvent) -> String {
    event.date.format("%b %-d, %Y").to_string()
}

pub fn render(list: &[&TourEvent]) -> Rendered {
    if list.is_empty() {
        return Rendered::Empty {
            message: NO_RESULTS.to_string(),
        };
    }

    Rendered::Cards {
        cards: list.iter().map(|e| Card::from_event(e)).collect(),
    }
}

impl Rendered {
    pub fn cards(&self) -> &[Card] {
        match self {
            Rendered::Empty { .. } => &[],
            Rendered::Cards { cards } => cards,
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Rendered::Empty { message } => Some(message),
            Rendered::Cards { .. } => None,
        }
    }

    /// HTML for the events container. Calendar buttons link to
    /// `invite_base/{id}/invite.ics`, request buttons to the prefilled
    /// `#request` form.
    pub fn to_html(&self, invite_base: &str) -> String {
        match self {
            Rendered::Empty { message } => {
                format!("<div class=\"note\">{}</div>\n", html_escape(message))
            }
            Rendered::Cards { cards } => cards
                .iter()
                .map(|card| card_html(card, invite_base))
                .collect(),
        }
    }
}

fn card_html(card: &Card, invite_base: &str) -> String {
    let prefill = format!(
        "?university={}&city_state={}#request",
        urlencoding::encode(&card.request.university),
        urlencoding::encode(&card.request.city_state),
    );

    format!(
        "<article class=\"event\">\n\
         \x20 <div class=\"event-head\">\n\
         \x20   <h3>{university}</h3>\n\
         \x20   <span class=\"badge\">{badge}</span>\n\
         \x20 </div>\n\
         \x20 <div class=\"meta\">{date} &bull; {location}</div>\n\
         \x20 <div class=\"actions\">\n\
         \x20   <a class=\"btn\" data-ics data-title=\"{title}\" data-date=\"{ics_date}\" href=\"{base}/{id}/invite.ics\">Add to calendar</a>\n\
         \x20   <a class=\"btn outline\" data-prefill-request href=\"{prefill}\">Request us here</a>\n\
         \x20 </div>\n\
         </article>\n",
        university = html_escape(&card.university),
        badge = html_escape(&card.badge),
        date = html_escape(&card.date_label),
        location = html_escape(&card.location),
        title = html_escape(&card.calendar.title),
        ics_date = html_escape(&card.calendar.date),
        base = invite_base.trim_end_matches('/'),
        id = card.calendar.event_id,
        prefill = html_escape(&prefill),
    )
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// The container cards are rendered into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsRegion {
    content: Rendered,
}

impl Default for EventsRegion {
    fn default() -> Self {
        EventsRegion {
            content: Rendered::Cards { cards: Vec::new() },
        }
    }
}

impl EventsRegion {
    /// Replace the region's whole content with `list`.
    pub fn replace(&mut self, list: &[&TourEvent]) {
        self.content = render(list);
    }

    pub fn content(&self) -> &Rendered {
        &self.content
    }
}
