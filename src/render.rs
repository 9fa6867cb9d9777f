//! Terminal rendering for tourstop types.
//!
//! Extension traits that add colored output to tourstop-core types using
//! owo_colors.

use owo_colors::OwoColorize;
use tourstop_core::render::{Card, Rendered};
use tourstop_core::request::TourRequest;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Card {
    fn render(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "{} {}",
            self.university.bold(),
            format!("[{}]", self.badge).cyan()
        ));
        lines.push(format!("   {} • {}", self.date_label, self.location).dimmed().to_string());
        lines.push(format!(
            "   {} {}",
            "add to calendar:".dimmed(),
            format!("tourstop invite {}", self.calendar.event_id).green()
        ));
        lines.join("\n")
    }
}

impl Render for Rendered {
    fn render(&self) -> String {
        match self {
            Rendered::Empty { message } => message.dimmed().to_string(),
            Rendered::Cards { cards } => cards
                .iter()
                .map(Render::render)
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

impl Render for TourRequest {
    fn render(&self) -> String {
        let when = self
            .captured_at()
            .map(|t| t.with_timezone(&chrono::Local).format("%b %-d, %Y %H:%M").to_string())
            .unwrap_or_else(|| "unknown time".to_string());

        let mut line = format!("{} {} <{}>", when.dimmed(), self.name.bold(), self.email);
        line.push_str(&format!("\n   {}", self.university));
        if !self.city_state.is_empty() {
            line.push_str(&format!(" ({})", self.city_state));
        }
        if !self.window.is_empty() {
            line.push_str(&format!("\n   {} {}", "window:".dimmed(), self.window));
        }
        if !self.message.is_empty() {
            line.push_str(&format!("\n   {} {}", "message:".dimmed(), self.message));
        }
        line
    }
}
