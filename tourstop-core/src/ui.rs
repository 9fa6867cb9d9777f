//! Navigation and feedback controls of the host page.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    /// Flip the menu and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Value of the toggle's `aria-expanded` attribute.
    pub fn aria_expanded(&self) -> &'static str {
        if self.open { "true" } else { "false" }
    }
}

/// What a click on an in-page link should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorAction {
    /// Suppress the instant jump and scroll smoothly to this element id
    SmoothScroll(String),
    /// Let the default navigation happen
    Default,
}

/// Resolve a `#id` link against the ids present on the page.
pub fn resolve_anchor(href: &str, has_target: impl Fn(&str) -> bool) -> AnchorAction {
    match href.strip_prefix('#') {
        Some(id) if !id.is_empty() && has_target(id) => AnchorAction::SmoothScroll(id.to_string()),
        _ => AnchorAction::Default,
    }
}

/// Transient notice. A new message replaces the current one and restarts
/// the timer; there is no queue.
#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    hide_at: Option<Instant>,
    duration: Duration,
}

impl Default for Toast {
    fn default() -> Self {
        Toast::new(Duration::from_millis(1800))
    }
}

impl Toast {
    pub fn new(duration: Duration) -> Self {
        Toast {
            message: String::new(),
            hide_at: None,
            duration,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.message = message.into();
        self.hide_at = Some(now + self.duration);
        tracing::debug!(message = %self.message, "Toast");
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.hide_at.is_some_and(|hide_at| now < hide_at)
    }
}
