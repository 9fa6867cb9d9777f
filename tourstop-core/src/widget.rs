//! The listing widget: the catalog wired to the controls of a host page.
//!
//! Every control of the page is an optional slot. A missing filter input
//! reads as unset, a missing region or toast simply receives nothing.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::catalog::Catalog;
use crate::config::TourConfig;
use crate::error::{TourError, TourResult};
use crate::event::TourEvent;
use crate::filter::{FilterState, filter};
use crate::intake::{self, Submission};
use crate::invite::{Invite, InviteZone};
use crate::render::{CalendarAction, EventsRegion, RequestAction};
use crate::request::{RequestForm, RequestLog};
use crate::storage::Storage;
use crate::ui::{AnchorAction, MobileMenu, Toast, resolve_anchor};

/// Id of the request form section.
pub const REQUEST_ANCHOR: &str = "request";

pub const SUBMITTED_MESSAGE: &str = "Thanks! Opening your email client…";

/// Controls provided by the host page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub search: Option<String>,
    pub state: Option<String>,
    pub month: Option<String>,
    pub events: Option<EventsRegion>,
    pub toast: Option<Toast>,
    pub menu: Option<MobileMenu>,
    pub form: Option<RequestForm>,
    /// Element ids in-page links can scroll to
    pub anchors: HashSet<String>,
}

impl Page {
    /// A page with every slot present and empty.
    pub fn full() -> Self {
        Page {
            search: Some(String::new()),
            state: Some(String::new()),
            month: Some(String::new()),
            events: Some(EventsRegion::default()),
            toast: Some(Toast::default()),
            menu: Some(MobileMenu::default()),
            form: Some(RequestForm::default()),
            anchors: ["schedule", REQUEST_ANCHOR].into_iter().map(String::from).collect(),
        }
    }

    /// Current filter, read from the input slots.
    pub fn filter_state(&self) -> FilterState {
        FilterState::from_inputs(
            self.search.as_deref(),
            self.state.as_deref(),
            self.month.as_deref(),
        )
    }

    pub fn has_anchor(&self, id: &str) -> bool {
        self.anchors.contains(id)
    }
}

pub struct Widget<'a> {
    catalog: &'a Catalog,
    storage: &'a dyn Storage,
    config: &'a TourConfig,
    pub page: Page,
}

impl<'a> Widget<'a> {
    pub fn new(catalog: &'a Catalog, page: Page, storage: &'a dyn Storage, config: &'a TourConfig) -> Self {
        let mut page = page;
        if let Some(toast) = page.toast.as_mut() {
            *toast = Toast::new(Duration::from_millis(config.toast_ms));
        }

        Widget {
            catalog,
            storage,
            config,
            page,
        }
    }

    /// Filter the catalog with the current inputs and re-render the events
    /// region.
    pub fn apply_filters(&mut self) -> Vec<&'a TourEvent> {
        let state = self.page.filter_state();
        let list = filter(self.catalog, &state);

        tracing::debug!(?state, shown = list.len(), "Applied filters");
        if let Some(region) = self.page.events.as_mut() {
            region.replace(&list);
        }
        list
    }

    /// Reset every present filter input and re-apply.
    pub fn clear_filters(&mut self) -> Vec<&'a TourEvent> {
        for slot in [&mut self.page.search, &mut self.page.state, &mut self.page.month] {
            if let Some(value) = slot.as_mut() {
                value.clear();
            }
        }
        self.apply_filters()
    }

    /// Copy a card's location into the request form and move to it.
    pub fn prefill(&mut self, action: &RequestAction) -> AnchorAction {
        if let Some(form) = self.page.form.as_mut() {
            form.university = action.university.clone();
            form.city_state = action.city_state.clone();
        }
        self.click_anchor(&format!("#{}", REQUEST_ANCHOR))
    }

    pub fn click_anchor(&self, href: &str) -> AnchorAction {
        resolve_anchor(href, |id| self.page.has_anchor(id))
    }

    /// Toggle the mobile menu, returning its new state if the page has one.
    pub fn toggle_menu(&mut self) -> Option<bool> {
        self.page.menu.as_mut().map(MobileMenu::toggle)
    }

    /// Build the invite behind a card's calendar control.
    pub fn export_invite(&mut self, action: &CalendarAction, now: Instant) -> TourResult<Invite> {
        let result = InviteZone::from_config(self.config.timezone.as_deref())
            .and_then(|zone| Invite::for_zone(&action.title, &action.date, zone, &self.config.invite));

        if let Err(e) = &result {
            tracing::warn!(error = %e, title = %action.title, "Calendar export failed");
            self.toast(e.to_string(), now);
        }
        result
    }

    /// Submit the request form: validate, store, hand off to mail.
    pub fn submit_request(&mut self, now: Instant) -> TourResult<Submission> {
        let form = self.page.form.clone().unwrap_or_default();
        let log = RequestLog::new(self.storage);

        match intake::submit(&form, &log, &self.config.mail, Utc::now()) {
            Ok(submission) => {
                self.toast(SUBMITTED_MESSAGE, now);
                if let Some(form) = self.page.form.as_mut() {
                    form.clear();
                }
                Ok(submission)
            }
            Err(e) => {
                if !matches!(e, TourError::MissingFields(_)) {
                    tracing::error!(error = %e, "Request submission failed");
                }
                self.toast(e.to_string(), now);
                Err(e)
            }
        }
    }

    fn toast(&mut self, message: impl Into<String>, now: Instant) {
        if let Some(toast) = self.page.toast.as_mut() {
            toast.show(message, now);
        }
    }
}
