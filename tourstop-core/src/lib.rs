//! Core of the tour stop listing widget.
//!
//! This crate provides everything shared by the `tourstop` CLI and server:
//! - `catalog` and `event` for the tour schedule
//! - `filter` and `render` for the card listing
//! - `invite` for calendar invite export
//! - `request`, `storage` and `intake` for tour requests
//! - `ui` and `widget` for the host page controls

pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod intake;
pub mod invite;
pub mod render;
pub mod request;
pub mod storage;
pub mod ui;
pub mod widget;

pub use catalog::Catalog;
pub use config::TourConfig;
pub use error::{TourError, TourResult};
pub use event::{EventStatus, TourEvent};

/// Load the configured catalog, or the built-in schedule when none is set.
pub fn load_catalog(config: &TourConfig) -> TourResult<Catalog> {
    match config.catalog_path() {
        Some(path) => Catalog::load(&path),
        None => Ok(Catalog::demo()),
    }
}
