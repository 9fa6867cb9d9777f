use anyhow::Result;
use tourstop_core::render::EventsRegion;
use tourstop_core::storage::MemoryStorage;
use tourstop_core::widget::{Page, Widget};
use tourstop_core::{Catalog, TourConfig};

use crate::render::Render;

pub fn run(
    catalog: &Catalog,
    config: &TourConfig,
    query: Option<String>,
    state: Option<String>,
    month: Option<u32>,
    json: bool,
) -> Result<()> {
    let page = Page {
        search: query,
        state,
        month: month.map(|m| m.to_string()),
        events: Some(EventsRegion::default()),
        ..Page::default()
    };

    // Listing never touches the request log
    let storage = MemoryStorage::new();
    let mut widget = Widget::new(catalog, page, &storage, config);
    let shown = widget.apply_filters();
    tracing::debug!(shown = shown.len(), total = catalog.len(), "Filtered tour stops");

    let Some(region) = widget.page.events.as_ref() else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(region.content())?);
    } else {
        println!("{}", region.content().render());
    }

    Ok(())
}
