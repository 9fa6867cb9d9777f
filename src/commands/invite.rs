use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use owo_colors::OwoColorize;
use tourstop_core::render::Card;
use tourstop_core::storage::MemoryStorage;
use tourstop_core::widget::{Page, Widget};
use tourstop_core::{Catalog, TourConfig};

pub fn run(catalog: &Catalog, config: &TourConfig, id: u32, dir: &Path) -> Result<()> {
    let card = Card::from_event(catalog.get(id)?);
    tracing::debug!(id, title = %card.calendar.title, dir = %dir.display(), "Exporting invite");

    let storage = MemoryStorage::new();
    let mut widget = Widget::new(catalog, Page::default(), &storage, config);
    let invite = widget.export_invite(&card.calendar, Instant::now())?;
    let path = invite.save(dir)?;

    println!("{}", format!("  Saved: {}", path.display()).green());
    Ok(())
}
