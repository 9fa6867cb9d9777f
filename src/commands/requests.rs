use anyhow::Result;
use owo_colors::OwoColorize;
use tourstop_core::TourConfig;
use tourstop_core::request::RequestLog;
use tourstop_core::storage::FileStorage;

use crate::render::Render;

pub fn run(config: &TourConfig, json: bool) -> Result<()> {
    let storage = FileStorage::new(config.data_path());
    let entries = RequestLog::new(&storage).entries()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", "No requests stored on this device".dimmed());
        return Ok(());
    }

    for (i, request) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", request.render());
    }

    Ok(())
}
