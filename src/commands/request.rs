use std::io::IsTerminal;
use std::time::Instant;

use anyhow::Result;
use dialoguer::Input;
use owo_colors::OwoColorize;
use tourstop_core::request::RequestForm;
use tourstop_core::storage::FileStorage;
use tourstop_core::widget::{Page, Widget};
use tourstop_core::{Catalog, TourConfig};

pub struct RequestArgs {
    pub name: Option<String>,
    pub email: Option<String>,
    pub university: Option<String>,
    pub city_state: Option<String>,
    pub window: Option<String>,
    pub message: Option<String>,
}

pub fn run(catalog: &Catalog, config: &TourConfig, args: RequestArgs, open_mail: bool) -> Result<()> {
    let interactive = std::io::stdin().is_terminal();

    let form = RequestForm {
        name: required(args.name, "  Name", interactive)?,
        email: required(args.email, "  Email", interactive)?,
        university: required(args.university, "  University", interactive)?,
        city_state: args.city_state.unwrap_or_default(),
        window: args.window.unwrap_or_default(),
        message: args.message.unwrap_or_default(),
    };

    let storage = FileStorage::new(config.data_path());
    let page = Page {
        form: Some(form),
        toast: Some(Default::default()),
        ..Page::default()
    };
    let mut widget = Widget::new(catalog, page, &storage, config);

    let result = widget.submit_request(Instant::now());
    let notice = widget
        .page
        .toast
        .as_ref()
        .map(|t| t.message().to_string())
        .unwrap_or_default();

    let submission = match result {
        Ok(submission) => submission,
        Err(e) => {
            eprintln!("  {}", notice.red());
            return Err(e.into());
        }
    };

    println!("{}", format!("  {}", notice).green());

    if open_mail {
        match open::that(&submission.mailto) {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "Could not open mail client");
                eprintln!("  {}", "(Could not open your mail client, use the link below)".dimmed());
            }
        }
    }
    println!("{}", submission.mailto);

    Ok(())
}

/// Use the flag value, or prompt for it when attached to a terminal.
fn required(value: Option<String>, prompt: &str, interactive: bool) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None if interactive => Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?),
        None => Ok(String::new()),
    }
}
