//! The tour listing page

use std::time::Instant;

use axum::{
    Form, Router,
    extract::{Query, State},
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;

use tourstop_core::render::{RequestAction, html_escape};
use tourstop_core::request::RequestForm;
use tourstop_core::widget::{Page, Widget};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/request", post(submit_form))
}

#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub q: Option<String>,
    pub state: Option<String>,
    pub month: Option<String>,
    /// Prefill from a card's "Request us here" link
    pub university: Option<String>,
    pub city_state: Option<String>,
}

/// GET / - Filtered cards plus the request form
async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let mut page = Page::full();
    page.search = query.q.or(page.search);
    page.state = query.state.or(page.state);
    page.month = query.month.or(page.month);

    let mut widget = Widget::new(state.catalog(), page, state.storage(), state.config());
    widget.apply_filters();

    if let Some(university) = query.university {
        widget.prefill(&RequestAction {
            university,
            city_state: query.city_state.unwrap_or_default(),
        });
    }

    Html(render_page(&state, &widget.page, None))
}

/// POST /request - Form submission; answers with the page, a toast and the
/// mail handoff link
async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<RequestForm>,
) -> Result<Html<String>, AppError> {
    let html = tokio::task::spawn_blocking(move || {
        let mut page = Page::full();
        page.form = Some(form);

        let mut widget = Widget::new(state.catalog(), page, state.storage(), state.config());
        widget.apply_filters();
        let mailto = widget.submit_request(Instant::now()).ok().map(|s| s.mailto);

        render_page(&state, &widget.page, mailto.as_deref())
    })
    .await?;

    Ok(Html(html))
}

fn render_page(state: &AppState, page: &Page, mailto: Option<&str>) -> String {
    let catalog = state.catalog();
    let search = page.search.as_deref().unwrap_or_default();
    let selected_state = page.state.as_deref().unwrap_or_default();
    let selected_month = page.month.as_deref().unwrap_or_default();

    let mut state_options = String::from("<option value=\"\">All states</option>");
    for code in catalog.states() {
        let selected = if code == selected_state { " selected" } else { "" };
        state_options.push_str(&format!("<option value=\"{0}\"{1}>{0}</option>", html_escape(code), selected));
    }

    let mut month_options = String::from("<option value=\"\">Any month</option>");
    for m in 1u8..=12 {
        let name = chrono::Month::try_from(m).map(|m| m.name()).unwrap_or_default();
        let selected = if selected_month == m.to_string() { " selected" } else { "" };
        month_options.push_str(&format!("<option value=\"{}\"{}>{}</option>", m, selected, name));
    }

    let events = page
        .events
        .as_ref()
        .map(|region| region.content().to_html("/events"))
        .unwrap_or_default();

    let form = page.form.clone().unwrap_or_default();
    let now = Instant::now();
    let toast = page
        .toast
        .as_ref()
        .filter(|t| t.is_visible(now))
        .map(|t| format!("<div id=\"toast\" class=\"toast show\">{}</div>", html_escape(t.message())))
        .unwrap_or_else(|| "<div id=\"toast\" class=\"toast\"></div>".to_string());
    let handoff = mailto
        .map(|uri| {
            format!(
                "<p class=\"note\"><a class=\"btn\" href=\"{}\">Open email</a></p>",
                html_escape(uri)
            )
        })
        .unwrap_or_default();
    let expanded = page.menu.as_ref().map(|m| m.aria_expanded()).unwrap_or("false");

    format!(
        r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>University Swings | Campus Tour</title>
</head>
<body>
<header>
  <a class="brand" href="/">University Swings</a>
  <button class="mobile-toggle" aria-controls="mobileMenu" aria-expanded="{expanded}">Menu</button>
  <nav id="mobileMenu"><a href="#schedule">Schedule</a> <a href="#request">Request a stop</a></nav>
</header>
<main>
<section id="schedule">
  <h2>Tour schedule</h2>
  <form class="filters" method="get" action="/">
    <input id="search" name="q" type="search" placeholder="Search university or city" value="{search}">
    <select id="state" name="state">{state_options}</select>
    <select id="month" name="month">{month_options}</select>
    <button type="submit">Filter</button>
    <a id="clearFilters" href="/">Clear</a>
  </form>
  <div id="events">
{events}  </div>
</section>
<section id="request">
  <h2>Request a tour stop</h2>
  <form id="requestForm" method="post" action="/request">
    <input id="rName" name="name" placeholder="Name" value="{name}">
    <input id="rEmail" name="email" type="email" placeholder="Email" value="{email}">
    <input id="rUniversity" name="university" placeholder="University" value="{university}">
    <input id="rCityState" name="cityState" placeholder="City, State" value="{city_state}">
    <input id="rWindow" name="window" placeholder="Preferred window" value="{window}">
    <textarea id="rMessage" name="message" placeholder="Message">{message}</textarea>
    <button type="submit">Send request</button>
  </form>
  {handoff}
</section>
</main>
{toast}
</body>
</html>
"##,
        expanded = expanded,
        search = html_escape(search),
        state_options = state_options,
        month_options = month_options,
        events = events,
        name = html_escape(&form.name),
        email = html_escape(&form.email),
        university = html_escape(&form.university),
        city_state = html_escape(&form.city_state),
        window = html_escape(&form.window),
        message = html_escape(&form.message),
        handoff = handoff,
        toast = toast,
    )
}
