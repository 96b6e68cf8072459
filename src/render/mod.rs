//! # HTML rendering
//!
//! Turns a [`UniqueQuery`] and a fetched page of [`UniqueItem`]s into a
//! complete HTML document. Renderers are plain functions of their inputs and
//! never touch the network, so the page can be rendered in tests from fixture
//! data alone.
//!
//! ## Layout
//!
//! - **Header**: title and a "Showing N of M (League: ...)" summary
//! - **Filters bar**: search box, ordering select, hidden league/page fields
//! - **Card grid**: one card per unique with prices and ancient drop stats
//! - **Pagination**: previous/next links driven by the API's `previous`/`next`
//!
//! All text coming from the request or the API is HTML-escaped.

mod card;

use chrono::{DateTime, Utc};

use crate::models::{Paginated, UniqueItem, UniqueQuery};

pub use card::render_card;

/// Ordering options offered in the filters bar as (label, API value).
pub const SORT_OPTIONS: [(&str, &str); 4] = [
    ("Name (A→Z)", "name"),
    ("Level (low→high)", "required_level"),
    ("Chaos value (high→low)", "-chaos_value"),
    ("Listings (high→low)", "-listing_count"),
];

const STYLES: &str = r"
body { background: #0b0e13; color: #d4d4d8; font-family: system-ui, sans-serif; margin: 0; }
main { max-width: 72rem; margin: 0 auto; padding: 1.5rem; }
h1 { font-size: 1.9rem; margin: 0 0 .5rem; }
.summary, .muted { color: #71717a; }
.filters { display: flex; gap: .75rem; margin: 1rem 0 1.5rem; }
.filters input[name=search] { flex: 1; padding: .5rem .75rem; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); gap: 1.25rem; }
.card { background: #0f1319; border: 1px solid rgba(180, 83, 9, .6); }
.card-header { padding: .6rem 1rem; text-align: center; background: #1c1408; }
.card-title { color: #f59e0b; font-weight: 600; }
.card-subtitle { color: #a1a1aa; font-size: .85rem; }
.card-body { padding: 1rem 1.5rem; text-align: center; font-size: .85rem; }
.stats { color: #7fb6ff; }
.price-chaos { color: #d4d4d8; }
.price-divine { color: #fde68a; }
.icon { max-height: 7rem; max-width: 7rem; }
.base-icon { height: 2rem; width: 2rem; opacity: .8; }
.flavour { color: #a16207; font-style: italic; }
.ancient { margin-top: .75rem; border: 1px solid rgba(180, 83, 9, .3); padding: .5rem .75rem; font-size: .75rem; }
.tier { color: #fcd34d; font-weight: 600; }
.pagination { display: flex; gap: 1rem; margin-top: 1.5rem; }
.pagination a { color: #60a5fa; }
.pagination .disabled { color: #52525b; }
";

/// Renders the full browse page for a successful fetch.
pub fn render_page(
    query: &UniqueQuery,
    page: &Paginated<UniqueItem>,
    fetched_at: DateTime<Utc>,
) -> String {
    let league_label = if query.league.is_empty() {
        "Current"
    } else {
        query.league.as_str()
    };

    let mut body = String::new();
    body.push_str("<h1>PoE Uniques</h1>\n");
    body.push_str(&format!(
        "<p class=\"summary\">Showing {} of {} (League: {})</p>\n",
        page.results.len(),
        page.count,
        escape_html(league_label)
    ));
    body.push_str(&render_filters(query));
    body.push_str(&render_grid(&page.results));
    body.push_str(&render_pagination(
        query,
        page.has_previous(),
        page.has_next(),
    ));
    body.push_str(&format!(
        "<p class=\"muted\">Prices as of {}</p>\n",
        fetched_at.format("%Y-%m-%d %H:%M UTC")
    ));

    document(&body)
}

/// Generic failure page shown when the uniques could not be fetched.
pub fn render_error_page(query: &UniqueQuery) -> String {
    let mut body = String::new();
    body.push_str("<h1>PoE Uniques</h1>\n");
    body.push_str(&render_filters(query));
    body.push_str(
        "<p class=\"summary\">The item catalog is unavailable right now. Please try again shortly.</p>\n",
    );
    document(&body)
}

fn document(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>PoE Uniques</title>\n<style>{STYLES}</style>\n</head>\n\
         <body>\n<main>\n{body}</main>\n</body>\n</html>\n"
    )
}

/// Search form. Submitting it always goes back to page 1 of the same league.
fn render_filters(query: &UniqueQuery) -> String {
    let mut html = String::from("<form class=\"filters\" method=\"get\" action=\"/\">\n");
    html.push_str(&format!(
        "  <input name=\"search\" value=\"{}\" placeholder=\"Search unique or base item...\">\n",
        escape_html(&query.search)
    ));

    html.push_str("  <select name=\"ordering\">\n");
    for (label, value) in SORT_OPTIONS {
        let selected = if value == query.ordering { " selected" } else { "" };
        html.push_str(&format!(
            "    <option value=\"{value}\"{selected}>{label}</option>\n"
        ));
    }
    html.push_str("  </select>\n");

    html.push_str(&format!(
        "  <input type=\"hidden\" name=\"league\" value=\"{}\">\n",
        escape_html(&query.league)
    ));
    html.push_str("  <input type=\"hidden\" name=\"page\" value=\"1\">\n");
    html.push_str("  <button type=\"submit\">Apply</button>\n</form>\n");
    html
}

fn render_grid(items: &[UniqueItem]) -> String {
    if items.is_empty() {
        return "<p class=\"muted\">No uniques match this search.</p>\n".to_string();
    }

    let mut html = String::from("<div class=\"grid\">\n");
    for item in items {
        html.push_str(&render_card(item));
    }
    html.push_str("</div>\n");
    html
}

/// Previous/next controls. A non-numeric page is shown as page 1.
pub fn render_pagination(query: &UniqueQuery, has_prev: bool, has_next: bool) -> String {
    let page = query.page_number().unwrap_or(1);

    let prev = if has_prev {
        format!(
            "<a href=\"{}\">← Prev</a>",
            escape_html(&build_href(query, page.saturating_sub(1).max(1)))
        )
    } else {
        "<span class=\"disabled\">← Prev</span>".to_string()
    };

    let next = if has_next {
        format!(
            "<a href=\"{}\">Next →</a>",
            escape_html(&build_href(query, page.saturating_add(1)))
        )
    } else {
        "<span class=\"disabled\">Next →</span>".to_string()
    };

    format!(
        "<nav class=\"pagination\">\n  {prev}\n  <span>Page {page}</span>\n  {next}\n</nav>\n"
    )
}

/// Link to another page of the same browse query.
///
/// `league` is always present, even when empty; `search` and `ordering` only
/// when set.
pub fn build_href(query: &UniqueQuery, page: u32) -> String {
    let mut href = format!(
        "/?page={page}&league={}",
        urlencoding::encode(&query.league)
    );
    if !query.search.is_empty() {
        href.push_str(&format!("&search={}", urlencoding::encode(&query.search)));
    }
    if !query.ordering.is_empty() {
        href.push_str(&format!(
            "&ordering={}",
            urlencoding::encode(&query.ordering)
        ));
    }
    href
}

/// Escapes HTML special characters.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
