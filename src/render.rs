// src/render.rs
//! Static page renderer.
//!
//! Takes the already sorted, summarized and categorized entries and lays them
//! out as one self-contained HTML page: an "All" tab plus one tab per
//! category. An entry with several categories appears under each of them.
//! No data is transformed here beyond grouping and escaping.

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

use crate::categorize::Category;
use crate::pipeline::Entry;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0 auto;max-width:860px;padding:1rem;color:#222}\
header h1{margin-bottom:.2rem}header p{color:#666;margin-top:0}\
nav button{border:1px solid #ccc;background:#f6f6f6;padding:.4rem .9rem;margin-right:.3rem;cursor:pointer;border-radius:4px}\
nav button.active{background:#222;color:#fff}\
section{display:none}section.active{display:block}\
article{border-bottom:1px solid #eee;padding:.8rem 0}\
article h2{font-size:1.1rem;margin:0 0 .3rem}\
.meta{font-size:.85rem;color:#777}.tag{font-size:.75rem;background:#eef;border-radius:3px;padding:0 .3rem;margin-left:.3rem}\
.empty{color:#999;font-style:italic}";

const SCRIPT: &str = "function showTab(id){document.querySelectorAll('section').forEach(function(s){s.classList.toggle('active',s.id===id)});\
document.querySelectorAll('nav button').forEach(function(b){b.classList.toggle('active',b.dataset.tab===id)});}";

/// Tab ids: "all" + lowercase category labels.
fn tab_id(cat: Option<Category>) -> String {
    cat.map(|c| c.label().to_ascii_lowercase())
        .unwrap_or_else(|| "all".to_string())
}

/// Render the whole page.
pub fn render_page(title: &str, entries: &[Entry], generated_at: DateTime<Utc>) -> String {
    let mut html = String::with_capacity(4096 + entries.len() * 512);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
<header><h1>{title}</h1><p>Updated {updated}</p></header>\n",
        title = encode_text(title),
        updated = generated_at.format("%d %b %Y %H:%M UTC"),
    );

    let tabs: Vec<Option<Category>> = std::iter::once(None)
        .chain(Category::ALL.into_iter().map(Some))
        .collect();

    html.push_str("<nav>");
    for (i, tab) in tabs.iter().enumerate() {
        let id = tab_id(*tab);
        let label = tab.map(|c| c.label()).unwrap_or("All");
        let count = entries
            .iter()
            .filter(|e| tab.map_or(true, |c| e.categories.contains(&c)))
            .count();
        let _ = write!(
            html,
            "<button data-tab=\"{id}\" onclick=\"showTab('{id}')\"{active}>{label} ({count})</button>",
            active = if i == 0 { " class=\"active\"" } else { "" },
        );
    }
    html.push_str("</nav>\n");

    for (i, tab) in tabs.iter().enumerate() {
        let _ = write!(
            html,
            "<section id=\"{}\"{}>\n",
            tab_id(*tab),
            if i == 0 { " class=\"active\"" } else { "" }
        );
        let mut any = false;
        for e in entries
            .iter()
            .filter(|e| tab.map_or(true, |c| e.categories.contains(&c)))
        {
            any = true;
            render_entry(&mut html, e);
        }
        if !any {
            html.push_str("<p class=\"empty\">No articles in this category.</p>\n");
        }
        html.push_str("</section>\n");
    }

    let _ = write!(html, "<script>{SCRIPT}</script>\n</body>\n</html>\n");
    html
}

fn render_entry(html: &mut String, e: &Entry) {
    html.push_str("<article>");
    if e.link.is_empty() {
        let _ = write!(html, "<h2>{}</h2>", encode_text(&e.title));
    } else {
        let _ = write!(
            html,
            "<h2><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></h2>",
            encode_double_quoted_attribute(&e.link),
            encode_text(&e.title)
        );
    }

    let _ = write!(html, "<div class=\"meta\">{}", encode_text(&e.source));
    if !e.display_date.is_empty() {
        let _ = write!(html, " &middot; {}", encode_text(&e.display_date));
    }
    for c in e.sorted_categories() {
        let _ = write!(html, "<span class=\"tag\">{}</span>", c.label());
    }
    html.push_str("</div>");

    let _ = write!(html, "<p>{}</p></article>\n", encode_text(&e.summary));
}
