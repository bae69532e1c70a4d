use std::sync::LazyLock;

use anyhow::{anyhow, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{ExtractedDetails, PageShape, HEADLINE_MISSING};

static HEADLINE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static MAIN_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("main").unwrap());
static FACT_ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.studiengang-fakten tr").unwrap());
static LABEL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static VALUE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static VALUE_PART_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p, li").unwrap());
static BODY_BLOCK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, h2, h3, li").unwrap());
static BLANKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Containers that never contribute to the free-text body: share widgets,
/// link lists, teaser grids and the facts box (extracted separately).
const EXCLUDED_CLASSES: &[&str] = &["share-box", "linklist", "teaser-grid", "studiengang-fakten"];

/// Page shape of the HTW Dresden study-program detail pages.
///
/// Headline from the first `h1`, key facts from the rows of the
/// `studiengang-fakten` box, free text from the remaining content of `main`.
#[derive(Debug, Default)]
pub struct HtwDresdenShape;

impl PageShape for HtwDresdenShape {
    fn extract(&self, url: &str, html: &str) -> Result<ExtractedDetails> {
        let doc = Html::parse_document(html);

        let headline = doc
            .select(&HEADLINE_SEL)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| HEADLINE_MISSING.to_string());

        let main = doc
            .select(&MAIN_SEL)
            .next()
            .ok_or_else(|| anyhow!("main content region missing on {}", url))?;

        let mut facts = Vec::new();
        for row in main.select(&FACT_ROW_SEL) {
            let label = match row.select(&LABEL_SEL).next().map(element_text) {
                Some(l) if !l.is_empty() => l,
                _ => continue,
            };
            let value = match row.select(&VALUE_SEL).next().map(cell_value) {
                Some(v) if !v.is_empty() => v,
                _ => continue,
            };
            facts.push((label, value));
        }

        let paragraphs: Vec<String> = main
            .select(&BODY_BLOCK_SEL)
            .filter(|block| !in_excluded(*block))
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();
        let body = BLANKS_RE
            .replace_all(paragraphs.join("\n\n").trim(), "\n\n")
            .to_string();

        Ok(ExtractedDetails {
            headline,
            url: url.to_string(),
            facts,
            body,
        })
    }
}

/// Whitespace-normalized text of one element.
fn element_text(el: ElementRef) -> String {
    el.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A value cell may hold several parts (paragraphs or list items); join them
/// with a comma. A plain cell is taken verbatim.
fn cell_value(td: ElementRef) -> String {
    let parts: Vec<String> = td
        .select(&VALUE_PART_SEL)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect();
    if parts.is_empty() {
        element_text(td)
    } else {
        parts.join(", ")
    }
}

fn in_excluded(el: ElementRef) -> bool {
    el.ancestors().filter_map(ElementRef::wrap).any(|a| {
        a.value()
            .classes()
            .any(|class| EXCLUDED_CLASSES.contains(&class))
    })
}

// ── Tests ──
