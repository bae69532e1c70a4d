pub mod htw;

use anyhow::Result;

/// Headline value used when a page carries no top-level heading. Records
/// with this headline are discarded by the persistence layer.
pub const HEADLINE_MISSING: &str = "Überschrift nicht gefunden";

/// Structured facts and free text extracted from one detail page.
///
/// Fact order follows the page and is stable within one extraction, so the
/// formatter output is deterministic for a given page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDetails {
    pub headline: String,
    pub url: String,
    pub facts: Vec<(String, String)>,
    pub body: String,
}

impl ExtractedDetails {
    pub fn fact(&self, label: &str) -> Option<&str> {
        self.facts
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

/// Site-specific extraction rules turning a raw page into [`ExtractedDetails`].
///
/// The pipeline driver only depends on this trait, so a changed page layout
/// means a new shape, not a new pipeline.
pub trait PageShape {
    fn extract(&self, url: &str, html: &str) -> Result<ExtractedDetails>;
}
