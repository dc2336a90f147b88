//! Site-specific scrapers for the monitored government news sources.
//!
//! Each scraper implements [`SourceAdapter`] and encodes exactly one site's
//! markup rules. Everything above this module only ever talks to the trait,
//! selected through [`Source::adapter`], so a layout change on one site is
//! contained in one file.
//!
//! # Supported Sources
//!
//! | Source | Module | Listing page |
//! |--------|--------|--------------|
//! | Ministry of Foreign Affairs | [`mfa`] | `https://www.mfa.am/en/` |
//! | Ministry of Education, Science, Culture and Sport | [`escs`] | `https://escs.am/en/category/news` |
//! | Ministry of Defence | [`mil`] | `https://www.mil.am/en/news` |
//! | Ministry of Economy | [`mineconomy`] | `https://www.mineconomy.am/en/news` |
//! | Office of the Government | [`gov`] | `https://www.gov.am/en/news` |
//!
//! # Common Patterns
//!
//! - A missing listing container fails the whole parse with a [`LayoutError`].
//! - A missing field inside one listing item does not: the title becomes
//!   [`NO_TITLE`], other fields become empty strings.
//! - Article pages must yield both a title and a body, or the parse fails.
//! - Dates are stored verbatim; nothing here parses calendar dates.

use crate::error::LayoutError;
use crate::models::{ArticleBody, ArticleListing, Source};
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};

pub mod escs;
pub mod gov;
pub mod mfa;
pub mod mil;
pub mod mineconomy;

/// Placeholder title for listing items whose title element is missing.
pub const NO_TITLE: &str = "No Title";

/// Listing and article extraction rules for one source.
pub trait SourceAdapter: Sync {
    fn source(&self) -> Source;

    /// Page that lists the most recent articles, newest first.
    fn listing_url(&self) -> &'static str;

    fn parse_listing(&self, document: &Html) -> Result<ArticleListing, LayoutError>;

    fn parse_article(&self, document: &Html) -> Result<ArticleBody, LayoutError>;
}

impl Source {
    /// The scraper responsible for this source.
    pub fn adapter(self) -> &'static dyn SourceAdapter {
        match self {
            Source::Mfa => &mfa::Mfa,
            Source::Escs => &escs::Escs,
            Source::Mil => &mil::Mil,
            Source::Mineconomy => &mineconomy::Mineconomy,
            Source::Gov => &gov::Gov,
        }
    }
}

/// Compile a selector that is known to be valid at build time.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

/// All text below `element` with runs of whitespace collapsed to one space
/// and the ends trimmed.
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().split_whitespace().join(" ")
}

/// Text of the first match of `selector` under `element`, if any.
pub(crate) fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(stripped_text)
}

/// The first match of `selector` in the whole document or a layout error.
pub(crate) fn require<'a>(
    document: &'a Html,
    selector: &Selector,
    site: Source,
    field: &'static str,
) -> Result<ElementRef<'a>, LayoutError> {
    document
        .select(selector)
        .next()
        .ok_or(LayoutError::new(site, field))
}

/// Stripped text of each element on its own line, skipping empty ones.
pub(crate) fn paragraphs<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    elements
        .map(stripped_text)
        .filter(|p| !p.is_empty())
        .join("\n")
}
