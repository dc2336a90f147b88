//! Ministry of Defence scraper.
//!
//! Article text on this site is a single `div.text-box` with `<br>`-separated
//! lines rather than paragraphs, so each text run becomes its own line.

use super::{NO_TITLE, SourceAdapter, first_text, require, selector, stripped_text};
use crate::error::LayoutError;
use crate::models::{ArticleBody, ArticleListing, ArticleRef, Source};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

static LISTING: Lazy<Selector> = Lazy::new(|| selector("section.news-section"));
static ITEM: Lazy<Selector> = Lazy::new(|| selector("section.news-section div.news-list-artical"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector("h3 > a"));
static DATE: Lazy<Selector> = Lazy::new(|| selector("div.news-action > p"));
static PAGE_TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static TEXT_BOX: Lazy<Selector> = Lazy::new(|| selector("div.text-box"));

#[derive(Debug)]
pub struct Mil;

impl SourceAdapter for Mil {
    fn source(&self) -> Source {
        Source::Mil
    }

    fn listing_url(&self) -> &'static str {
        "https://www.mil.am/en/news"
    }

    fn parse_listing(&self, document: &Html) -> Result<ArticleListing, LayoutError> {
        require(document, &LISTING, Source::Mil, "news section")?;

        let articles: ArticleListing = document
            .select(&ITEM)
            .map(|item| {
                let anchor = item.select(&TITLE_LINK).next();
                ArticleRef {
                    title: anchor
                        .map(stripped_text)
                        .unwrap_or_else(|| NO_TITLE.to_string()),
                    date: first_text(item, &DATE).unwrap_or_default(),
                    link: anchor
                        .and_then(|a| a.value().attr("href"))
                        .unwrap_or_default()
                        .to_string(),
                }
            })
            .collect();

        debug!(count = articles.len(), "Parsed MIL listing");
        Ok(articles)
    }

    fn parse_article(&self, document: &Html) -> Result<ArticleBody, LayoutError> {
        let title = stripped_text(require(document, &PAGE_TITLE, Source::Mil, "page title")?);
        let text_box = require(document, &TEXT_BOX, Source::Mil, "text box")?;
        let content = text_box
            .text()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .join("\n");
        Ok(ArticleBody { title, content })
    }
}
