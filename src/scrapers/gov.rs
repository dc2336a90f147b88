//! Office of the Government scraper.
//!
//! News cards on this site have no linked headline: the title is a bare
//! `strong`, the link lives on a trailing "more »" anchor and the date line
//! is prefixed with a label that is dropped.

use super::{NO_TITLE, SourceAdapter, first_text, paragraphs, require, selector, stripped_text};
use crate::error::LayoutError;
use crate::models::{ArticleBody, ArticleListing, ArticleRef, Source};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static LISTING: Lazy<Selector> = Lazy::new(|| selector("div#content"));
static ITEM: Lazy<Selector> = Lazy::new(|| selector("div#content div.news"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("strong"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static DATE: Lazy<Selector> = Lazy::new(|| selector("p.news-date"));
static PAGE_TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p[style='text-align: justify;']"));
static MORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)more\s*»").unwrap());

#[derive(Debug)]
pub struct Gov;

/// Drop the leading label token ("Date: 12.03.2025" -> "12.03.2025").
fn strip_label(date: &str) -> &str {
    date.split_once(' ').map_or(date, |(_, rest)| rest)
}

fn more_link<'a>(item: ElementRef<'a>) -> Option<&'a str> {
    item.select(&ANCHOR)
        .find(|a| MORE.is_match(&stripped_text(*a)))
        .and_then(|a| a.value().attr("href"))
}

impl SourceAdapter for Gov {
    fn source(&self) -> Source {
        Source::Gov
    }

    fn listing_url(&self) -> &'static str {
        "https://www.gov.am/en/news"
    }

    fn parse_listing(&self, document: &Html) -> Result<ArticleListing, LayoutError> {
        require(document, &LISTING, Source::Gov, "content block")?;

        let articles: ArticleListing = document
            .select(&ITEM)
            .map(|item| {
                ArticleRef::new(
                    first_text(item, &TITLE).unwrap_or_else(|| NO_TITLE.to_string()),
                    first_text(item, &DATE)
                        .map(|d| strip_label(&d).to_string())
                        .unwrap_or_default(),
                    more_link(item).unwrap_or_default(),
                )
            })
            .collect();

        debug!(count = articles.len(), "Parsed GOV listing");
        Ok(articles)
    }

    fn parse_article(&self, document: &Html) -> Result<ArticleBody, LayoutError> {
        let title = stripped_text(require(document, &PAGE_TITLE, Source::Gov, "page title")?);
        let content = paragraphs(document.select(&PARAGRAPH));
        if content.is_empty() {
            return Err(LayoutError::new(Source::Gov, "article paragraphs"));
        }
        Ok(ArticleBody { title, content })
    }
}
