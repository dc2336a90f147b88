//! Ministry of Economy scraper.
//!
//! Listing cards wrap the `h2` headline in the article anchor, so the link is
//! taken from the closest `a[href]` ancestor of the headline.

use super::{NO_TITLE, SourceAdapter, first_text, paragraphs, require, selector, stripped_text};
use crate::error::LayoutError;
use crate::models::{ArticleBody, ArticleListing, ArticleRef, Source};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static LISTING: Lazy<Selector> = Lazy::new(|| selector("div.news-content"));
static ITEM: Lazy<Selector> = Lazy::new(|| selector("div.news-content div.news-background-text"));
static HEADLINE: Lazy<Selector> = Lazy::new(|| selector("h2"));
static DATE: Lazy<Selector> = Lazy::new(|| selector("div.date"));
static ARTICLE_HEADLINE: Lazy<Selector> = Lazy::new(|| selector("div.full-news-header h1"));
static ARTICLE_TEXT: Lazy<Selector> = Lazy::new(|| selector("div.full-news-text"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));

#[derive(Debug)]
pub struct Mineconomy;

/// `href` of the nearest enclosing anchor.
fn enclosing_href<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "a")
        .find_map(|a| a.value().attr("href"))
}

impl SourceAdapter for Mineconomy {
    fn source(&self) -> Source {
        Source::Mineconomy
    }

    fn listing_url(&self) -> &'static str {
        "https://www.mineconomy.am/en/news"
    }

    fn parse_listing(&self, document: &Html) -> Result<ArticleListing, LayoutError> {
        require(document, &LISTING, Source::Mineconomy, "news content")?;

        let articles: ArticleListing = document
            .select(&ITEM)
            .map(|item| {
                let headline = item.select(&HEADLINE).next();
                ArticleRef {
                    title: headline
                        .map(stripped_text)
                        .unwrap_or_else(|| NO_TITLE.to_string()),
                    date: first_text(item, &DATE).unwrap_or_default(),
                    link: headline
                        .and_then(enclosing_href)
                        .unwrap_or_default()
                        .to_string(),
                }
            })
            .collect();

        debug!(count = articles.len(), "Parsed MINECONOMY listing");
        Ok(articles)
    }

    fn parse_article(&self, document: &Html) -> Result<ArticleBody, LayoutError> {
        let title = stripped_text(require(
            document,
            &ARTICLE_HEADLINE,
            Source::Mineconomy,
            "article headline",
        )?);
        let text = require(document, &ARTICLE_TEXT, Source::Mineconomy, "article text")?;
        // Blocks without `p` children keep their flattened text.
        let content = match paragraphs(text.select(&PARAGRAPH)) {
            content if content.is_empty() => stripped_text(text),
            content => content,
        };
        Ok(ArticleBody { title, content })
    }
}
