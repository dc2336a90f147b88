//! Ministry of Education, Science, Culture and Sport scraper.

use super::{NO_TITLE, SourceAdapter, first_text, paragraphs, require, selector, stripped_text};
use crate::error::LayoutError;
use crate::models::{ArticleBody, ArticleListing, ArticleRef, Source};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

static LISTING: Lazy<Selector> = Lazy::new(|| selector("div.form-row.cnews"));
static ITEM: Lazy<Selector> = Lazy::new(|| selector("div.form-row.cnews article.col.w-100"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("div.title.text-start"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a.d-block.clearfix[href]"));
static DATE: Lazy<Selector> = Lazy::new(|| selector("time.text-start"));
static PAGE_TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static BODY: Lazy<Selector> = Lazy::new(|| selector("div.article-text.form-row"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));

#[derive(Debug)]
pub struct Escs;

impl SourceAdapter for Escs {
    fn source(&self) -> Source {
        Source::Escs
    }

    fn listing_url(&self) -> &'static str {
        "https://escs.am/en/category/news"
    }

    fn parse_listing(&self, document: &Html) -> Result<ArticleListing, LayoutError> {
        require(document, &LISTING, Source::Escs, "news listing")?;

        let articles: ArticleListing = document
            .select(&ITEM)
            .map(|item| {
                ArticleRef::new(
                    first_text(item, &TITLE).unwrap_or_else(|| NO_TITLE.to_string()),
                    first_text(item, &DATE).unwrap_or_default(),
                    item.select(&LINK)
                        .next()
                        .and_then(|a| a.value().attr("href"))
                        .unwrap_or_default(),
                )
            })
            .collect();

        debug!(count = articles.len(), "Parsed ESCS listing");
        Ok(articles)
    }

    fn parse_article(&self, document: &Html) -> Result<ArticleBody, LayoutError> {
        let title = stripped_text(require(document, &PAGE_TITLE, Source::Escs, "page title")?);
        let body = require(document, &BODY, Source::Escs, "article text")?;
        Ok(ArticleBody {
            title,
            content: paragraphs(body.select(&PARAGRAPH)),
        })
    }
}
