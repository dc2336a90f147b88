//! Ministry of Foreign Affairs scraper.
//!
//! The English homepage carries the news block: each `li.home-news-item`
//! has an `a.link` headline and a `div.date`. Article bodies are justified
//! paragraphs under an `h2` headline.

use super::{NO_TITLE, SourceAdapter, first_text, paragraphs, require, selector, stripped_text};
use crate::error::LayoutError;
use crate::models::{ArticleBody, ArticleListing, ArticleRef, Source};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

static LISTING: Lazy<Selector> = Lazy::new(|| selector("div.home-news-listing"));
static ITEM: Lazy<Selector> = Lazy::new(|| selector("div.home-news-listing li.home-news-item"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector("a.link"));
static DATE: Lazy<Selector> = Lazy::new(|| selector("div.date"));
static HEADLINE: Lazy<Selector> = Lazy::new(|| selector("h2"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector(r#"p[style="text-align: justify;"]"#));

#[derive(Debug)]
pub struct Mfa;

impl SourceAdapter for Mfa {
    fn source(&self) -> Source {
        Source::Mfa
    }

    fn listing_url(&self) -> &'static str {
        "https://www.mfa.am/en/"
    }

    fn parse_listing(&self, document: &Html) -> Result<ArticleListing, LayoutError> {
        require(document, &LISTING, Source::Mfa, "news listing")?;

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

        debug!(count = articles.len(), "Parsed MFA listing");
        Ok(articles)
    }

    fn parse_article(&self, document: &Html) -> Result<ArticleBody, LayoutError> {
        let title = stripped_text(require(document, &HEADLINE, Source::Mfa, "article headline")?);
        let content = paragraphs(document.select(&PARAGRAPH));
        if content.is_empty() {
            return Err(LayoutError::new(Source::Mfa, "article paragraphs"));
        }
        Ok(ArticleBody { title, content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_HTML: &str = r#"
        <html><body>
          <div class="home-news-listing">
            <ul>
              <li class="home-news-item">
                <div class="date">14 March 2025</div>
                <a class="link" href="https://www.mfa.am/en/press-releases/2025/03/14/fm_meeting/">
                  Foreign Minister meets   ambassador
                </a>
              </li>
              <li class="home-news-item">
                <div class="date">13 March 2025</div>
                <a class="link" href="/en/press-releases/2025/03/13/statement/">Statement</a>
              </li>
              <li class="home-news-item">
                <div class="date">12 March 2025</div>
              </li>
            </ul>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_listing() {
        let doc = Html::parse_document(LISTING_HTML);
        let listing = Mfa.parse_listing(&doc).unwrap();

        assert_eq!(listing.len(), 3);
        assert_eq!(
            listing[0],
            ArticleRef::new(
                "Foreign Minister meets ambassador",
                "14 March 2025",
                "https://www.mfa.am/en/press-releases/2025/03/14/fm_meeting/",
            )
        );
        assert_eq!(listing[1].link, "/en/press-releases/2025/03/13/statement/");
    }

    #[test]
    fn test_parse_listing_substitutes_missing_title() {
        let doc = Html::parse_document(LISTING_HTML);
        let listing = Mfa.parse_listing(&doc).unwrap();

        assert_eq!(listing[2], ArticleRef::new(NO_TITLE, "12 March 2025", ""));
    }

    #[test]
    fn test_parse_listing_without_container_is_layout_error() {
        let doc = Html::parse_document("<html><body><div class=\"news\"></div></body></html>");
        let err = Mfa.parse_listing(&doc).unwrap_err();
        assert_eq!(err, LayoutError::new(Source::Mfa, "news listing"));
    }

    #[test]
    fn test_parse_article() {
        let doc = Html::parse_document(
            r#"<html><body>
                 <h2> Press release </h2>
                 <p style="text-align: justify;">First paragraph.</p>
                 <p>Navigation noise</p>
                 <p style="text-align: justify;">Second <strong>paragraph</strong>.</p>
               </body></html>"#,
        );
        let body = Mfa.parse_article(&doc).unwrap();
        assert_eq!(body.title, "Press release");
        assert_eq!(body.content, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn test_parse_article_without_paragraphs_is_layout_error() {
        let doc = Html::parse_document("<html><body><h2>Title</h2><p>plain</p></body></html>");
        let err = Mfa.parse_article(&doc).unwrap_err();
        assert_eq!(err.field, "article paragraphs");
    }
}
