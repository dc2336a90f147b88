//! Data models shared by the scrapers, the snapshot store and the detector.
//!
//! - [`Source`]: the fixed set of monitored government sites
//! - [`ArticleRef`]: one title/date/link entry from a listing page
//! - [`ArticleBody`]: the extracted title and text of a single article
//! - [`Update`]: what the detector hands back when a listing changed

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A monitored news source.
///
/// The declaration order is the order in which a polling cycle visits the
/// sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Ministry of Foreign Affairs.
    Mfa,
    /// Ministry of Education, Science, Culture and Sport.
    Escs,
    /// Ministry of Defence.
    Mil,
    /// Ministry of Economy.
    Mineconomy,
    /// Office of the Government.
    Gov,
}

impl Source {
    /// Every source, in polling order.
    pub const ALL: [Source; 5] = [
        Source::Mfa,
        Source::Escs,
        Source::Mil,
        Source::Mineconomy,
        Source::Gov,
    ];

    /// The short upper-case key used in configuration and logs.
    pub fn key(self) -> &'static str {
        match self {
            Source::Mfa => "MFA",
            Source::Escs => "ESCS",
            Source::Mil => "MIL",
            Source::Mineconomy => "MINECONOMY",
            Source::Gov => "GOV",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Source::ALL
            .into_iter()
            .find(|source| source.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "unknown source '{wanted}' (expected one of: {})",
                    Source::ALL.map(Source::key).join(", ")
                )
            })
    }
}

/// One entry of a source's listing page.
///
/// `date` is kept exactly as the site prints it and `link` may be absolute
/// or site-relative. Equality compares all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub title: String,
    pub date: String,
    pub link: String,
}

impl ArticleRef {
    pub fn new(title: impl Into<String>, date: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            link: link.into(),
        }
    }
}

/// A listing page in the site's own "newest first" order.
pub type ArticleListing = Vec<ArticleRef>;

/// Title and plain-text body of a single article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleBody {
    pub title: String,
    /// Paragraphs joined with `\n`.
    pub content: String,
}

impl fmt::Display for ArticleBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "# {}\n\n{}", self.title, self.content)
    }
}

/// A newly detected article together with the link it was listed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub body: ArticleBody,
    /// The link exactly as it appears on the listing page.
    pub link: String,
    /// `link` resolved against the listing page; this is what was fetched.
    pub url: Url,
    /// `false` when the new listing could not be written to the snapshot
    /// store, so the same article will be reported again on the next check.
    pub recorded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_str_is_case_insensitive() {
        assert_eq!("mfa".parse::<Source>(), Ok(Source::Mfa));
        assert_eq!(" MINECONOMY ".parse::<Source>(), Ok(Source::Mineconomy));
        assert_eq!("Gov".parse::<Source>(), Ok(Source::Gov));
    }

    #[test]
    fn test_source_from_str_rejects_unknown_key() {
        let err = "nasa".parse::<Source>().unwrap_err();
        assert!(err.contains("nasa"));
        assert!(err.contains("MFA, ESCS, MIL, MINECONOMY, GOV"));
    }

    #[test]
    fn test_source_display_uses_key() {
        assert_eq!(Source::Escs.to_string(), "ESCS");
    }

    #[test]
    fn test_article_ref_equality_is_structural() {
        let a = ArticleRef::new("A", "Jan 1", "/a");
        assert_eq!(a, ArticleRef::new("A", "Jan 1", "/a"));
        assert_ne!(a, ArticleRef::new("A", "Jan 2", "/a"));
        assert_ne!(a, ArticleRef::new("A", "Jan 1", "/b"));
        assert_ne!(a, ArticleRef::new("B", "Jan 1", "/a"));
    }

    #[test]
    fn test_article_body_rendering() {
        let body = ArticleBody {
            title: "Statement".to_string(),
            content: "First.\nSecond.".to_string(),
        };
        assert_eq!(body.to_string(), "# Statement\n\nFirst.\nSecond.");
    }

    #[test]
    fn test_article_ref_serialization_keeps_unicode() {
        let article = ArticleRef::new("Հայաստան և ԵՄ", "12.03.2025", "/hy/news/1");
        let json = serde_json::to_string(&article).unwrap();
        let back: ArticleRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, article);
    }
}
