//! Novelty detection for a single source.
//!
//! [`UpdateDetector::check_for_update`] fetches the source's listing page,
//! compares it with the stored snapshot as a whole list, and when anything
//! differs stores the new listing and extracts the first (newest) article.

use crate::error::{Error, LayoutError};
use crate::fetcher::PageFetcher;
use crate::models::{ArticleListing, Source, Update};
use crate::scrapers::SourceAdapter;
use crate::snapshot::SnapshotStore;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Drives fetcher, scraper and snapshot store for one check at a time.
///
/// Checks for the same source must not overlap: the load/compare/save
/// sequence is not guarded by any lock.
#[derive(Debug)]
pub struct UpdateDetector<F, S> {
    fetcher: F,
    store: S,
}

impl<F, S> UpdateDetector<F, S>
where
    F: PageFetcher,
    S: SnapshotStore,
{
    /// Creates a detector over an injected fetcher and snapshot store.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of parsed pages, usually an [`HttpFetcher`](crate::fetcher::HttpFetcher)
    /// * `store` - Where the last seen listing of each source is kept
    ///
    /// # Returns
    ///
    /// A detector holding no state of its own besides the two collaborators.
    pub fn new(fetcher: F, store: S) -> Self {
        Self { fetcher, store }
    }

    /// Report the newest article of `source` if its listing changed.
    ///
    /// Returns `Ok(None)` when the listing equals the stored snapshot or is
    /// empty. Fetch, layout and snapshot read errors propagate unchanged.
    ///
    /// A failed snapshot write does not suppress the update: the article is
    /// still returned with [`Update::recorded`] set to `false`, and the same
    /// article may be reported again on the next check.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] when the listing or article page cannot be fetched
    /// - [`Error::Layout`] when either page no longer has the expected
    ///   structure, including a newest item without a link
    /// - [`Error::Persistence`] when the stored snapshot cannot be read
    #[instrument(level = "info", skip(self), fields(%source))]
    pub async fn check_for_update(&self, source: Source) -> Result<Option<Update>, Error> {
        let adapter = source.adapter();
        let listing = self.fetch_listing(adapter).await?;

        let Some(newest) = listing.first().cloned() else {
            warn!("Listing page has no articles");
            return Ok(None);
        };

        let previous = self.store.load(source).await?;
        if listing == previous {
            debug!(count = listing.len(), "Listing unchanged");
            return Ok(None);
        }

        info!(
            count = listing.len(),
            previous = previous.len(),
            title = %newest.title,
            "Listing changed"
        );
        let url = resolve_link(adapter, &newest.link)?;

        let recorded = match self.store.save(source, &listing).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Snapshot not saved");
                false
            }
        };

        let body = {
            let document = self.fetcher.fetch(url.as_str()).await?;
            adapter.parse_article(&document)?
        };

        Ok(Some(Update {
            body,
            link: newest.link,
            url,
            recorded,
        }))
    }

    async fn fetch_listing(&self, adapter: &dyn SourceAdapter) -> Result<ArticleListing, Error> {
        let document = self.fetcher.fetch(adapter.listing_url()).await?;
        Ok(adapter.parse_listing(&document)?)
    }
}

/// Make a listed link absolute against the listing page it came from.
///
/// An empty link would resolve to the listing page itself, so it is a
/// missing field.
fn resolve_link(adapter: &dyn SourceAdapter, link: &str) -> Result<Url, LayoutError> {
    let link_error = || LayoutError::new(adapter.source(), "article link");
    let link = link.trim();
    if link.is_empty() {
        return Err(link_error());
    }
    Url::parse(adapter.listing_url())
        .and_then(|base| base.join(link))
        .map_err(|_| link_error())
}
