//! Incremental discovery against the paginated search API.
//!
//! The stream is pull-based: callers ask for one resolved photo at a time,
//! so a consumer that stops early never causes further pages to be fetched.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info, warn};

use crate::flickr::types::{SearchHit, SearchPage};
use crate::flickr::Catalog;
use crate::resolve::{self, ResolvedPhoto};

/// Forward-only, non-restartable stream of resolved photos.
///
/// Owns the known-ID set and is its only writer: an identifier is added the
/// moment its photo is yielded, before the caller persists it, so a
/// duplicate later in the run is skipped without any network calls.
pub struct PhotoStream<'a, C> {
    catalog: &'a C,
    license: u8,
    fetch_assets: bool,
    known_ids: HashSet<String>,
    page: u64,
    previous_page_ids: HashSet<String>,
    pending: VecDeque<SearchHit>,
    exhausted: bool,
}

impl<'a, C: Catalog> PhotoStream<'a, C> {
    pub fn new(
        catalog: &'a C,
        license: u8,
        fetch_assets: bool,
        known_ids: HashSet<String>,
    ) -> Self {
        Self {
            catalog,
            license,
            fetch_assets,
            known_ids,
            page: 1,
            previous_page_ids: HashSet::new(),
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Produce the next resolved photo, or `None` once the search is
    /// exhausted. Identifiers in the known set at call time are never
    /// yielded, and each identifier is yielded at most once per run.
    pub async fn next_photo(&mut self) -> Option<ResolvedPhoto> {
        loop {
            while let Some(hit) = self.pending.pop_front() {
                if self.known_ids.contains(&hit.id) {
                    debug!("Photo {} already fetched, skipping", hit.id);
                    continue;
                }
                match resolve::resolve(self.catalog, &hit, self.fetch_assets).await {
                    Ok(resolved) => {
                        self.known_ids.insert(hit.id);
                        return Some(resolved);
                    }
                    Err(reason) => {
                        warn!("Skipping photo {}: {}", hit.id, reason);
                    }
                }
            }

            if self.exhausted {
                return None;
            }

            let page = self.fetch_page().await;
            let current_ids: HashSet<String> =
                page.hits.iter().map(|hit| hit.id.clone()).collect();

            // An identical page returned twice in a row means the result set
            // looped or went stale; stop without another request.
            if !current_ids.is_empty() && current_ids == self.previous_page_ids {
                info!("Search results repeated at page {}, stopping", self.page);
                self.exhausted = true;
                return None;
            }
            self.previous_page_ids = current_ids;
            self.pending.extend(page.hits);

            // The declared page count is authoritative and re-read from every
            // response; the last page fetched is `pages - 1`.
            self.page += 1;
            if self.page >= page.pages {
                self.exhausted = true;
            }
        }
    }

    /// Fetch the current page, retrying the same page on any failure.
    /// No backoff and no cap; a persistently failing search blocks the run.
    async fn fetch_page(&self) -> SearchPage {
        loop {
            match self.catalog.search(self.page, self.license).await {
                Ok(page) => return page,
                Err(e) => {
                    warn!(
                        "Unable to fetch search results page {}: {}. Retrying...",
                        self.page, e
                    );
                }
            }
        }
    }
}
