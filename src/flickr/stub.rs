//! In-memory catalog for tests. Search responses are served in submission
//! order; per-item lookups come from keyed maps. Every call is counted so
//! tests can assert which network traffic a scenario produces.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::CatalogError;
use super::types::{InfoOwner, PhotoInfo, SearchHit, SearchPage, SizeVariant, TagList};
use super::Catalog;
use crate::resolve::SOURCE_SIZE;

#[derive(Default)]
pub(crate) struct StubCatalog {
    pub search_queue: Mutex<VecDeque<Result<SearchPage, CatalogError>>>,
    pub infos: Mutex<HashMap<String, PhotoInfo>>,
    pub sizes: Mutex<HashMap<String, Vec<SizeVariant>>>,
    pub assets: Mutex<HashMap<String, Vec<u8>>>,
    pub search_calls: AtomicUsize,
    pub info_calls: AtomicUsize,
    pub size_calls: AtomicUsize,
    pub asset_calls: AtomicUsize,
}

impl StubCatalog {
    pub fn queue_page(&self, page: SearchPage) {
        self.search_queue.lock().unwrap().push_back(Ok(page));
    }

    pub fn queue_error(&self) {
        self.search_queue.lock().unwrap().push_back(Err(CatalogError::Api {
            code: 105,
            message: "Service currently unavailable".into(),
        }));
    }

    /// Register a fully resolvable photo: metadata, a Medium 640 JPEG
    /// variant, and asset bytes.
    pub fn add_photo(&self, id: &str) {
        let source = format!("https://live.staticflickr.com/{id}_z.jpg");
        self.infos.lock().unwrap().insert(
            id.to_string(),
            PhotoInfo {
                owner: InfoOwner {
                    path_alias: Some(format!("alias-{id}")),
                    realname: Some(format!("Name {id}")),
                },
                tags: TagList::default(),
            },
        );
        self.sizes.lock().unwrap().insert(
            id.to_string(),
            vec![
                SizeVariant {
                    label: "Square".into(),
                    source: format!("https://live.staticflickr.com/{id}_s.jpg"),
                },
                SizeVariant {
                    label: SOURCE_SIZE.into(),
                    source: source.clone(),
                },
            ],
        );
        self.assets
            .lock()
            .unwrap()
            .insert(source, vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }
}

pub(crate) fn hit(id: &str) -> SearchHit {
    SearchHit {
        id: id.to_string(),
        secret: format!("sec-{id}"),
        owner: format!("owner-{id}"),
        title: format!("Photo {id}"),
    }
}

pub(crate) fn page(number: u64, pages: u64, ids: &[&str]) -> SearchPage {
    SearchPage {
        page: number,
        pages,
        hits: ids.iter().map(|id| hit(id)).collect(),
    }
}

#[async_trait]
impl Catalog for StubCatalog {
    async fn search(&self, _page: u64, _license: u8) -> Result<SearchPage, CatalogError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search_queue
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected search call")
    }

    async fn photo_info(&self, id: &str, _secret: &str) -> Result<PhotoInfo, CatalogError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        self.infos
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(CatalogError::Api {
                code: 1,
                message: "Photo not found".into(),
            })
    }

    async fn photo_sizes(&self, id: &str) -> Result<Vec<SizeVariant>, CatalogError> {
        self.size_calls.fetch_add(1, Ordering::SeqCst);
        self.sizes
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(CatalogError::Api {
                code: 1,
                message: "Photo not found".into(),
            })
    }

    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.asset_calls.fetch_add(1, Ordering::SeqCst);
        self.assets
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or(CatalogError::Status(404))
    }
}
