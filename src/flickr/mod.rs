//! Client for the Flickr REST API.
//!
//! Every endpoint wraps its payload in an envelope carrying a `stat` field;
//! replies are decoded once here into typed structs, and `stat != "ok"`
//! becomes a [`CatalogError::Api`] instead of leaking duck-typed JSON into
//! the rest of the crate.

pub mod error;
#[cfg(test)]
pub(crate) mod stub;
pub mod types;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub use error::CatalogError;
use types::{PhotoInfo, SearchPage, SizeVariant};

const REST_ENDPOINT: &str = "https://api.flickr.com/services/rest/";

/// The remote photo catalog, seen through the four calls the crawler needs.
/// Implemented by [`FlickrClient`] and by in-memory stubs in tests.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// One page of search hits for the given license class, sorted by relevance.
    async fn search(&self, page: u64, license: u8) -> Result<SearchPage, CatalogError>;

    /// Full metadata for a single photo.
    async fn photo_info(&self, id: &str, secret: &str) -> Result<PhotoInfo, CatalogError>;

    /// The available resolution variants for a single photo.
    async fn photo_sizes(&self, id: &str) -> Result<Vec<SizeVariant>, CatalogError>;

    /// Raw bytes of an asset, fetched by variant URL.
    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, CatalogError>;
}

pub struct FlickrClient {
    http: reqwest::Client,
    api_key: String,
    #[allow(dead_code)] // unsigned REST calls don't use the secret
    api_secret: String,
}

impl FlickrClient {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            api_secret,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("method", method),
            ("api_key", &self.api_key),
            ("format", "json"),
            ("nojsoncallback", "1"),
        ];
        query.extend_from_slice(params);

        let response = self.http.get(REST_ENDPOINT).query(&query).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }
        Ok(response.json::<T>().await?)
    }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    stat: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    photos: Option<SearchPage>,
}

#[derive(Debug, Deserialize)]
struct InfoEnvelope {
    stat: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    photo: Option<PhotoInfo>,
}

#[derive(Debug, Deserialize)]
struct SizesEnvelope {
    stat: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    sizes: Option<SizesBlock>,
}

#[derive(Debug, Deserialize)]
struct SizesBlock {
    #[serde(rename = "size", default)]
    variants: Vec<SizeVariant>,
}

fn check_stat(stat: &str, code: Option<i64>, message: Option<String>) -> Result<(), CatalogError> {
    if stat == "ok" {
        Ok(())
    } else {
        Err(CatalogError::Api {
            code: code.unwrap_or(0),
            message: message.unwrap_or_else(|| "unknown error".into()),
        })
    }
}

#[async_trait]
impl Catalog for FlickrClient {
    async fn search(&self, page: u64, license: u8) -> Result<SearchPage, CatalogError> {
        let page_param = page.to_string();
        let license_param = license.to_string();
        let env: SearchEnvelope = self
            .call(
                "flickr.photos.search",
                &[
                    ("page", page_param.as_str()),
                    ("sort", "relevance"),
                    ("license", license_param.as_str()),
                ],
            )
            .await?;
        check_stat(&env.stat, env.code, env.message)?;
        env.photos
            .ok_or(CatalogError::Shape("search reply without photos"))
    }

    async fn photo_info(&self, id: &str, secret: &str) -> Result<PhotoInfo, CatalogError> {
        let env: InfoEnvelope = self
            .call(
                "flickr.photos.getInfo",
                &[("photo_id", id), ("secret", secret)],
            )
            .await?;
        check_stat(&env.stat, env.code, env.message)?;
        env.photo
            .ok_or(CatalogError::Shape("getInfo reply without photo"))
    }

    async fn photo_sizes(&self, id: &str) -> Result<Vec<SizeVariant>, CatalogError> {
        let env: SizesEnvelope = self
            .call("flickr.photos.getSizes", &[("photo_id", id)])
            .await?;
        check_stat(&env.stat, env.code, env.message)?;
        env.sizes
            .map(|block| block.variants)
            .ok_or(CatalogError::Shape("getSizes reply without sizes"))
    }

    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
