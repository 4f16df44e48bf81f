//! Per-item resolution: turn a raw search hit into a fully resolved photo,
//! or a classified skip. Nothing here touches the local store, and no error
//! escapes as anything other than a [`SkipReason`].

use thiserror::Error;

use crate::flickr::types::{SearchHit, TagEntry};
use crate::flickr::{Catalog, CatalogError};
use crate::types::{Item, Owner};

/// Which variant to fetch. Medium 640 is the largest non-original size,
/// capped at 640 x 640 pixels.
pub const SOURCE_SIZE: &str = "Medium 640";

/// Why a single photo was skipped. The discovery loop logs these and moves
/// on; they never abort a crawl.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("unable to fetch the photo's metadata")]
    MetadataUnavailable(#[source] CatalogError),

    #[error("unable to fetch the photo's size listing")]
    SizeInfoUnavailable(#[source] CatalogError),

    #[error("the photo has no matching size variant")]
    NoMatchingVariant,

    #[error("the photo's source is not a JPEG image")]
    NotJpeg,

    #[error("unable to fetch the image bytes")]
    DownloadFailed(#[source] CatalogError),
}

/// A resolved photo paired with its downloaded bytes. `asset` is `None` in
/// metadata-only mode; the source URL is still recorded on the item.
#[derive(Debug, Clone)]
pub struct ResolvedPhoto {
    pub item: Item,
    pub asset: Option<Vec<u8>>,
}

/// Resolve one search hit: metadata, size listing, variant selection, JPEG
/// check, and (when `fetch_asset` is set) the byte download.
pub async fn resolve<C: Catalog>(
    catalog: &C,
    hit: &SearchHit,
    fetch_asset: bool,
) -> Result<ResolvedPhoto, SkipReason> {
    let info = catalog
        .photo_info(&hit.id, &hit.secret)
        .await
        .map_err(SkipReason::MetadataUnavailable)?;

    let sizes = catalog
        .photo_sizes(&hit.id)
        .await
        .map_err(SkipReason::SizeInfoUnavailable)?;

    let source = sizes
        .iter()
        .find(|variant| variant.label == SOURCE_SIZE)
        .map(|variant| variant.source.clone())
        .ok_or(SkipReason::NoMatchingVariant)?;

    // Suffix check on the URL exactly as returned; no case normalization.
    if !source.ends_with(".jpg") && !source.ends_with(".jpeg") {
        return Err(SkipReason::NotJpeg);
    }

    let asset = if fetch_asset {
        Some(
            catalog
                .fetch_asset(&source)
                .await
                .map_err(SkipReason::DownloadFailed)?,
        )
    } else {
        None
    };

    let owner = Owner {
        id: hit.owner.clone(),
        username: info.owner.path_alias.unwrap_or_default(),
        name: info.owner.realname.unwrap_or_default(),
    };

    let item = Item {
        id: hit.id.clone(),
        title: hit.title.clone(),
        owner,
        tags: normalize_tags(&info.tags.entries),
        url: format!("https://www.flickr.com/photos/{}/{}/", hit.owner, hit.id),
        source,
    };

    Ok(ResolvedPhoto { item, asset })
}

/// Drop machine tags, then normalize the rest.
fn normalize_tags(entries: &[TagEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| !entry.machine)
        .filter_map(|entry| normalize_tag(&entry.raw))
        .collect()
}

/// Tags with any non-ASCII character are rejected whole; the rest keep only
/// ASCII letters and digits, lower-cased. Tags left empty are dropped.
fn normalize_tag(raw: &str) -> Option<String> {
    if !raw.is_ascii() {
        return None;
    }
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
