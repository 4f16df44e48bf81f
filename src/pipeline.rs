//! Composition root: wires the local store's known IDs into the discovery
//! stream and persists each resolved photo.

use anyhow::Context;
use tracing::{debug, info};

use crate::config::Config;
use crate::discover::PhotoStream;
use crate::flickr::Catalog;
use crate::store::LocalStore;

/// Run a crawl to completion. Per-item resolution failures are handled
/// inside the stream; a storage failure is fatal and propagates.
pub async fn run<C: Catalog>(catalog: &C, config: &Config) -> anyhow::Result<()> {
    let store = LocalStore::new(&config.dest_dir);
    let known_ids = store.known_ids().with_context(|| {
        format!(
            "listing destination directory {}",
            config.dest_dir.display()
        )
    })?;
    info!(
        "{} photos already fetched in {}",
        known_ids.len(),
        config.dest_dir.display()
    );

    let mut stream = PhotoStream::new(catalog, config.license, !config.metadata_only, known_ids);

    let mut fetched = 0u64;
    while let Some(resolved) = stream.next_photo().await {
        let id = &resolved.item.id;
        // Defensive re-check against filesystem truth, independent of the
        // in-memory set used for API-call avoidance.
        if store.exists(id) {
            debug!("Photo {} already on disk, skipping", id);
            continue;
        }
        store
            .persist(&resolved.item, resolved.asset.as_deref())
            .await
            .with_context(|| format!("persisting photo {id}"))?;
        fetched += 1;
        info!("Fetched {} ({})", id, resolved.item.title);
    }

    info!("Search exhausted, {} photos fetched", fetched);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flickr::stub::{page, StubCatalog};
    use std::path::Path;
    use std::sync::atomic::Ordering;

    fn test_config(dest_dir: &Path, metadata_only: bool) -> Config {
        Config {
            api_key: "key".into(),
            api_secret: "secret".into(),
            dest_dir: dest_dir.to_path_buf(),
            license: 4,
            metadata_only,
        }
    }

    #[tokio::test]
    async fn test_run_fetches_only_unknown_hit() {
        let dir = tempfile::tempdir().unwrap();
        // "1" is already materialized; only "2" should be resolved.
        std::fs::write(dir.path().join("1.jpg"), b"old").unwrap();

        let stub = StubCatalog::default();
        stub.add_photo("1");
        stub.add_photo("2");
        stub.queue_page(page(1, 1, &["1", "2"]));

        run(&stub, &test_config(dir.path(), false)).await.unwrap();

        assert_eq!(stub.info_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.size_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stub.asset_calls.load(Ordering::SeqCst), 1);
        assert!(dir.path().join("2.jpg").exists());
        assert!(dir.path().join("2.json").exists());
        // The pre-existing photo was not re-written.
        assert_eq!(std::fs::read(dir.path().join("1.jpg")).unwrap(), b"old");
        assert!(!dir.path().join("1.json").exists());
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();

        let stub = StubCatalog::default();
        stub.add_photo("1");
        stub.queue_page(page(1, 1, &["1"]));
        run(&stub, &test_config(dir.path(), false)).await.unwrap();

        let before: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(before.len(), 2);

        // Second run over the same destination: the id is known from the
        // directory listing, so no per-item calls and no new writes.
        let stub = StubCatalog::default();
        stub.add_photo("1");
        stub.queue_page(page(1, 1, &["1"]));
        run(&stub, &test_config(dir.path(), false)).await.unwrap();

        assert_eq!(stub.info_calls.load(Ordering::SeqCst), 0);
        assert_eq!(stub.asset_calls.load(Ordering::SeqCst), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_metadata_only_run_writes_json_only() {
        let dir = tempfile::tempdir().unwrap();

        let stub = StubCatalog::default();
        stub.add_photo("1");
        stub.queue_page(page(1, 1, &["1"]));

        run(&stub, &test_config(dir.path(), true)).await.unwrap();

        assert_eq!(stub.asset_calls.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("1.jpg").exists());
        assert!(dir.path().join("1.json").exists());
    }

    #[tokio::test]
    async fn test_partial_prior_write_blocks_refetch_of_missing_sibling() {
        let dir = tempfile::tempdir().unwrap();
        // Lone metadata file from an interrupted earlier run.
        std::fs::write(dir.path().join("1.json"), b"{}").unwrap();

        let stub = StubCatalog::default();
        stub.add_photo("1");
        stub.queue_page(page(1, 1, &["1"]));

        run(&stub, &test_config(dir.path(), false)).await.unwrap();

        // Known from the listing: never resolved, never repaired.
        assert_eq!(stub.info_calls.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("1.jpg").exists());
    }
}
