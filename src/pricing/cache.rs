//! Persistent price caches keyed by market hash name.
//!
//! Two backends share one interface: a JSON file held in memory and flushed by
//! atomic rename, and an SQLite table (see [`crate::db::Repository`]).

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::db::{init_db, Repository};

#[derive(Debug, Error)]
pub enum PriceCacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cache database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[async_trait]
pub trait PriceCache: Send + Sync + fmt::Debug {
    async fn get(&self, key: &str) -> Result<Option<i64>, PriceCacheError>;

    async fn set(&self, key: &str, price_cents: i64) -> Result<(), PriceCacheError>;

    async fn contains(&self, key: &str) -> Result<bool, PriceCacheError>;

    async fn size(&self) -> Result<usize, PriceCacheError>;

    /// Make every `set` so far durable.
    async fn flush(&self) -> Result<(), PriceCacheError>;

    /// Snapshot of all cached prices.
    async fn entries(&self) -> Result<Vec<(String, i64)>, PriceCacheError>;
}

/// Open the cache backend matching the path suffix.
///
/// `.sqlite`, `.sqlite3` and `.db` select SQLite; anything else is a JSON file.
pub async fn open_price_cache(path: &Path) -> Result<Arc<dyn PriceCache>, PriceCacheError> {
    let is_sqlite = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("sqlite" | "sqlite3" | "db")
    );

    if is_sqlite {
        let pool = init_db(&path.to_string_lossy()).await?;
        Ok(Arc::new(Repository::new(pool)))
    } else {
        Ok(Arc::new(JsonPriceCache::open(path)))
    }
}

/// JSON-file cache. Reads once on open, writes only on `flush`.
#[derive(Debug)]
pub struct JsonPriceCache {
    path: PathBuf,
    store: Mutex<HashMap<String, i64>>,
}

impl JsonPriceCache {
    /// Load the cache at `path`. A missing or malformed file starts empty and is left in place.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let store = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, i64>>(&content) {
                Ok(map) => {
                    info!("Loaded {} cached prices from {}", map.len(), path.display());
                    map
                }
                Err(e) => {
                    warn!("Ignoring malformed price cache {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!("Could not read price cache {}: {}", path.display(), e);
                HashMap::new()
            }
        };

        Self {
            path,
            store: Mutex::new(store),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `bytes` to a temp file next to `path`, fsync, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl PriceCache for JsonPriceCache {
    async fn get(&self, key: &str) -> Result<Option<i64>, PriceCacheError> {
        Ok(self.store.lock().await.get(key).copied())
    }

    async fn set(&self, key: &str, price_cents: i64) -> Result<(), PriceCacheError> {
        self.store.lock().await.insert(key.to_string(), price_cents);
        Ok(())
    }

    async fn contains(&self, key: &str) -> Result<bool, PriceCacheError> {
        Ok(self.store.lock().await.contains_key(key))
    }

    async fn size(&self) -> Result<usize, PriceCacheError> {
        Ok(self.store.lock().await.len())
    }

    async fn flush(&self) -> Result<(), PriceCacheError> {
        // Sorted keys keep the file diff-friendly.
        let bytes = {
            let store = self.store.lock().await;
            let sorted: BTreeMap<&String, &i64> = store.iter().collect();
            serde_json::to_vec(&sorted)?
        };

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<(String, i64)>, PriceCacheError> {
        Ok(self
            .store
            .lock()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect())
    }
}
