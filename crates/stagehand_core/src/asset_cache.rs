//! Cached asset loading
//!
//! [`AssetCache`] loads each file once per asset type and hands out cheap
//! [`AssetHandle`]s. Asking for the same path again returns the existing
//! handle without touching the disk. With change watching enabled,
//! [`AssetCache::check_hot_reload`] reloads assets whose file was modified.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use crate::asset_error::AssetError;

/// Identifier of a cached asset; assigned from 1 upward
pub type AssetId = u64;

/// Handle to a cached asset
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct AssetHandle {
    id: AssetId,
    path: PathBuf,
}

impl AssetHandle {
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// File the asset was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A type that can be loaded from a file into the cache
pub trait Asset: Sized + Send + Sync + 'static {
    fn load_from_file(path: &Path) -> Result<Self, AssetError>;
}

struct CachedEntry {
    data: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    path: PathBuf,
    load_time: SystemTime,
}

/// Path-deduplicating asset cache
pub struct AssetCache {
    assets: HashMap<AssetId, CachedEntry>,
    index: HashMap<(PathBuf, TypeId), AssetId>,
    next_id: AssetId,
    watch_for_changes: bool,
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCache {
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
            index: HashMap::new(),
            next_id: 1,
            watch_for_changes: false,
        }
    }

    /// Load `path` as a `T`, or return the handle from an earlier load
    pub fn load<T: Asset>(&mut self, path: impl AsRef<Path>) -> Result<AssetHandle, AssetError> {
        let path = path.as_ref().to_path_buf();
        let key = (path.clone(), TypeId::of::<T>());

        if let Some(&id) = self.index.get(&key) {
            log::trace!("Asset cache hit: {}", path.display());
            return Ok(AssetHandle { id, path });
        }

        let data = T::load_from_file(&path)?;
        let id = self.next_id;
        self.next_id += 1;

        self.assets.insert(
            id,
            CachedEntry {
                data: Arc::new(data),
                type_id: TypeId::of::<T>(),
                path: path.clone(),
                load_time: SystemTime::now(),
            },
        );
        self.index.insert(key, id);
        log::info!("Loaded asset {} ({})", path.display(), std::any::type_name::<T>());

        Ok(AssetHandle { id, path })
    }

    /// The cached data for `handle`, if it is still cached and is a `T`
    pub fn get<T: Asset>(&self, handle: &AssetHandle) -> Option<Arc<T>> {
        let entry = self.assets.get(&handle.id)?;
        Arc::clone(&entry.data).downcast::<T>().ok()
    }

    /// Drop an asset from the cache; outstanding `Arc`s stay valid
    pub fn evict(&mut self, handle: &AssetHandle) -> bool {
        match self.assets.remove(&handle.id) {
            Some(entry) => {
                self.index.remove(&(entry.path, entry.type_id));
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, handle: &AssetHandle) -> bool {
        self.assets.contains_key(&handle.id)
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    pub fn set_watch_for_changes(&mut self, enabled: bool) {
        self.watch_for_changes = enabled;
    }

    pub fn is_watching_for_changes(&self) -> bool {
        self.watch_for_changes
    }

    /// Reload every cached `T` whose file changed since it was loaded
    ///
    /// Does nothing unless change watching is enabled. A failed reload keeps
    /// the previous data.
    pub fn check_hot_reload<T: Asset>(&mut self) -> Vec<AssetHandle> {
        if !self.watch_for_changes {
            return Vec::new();
        }

        let mut reloaded = Vec::new();
        for (&id, entry) in self.assets.iter_mut() {
            if entry.type_id != TypeId::of::<T>() {
                continue;
            }
            let Ok(modified) = std::fs::metadata(&entry.path).and_then(|m| m.modified()) else {
                continue;
            };
            if modified <= entry.load_time {
                continue;
            }

            match T::load_from_file(&entry.path) {
                Ok(data) => {
                    let data: Arc<dyn Any + Send + Sync> = Arc::new(data);
                    entry.data = data;
                    entry.load_time = SystemTime::now();
                    log::info!("Hot-reloaded asset: {}", entry.path.display());
                    reloaded.push(AssetHandle {
                        id,
                        path: entry.path.clone(),
                    });
                }
                Err(err) => {
                    log::warn!("Failed to hot-reload asset {}: {}", entry.path.display(), err);
                }
            }
        }
        reloaded
    }
}
