//! Personal research library: folders and saved items over an opaque
//! key-value store.
//!
//! The store itself is an external collaborator (Redis, SQL, anything with
//! get/set/delete/list); this module owns only the [`KvStore`] contract,
//! the key scheme and the folder/item operations. Values are JSON
//! documents. Entries that fail to parse are skipped rather than failing
//! the whole listing.

mod store;

pub use store::{KvStore, MemoryStore};

use crate::models::{Folder, LibraryItem, MergedRecord};

const FOLDER_PREFIX: &str = "folder:";
const ITEM_PREFIX: &str = "item:";

/// Errors from library operations
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// Underlying store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Rejected input (e.g. empty folder name)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing folder or item
    #[error("Not found: {0}")]
    NotFound(String),

    /// Value in the store could not be decoded
    #[error("Corrupt entry: {0}")]
    Corrupt(String),
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::Corrupt(err.to_string())
    }
}

/// Folder and item operations over an injected store.
#[derive(Debug, Clone)]
pub struct Library<S: KvStore> {
    store: S,
}

impl<S: KvStore> Library<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========== FOLDERS ==========

    /// Create a folder. Blank names are rejected.
    pub async fn create_folder(&self, name: &str) -> Result<Folder, LibraryError> {
        if name.trim().is_empty() {
            return Err(LibraryError::InvalidInput(
                "Folder name cannot be empty".to_string(),
            ));
        }

        let folder = Folder {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            created_at: chrono::Utc::now(),
        };

        let key = format!("{}{}", FOLDER_PREFIX, folder.id);
        self.store.set(&key, &serde_json::to_string(&folder)?).await?;
        Ok(folder)
    }

    /// All folders, sorted by name (case-insensitive).
    pub async fn folders(&self) -> Result<Vec<Folder>, LibraryError> {
        let keys = self.store.keys(FOLDER_PREFIX).await?;
        let mut folders = Vec::with_capacity(keys.len());

        for key in keys {
            match self.read_json::<Folder>(&key).await {
                Ok(Some(folder)) => folders.push(folder),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(%key, %error, "skipping inconsistent folder entry");
                }
            }
        }

        folders.sort_by_key(|f| f.name.to_lowercase());
        Ok(folders)
    }

    /// Delete a folder and every item saved in it.
    pub async fn delete_folder(&self, folder_id: &str) -> Result<(), LibraryError> {
        let key = format!("{}{}", FOLDER_PREFIX, folder_id);
        if self.store.get(&key).await?.is_none() {
            return Err(LibraryError::NotFound(format!("folder {}", folder_id)));
        }

        for item in self.items(folder_id).await? {
            self.store
                .delete(&format!("{}{}", ITEM_PREFIX, item.id))
                .await?;
        }
        self.store.delete(&key).await?;
        Ok(())
    }

    // ========== ITEMS ==========

    /// Persist a merged record (with its summary/annotation already filled
    /// in by the external summarization step) into a folder. An empty
    /// `folder_id` files the item under the root view.
    pub async fn save_item(
        &self,
        record: &MergedRecord,
        folder_id: &str,
    ) -> Result<LibraryItem, LibraryError> {
        if record.url.trim().is_empty() {
            return Err(LibraryError::InvalidInput(
                "Cannot save an item without a URL".to_string(),
            ));
        }
        if !folder_id.is_empty() {
            let folder_key = format!("{}{}", FOLDER_PREFIX, folder_id);
            if self.store.get(&folder_key).await?.is_none() {
                return Err(LibraryError::NotFound(format!("folder {}", folder_id)));
            }
        }

        let item = LibraryItem::from_record(record, folder_id);
        let key = format!("{}{}", ITEM_PREFIX, item.id);
        self.store.set(&key, &serde_json::to_string(&item)?).await?;
        Ok(item)
    }

    /// Items in a folder, newest first. An empty `folder_id` lists the
    /// root view (items saved without a folder).
    pub async fn items(&self, folder_id: &str) -> Result<Vec<LibraryItem>, LibraryError> {
        let keys = self.store.keys(ITEM_PREFIX).await?;
        let mut items = Vec::new();

        for key in keys {
            match self.read_json::<LibraryItem>(&key).await {
                Ok(Some(item)) if item.folder_id == folder_id => items.push(item),
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(%key, %error, "skipping inconsistent item entry");
                }
            }
        }

        items.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(items)
    }

    /// Delete one item.
    pub async fn delete_item(&self, item_id: &str) -> Result<(), LibraryError> {
        let key = format!("{}{}", ITEM_PREFIX, item_id);
        if self.store.get(&key).await?.is_none() {
            return Err(LibraryError::NotFound(format!("item {}", item_id)));
        }
        self.store.delete(&key).await
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, LibraryError> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}
