//! # Completed-Order Store
//!
//! The durable set of order ids that have finished packing. The session
//! checks it before accepting an invoice and adds to it when an order
//! completes.
//!
//! ## File Layout
//!
//! [`FileCompletedOrderStore`] keeps one file, `<state_dir>/completed_orders.json`,
//! holding a sorted JSON array of order ids. A missing file is an empty
//! set. Every write goes to a sibling temporary file that is then renamed
//! over the original, so a crash mid-write leaves the previous set intact.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use kpk_core::OrderId;

/// File name of the completed-order set inside the state directory.
pub const COMPLETED_ORDERS_FILE: &str = "completed_orders.json";

/// Errors from the completed-order store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the store file failed.
    #[error("completed-order store I/O at {}: {source}", path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The store file is not a JSON array of order ids.
    #[error("completed-order store {} is corrupt: {source}", path.display())]
    Corrupt {
        /// The store file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// The set of orders that finished packing.
pub trait CompletedOrderStore: Send + Sync {
    /// Whether `order` has been packed.
    fn contains(&self, order: &OrderId) -> Result<bool, StoreError>;

    /// Add `order` to the set. Marking an order twice is not an error.
    fn mark_completed(&self, order: &OrderId) -> Result<(), StoreError>;

    /// Every packed order, sorted.
    fn list(&self) -> Result<Vec<OrderId>, StoreError>;
}

/// In-memory store. Forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemoryCompletedOrderStore {
    orders: Mutex<BTreeSet<OrderId>>,
}

impl MemoryCompletedOrderStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompletedOrderStore for MemoryCompletedOrderStore {
    fn contains(&self, order: &OrderId) -> Result<bool, StoreError> {
        Ok(self.orders.lock().contains(order))
    }

    fn mark_completed(&self, order: &OrderId) -> Result<(), StoreError> {
        self.orders.lock().insert(order.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<OrderId>, StoreError> {
        Ok(self.orders.lock().iter().cloned().collect())
    }
}

/// Store backed by a JSON file in the state directory.
#[derive(Debug)]
pub struct FileCompletedOrderStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileCompletedOrderStore {
    /// A store at `<state_dir>/completed_orders.json`. Nothing is touched
    /// on disk until the first write.
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(COMPLETED_ORDERS_FILE),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeSet<OrderId>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(io_error(&self.path)(e)),
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, orders: &BTreeSet<OrderId>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(io_error(dir))?;
        }
        let json = serde_json::to_vec_pretty(orders).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_error(&tmp))?;
        std::fs::rename(&tmp, &self.path).map_err(io_error(&self.path))
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

impl CompletedOrderStore for FileCompletedOrderStore {
    fn contains(&self, order: &OrderId) -> Result<bool, StoreError> {
        Ok(self.load()?.contains(order))
    }

    fn mark_completed(&self, order: &OrderId) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut orders = self.load()?;
        if orders.insert(order.clone()) {
            self.save(&orders)?;
            tracing::debug!(order = %order, path = %self.path.display(), "order marked completed");
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<OrderId>, StoreError> {
        Ok(self.load()?.into_iter().collect())
    }
}
