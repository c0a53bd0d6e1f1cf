//! Embedded vault store.
//!
//! One sled tree holds every record of a wallet. Mutations go through
//! [`VaultStore::write`], which stages puts and removals in memory and
//! commits them as a single `sled::Batch` only when the closure returns
//! `Ok`. A failed closure leaves the tree exactly as it was.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, error, info};

use crate::core::errors::Result;

pub mod records;

/// Ordered key/value store for encrypted vault records.
pub struct VaultStore {
    db: sled::Db,
    tree: sled::Tree,
    // serializes writers; sled readers never block on it
    writer: Mutex<()>,
}

impl VaultStore {
    /// Opens (or creates) the database at `path` and its `tree_name` tree.
    pub fn open(path: &Path, tree_name: &str) -> Result<Self> {
        let db = sled::open(path)?;
        let tree = db.open_tree(tree_name)?;
        info!(path = %path.display(), tree = tree_name, "Vault store opened");
        Ok(Self { db, tree, writer: Mutex::new(()) })
    }

    /// In-memory store that disappears on drop.
    pub fn open_temporary(tree_name: &str) -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        let tree = db.open_tree(tree_name)?;
        Ok(Self { db, tree, writer: Mutex::new(()) })
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.tree.get(key)?.map(|v| v.to_vec()))
    }

    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.tree.contains_key(key)?)
    }

    /// All records whose key starts with `prefix`, in key order.
    pub fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.tree
            .scan_prefix(prefix)
            .map(|item| {
                let (k, v) = item?;
                Ok((k.to_vec(), v.to_vec()))
            })
            .collect()
    }

    /// Every record in key order.
    pub fn entries(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.scan_prefix(&[])
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Runs `f` against a staged write set and commits it atomically on `Ok`.
    ///
    /// Only one writer runs at a time.
    pub fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut WriteTxn) -> Result<T>,
    {
        let _guard = self.writer.lock();

        let mut txn = WriteTxn { tree: &self.tree, staged: BTreeMap::new() };
        let value = f(&mut txn)?;

        let (batch, puts, removes) = txn.into_batch();
        self.tree.apply_batch(batch)?;
        debug!(puts, removes, "Committed vault write");

        // batch is already visible to readers; the next flush picks it up
        if let Err(e) = self.db.flush() {
            error!(error = %e, "Vault flush failed after commit");
        }
        Ok(value)
    }

    /// Removes every record in one commit.
    pub fn truncate(&self) -> Result<()> {
        self.write(|txn| txn.truncate())
    }
}

/// Staged mutations of one [`VaultStore::write`] call.
pub struct WriteTxn<'a> {
    tree: &'a sled::Tree,
    staged: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl WriteTxn<'_> {
    /// Reads through the staged set, then the committed tree. Runs under the
    /// writer lock, so no other commit can land between this read and ours.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(staged) = self.staged.get(key) {
            return Ok(staged.clone());
        }
        Ok(self.tree.get(key)?.map(|v| v.to_vec()))
    }

    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.staged.insert(key.into(), Some(value.into()));
    }

    pub fn put_all<I, K, V>(&mut self, records: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
    {
        for (k, v) in records {
            self.put(k, v);
        }
    }

    /// Stages removal of every record currently in the tree. Later puts in
    /// the same transaction survive.
    pub fn truncate(&mut self) -> Result<()> {
        for item in self.tree.iter().keys() {
            let key = item?.to_vec();
            self.staged.entry(key).or_insert(None);
        }
        // puts staged before the truncate are dropped too
        for value in self.staged.values_mut() {
            *value = None;
        }
        Ok(())
    }

    fn into_batch(self) -> (sled::Batch, usize, usize) {
        let mut batch = sled::Batch::default();
        let (mut puts, mut removes) = (0, 0);
        for (key, value) in self.staged {
            match value {
                Some(v) => {
                    batch.insert(key, v);
                    puts += 1;
                }
                None => {
                    batch.remove(key);
                    removes += 1;
                }
            }
        }
        (batch, puts, removes)
    }
}
