//! GSTIN record store.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::core::{GstinRecord, StoreError};

/// Document store for [`GstinRecord`]s keyed by GSTIN or transporter ID.
///
/// Upserts are last-writer-wins.
#[async_trait]
pub trait GstinStore: Send + Sync {
    async fn get(&self, gstin: &str) -> Result<Option<GstinRecord>, StoreError>;

    async fn exists(&self, gstin: &str) -> Result<bool, StoreError> {
        Ok(self.get(gstin).await?.is_some())
    }

    async fn upsert(&self, record: GstinRecord) -> Result<(), StoreError>;
}

/// In-memory [`GstinStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, GstinRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing records.
    pub fn with_records(records: impl IntoIterator<Item = GstinRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.records.insert(record.gstin.clone(), record);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl GstinStore for MemoryStore {
    async fn get(&self, gstin: &str) -> Result<Option<GstinRecord>, StoreError> {
        Ok(self.records.get(gstin).map(|r| r.value().clone()))
    }

    async fn exists(&self, gstin: &str) -> Result<bool, StoreError> {
        Ok(self.records.contains_key(gstin))
    }

    async fn upsert(&self, record: GstinRecord) -> Result<(), StoreError> {
        self.records.insert(record.gstin.clone(), record);
        Ok(())
    }
}
