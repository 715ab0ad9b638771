//! Per-user result slots.
//!
//! Each user has one slot holding their latest analysis. A slot is replaced
//! wholesale when a new result arrives and never edited. A user may have at
//! most one analysis in flight; a second submit is refused until the first
//! one finishes.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::AnalysisView;
use crate::error::ApiError;

/// A finished analysis as displayed to its owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,
    pub view: AnalysisView,
}

#[derive(Clone, Default)]
pub struct ResultStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    latest: HashMap<i64, Arc<AnalysisRecord>>,
    in_flight: HashSet<i64>,
}

/// Marks a user's analysis as in flight until dropped.
pub struct InFlightGuard {
    store: ResultStore,
    user_id: i64,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the user's in-flight slot.
    pub fn begin(&self, user_id: i64) -> Result<InFlightGuard, ApiError> {
        let mut inner = self.inner.write();
        if !inner.in_flight.insert(user_id) {
            return Err(ApiError::Conflict(
                "An analysis is already in progress for this account".to_string(),
            ));
        }

        Ok(InFlightGuard {
            store: self.clone(),
            user_id,
        })
    }

    pub fn latest(&self, user_id: i64) -> Option<Arc<AnalysisRecord>> {
        self.inner.read().latest.get(&user_id).cloned()
    }
}

impl InFlightGuard {
    /// Publish the finished record, replacing the previous one, and release
    /// the in-flight slot.
    pub fn complete(self, record: AnalysisRecord) -> Arc<AnalysisRecord> {
        let record = Arc::new(record);
        self.store
            .inner
            .write()
            .latest
            .insert(self.user_id, Arc::clone(&record));
        record
        // `self` drops here and releases the slot
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.store.inner.write().in_flight.remove(&self.user_id);
    }
}
