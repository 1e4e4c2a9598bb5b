//! # Estate Session
//!
//! A [`Session`] owns one loaded dataset and is the only way the rest of
//! the application reaches it. List views and lookups borrow from the
//! session; a reload produces a new session rather than mutating this one.

pub mod detail;

pub use detail::{humanize_key, DetailField, PropertyCard, PropertyDetail, TypeTone};

use chrono::{DateTime, Utc};
use estate_core::{Dataset, Property, PropertyId};
use estate_listview::{available_types, ListView, SortKey, TypeFilter};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Linear lookup by identifier; absence is not an error.
pub fn find_by_id<'a, I>(records: I, id: PropertyId) -> Option<&'a Property>
where
    I: IntoIterator<Item = &'a Property>,
{
    records.into_iter().find(|p| p.id == id)
}

/// One loaded dataset
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    dataset: Arc<Dataset>,
    loaded_at: DateTime<Utc>,
}

/// Session metadata, without the records
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub loaded_at: DateTime<Utc>,
    pub properties: usize,
}

impl Session {
    pub fn new(dataset: Dataset) -> Self {
        Self::from_shared(Arc::new(dataset))
    }

    pub fn from_shared(dataset: Arc<Dataset>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            dataset,
            loaded_at: Utc::now(),
        };
        tracing::debug!(session = %session.id, properties = session.dataset.len(), "session opened");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn properties(&self) -> &[Property] {
        self.dataset.properties()
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            loaded_at: self.loaded_at,
            properties: self.dataset.len(),
        }
    }

    /// Filtered and sorted view over all records
    pub fn list_view(&self, filter: TypeFilter, sort: SortKey) -> ListView<'_> {
        ListView::with_params(self.properties(), filter, sort)
    }

    /// Options for the type filter
    pub fn types(&self) -> Vec<String> {
        available_types(self.properties())
    }

    pub fn find(&self, id: PropertyId) -> Option<&Property> {
        find_by_id(self.properties(), id)
    }

    pub fn detail(&self, id: PropertyId) -> Option<PropertyDetail> {
        let detail = self.find(id).map(PropertyDetail::from_property);
        if detail.is_none() {
            tracing::info!(%id, "property not found");
        }
        detail
    }
}
