//! # Estate Core
//!
//! Foundation types for the portfolio dashboard.
//!
//! ```text
//! ┌───────────────────────────── Dataset ─────────────────────────────┐
//! │                                                                   │
//! │  properties: [Property]          consolidatedMetrics              │
//! │  ├─ id (required, unique)        ├─ totalProperties               │
//! │  ├─ commune / canton / type      ├─ totalAnnualRentCHF            │
//! │  ├─ surface / units / years      ├─ totalRentableSurfaceSqM       │
//! │  ├─ rents / value / yields       ├─ averageRentPerSqMPerYearCHF   │
//! │  └─ extra (unknown members)      └─ propertyTypeDistribution      │
//! │                                                                   │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Record fields decode leniently: anything that is not a well-formed
//! value for the field becomes `None`. Only the identifier is mandatory.

pub mod format;
pub mod lenient;
pub mod metrics;
pub mod property;

pub use format::{
    format_currency, format_number, format_percentage, format_surface, FormatOptions, Notation,
    NOT_AVAILABLE,
};
pub use metrics::{ConsolidatedMetrics, TypeDistribution};
pub use property::{NumericField, Property, PropertyId, TextField};

use serde::Serialize;
use std::collections::HashSet;

/// Result type for estate-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while assembling a dataset
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Duplicate property id: {0}")]
    DuplicateId(PropertyId),
}

/// An immutable, loaded portfolio: ordered records plus the supplied summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    properties: Vec<Property>,
    consolidated_metrics: ConsolidatedMetrics,
}

impl Dataset {
    /// Assemble a dataset, rejecting repeated identifiers.
    pub fn new(properties: Vec<Property>, consolidated_metrics: ConsolidatedMetrics) -> Result<Self> {
        let mut seen = HashSet::with_capacity(properties.len());
        for property in &properties {
            if !seen.insert(property.id) {
                return Err(Error::DuplicateId(property.id));
            }
        }

        Ok(Self {
            properties,
            consolidated_metrics,
        })
    }

    /// Records in source order
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The externally supplied summary
    pub fn metrics(&self) -> &ConsolidatedMetrics {
        &self.consolidated_metrics
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
