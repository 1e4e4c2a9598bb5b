//! Consolidated portfolio metrics
//!
//! Supplied by the source document alongside the records. Nothing here is
//! recomputed; consumers fall back to derived values when a member is absent.

use crate::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Summary object delivered with the property list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedMetrics {
    #[serde(default, deserialize_with = "lenient::integer", skip_serializing_if = "Option::is_none")]
    pub total_properties: Option<u64>,
    #[serde(rename = "totalAnnualRentCHF", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub total_annual_rent_chf: Option<f64>,
    #[serde(rename = "totalRentableSurfaceSqM", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub total_rentable_surface_sqm: Option<f64>,
    #[serde(rename = "averageRentPerSqMPerYearCHF", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub average_rent_per_sqm_chf: Option<f64>,
    #[serde(rename = "averageYieldGrossCBREPercent", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub average_gross_yield_percent: Option<f64>,

    /// Property type -> count and surface
    #[serde(default)]
    pub property_type_distribution: BTreeMap<String, TypeDistribution>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the property-type distribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDistribution {
    #[serde(default, deserialize_with = "lenient::integer", skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(rename = "surfaceSqM", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub surface_sqm: Option<f64>,
}

impl TypeDistribution {
    pub fn new(count: u64, surface_sqm: f64) -> Self {
        Self {
            count: Some(count),
            surface_sqm: Some(surface_sqm),
        }
    }

    /// Count, 0 when absent
    pub fn count(&self) -> u64 {
        self.count.unwrap_or(0)
    }

    /// Surface in m², 0 when absent
    pub fn surface(&self) -> f64 {
        self.surface_sqm.unwrap_or(0.0)
    }
}
