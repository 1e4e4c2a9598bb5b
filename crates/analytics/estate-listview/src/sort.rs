//! Sort keys for the property list

use crate::ParseError;
use estate_core::{NumericField, Property};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Attribute a list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Value,
    Yield,
    Rent,
    Surface,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Value => "value",
            SortField::Yield => "yield",
            SortField::Rent => "rent",
            SortField::Surface => "surface",
        }
    }

    /// Sort value of a record; absent values compare as 0.
    ///
    /// Rent uses the actual rent, falling back to the potential rent when
    /// no actual rent is reported.
    pub fn extract(&self, property: &Property) -> f64 {
        let value = match self {
            SortField::Value => property.get(NumericField::Valuation),
            SortField::Yield => property.get(NumericField::GrossYield),
            SortField::Rent => property
                .get(NumericField::AnnualRent)
                .or_else(|| property.get(NumericField::PotentialRent)),
            SortField::Surface => property.get(NumericField::RentableSurface),
        };
        // adding 0.0 folds -0.0 into 0.0 so it ties with absent values
        value.unwrap_or(0.0) + 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One of the eight list orderings, written `<field>-<direction>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Every key, in menu order
    pub const ALL: [SortKey; 8] = [
        SortKey::new(SortField::Value, SortDirection::Desc),
        SortKey::new(SortField::Value, SortDirection::Asc),
        SortKey::new(SortField::Yield, SortDirection::Desc),
        SortKey::new(SortField::Yield, SortDirection::Asc),
        SortKey::new(SortField::Rent, SortDirection::Desc),
        SortKey::new(SortField::Rent, SortDirection::Asc),
        SortKey::new(SortField::Surface, SortDirection::Desc),
        SortKey::new(SortField::Surface, SortDirection::Asc),
    ];

    /// Menu label, e.g. `Value (High to Low)`
    pub fn label(&self) -> String {
        let field = match self.field {
            SortField::Value => "Value",
            SortField::Yield => "Yield",
            SortField::Rent => "Rent",
            SortField::Surface => "Surface",
        };
        let order = match self.direction {
            SortDirection::Desc => "High to Low",
            SortDirection::Asc => "Low to High",
        };
        format!("{field} ({order})")
    }

    pub fn compare(&self, a: &Property, b: &Property) -> Ordering {
        let (a, b) = (self.field.extract(a), self.field.extract(b));
        match self.direction {
            SortDirection::Asc => a.total_cmp(&b),
            SortDirection::Desc => b.total_cmp(&a),
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::new(SortField::Value, SortDirection::Desc)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.field.as_str(), self.direction.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.to_string() == s)
            .ok_or_else(|| ParseError::UnknownSort(s.to_string()))
    }
}

impl Serialize for SortKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
