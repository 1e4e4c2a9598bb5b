//! # Estate ListView
//!
//! The property list as the user sees it: the loaded records narrowed by a
//! type filter and ordered by a sort key.
//!
//! ```text
//!   base (source order) ──► apply_filter(filter) ──► apply_sort(key) ──► visible
//!                                                                          │
//!                                                    ViewSignal::{Populated, Empty}
//! ```
//!
//! The derived list is always recomputed from the base, never from the
//! previous derived list, so recomputing with unchanged parameters yields
//! the same sequence.

pub mod sort;

pub use sort::{SortDirection, SortField, SortKey};

use estate_core::{Property, TextField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Parameter parse failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown sort key: {0}")]
    UnknownSort(String),

    #[error("Empty type filter")]
    EmptyFilter,
}

/// Wire form of [`TypeFilter::All`]
pub const ALL_TYPES: &str = "all";

/// Which property types stay in the list
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TypeFilter {
    #[default]
    All,
    Type(String),
}

impl TypeFilter {
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Type(wanted) => property.text(TextField::Type) == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str(ALL_TYPES),
            TypeFilter::Type(value) => f.write_str(value),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(ParseError::EmptyFilter),
            ALL_TYPES => Ok(TypeFilter::All),
            other => Ok(TypeFilter::Type(other.to_string())),
        }
    }
}

impl Serialize for TypeFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Records kept by the filter, in input order
pub fn apply_filter<'a>(records: &[&'a Property], filter: &TypeFilter) -> Vec<&'a Property> {
    records
        .iter()
        .copied()
        .filter(|p| filter.matches(p))
        .collect()
}

/// Stable sort by the key's field; the input is left untouched
pub fn apply_sort<'a>(records: &[&'a Property], key: SortKey) -> Vec<&'a Property> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

/// Distinct non-empty types, sorted; the filter's option list
pub fn available_types<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Property>,
{
    records
        .into_iter()
        .filter_map(|p| p.text(TextField::Type))
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Outcome of a recompute, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "count", rename_all = "lowercase")]
pub enum ViewSignal {
    Populated(usize),
    Empty,
}

/// Filter and sort state over one base list
#[derive(Debug, Clone)]
pub struct ListView<'a> {
    base: Vec<&'a Property>,
    filter: TypeFilter,
    sort: SortKey,
    visible: Vec<&'a Property>,
    signal: ViewSignal,
    recomputes: u64,
}

impl<'a> ListView<'a> {
    /// View with the default parameters (`all`, `value-desc`)
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Property>,
    {
        Self::with_params(records, TypeFilter::All, SortKey::default())
    }

    pub fn with_params<I>(records: I, filter: TypeFilter, sort: SortKey) -> Self
    where
        I: IntoIterator<Item = &'a Property>,
    {
        let mut view = Self {
            base: records.into_iter().collect(),
            filter,
            sort,
            visible: Vec::new(),
            signal: ViewSignal::Empty,
            recomputes: 0,
        };
        view.recompute();
        view
    }

    pub fn set_filter(&mut self, filter: TypeFilter) -> ViewSignal {
        self.filter = filter;
        self.recompute()
    }

    pub fn set_sort(&mut self, sort: SortKey) -> ViewSignal {
        self.sort = sort;
        self.recompute()
    }

    /// Derive the visible list from the base.
    pub fn recompute(&mut self) -> ViewSignal {
        let filtered = apply_filter(&self.base, &self.filter);
        self.visible = apply_sort(&filtered, self.sort);
        self.recomputes += 1;

        self.signal = if self.visible.is_empty() {
            ViewSignal::Empty
        } else {
            ViewSignal::Populated(self.visible.len())
        };

        tracing::debug!(
            filter = %self.filter,
            sort = %self.sort,
            visible = self.visible.len(),
            "list view recomputed"
        );
        self.signal
    }

    pub fn visible(&self) -> &[&'a Property] {
        &self.visible
    }

    pub fn base(&self) -> &[&'a Property] {
        &self.base
    }

    pub fn filter(&self) -> &TypeFilter {
        &self.filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn signal(&self) -> ViewSignal {
        self.signal
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Times the derived list has been rebuilt
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn records(values: Value) -> Vec<Property> {
        serde_json::from_value(values).unwrap()
    }

    fn ids(list: &[&Property]) -> Vec<i64> {
        list.iter().map(|p| p.id.0).collect()
    }

    fn portfolio() -> Vec<Property> {
        records(json!([
            {"id": 1, "type": "A", "cbreValueCHF": 100, "vacancyPercent": 5},
            {"id": 2, "type": "B", "cbreValueCHF": 300, "vacancyPercent": null},
            {"id": 3, "type": "A", "cbreValueCHF": 200, "vacancyPercent": 15}
        ]))
    }

    #[test]
    fn test_filter_all_is_identity() {
        let all = portfolio();
        let base: Vec<&Property> = all.iter().collect();
        assert_eq!(ids(&apply_filter(&base, &TypeFilter::All)), vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_keeps_order() {
        let all = portfolio();
        let base: Vec<&Property> = all.iter().collect();
        let only_a = apply_filter(&base, &TypeFilter::Type("A".into()));
        assert_eq!(ids(&only_a), vec![1, 3]);

        let none = apply_filter(&base, &TypeFilter::Type("C".into()));
        assert!(none.is_empty());
    }

    #[test]
    fn test_rent_desc_uses_potential_fallback() {
        let all = records(json!([
            {"id": 1, "annualRentSourceCHF": 50},
            {"id": 2, "annualRentSourceCHF": null, "annualRentPotentialCBRECHF": 80}
        ]));
        let base: Vec<&Property> = all.iter().collect();
        let sorted = apply_sort(&base, "rent-desc".parse().unwrap());
        assert_eq!(ids(&sorted), vec![2, 1]);
    }

    #[test]
    fn test_rent_desc_fallback_below_actual_rent() {
        let all = records(json!([
            {"id": 1, "annualRentSourceCHF": null, "annualRentPotentialCBRECHF": 500},
            {"id": 2, "annualRentSourceCHF": 1000}
        ]));
        let base: Vec<&Property> = all.iter().collect();
        let sorted = apply_sort(&base, "rent-desc".parse().unwrap());
        assert_eq!(ids(&sorted), vec![2, 1]);
    }

    #[test]
    fn test_negative_zero_value_keeps_input_order() {
        let all = records(json!([
            {"id": 1, "cbreValueCHF": -0.0},
            {"id": 2}
        ]));
        let base: Vec<&Property> = all.iter().collect();
        assert_eq!(ids(&apply_sort(&base, SortKey::default())), vec![1, 2]);
        assert_eq!(ids(&apply_sort(&base, "value-asc".parse().unwrap())), vec![1, 2]);
    }

    #[test]
    fn test_sort_missing_values_as_zero_and_stable() {
        let all = records(json!([
            {"id": 1},
            {"id": 2, "rentableSurfaceSqM": 10},
            {"id": 3, "rentableSurfaceSqM": "n/a"},
            {"id": 4, "rentableSurfaceSqM": -5}
        ]));
        let base: Vec<&Property> = all.iter().collect();

        let asc = apply_sort(&base, "surface-asc".parse().unwrap());
        assert_eq!(ids(&asc), vec![1, 3, 4, 2]);

        let desc = apply_sort(&base, "surface-desc".parse().unwrap());
        assert_eq!(ids(&desc), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let all = records(json!([
            {"id": 1, "grossYieldCBREPercent": 4.2},
            {"id": 2, "grossYieldCBREPercent": 5.1},
            {"id": 3},
            {"id": 4, "grossYieldCBREPercent": 4.2}
        ]));
        let base: Vec<&Property> = all.iter().collect();

        for key in SortKey::ALL {
            let once = apply_sort(&base, key);
            let twice = apply_sort(&once, key);
            assert_eq!(ids(&once), ids(&twice), "{key}");
        }
    }

    #[test]
    fn test_view_filter_then_sort() {
        let all = portfolio();
        let mut view = ListView::new(&all);
        assert_eq!(ids(view.visible()), vec![2, 3, 1]);

        let signal = view.set_filter("A".parse().unwrap());
        assert_eq!(signal, ViewSignal::Populated(2));
        assert_eq!(ids(view.visible()), vec![3, 1]);
    }

    #[test]
    fn test_each_change_recomputes_once() {
        let all = portfolio();
        let mut view = ListView::new(&all);
        assert_eq!(view.recomputes(), 1);

        view.set_sort("value-asc".parse().unwrap());
        assert_eq!(view.recomputes(), 2);
        view.set_filter(TypeFilter::All);
        assert_eq!(view.recomputes(), 3);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let all = portfolio();
        let mut view = ListView::with_params(&all, TypeFilter::Type("A".into()), SortKey::default());
        let first = ids(view.visible());
        view.recompute();
        assert_eq!(ids(view.visible()), first);
        assert_eq!(ids(view.base()), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_signal() {
        let all = portfolio();
        let mut view = ListView::new(&all);
        let signal = view.set_filter(TypeFilter::Type("Industriel".into()));
        assert_eq!(signal, ViewSignal::Empty);
        assert!(view.is_empty());

        let nothing: Vec<Property> = Vec::new();
        assert_eq!(ListView::new(&nothing).signal(), ViewSignal::Empty);
    }

    #[test]
    fn test_available_types() {
        let all = records(json!([
            {"id": 1, "type": "Mixte"},
            {"id": 2, "type": "Industriel"},
            {"id": 3},
            {"id": 4, "type": "Mixte"},
            {"id": 5, "type": " "}
        ]));
        assert_eq!(available_types(&all), vec!["Industriel", "Mixte"]);
    }

    #[test]
    fn test_type_filter_text_form() {
        assert_eq!("all".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!(
            "Rés.+Comm.".parse::<TypeFilter>().unwrap(),
            TypeFilter::Type("Rés.+Comm.".into())
        );
        assert_eq!("".parse::<TypeFilter>(), Err(ParseError::EmptyFilter));
        assert_eq!(TypeFilter::All.to_string(), "all");
    }
}
