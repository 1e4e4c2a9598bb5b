//! # Estate Aggregate
//!
//! Pure aggregations over property records. Nothing here fails on bad
//! per-record data:
//!
//! - sums treat absent / non-numeric values as 0
//! - groupings put absent / blank keys under [`MISSING_KEY`]
//! - averages skip records without a value, and report `None` (not 0)
//!   when no record has one
//!
//! Every function takes any iterator of `&Property`, so the same code runs
//! over a whole dataset (`dataset.properties()`) or a group
//! (`group.iter().copied()`).

use estate_core::{NumericField, Property};
use std::collections::BTreeMap;

/// Group key for records whose grouping field is absent or blank
pub const MISSING_KEY: &str = "N/A";

/// Records partitioned by key; keys iterate in sorted order
pub type Groups<'a> = BTreeMap<String, Vec<&'a Property>>;

/// Sum a numeric member by JSON key
pub fn sum_field<'a, I>(records: I, field: &str) -> f64
where
    I: IntoIterator<Item = &'a Property>,
{
    records
        .into_iter()
        .map(|p| p.number(field).unwrap_or(0.0))
        .sum()
}

/// Partition records by the value of a member, keeping source order
/// within each group.
///
/// Only absent, null and blank values go to [`MISSING_KEY`]. A numeric `0`
/// or a boolean `false` is a real value and gets its own `"0"` / `"false"`
/// group rather than joining the missing-value group.
pub fn group_by<'a, I>(records: I, field: &str) -> Groups<'a>
where
    I: IntoIterator<Item = &'a Property>,
{
    let mut groups: Groups<'a> = BTreeMap::new();
    for record in records {
        let key = record
            .group_key(field)
            .unwrap_or_else(|| MISSING_KEY.to_string());
        groups.entry(key).or_default().push(record);
    }
    groups
}

/// Mean vacancy over records that report one
pub fn average_vacancy<'a, I>(records: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Property>,
{
    let (sum, count) = records
        .into_iter()
        .filter_map(|p| p.get(NumericField::Vacancy))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Mean vacancy per group.
///
/// A group where no record reports vacancy maps to 0 so that every
/// category keeps a plotted value.
pub fn average_vacancy_by_group<'a, I>(records: I, group_field: &str) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Property>,
{
    group_by(records, group_field)
        .into_iter()
        .map(|(key, group)| {
            let average = average_vacancy(group.iter().copied()).unwrap_or(0.0);
            (key, average)
        })
        .collect()
}

/// Number of records per group
pub fn count_by<'a, I>(records: I, field: &str) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a Property>,
{
    group_by(records, field)
        .into_iter()
        .map(|(key, group)| (key, group.len()))
        .collect()
}

/// Sum of `sum_field` per value of `group_field`
pub fn sum_by_group<'a, I>(records: I, group_field: &str, sum_field_key: &str) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Property>,
{
    group_by(records, group_field)
        .into_iter()
        .map(|(key, group)| (key, sum_field(group.iter().copied(), sum_field_key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_core::PropertyId;
    use serde_json::{json, Value};

    fn records(values: Value) -> Vec<Property> {
        serde_json::from_value(values).unwrap()
    }

    fn ids(group: &[&Property]) -> Vec<i64> {
        group.iter().map(|p| p.id.0).collect()
    }

    fn portfolio() -> Vec<Property> {
        records(json!([
            {"id": 1, "type": "A", "cbreValueCHF": 100, "vacancyPercent": 5},
            {"id": 2, "type": "B", "cbreValueCHF": 300, "vacancyPercent": null},
            {"id": 3, "type": "A", "cbreValueCHF": 200, "vacancyPercent": 15}
        ]))
    }

    #[test]
    fn test_sum_empty_is_zero() {
        let empty: Vec<Property> = Vec::new();
        assert_eq!(sum_field(&empty, "cbreValueCHF"), 0.0);
    }

    #[test]
    fn test_sum_ignores_absent_and_non_numeric() {
        let list = records(json!([
            {"id": 1, "v": 10},
            {"id": 2, "v": null},
            {"id": 3, "v": "x"},
            {"id": 4}
        ]));
        assert_eq!(sum_field(&list, "v"), 10.0);
    }

    #[test]
    fn test_sum_known_field() {
        assert_eq!(sum_field(&portfolio(), "cbreValueCHF"), 600.0);
    }

    #[test]
    fn test_group_by_partitions_in_order() {
        let all = portfolio();
        let groups = group_by(&all, "type");

        assert_eq!(groups.len(), 2);
        assert_eq!(ids(&groups["A"]), vec![1, 3]);
        assert_eq!(ids(&groups["B"]), vec![2]);

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, all.len());
    }

    #[test]
    fn test_group_by_sentinel_for_missing_keys() {
        let list = records(json!([
            {"id": 1, "canton": "VD"},
            {"id": 2},
            {"id": 3, "canton": ""},
            {"id": 4, "canton": null},
            {"id": 5, "canton": "GE"}
        ]));
        let groups = group_by(&list, "canton");

        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["GE", MISSING_KEY, "VD"]);
        assert_eq!(ids(&groups[MISSING_KEY]), vec![2, 3, 4]);
    }

    #[test]
    fn test_group_by_zero_and_false_are_real_keys() {
        let list = records(json!([
            {"id": 1, "floorCount": 0, "listed": false},
            {"id": 2, "floorCount": 3, "listed": true},
            {"id": 3}
        ]));

        let floors = group_by(&list, "floorCount");
        assert_eq!(ids(&floors["0"]), vec![1]);
        assert_eq!(ids(&floors[MISSING_KEY]), vec![3]);

        let listed = group_by(&list, "listed");
        assert_eq!(ids(&listed["false"]), vec![1]);
        assert_eq!(ids(&listed["true"]), vec![2]);
    }

    #[test]
    fn test_every_record_in_exactly_one_group() {
        let list = records(json!([
            {"id": 1, "canton": "BE"}, {"id": 2, "canton": "ZH"}, {"id": 3},
            {"id": 4, "canton": "BE"}, {"id": 5, "canton": "ZH"}, {"id": 6, "canton": "TI"}
        ]));
        let groups = group_by(&list, "canton");

        let mut seen: Vec<PropertyId> = groups.values().flatten().map(|p| p.id).collect();
        seen.sort();
        let expected: Vec<PropertyId> = list.iter().map(|p| p.id).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_group_by_empty() {
        let empty: Vec<Property> = Vec::new();
        assert!(group_by(&empty, "type").is_empty());
    }

    #[test]
    fn test_average_vacancy_absent_vs_zero() {
        let empty: Vec<Property> = Vec::new();
        assert_eq!(average_vacancy(&empty), None);

        let zero = records(json!([{"id": 1, "vacancyPercent": 0}]));
        assert_eq!(average_vacancy(&zero), Some(0.0));

        let none_reported = records(json!([{"id": 1}, {"id": 2, "vacancyPercent": "?"}]));
        assert_eq!(average_vacancy(&none_reported), None);
    }

    #[test]
    fn test_average_vacancy_skips_missing() {
        assert_eq!(average_vacancy(&portfolio()), Some(10.0));
    }

    #[test]
    fn test_average_vacancy_by_group_defaults_to_zero() {
        let by_type = average_vacancy_by_group(&portfolio(), "type");

        assert_eq!(by_type.len(), 2);
        assert_eq!(by_type["A"], 10.0);
        assert_eq!(by_type["B"], 0.0);
    }

    #[test]
    fn test_count_and_sum_by_group() {
        let list = records(json!([
            {"id": 1, "canton": "VD", "annualRentSourceCHF": 1000},
            {"id": 2, "canton": "GE", "annualRentSourceCHF": 500},
            {"id": 3, "canton": "VD", "annualRentSourceCHF": null},
            {"id": 4, "canton": "VD", "annualRentSourceCHF": 250}
        ]));

        let counts = count_by(&list, "canton");
        assert_eq!(counts["VD"], 3);
        assert_eq!(counts["GE"], 1);

        let rents = sum_by_group(&list, "canton", "annualRentSourceCHF");
        assert_eq!(rents["VD"], 1250.0);
        assert_eq!(rents["GE"], 500.0);
    }

    #[test]
    fn test_works_over_groups() {
        let all = portfolio();
        let groups = group_by(&all, "type");
        assert_eq!(sum_field(groups["A"].iter().copied(), "cbreValueCHF"), 300.0);
    }
}
