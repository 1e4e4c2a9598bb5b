//! Document shape check
//!
//! The document must be an object carrying both `properties` (an array of
//! record objects, each with an integer `id`) and `consolidatedMetrics`.
//! Anything inside a record beyond its `id` is decoded leniently and never
//! fails the load.

use crate::{LoadError, Result};
use estate_core::{ConsolidatedMetrics, Dataset, Property};
use serde_json::{Map, Value};

pub const PROPERTIES_MEMBER: &str = "properties";
pub const METRICS_MEMBER: &str = "consolidatedMetrics";

/// Parse raw bytes into a dataset
pub fn parse_document(bytes: &[u8]) -> Result<Dataset> {
    let root: Value = serde_json::from_slice(bytes)?;
    let Value::Object(mut root) = root else {
        return Err(LoadError::Malformed("document is not a JSON object".into()));
    };

    let properties = take_member(&mut root, PROPERTIES_MEMBER)?;
    let metrics = take_member(&mut root, METRICS_MEMBER)?;

    let Value::Array(items) = properties else {
        return Err(LoadError::Malformed(format!("`{PROPERTIES_MEMBER}` is not an array")));
    };
    if !metrics.is_object() {
        return Err(LoadError::Malformed(format!("`{METRICS_MEMBER}` is not an object")));
    }

    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Property>(item)
                .map_err(|e| LoadError::Malformed(format!("property #{index}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let metrics: ConsolidatedMetrics = serde_json::from_value(metrics)
        .map_err(|e| LoadError::Malformed(format!("{METRICS_MEMBER}: {e}")))?;

    Ok(Dataset::new(records, metrics)?)
}

fn take_member(root: &mut Map<String, Value>, name: &'static str) -> Result<Value> {
    match root.remove(name) {
        None | Some(Value::Null) => Err(LoadError::MissingMember(name)),
        Some(value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_core::PropertyId;

    #[test]
    fn test_parses_complete_document() {
        let doc = br#"{
            "properties": [
                {"id": 1, "type": "Mixte", "canton": "VD", "cbreValueCHF": 5200000},
                {"id": 2, "type": "Industriel", "vacancyPercent": "unknown"}
            ],
            "consolidatedMetrics": {
                "totalProperties": 2,
                "propertyTypeDistribution": {"Mixte": {"count": 1, "surfaceSqM": 900}}
            }
        }"#;

        let dataset = parse_document(doc).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.properties()[0].id, PropertyId(1));
        assert_eq!(dataset.properties()[1].vacancy_percent, None);
        assert_eq!(dataset.metrics().total_properties, Some(2));
    }

    #[test]
    fn test_missing_properties() {
        let err = parse_document(br#"{"consolidatedMetrics": {}}"#).unwrap_err();
        assert!(matches!(err, LoadError::MissingMember(PROPERTIES_MEMBER)));
    }

    #[test]
    fn test_missing_metrics() {
        let err = parse_document(br#"{"properties": []}"#).unwrap_err();
        assert!(matches!(err, LoadError::MissingMember(METRICS_MEMBER)));
    }

    #[test]
    fn test_null_member_counts_as_missing() {
        let err = parse_document(br#"{"properties": null, "consolidatedMetrics": {}}"#).unwrap_err();
        assert!(matches!(err, LoadError::MissingMember(PROPERTIES_MEMBER)));
    }

    #[test]
    fn test_empty_property_list_is_valid() {
        let dataset = parse_document(br#"{"properties": [], "consolidatedMetrics": {}}"#).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_non_array_properties() {
        let err = parse_document(br#"{"properties": {"id": 1}, "consolidatedMetrics": {}}"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn test_record_without_id() {
        let err = parse_document(br#"{"properties": [{"commune": "Sion"}], "consolidatedMetrics": {}}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Malformed(msg) if msg.starts_with("property #0")));
    }

    #[test]
    fn test_negative_id_is_a_valid_record() {
        let dataset = parse_document(br#"{"properties": [{"id": -1}, {"id": 2}], "consolidatedMetrics": {}}"#)
            .unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.properties()[0].id, PropertyId(-1));
    }

    #[test]
    fn test_duplicate_ids() {
        let err = parse_document(br#"{"properties": [{"id": 4}, {"id": 4}], "consolidatedMetrics": {}}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Dataset(estate_core::Error::DuplicateId(PropertyId(4)))));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(parse_document(b"<html>"), Err(LoadError::Json(_))));
        assert!(matches!(parse_document(b"[]"), Err(LoadError::Malformed(_))));
    }
}
