//! Property detail and card views
//!
//! Both turn a record into labelled, already-formatted fields; rendering
//! them is left to the caller.

use estate_core::{
    format_currency, format_number, format_percentage, format_surface, FormatOptions,
    NumericField, Property, PropertyId, TextField, NOT_AVAILABLE,
};
use serde::Serialize;
use serde_json::Value;

/// A label and its display value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub label: String,
    pub value: String,
}

impl DetailField {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Everything known about one property, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDetail {
    pub id: PropertyId,
    pub fields: Vec<DetailField>,
    /// Members without a dedicated field, with humanised labels
    pub additional: Vec<DetailField>,
}

impl PropertyDetail {
    pub fn from_property(property: &Property) -> Self {
        let fields = DETAIL_LAYOUT
            .iter()
            .filter_map(|row| {
                let value = row.source.render(property)?;
                let keep = value != NOT_AVAILABLE || row.always_shown;
                keep.then(|| DetailField::new(row.label, value))
            })
            .collect();

        let additional = property
            .extra
            .iter()
            .filter_map(|(key, value)| {
                render_extra(value).map(|value| DetailField::new(humanize_key(key), value))
            })
            .collect();

        Self {
            id: property.id,
            fields,
            additional,
        }
    }

    /// Display value by label
    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .chain(&self.additional)
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    /// Plain-text rendering, one `Label: value` per line
    pub fn to_text(&self) -> String {
        let mut out = format!("Property Details (ID: {}):\n", self.id);
        out.push_str(&"-".repeat(26));
        out.push('\n');
        for field in &self.fields {
            out.push_str(&format!("{}: {}\n", field.label, field.value));
        }
        if !self.additional.is_empty() {
            out.push_str("\nAdditional Data:\n");
            out.push_str(&"-".repeat(26));
            out.push('\n');
            for field in &self.additional {
                out.push_str(&format!("{}: {}\n", field.label, field.value));
            }
        }
        out
    }
}

/// Where a detail row takes its value from, and how it is formatted
#[derive(Debug, Clone, Copy)]
enum Source {
    Text(TextField),
    Year(NumericField),
    Count(NumericField),
    Surface(NumericField),
    Currency(NumericField),
    Percentage(NumericField),
    RentPerSqm(NumericField),
    Years(NumericField),
}

impl Source {
    /// `None` when the record does not carry the member at all
    fn render(self, property: &Property) -> Option<String> {
        let options = FormatOptions::default();
        match self {
            Source::Text(field) => property.text(field).map(str::to_owned),
            Source::Year(field) => property.get(field).map(|v| format!("{v}")),
            Source::Count(field) => property.get(field).map(|v| format_number(Some(v), options)),
            Source::Surface(field) => property.get(field).map(|v| format_surface(Some(v), options)),
            Source::Currency(field) => property.get(field).map(|v| format_currency(Some(v), options)),
            Source::Percentage(field) => {
                property.get(field).map(|v| format_percentage(Some(v), options))
            }
            Source::RentPerSqm(field) => property.get(field).map(rent_per_sqm),
            Source::Years(field) => property.get(field).map(|v| format!("{v:.1} years")),
        }
    }
}

struct Row {
    label: &'static str,
    source: Source,
    always_shown: bool,
}

const fn row(label: &'static str, source: Source) -> Row {
    Row {
        label,
        source,
        always_shown: false,
    }
}

const fn identity(label: &'static str, field: TextField) -> Row {
    Row {
        label,
        source: Source::Text(field),
        always_shown: true,
    }
}

const DETAIL_LAYOUT: &[Row] = &[
    identity("Address", TextField::Address),
    identity("Commune", TextField::Commune),
    identity("Canton", TextField::Canton),
    identity("Type", TextField::Type),
    row("Specific Use", Source::Text(TextField::SpecificUse)),
    row("Construction Year", Source::Year(NumericField::ConstructionYear)),
    row("Last Renovation Year", Source::Year(NumericField::LastRenovationYear)),
    row("Condition", Source::Text(TextField::Condition)),
    row("Number of Units", Source::Count(NumericField::NumberOfUnits)),
    row("Floor", Source::Text(TextField::Floor)),
    row("Heating Type", Source::Text(TextField::HeatingType)),
    row("Rentable Surface", Source::Surface(NumericField::RentableSurface)),
    row("Annual Rent (Actual)", Source::Currency(NumericField::AnnualRent)),
    row("Annual Rent (Potential CBRE)", Source::Currency(NumericField::PotentialRent)),
    row("Rent Potential Gain", Source::Percentage(NumericField::PotentialPercent)),
    row("Avg. Net Rent/m²/Year", Source::RentPerSqm(NumericField::NetRentPerSqm)),
    row("Vacancy Rate", Source::Percentage(NumericField::Vacancy)),
    row("WAULT", Source::Years(NumericField::Wault)),
    row("CBRE Value", Source::Currency(NumericField::Valuation)),
    row("Gross Yield (CBRE)", Source::Percentage(NumericField::GrossYield)),
    row("Net Yield (CBRE)", Source::Percentage(NumericField::NetYield)),
    row("Acquisition Price", Source::Currency(NumericField::AcquisitionPrice)),
];

fn rent_per_sqm(value: f64) -> String {
    format!(
        "{}/m²/year",
        format_currency(Some(value), FormatOptions::max_fraction_digits(2))
    )
}

fn render_extra(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n
            .as_f64()
            .map(|v| format_number(Some(v), FormatOptions::default())),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// `someKey` → `Some Key`
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() && !out.is_empty() {
            out.push(' ');
        }
        out.push(c);
    }
    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Colour family of a type badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTone {
    Blue,
    Purple,
    Green,
    Orange,
    Teal,
    Gray,
}

impl TypeTone {
    pub fn for_type(property_type: Option<&str>) -> Self {
        match property_type {
            Some("Résidentiel") => TypeTone::Blue,
            Some("Mixte") => TypeTone::Purple,
            Some("Rés.+Comm.") => TypeTone::Green,
            Some("Industriel") => TypeTone::Orange,
            Some("Commercial") => TypeTone::Teal,
            _ => TypeTone::Gray,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTone::Blue => "blue",
            TypeTone::Purple => "purple",
            TypeTone::Green => "green",
            TypeTone::Orange => "orange",
            TypeTone::Teal => "teal",
            TypeTone::Gray => "gray",
        }
    }
}

/// Grid card summary of one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyCard {
    pub id: PropertyId,
    pub commune: String,
    pub address: String,
    pub property_type: String,
    pub tone: TypeTone,
    pub fields: Vec<DetailField>,
}

impl PropertyCard {
    pub fn from_property(p: &Property) -> Self {
        let options = FormatOptions::default();
        let or_na = |v: Option<&str>| v.unwrap_or(NOT_AVAILABLE).to_string();
        let mut fields = Vec::with_capacity(16);

        fields.push(DetailField::new("Canton", or_na(p.text(TextField::Canton))));
        fields.push(DetailField::new(
            "Constructed",
            p.construction_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ));
        if let Some(year) = p.last_renovation_year {
            fields.push(DetailField::new("Renovated", year.to_string()));
        }
        fields.push(DetailField::new("Surface", format_surface(p.rentable_surface_sqm, options)));
        fields.push(DetailField::new("CBRE Value", format_currency(p.valuation_chf, options)));
        fields.extend(rent_fields(p));
        fields.push(DetailField::new(
            "Gross Yield (CBRE)",
            format_percentage(p.gross_yield_percent, options),
        ));
        fields.push(DetailField::new(
            "Net Yield (CBRE)",
            format_percentage(p.net_yield_percent, options),
        ));
        fields.push(DetailField::new("Vacancy", format_percentage(p.vacancy_percent, options)));

        if let Some(gain) = p.potential_percent.filter(|v| *v != 0.0) {
            fields.push(DetailField::new(
                "Rent Potential Gain",
                format_percentage(Some(gain), options),
            ));
        }
        if p.acquisition_price_chf.is_some() {
            fields.push(DetailField::new(
                "Acq. Price",
                format_currency(p.acquisition_price_chf, options),
            ));
        }
        if let Some(units) = p.number_of_units {
            fields.push(DetailField::new("Units", units.to_string()));
        }
        for (label, field) in [
            ("Condition", TextField::Condition),
            ("Heating", TextField::HeatingType),
            ("Specific Use", TextField::SpecificUse),
            ("Floor", TextField::Floor),
        ] {
            if let Some(text) = p.text(field) {
                fields.push(DetailField::new(label, text));
            }
        }
        fields.push(DetailField::new(
            "Net Rent/m²/Year",
            p.net_rent_per_sqm_chf
                .map(rent_per_sqm)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ));
        fields.push(DetailField::new(
            "WAULT",
            p.wault_years
                .map(|v| format!("{v:.1} years"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ));

        Self {
            id: p.id,
            commune: or_na(p.text(TextField::Commune)),
            address: or_na(p.text(TextField::Address)),
            property_type: or_na(p.text(TextField::Type)),
            tone: TypeTone::for_type(p.text(TextField::Type)),
            fields,
        }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

/// Actual rent, plus potential rent when it differs; potential alone when
/// no actual rent is reported.
fn rent_fields(p: &Property) -> Vec<DetailField> {
    let options = FormatOptions::default();
    let actual = p.annual_rent_chf;
    let potential = p.potential_rent_chf.filter(|v| *v != 0.0);

    match (actual, potential) {
        (None, Some(potential)) => vec![DetailField::new(
            "Annual Rent (Potential)",
            format_currency(Some(potential), options),
        )],
        (Some(actual), Some(potential)) if actual != 0.0 && actual != potential => vec![
            DetailField::new("Annual Rent (Actual)", format_currency(Some(actual), options)),
            DetailField::new("Potential Rent", format_currency(Some(potential), options)),
        ],
        _ => vec![DetailField::new("Annual Rent (Actual)", format_currency(actual, options))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn property(value: Value) -> Property {
        serde_json::from_value(value).unwrap()
    }

    fn labels(fields: &[DetailField]) -> Vec<&str> {
        fields.iter().map(|f| f.label.as_str()).collect()
    }

    #[test]
    fn test_detail_order_and_formatting() {
        let p = property(json!({
            "id": 7,
            "adresse": "Rue du Lac 12",
            "commune": "Montreux",
            "canton": "VD",
            "type": "Mixte",
            "constructionYear": 1965,
            "numberOfUnits": 1200,
            "rentableSurfaceSqM": 2450.4,
            "annualRentSourceCHF": 512000,
            "areaWeightedNetRentYearSqMCHF": 208.95,
            "vacancyPercent": 3.27,
            "waultYears": 4,
            "cbreValueCHF": 14800000,
            "grossYieldCBREPercent": 3.46
        }));

        let detail = PropertyDetail::from_property(&p);
        assert_eq!(
            labels(&detail.fields),
            vec![
                "Address",
                "Commune",
                "Canton",
                "Type",
                "Construction Year",
                "Number of Units",
                "Rentable Surface",
                "Annual Rent (Actual)",
                "Avg. Net Rent/m²/Year",
                "Vacancy Rate",
                "WAULT",
                "CBRE Value",
                "Gross Yield (CBRE)",
            ]
        );
        assert_eq!(detail.value("Construction Year"), Some("1965"));
        assert_eq!(detail.value("Number of Units"), Some("1’200"));
        assert_eq!(detail.value("Rentable Surface"), Some("2’450 m²"));
        assert_eq!(detail.value("Annual Rent (Actual)"), Some("CHF 512’000.00"));
        assert_eq!(detail.value("Avg. Net Rent/m²/Year"), Some("CHF 208.95/m²/year"));
        assert_eq!(detail.value("Vacancy Rate"), Some("3.3%"));
        assert_eq!(detail.value("WAULT"), Some("4.0 years"));
        assert_eq!(detail.value("CBRE Value"), Some("CHF 14’800’000.00"));
    }

    #[test]
    fn test_detail_skips_absent_members() {
        let detail = PropertyDetail::from_property(&property(json!({"id": 1, "commune": "Sion"})));
        assert_eq!(labels(&detail.fields), vec!["Commune"]);
        assert!(detail.additional.is_empty());
    }

    #[test]
    fn test_identity_fields_keep_sentinel_text() {
        let detail = PropertyDetail::from_property(&property(json!({
            "id": 1, "canton": "N/A", "condition": "N/A"
        })));
        assert_eq!(labels(&detail.fields), vec!["Canton"]);
        assert_eq!(detail.value("Canton"), Some(NOT_AVAILABLE));
    }

    #[test]
    fn test_additional_data() {
        let detail = PropertyDetail::from_property(&property(json!({
            "id": 3,
            "energyLabel": "B",
            "parkingSpaces": 1500,
            "notes": "  ",
            "owner": null,
            "tags": ["a", "b"]
        })));

        assert_eq!(detail.value("Energy Label"), Some("B"));
        assert_eq!(detail.value("Parking Spaces"), Some("1’500"));
        assert_eq!(detail.value("Tags"), Some("[\"a\",\"b\"]"));
        assert_eq!(detail.additional.len(), 3);
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("someKey"), "Some Key");
        assert_eq!(humanize_key("energyLabelCHF"), "Energy Label C H F");
        assert_eq!(humanize_key("notes"), "Notes");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn test_text_rendering() {
        let detail = PropertyDetail::from_property(&property(json!({"id": 9, "type": "Industriel"})));
        let text = detail.to_text();
        assert!(text.starts_with("Property Details (ID: 9):\n"));
        assert!(text.contains("Type: Industriel\n"));
        assert!(!text.contains("Additional Data"));
    }

    #[test]
    fn test_card_rent_variants() {
        let both = PropertyCard::from_property(&property(json!({
            "id": 1, "annualRentSourceCHF": 100000, "annualRentPotentialCBRECHF": 120000
        })));
        assert_eq!(both.value("Annual Rent (Actual)"), Some("CHF 100’000.00"));
        assert_eq!(both.value("Potential Rent"), Some("CHF 120’000.00"));

        let potential_only = PropertyCard::from_property(&property(json!({
            "id": 2, "annualRentPotentialCBRECHF": 90000
        })));
        assert_eq!(potential_only.value("Annual Rent (Actual)"), None);
        assert_eq!(potential_only.value("Annual Rent (Potential)"), Some("CHF 90’000.00"));

        let neither = PropertyCard::from_property(&property(json!({"id": 3})));
        assert_eq!(neither.value("Annual Rent (Actual)"), Some(NOT_AVAILABLE));
    }

    #[test]
    fn test_card_header_and_optional_rows() {
        let card = PropertyCard::from_property(&property(json!({
            "id": 4,
            "type": "Résidentiel",
            "potentialPercent": 0,
            "heatingType": "Gas"
        })));

        assert_eq!(card.commune, NOT_AVAILABLE);
        assert_eq!(card.property_type, "Résidentiel");
        assert_eq!(card.tone, TypeTone::Blue);
        assert_eq!(card.value("Rent Potential Gain"), None);
        assert_eq!(card.value("Heating"), Some("Gas"));
        assert_eq!(card.value("Constructed"), Some(NOT_AVAILABLE));
        assert_eq!(card.value("WAULT"), Some(NOT_AVAILABLE));
    }
}
