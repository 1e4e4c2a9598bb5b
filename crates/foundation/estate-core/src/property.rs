//! Property records
//!
//! A flat record per building. Known members are typed; every other member
//! of the source object is kept in [`Property::extra`] so that aggregations
//! can still address it by name.

use crate::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Unique, immutable record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub i64);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PropertyId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for PropertyId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// One property of the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,

    // Location
    #[serde(rename = "adresse", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub commune: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub canton: Option<String>,

    // Classification
    #[serde(rename = "type", default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub specific_use: Option<String>,

    // Physical
    #[serde(default, deserialize_with = "lenient::integer", skip_serializing_if = "Option::is_none")]
    pub construction_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::integer", skip_serializing_if = "Option::is_none")]
    pub last_renovation_year: Option<i32>,
    #[serde(rename = "rentableSurfaceSqM", default, deserialize_with = "lenient::non_negative", skip_serializing_if = "Option::is_none")]
    pub rentable_surface_sqm: Option<f64>,
    #[serde(default, deserialize_with = "lenient::integer", skip_serializing_if = "Option::is_none")]
    pub number_of_units: Option<u32>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub heating_type: Option<String>,

    // Financial
    #[serde(rename = "annualRentSourceCHF", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub annual_rent_chf: Option<f64>,
    #[serde(rename = "annualRentPotentialCBRECHF", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub potential_rent_chf: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub potential_percent: Option<f64>,
    #[serde(rename = "cbreValueCHF", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub valuation_chf: Option<f64>,
    #[serde(rename = "acquisitionPriceCHF", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub acquisition_price_chf: Option<f64>,
    #[serde(rename = "grossYieldCBREPercent", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub gross_yield_percent: Option<f64>,
    #[serde(rename = "netYieldCBREPercent", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub net_yield_percent: Option<f64>,
    #[serde(rename = "areaWeightedNetRentYearSqMCHF", default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub net_rent_per_sqm_chf: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub vacancy_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub wault_years: Option<f64>,

    /// Members without a dedicated field, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Property {
    /// Record with only an identifier
    pub fn new(id: impl Into<PropertyId>) -> Self {
        Self {
            id: id.into(),
            address: None,
            commune: None,
            canton: None,
            property_type: None,
            specific_use: None,
            construction_year: None,
            last_renovation_year: None,
            rentable_surface_sqm: None,
            number_of_units: None,
            floor: None,
            condition: None,
            heating_type: None,
            annual_rent_chf: None,
            potential_rent_chf: None,
            potential_percent: None,
            valuation_chf: None,
            acquisition_price_chf: None,
            gross_yield_percent: None,
            net_yield_percent: None,
            net_rent_per_sqm_chf: None,
            vacancy_percent: None,
            wault_years: None,
            extra: Map::new(),
        }
    }

    /// Typed numeric field
    pub fn get(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::ConstructionYear => self.construction_year.map(f64::from),
            NumericField::LastRenovationYear => self.last_renovation_year.map(f64::from),
            NumericField::RentableSurface => self.rentable_surface_sqm,
            NumericField::NumberOfUnits => self.number_of_units.map(f64::from),
            NumericField::AnnualRent => self.annual_rent_chf,
            NumericField::PotentialRent => self.potential_rent_chf,
            NumericField::PotentialPercent => self.potential_percent,
            NumericField::Valuation => self.valuation_chf,
            NumericField::AcquisitionPrice => self.acquisition_price_chf,
            NumericField::GrossYield => self.gross_yield_percent,
            NumericField::NetYield => self.net_yield_percent,
            NumericField::NetRentPerSqm => self.net_rent_per_sqm_chf,
            NumericField::Vacancy => self.vacancy_percent,
            NumericField::Wault => self.wault_years,
        }
    }

    /// Typed text field
    pub fn text(&self, field: TextField) -> Option<&str> {
        let value = match field {
            TextField::Address => &self.address,
            TextField::Commune => &self.commune,
            TextField::Canton => &self.canton,
            TextField::Type => &self.property_type,
            TextField::SpecificUse => &self.specific_use,
            TextField::Floor => &self.floor,
            TextField::Condition => &self.condition,
            TextField::HeatingType => &self.heating_type,
        };
        value.as_deref()
    }

    /// Numeric value of a member addressed by its JSON key.
    ///
    /// Known text members and non-numeric values yield `None`.
    pub fn number(&self, key: &str) -> Option<f64> {
        if key == "id" {
            return Some(self.id.0 as f64);
        }
        if let Ok(field) = key.parse::<NumericField>() {
            return self.get(field);
        }
        if key.parse::<TextField>().is_ok() {
            return None;
        }
        self.extra.get(key).and_then(lenient::as_number)
    }

    /// Grouping key of a member addressed by its JSON key.
    ///
    /// `None` for absent, null and blank values. Numbers render without a
    /// trailing `.0` so that `1990` groups as `"1990"`.
    pub fn group_key(&self, key: &str) -> Option<String> {
        if let Ok(field) = key.parse::<TextField>() {
            return self.text(field).map(str::to_owned);
        }
        if key == "id" || key.parse::<NumericField>().is_ok() {
            return self.number(key).map(number_key);
        }
        match self.extra.get(key)? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }
}

fn number_key(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

macro_rules! json_keyed_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// JSON member name
            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

json_keyed_enum! {
    /// Numeric members of a [`Property`]
    NumericField {
        ConstructionYear => "constructionYear",
        LastRenovationYear => "lastRenovationYear",
        RentableSurface => "rentableSurfaceSqM",
        NumberOfUnits => "numberOfUnits",
        AnnualRent => "annualRentSourceCHF",
        PotentialRent => "annualRentPotentialCBRECHF",
        PotentialPercent => "potentialPercent",
        Valuation => "cbreValueCHF",
        AcquisitionPrice => "acquisitionPriceCHF",
        GrossYield => "grossYieldCBREPercent",
        NetYield => "netYieldCBREPercent",
        NetRentPerSqm => "areaWeightedNetRentYearSqMCHF",
        Vacancy => "vacancyPercent",
        Wault => "waultYears",
    }
}

json_keyed_enum! {
    /// Text members of a [`Property`]
    TextField {
        Address => "adresse",
        Commune => "commune",
        Canton => "canton",
        Type => "type",
        SpecificUse => "specificUse",
        Floor => "floor",
        Condition => "condition",
        HeatingType => "heatingType",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Property {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decodes_source_member_names() {
        let p = parse(json!({
            "id": 7,
            "adresse": "Rue du Lac 4",
            "commune": "Nyon",
            "canton": "VD",
            "type": "Résidentiel",
            "rentableSurfaceSqM": 1250.5,
            "annualRentSourceCHF": 310000,
            "annualRentPotentialCBRECHF": 335000,
            "cbreValueCHF": 8_400_000,
            "grossYieldCBREPercent": 3.7,
            "vacancyPercent": 2.5,
            "constructionYear": 1974,
            "numberOfUnits": 18,
            "floor": 3
        }));

        assert_eq!(p.id, PropertyId(7));
        assert_eq!(p.address.as_deref(), Some("Rue du Lac 4"));
        assert_eq!(p.property_type.as_deref(), Some("Résidentiel"));
        assert_eq!(p.rentable_surface_sqm, Some(1250.5));
        assert_eq!(p.valuation_chf, Some(8_400_000.0));
        assert_eq!(p.construction_year, Some(1974));
        assert_eq!(p.number_of_units, Some(18));
        assert_eq!(p.floor.as_deref(), Some("3"));
        assert!(p.extra.is_empty());
    }

    #[test]
    fn test_malformed_members_become_absent() {
        let p = parse(json!({
            "id": 1,
            "vacancyPercent": "n/a",
            "cbreValueCHF": null,
            "type": "",
            "rentableSurfaceSqM": -10
        }));

        assert_eq!(p.vacancy_percent, None);
        assert_eq!(p.valuation_chf, None);
        assert_eq!(p.property_type, None);
        assert_eq!(p.rentable_surface_sqm, None);
    }

    #[test]
    fn test_unknown_members_are_addressable() {
        let p = parse(json!({"id": 1, "parkingSpaces": 12, "zone": "Centre", "note": ""}));

        assert_eq!(p.number("parkingSpaces"), Some(12.0));
        assert_eq!(p.number("zone"), None);
        assert_eq!(p.group_key("zone").as_deref(), Some("Centre"));
        assert_eq!(p.group_key("note"), None);
        assert_eq!(p.group_key("missing"), None);
    }

    #[test]
    fn test_number_by_key() {
        let p = parse(json!({"id": 4, "cbreValueCHF": 100, "canton": "GE"}));

        assert_eq!(p.number("cbreValueCHF"), Some(100.0));
        assert_eq!(p.number("canton"), None);
        assert_eq!(p.number("id"), Some(4.0));
    }

    #[test]
    fn test_group_key_renders_integral_numbers() {
        let p = parse(json!({"id": 1, "constructionYear": 1990, "waultYears": 4.5}));

        assert_eq!(p.group_key("constructionYear").as_deref(), Some("1990"));
        assert_eq!(p.group_key("waultYears").as_deref(), Some("4.5"));
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in NumericField::ALL {
            assert_eq!(field.key().parse::<NumericField>(), Ok(*field));
        }
        for field in TextField::ALL {
            assert_eq!(field.key().parse::<TextField>(), Ok(*field));
        }
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result: Result<Property, _> = serde_json::from_value(json!({"commune": "Bern"}));
        assert!(result.is_err());
    }
}
