//! Summary metric cards and the per-type distribution lines

use estate_aggregate::{average_vacancy, sum_field};
use estate_core::{
    format_currency, format_percentage, format_surface, Dataset, FormatOptions, NumericField,
    Property, TextField,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// One headline figure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub subtitle: &'static str,
}

impl MetricCard {
    fn new(title: &'static str, value: String, subtitle: &'static str) -> Self {
        Self {
            title,
            value,
            subtitle,
        }
    }
}

/// The eight overview cards, in display order
pub fn metric_cards(dataset: &Dataset) -> Vec<MetricCard> {
    let metrics = dataset.metrics();
    let records = dataset.properties();
    let defaults = FormatOptions::default();

    let total_properties = metrics
        .total_properties
        .unwrap_or(records.len() as u64);
    let portfolio_value = sum_field(records, NumericField::Valuation.key());
    let avg_vacancy = average_vacancy(records);
    let avg_occupancy = avg_vacancy.map(|v| 100.0 - v);

    vec![
        MetricCard::new(
            "Total Properties",
            total_properties.to_string(),
            "Properties in portfolio",
        ),
        MetricCard::new(
            "Total Portfolio Value (CBRE)",
            format_currency(Some(portfolio_value), defaults),
            "Estimated market value",
        ),
        MetricCard::new(
            "Total Annual Rent",
            format_currency(metrics.total_annual_rent_chf, defaults),
            "Gross annual income",
        ),
        MetricCard::new(
            "Total Rentable Surface",
            format_surface(metrics.total_rentable_surface_sqm, defaults),
            "Total area m²",
        ),
        MetricCard::new(
            "Avg. Rent/m²/Year",
            format_currency(
                metrics.average_rent_per_sqm_chf,
                FormatOptions::max_fraction_digits(2),
            ),
            "CHF/m²/year",
        ),
        MetricCard::new(
            "Avg. Gross Yield (CBRE)",
            format_percentage(metrics.average_gross_yield_percent, defaults),
            "Portfolio average yield",
        ),
        MetricCard::new(
            "Portfolio Avg. Vacancy",
            format_percentage(avg_vacancy, defaults),
            "Average of reported vacancies",
        ),
        MetricCard::new(
            "Portfolio Avg. Occupancy",
            format_percentage(avg_occupancy, FormatOptions::decimal_places(1)),
            "Derived from avg. vacancy",
        ),
    ]
}

/// Summary of one property type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionLine {
    pub property_type: String,
    pub count: u64,
    pub surface_sqm: f64,
    /// Actual rent of the records of this type
    pub total_rent_chf: f64,
}

impl DistributionLine {
    /// `Mixte: 3 properties, 2’400 m², Total Rent: CHF 310’000.00`
    pub fn text(&self) -> String {
        format!(
            "{}: {} properties, {}, Total Rent: {}",
            self.property_type,
            self.count,
            format_surface(Some(self.surface_sqm), FormatOptions::default()),
            format_currency(Some(self.total_rent_chf), FormatOptions::default()),
        )
    }
}

/// One line per type of the supplied distribution, sorted by type
pub fn distribution_lines(dataset: &Dataset) -> Vec<DistributionLine> {
    let rents = rent_by_type(dataset.properties());

    dataset
        .metrics()
        .property_type_distribution
        .iter()
        .map(|(property_type, entry)| DistributionLine {
            property_type: property_type.clone(),
            count: entry.count(),
            surface_sqm: entry.surface(),
            total_rent_chf: rents.get(property_type.as_str()).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Only records carrying both a type and an actual rent contribute.
fn rent_by_type(records: &[Property]) -> BTreeMap<&str, f64> {
    let mut rents = BTreeMap::new();
    for record in records {
        if let (Some(property_type), Some(rent)) =
            (record.text(TextField::Type), record.annual_rent_chf)
        {
            *rents.entry(property_type).or_insert(0.0) += rent;
        }
    }
    rents
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_core::{ConsolidatedMetrics, TypeDistribution};
    use serde_json::json;

    fn dataset(records: serde_json::Value, metrics: serde_json::Value) -> Dataset {
        let records: Vec<Property> = serde_json::from_value(records).unwrap();
        let metrics: ConsolidatedMetrics = serde_json::from_value(metrics).unwrap();
        Dataset::new(records, metrics).unwrap()
    }

    fn card<'a>(cards: &'a [MetricCard], title: &str) -> &'a str {
        cards
            .iter()
            .find(|c| c.title == title)
            .map(|c| c.value.as_str())
            .unwrap()
    }

    #[test]
    fn test_cards_from_summary_and_records() {
        let data = dataset(
            json!([
                {"id": 1, "cbreValueCHF": 1000000, "vacancyPercent": 4},
                {"id": 2, "cbreValueCHF": 2500000, "vacancyPercent": 6}
            ]),
            json!({
                "totalProperties": 12,
                "totalAnnualRentCHF": 345678.9,
                "totalRentableSurfaceSqM": 5400,
                "averageRentPerSqMPerYearCHF": 233.456,
                "averageYieldGrossCBREPercent": 4.567
            }),
        );

        let cards = metric_cards(&data);
        assert_eq!(cards.len(), 8);
        assert_eq!(card(&cards, "Total Properties"), "12");
        assert_eq!(card(&cards, "Total Portfolio Value (CBRE)"), "CHF 3’500’000.00");
        assert_eq!(card(&cards, "Total Annual Rent"), "CHF 345’678.90");
        assert_eq!(card(&cards, "Total Rentable Surface"), "5’400 m²");
        assert_eq!(card(&cards, "Avg. Rent/m²/Year"), "CHF 233.46");
        assert_eq!(card(&cards, "Avg. Gross Yield (CBRE)"), "4.6%");
        assert_eq!(card(&cards, "Portfolio Avg. Vacancy"), "5.0%");
        assert_eq!(card(&cards, "Portfolio Avg. Occupancy"), "95.0%");
    }

    #[test]
    fn test_cards_fall_back_when_summary_is_sparse() {
        let data = dataset(json!([{"id": 1}, {"id": 2}, {"id": 3}]), json!({}));
        let cards = metric_cards(&data);

        assert_eq!(card(&cards, "Total Properties"), "3");
        assert_eq!(card(&cards, "Total Portfolio Value (CBRE)"), "CHF 0.00");
        assert_eq!(card(&cards, "Total Annual Rent"), "N/A");
        assert_eq!(card(&cards, "Portfolio Avg. Vacancy"), "N/A");
        assert_eq!(card(&cards, "Portfolio Avg. Occupancy"), "N/A");
    }

    #[test]
    fn test_distribution_lines() {
        let mut metrics = ConsolidatedMetrics::default();
        metrics
            .property_type_distribution
            .insert("Mixte".into(), TypeDistribution::new(2, 2400.0));
        metrics
            .property_type_distribution
            .insert("Industriel".into(), TypeDistribution::default());

        let records: Vec<Property> = serde_json::from_value(json!([
            {"id": 1, "type": "Mixte", "annualRentSourceCHF": 200000},
            {"id": 2, "type": "Mixte", "annualRentSourceCHF": 110000},
            {"id": 3, "type": "Mixte"},
            {"id": 4, "annualRentSourceCHF": 999}
        ]))
        .unwrap();
        let data = Dataset::new(records, metrics).unwrap();

        let lines = distribution_lines(&data);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Industriel: 0 properties, 0 m², Total Rent: CHF 0.00");
        assert_eq!(
            lines[1].text(),
            "Mixte: 2 properties, 2’400 m², Total Rent: CHF 310’000.00"
        );
    }
}
