//! Chart datasets
//!
//! Each overview chart is a labelled series derived from the dataset.
//! Labels are always sorted; the drawing itself belongs to a
//! [`ChartBackend`](crate::ChartBackend).

use estate_aggregate::{average_vacancy_by_group, count_by, sum_by_group};
use estate_core::{
    format_currency, format_number, format_percentage, format_surface, Dataset, FormatOptions,
    NumericField, TextField, NOT_AVAILABLE,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The six overview charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartId {
    RentByCanton,
    PropertyTypeCount,
    RentByPropertyType,
    SurfaceByPropertyType,
    VacancyByPropertyType,
    CountByCanton,
}

impl ChartId {
    /// Display order
    pub const ALL: [ChartId; 6] = [
        ChartId::RentByCanton,
        ChartId::PropertyTypeCount,
        ChartId::RentByPropertyType,
        ChartId::SurfaceByPropertyType,
        ChartId::VacancyByPropertyType,
        ChartId::CountByCanton,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartId::RentByCanton => "rent-by-canton",
            ChartId::PropertyTypeCount => "property-type-count",
            ChartId::RentByPropertyType => "rent-by-property-type",
            ChartId::SurfaceByPropertyType => "surface-by-property-type",
            ChartId::VacancyByPropertyType => "vacancy-by-property-type",
            ChartId::CountByCanton => "count-by-canton",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartId::RentByCanton => "Total Annual Rent by Canton",
            ChartId::PropertyTypeCount => "Property Type Distribution (Count)",
            ChartId::RentByPropertyType => "Total Annual Rent by Property Type",
            ChartId::SurfaceByPropertyType => "Rentable Surface by Property Type (Pie)",
            ChartId::VacancyByPropertyType => "Average Vacancy Rate by Property Type",
            ChartId::CountByCanton => "Portfolio Distribution by Canton (Count)",
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartId::RentByCanton | ChartId::RentByPropertyType | ChartId::VacancyByPropertyType => {
                ChartKind::Bar
            }
            ChartId::PropertyTypeCount | ChartId::SurfaceByPropertyType | ChartId::CountByCanton => {
                ChartKind::Pie
            }
        }
    }

    pub fn series_label(&self) -> &'static str {
        match self {
            ChartId::RentByCanton | ChartId::RentByPropertyType => "Total Annual Rent (CHF)",
            ChartId::PropertyTypeCount | ChartId::CountByCanton => "Property Count",
            ChartId::SurfaceByPropertyType => "Total Rentable Surface (m²)",
            ChartId::VacancyByPropertyType => "Average Vacancy Rate (%)",
        }
    }

    pub fn unit(&self) -> ValueUnit {
        match self {
            ChartId::RentByCanton | ChartId::RentByPropertyType => ValueUnit::Currency,
            ChartId::PropertyTypeCount | ChartId::CountByCanton => ValueUnit::Count,
            ChartId::SurfaceByPropertyType => ValueUnit::Surface,
            ChartId::VacancyByPropertyType => ValueUnit::Percentage,
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

/// How a chart's values are written in tooltips and axis ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueUnit {
    Currency,
    Count,
    Surface,
    Percentage,
}

impl ValueUnit {
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueUnit::Currency => format_currency(
                Some(value),
                FormatOptions::compact().with_max_fraction_digits(0),
            ),
            ValueUnit::Count => format_number(Some(value), FormatOptions::default()),
            ValueUnit::Surface => format_surface(Some(value), FormatOptions::max_fraction_digits(0)),
            ValueUnit::Percentage => format_percentage(Some(value), FormatOptions::decimal_places(1)),
        }
    }
}

/// A labelled series ready to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub id: ChartId,
    pub kind: ChartKind,
    pub title: &'static str,
    pub series_label: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub unit: ValueUnit,
}

impl ChartData {
    fn from_series<V: Into<f64>>(id: ChartId, series: BTreeMap<String, V>) -> Self {
        let (labels, values) = series.into_iter().map(|(k, v)| (k, v.into())).unzip();
        Self {
            id,
            kind: id.kind(),
            title: id.title(),
            series_label: id.series_label(),
            labels,
            values,
            unit: id.unit(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Percentage of the total held by one point; 0 when the total is not positive
    pub fn share(&self, index: usize) -> Option<f64> {
        let value = *self.values.get(index)?;
        let total = self.total();
        Some(if total > 0.0 { value / total * 100.0 } else { 0.0 })
    }

    /// Hover text of one point, e.g. `Property Count: 3 (42.9%)`
    pub fn tooltip(&self, index: usize) -> Option<String> {
        let value = *self.values.get(index)?;
        let formatted = if value.is_finite() {
            self.unit.format(value)
        } else {
            NOT_AVAILABLE.to_string()
        };

        let mut text = format!("{}: {formatted}", self.series_label);
        if self.kind == ChartKind::Pie {
            if let Some(share) = self.share(index) {
                text.push_str(&format!(" ({share:.1}%)"));
            }
        }
        Some(text)
    }

    /// Value-axis tick text for bar charts
    pub fn axis_tick(&self, value: f64) -> String {
        self.unit.format(value)
    }
}

/// All six datasets, in display order
pub fn chart_datasets(dataset: &Dataset) -> Vec<ChartData> {
    ChartId::ALL.iter().map(|id| chart_dataset(dataset, *id)).collect()
}

pub fn chart_dataset(dataset: &Dataset, id: ChartId) -> ChartData {
    let records = dataset.properties();
    let distribution = &dataset.metrics().property_type_distribution;
    let canton = TextField::Canton.key();
    let property_type = TextField::Type.key();
    let rent = NumericField::AnnualRent.key();

    match id {
        ChartId::RentByCanton => ChartData::from_series(id, sum_by_group(records, canton, rent)),
        ChartId::PropertyTypeCount => ChartData::from_series(
            id,
            distribution
                .iter()
                .map(|(k, v)| (k.clone(), v.count() as f64))
                .collect::<BTreeMap<_, _>>(),
        ),
        ChartId::RentByPropertyType => {
            ChartData::from_series(id, sum_by_group(records, property_type, rent))
        }
        ChartId::SurfaceByPropertyType => ChartData::from_series(
            id,
            distribution
                .iter()
                .map(|(k, v)| (k.clone(), v.surface()))
                .collect::<BTreeMap<_, _>>(),
        ),
        ChartId::VacancyByPropertyType => {
            ChartData::from_series(id, average_vacancy_by_group(records, property_type))
        }
        ChartId::CountByCanton => ChartData::from_series(
            id,
            count_by(records, canton)
                .into_iter()
                .map(|(k, n)| (k, n as f64))
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}
