//! Display formatting (de-CH)
//!
//! Pure functions from an optional number to a display string. Absent
//! values render as [`NOT_AVAILABLE`].
//!
//! - currency: `CHF 1’234’567.00`
//! - surface: `1’234 m²`
//! - percentage: `4.2%`

/// Marker for absent or non-numeric values
pub const NOT_AVAILABLE: &str = "N/A";

const GROUP_SEPARATOR: char = '’';

/// Number notation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Notation {
    #[default]
    Standard,
    /// `Mio.` / `Mrd.` suffixes for large magnitudes
    Compact,
}

/// Overrides for a single formatting call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub min_fraction_digits: Option<usize>,
    pub max_fraction_digits: Option<usize>,
    pub notation: Notation,
}

impl FormatOptions {
    pub fn max_fraction_digits(digits: usize) -> Self {
        Self {
            max_fraction_digits: Some(digits),
            ..Self::default()
        }
    }

    /// Fixed number of decimals
    pub fn decimal_places(digits: usize) -> Self {
        Self {
            min_fraction_digits: Some(digits),
            max_fraction_digits: Some(digits),
            ..Self::default()
        }
    }

    pub fn compact() -> Self {
        Self {
            notation: Notation::Compact,
            ..Self::default()
        }
    }

    pub fn with_max_fraction_digits(mut self, digits: usize) -> Self {
        self.max_fraction_digits = Some(digits);
        self
    }

    /// Resolve (min, max) against the style's defaults.
    fn fraction_digits(&self, default_min: usize, default_max: usize) -> (usize, usize) {
        match (self.min_fraction_digits, self.max_fraction_digits) {
            (Some(min), Some(max)) => (min.min(max), max),
            (Some(min), None) => (min, default_max.max(min)),
            (None, Some(max)) => (default_min.min(max), max),
            (None, None) => (default_min, default_max),
        }
    }
}

/// Swiss francs, two decimals unless overridden
pub fn format_currency(value: Option<f64>, options: FormatOptions) -> String {
    let Some(value) = finite(value) else {
        return NOT_AVAILABLE.to_string();
    };

    let body = match options.notation {
        Notation::Standard => {
            let (min, max) = options.fraction_digits(2, 2);
            decimal(value, min, max)
        }
        Notation::Compact => compact(value, options),
    };

    if let Some(positive) = body.strip_prefix('-') {
        format!("CHF-{positive}")
    } else {
        format!("CHF {body}")
    }
}

/// Square metres, no decimals unless overridden
pub fn format_surface(value: Option<f64>, options: FormatOptions) -> String {
    let Some(value) = finite(value) else {
        return NOT_AVAILABLE.to_string();
    };
    let (min, max) = options.fraction_digits(0, 0);
    format!("{} m²", decimal(value, min, max))
}

/// Fixed decimals (default 1) followed by `%`; no digit grouping
pub fn format_percentage(value: Option<f64>, options: FormatOptions) -> String {
    let Some(value) = finite(value) else {
        return NOT_AVAILABLE.to_string();
    };
    let places = options
        .max_fraction_digits
        .or(options.min_fraction_digits)
        .unwrap_or(1);
    let fixed = format!("{value:.places$}");
    format!("{}%", normalize_negative_zero(fixed))
}

/// Plain grouped number, up to three decimals unless overridden
pub fn format_number(value: Option<f64>, options: FormatOptions) -> String {
    let Some(value) = finite(value) else {
        return NOT_AVAILABLE.to_string();
    };
    match options.notation {
        Notation::Standard => {
            let (min, max) = options.fraction_digits(0, 3);
            decimal(value, min, max)
        }
        Notation::Compact => compact(value, options),
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn compact(value: f64, options: FormatOptions) -> String {
    let (scaled, suffix) = match value.abs() {
        v if v >= 1e9 => (value / 1e9, " Mrd."),
        v if v >= 1e6 => (value / 1e6, " Mio."),
        _ => (value, ""),
    };
    let default_max = if suffix.is_empty() || scaled.abs() >= 100.0 { 0 } else { 1 };
    let (min, max) = options.fraction_digits(0, default_max);
    format!("{}{suffix}", decimal(scaled, min, max))
}

/// Round to `max` decimals, trim trailing zeros down to `min`, group the
/// integer part by thousands.
fn decimal(value: f64, min: usize, max: usize) -> String {
    let fixed = format!("{:.*}", max, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.to_string();
    while frac.len() > min && frac.ends_with('0') {
        frac.pop();
    }

    let is_zero = int_part.chars().chain(frac.chars()).all(|c| c == '0');
    let mut out = String::with_capacity(fixed.len() + 4);
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

fn normalize_negative_zero(fixed: String) -> String {
    match fixed.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => fixed,
    }
}
