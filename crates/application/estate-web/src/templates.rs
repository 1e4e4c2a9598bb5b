//! HTML templates for the portfolio dashboard
//!
//! Plain server-rendered pages. Every value interpolated into markup goes
//! through [`html_escape`]; chart markup comes pre-escaped from the SVG
//! backend.

use estate_dashboard::{ChartData, DashboardModel, DistributionLine, MetricCard};
use estate_listview::{SortKey, TypeFilter, ALL_TYPES};
use estate_session::{DetailField, PropertyCard, PropertyDetail};

/// CSS styles
pub const STYLE_CSS: &str = r#"
:root {
    --primary: #007bff;
    --dark: #1f2937;
    --muted: #6b7280;
    --border: #e5e7eb;
    --bg: #f9fafb;
    --danger: #dc2626;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    background: var(--bg);
    color: var(--dark);
    line-height: 1.5;
}

.header {
    background: #fff;
    border-bottom: 1px solid var(--border);
    padding: 16px 24px;
    display: flex;
    justify-content: space-between;
    align-items: center;
}

.logo { font-size: 1.6em; font-weight: bold; color: var(--primary); }
.logo span { color: var(--dark); }
.nav a { color: var(--dark); margin-left: 20px; text-decoration: none; font-weight: 500; }
.nav a:hover { color: var(--primary); }

main { max-width: 1280px; margin: 0 auto; padding: 24px; }
h2 { font-size: 1.5em; margin-bottom: 4px; }
.lead { color: var(--muted); margin-bottom: 24px; }

.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 24px; margin-bottom: 32px; }
.charts { display: grid; grid-template-columns: repeat(auto-fill, minmax(520px, 1fr)); gap: 24px; margin-bottom: 24px; }

.panel, .metrics-card, .property-card {
    background: #fff;
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 20px;
}

.metrics-card h3 { font-size: 0.85em; color: var(--muted); font-weight: 500; }
.metrics-card .value { font-size: 1.5em; font-weight: bold; margin-top: 4px; }
.metrics-card .subtitle { font-size: 0.85em; color: var(--muted); }

.chart { width: 100%; height: auto; }
.chart .grid { stroke: var(--border); }
.chart text { font-size: 11px; fill: var(--muted); }

.property-card { display: flex; flex-direction: column; padding: 0; }
.property-card .card-head { background: #f3f4f6; padding: 16px; border-bottom: 1px solid var(--border); display: flex; justify-content: space-between; }
.property-card dl { display: grid; grid-template-columns: 1fr 1fr; gap: 12px 16px; padding: 16px; flex-grow: 1; }
.property-card dt { font-size: 0.75em; color: var(--muted); }
.property-card dd { font-weight: 500; }
.property-card .card-foot { padding: 12px 16px; border-top: 1px solid var(--border); text-align: right; }

.badge { padding: 2px 8px; border-radius: 999px; font-size: 0.75em; white-space: nowrap; align-self: flex-start; }
.tone-blue { background: #dbeafe; color: #1e40af; }
.tone-purple { background: #ede9fe; color: #5b21b6; }
.tone-green { background: #dcfce7; color: #166534; }
.tone-orange { background: #ffedd5; color: #9a3412; }
.tone-teal { background: #ccfbf1; color: #115e59; }
.tone-gray { background: #e5e7eb; color: #1f2937; }

.toolbar { display: flex; justify-content: space-between; align-items: center; gap: 16px; margin-bottom: 24px; flex-wrap: wrap; }
.toolbar select { padding: 8px 12px; border: 1px solid #d1d5db; border-radius: 8px; background: #fff; }

.empty-state, .notice { text-align: center; padding: 64px 0; color: var(--muted); }
.error-view { text-align: center; padding: 80px 0; }
.error-view h2 { color: var(--danger); }

.button { margin-top: 24px; padding: 8px 16px; background: var(--primary); color: #fff; border: none; border-radius: 4px; cursor: pointer; }
a.link { color: var(--primary); text-decoration: none; font-weight: 500; }

.details dt { font-weight: 600; }
.details { display: grid; grid-template-columns: max-content 1fr; gap: 6px 24px; }
"#;

/// Page shell with header and navigation
pub fn wrap_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
    <meta charset=\"UTF-8\">
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
    <title>{} | Real Estate Metrics</title>
    <link rel=\"stylesheet\" href=\"/static/style.css\">
</head>
<body>
    <header class=\"header\">
        <div class=\"logo\"><span>REAL ESTATE</span>METRICS</div>
        <nav class=\"nav\">
            <a href=\"/\">Dashboard</a>
            <a href=\"/properties\">Properties</a>
        </nav>
    </header>
    <main>
{}
    </main>
</body>
</html>",
        html_escape(title),
        body
    )
}

/// Portfolio overview: cards, charts and distribution details
pub fn dashboard_html(model: &DashboardModel, charts: &[(&ChartData, Option<&str>)]) -> String {
    let cards: String = model.cards.iter().map(metrics_card_html).collect();

    let panels: String = charts
        .iter()
        .map(|(chart, markup)| {
            format!(
                "<div class=\"panel\"><h3>{}</h3>{}</div>",
                html_escape(chart.title),
                markup.unwrap_or("<p class=\"notice\">Chart unavailable.</p>")
            )
        })
        .collect();

    let body = format!(
        "<h2>Portfolio Overview</h2>
<p class=\"lead\">Consolidated metrics for all properties in the portfolio.</p>
<div class=\"grid\">{cards}</div>
<div class=\"charts\">{panels}</div>
<div class=\"panel\">
    <h3>Property Type Distribution Details</h3>
    {}
</div>",
        distribution_html(&model.distribution)
    );
    wrap_page("Dashboard", &body)
}

fn metrics_card_html(card: &MetricCard) -> String {
    format!(
        "<div class=\"metrics-card\"><h3>{}</h3><p class=\"value\">{}</p><p class=\"subtitle\">{}</p></div>",
        html_escape(card.title),
        html_escape(&card.value),
        html_escape(card.subtitle)
    )
}

fn distribution_html(lines: &[DistributionLine]) -> String {
    if lines.is_empty() {
        return "<ul><li>No property type data to display.</li></ul>".to_string();
    }
    let items: String = lines
        .iter()
        .map(|line| {
            let text = line.text();
            let rest = text
                .strip_prefix(&format!("{}:", line.property_type))
                .unwrap_or(&text);
            format!(
                "<li><strong>{}:</strong>{}</li>",
                html_escape(&line.property_type),
                html_escape(rest)
            )
        })
        .collect();
    format!("<ul>{items}</ul>")
}

/// Property grid with filter and sort controls
pub fn properties_html(
    cards: &[PropertyCard],
    types: &[String],
    filter: &TypeFilter,
    sort: SortKey,
) -> String {
    let selected = |yes: bool| if yes { " selected" } else { "" };

    let type_options: String = std::iter::once(format!(
        "<option value=\"{ALL_TYPES}\"{}>All Types</option>",
        selected(*filter == TypeFilter::All)
    ))
    .chain(types.iter().map(|t| {
        let is_selected = matches!(filter, TypeFilter::Type(f) if f == t);
        format!(
            "<option value=\"{0}\"{1}>{0}</option>",
            html_escape(t),
            selected(is_selected)
        )
    }))
    .collect();

    let sort_options: String = SortKey::ALL
        .iter()
        .map(|key| {
            format!(
                "<option value=\"{key}\"{}>{}</option>",
                selected(*key == sort),
                key.label()
            )
        })
        .collect();

    let listing = if cards.is_empty() {
        empty_state_html()
    } else {
        let items: String = cards.iter().map(card_html).collect();
        format!("<div class=\"grid\" id=\"property-list\">{items}</div>")
    };

    let body = format!(
        "<div class=\"toolbar\">
    <div>
        <h2>Properties</h2>
        <p class=\"lead\">All properties in the portfolio.</p>
    </div>
    <form method=\"get\" action=\"/properties\">
        <select name=\"type\" id=\"property-filter-type\" onchange=\"this.form.submit()\">{type_options}</select>
        <select name=\"sort\" id=\"property-sort\" onchange=\"this.form.submit()\">{sort_options}</select>
        <noscript><button class=\"button\" type=\"submit\">Apply</button></noscript>
    </form>
</div>
{listing}"
    );
    wrap_page("Properties", &body)
}

fn empty_state_html() -> String {
    "<div class=\"empty-state\" id=\"empty-state\">
    <h3>No properties found</h3>
    <p>Try adjusting your filters.</p>
</div>"
        .to_string()
}

/// One grid card
pub fn card_html(card: &PropertyCard) -> String {
    let rows: String = card.fields.iter().map(definition_html).collect();
    format!(
        "<div class=\"property-card\">
    <div class=\"card-head\">
        <div><h3>{}</h3><p>{}</p></div>
        <span class=\"badge tone-{}\">{}</span>
    </div>
    <dl>{rows}</dl>
    <div class=\"card-foot\"><a class=\"link\" href=\"/properties/{}\">View Details →</a></div>
</div>",
        html_escape(&card.commune),
        html_escape(&card.address),
        card.tone.as_str(),
        html_escape(&card.property_type),
        card.id
    )
}

fn definition_html(field: &DetailField) -> String {
    format!(
        "<div><dt>{}</dt><dd>{}</dd></div>",
        html_escape(&field.label),
        html_escape(&field.value)
    )
}

/// Full property detail
pub fn detail_html(detail: &PropertyDetail) -> String {
    let rows: String = detail.fields.iter().map(definition_html).collect();
    let additional = if detail.additional.is_empty() {
        String::new()
    } else {
        let extra: String = detail.additional.iter().map(definition_html).collect();
        format!("<h3>Additional Data</h3><dl class=\"details\">{extra}</dl>")
    };

    let body = format!(
        "<div class=\"panel\">
    <h2>Property Details (ID: {})</h2>
    <dl class=\"details\">{rows}</dl>
    {additional}
    <p><a class=\"link\" href=\"/properties\">← Back to properties</a></p>
</div>",
        detail.id
    );
    wrap_page(&format!("Property {}", detail.id), &body)
}

/// Non-fatal notice for an unknown identifier
pub fn not_found_html(id: &str) -> String {
    let body = format!(
        "<div class=\"notice\">
    <h2>Property details not found.</h2>
    <p>No property with ID {} is in the portfolio.</p>
    <p><a class=\"link\" href=\"/properties\">← Back to properties</a></p>
</div>",
        html_escape(id)
    );
    wrap_page("Not found", &body)
}

/// Notice for request parameters that cannot be used
pub fn bad_request_html(message: &str) -> String {
    let body = format!(
        "<div class=\"notice\"><h2>Invalid request</h2><p>{}</p>\
         <p><a class=\"link\" href=\"/properties\">← Back to properties</a></p></div>",
        html_escape(message)
    );
    wrap_page("Invalid request", &body)
}

/// Load failure with a retry action
pub fn error_html(message: &str, origin: &str) -> String {
    let body = format!(
        "<div class=\"error-view\">
    <h2>Error Loading Application</h2>
    <p>{}</p>
    <p class=\"lead\">Please ensure '{}' is accessible and correctly formatted.</p>
    <form method=\"post\" action=\"/reload\">
        <button class=\"button\" type=\"submit\">Retry</button>
    </form>
</div>",
        html_escape(message),
        html_escape(origin)
    );
    wrap_page("Error", &body)
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_core::Property;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
        assert_eq!(html_escape("l'Isle"), "l&#39;Isle");
    }

    #[test]
    fn test_empty_grid_shows_placeholder() {
        let html = properties_html(&[], &["Mixte".into()], &TypeFilter::All, SortKey::default());
        assert!(html.contains("No properties found"));
        assert!(!html.contains("id=\"property-list\""));
        assert!(html.contains("<option value=\"value-desc\" selected>Value (High to Low)</option>"));
    }

    #[test]
    fn test_grid_marks_selected_type() {
        let mut property = Property::new(5);
        property.property_type = Some("Mixte".into());
        let cards = vec![PropertyCard::from_property(&property)];

        let html = properties_html(
            &cards,
            &["Industriel".into(), "Mixte".into()],
            &TypeFilter::Type("Mixte".into()),
            "rent-asc".parse().unwrap(),
        );
        assert!(html.contains("<option value=\"Mixte\" selected>Mixte</option>"));
        assert!(html.contains("<option value=\"Industriel\">Industriel</option>"));
        assert!(html.contains("<option value=\"rent-asc\" selected>"));
        assert!(html.contains("href=\"/properties/5\""));
        assert!(html.contains("tone-purple"));
    }

    #[test]
    fn test_error_view_offers_retry() {
        let html = error_html("Failed to fetch data: 404 Not Found", "data/propertiesData.json");
        assert!(html.contains("Error Loading Application"));
        assert!(html.contains("Failed to fetch data: 404 Not Found"));
        assert!(html.contains("action=\"/reload\""));
        assert!(html.contains(">Retry</button>"));
    }

    #[test]
    fn test_not_found_escapes_id() {
        let html = not_found_html("<script>");
        assert!(html.contains("&lt;script&gt;"));
    }
}
