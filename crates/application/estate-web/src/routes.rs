//! Route definitions for the web dashboard

/// All routes defined in the application
pub const ROUTES: &[(&str, &str, &str)] = &[
    // Pages
    ("GET", "/", "Portfolio overview"),
    ("GET", "/properties", "Property grid (?type=&sort=)"),
    ("GET", "/properties/:id", "Property detail"),
    ("POST", "/reload", "Reload the portfolio document"),

    // API
    ("GET", "/api/health", "Health check"),
    ("GET", "/api/dashboard", "Overview cards, charts, distribution"),
    ("GET", "/api/properties", "Filtered and sorted records (?type=&sort=)"),
    ("GET", "/api/properties/:id", "One record with its detail view"),

    // Static assets
    ("GET", "/static/style.css", "CSS stylesheet"),
];

/// Route table as aligned text
pub fn route_table() -> String {
    let mut out = String::from("\nEstate Dashboard Routes:\n");
    out.push_str(&format!("{:-<60}\n", ""));
    for (method, path, desc) in ROUTES {
        out.push_str(&format!("{:6} {:24} {}\n", method, path, desc));
    }
    out
}
