//! Estate CLI
//!
//! Inspect a portfolio document from the terminal, or serve the web dashboard.
//!
//! ```bash
//! estate summary                              # overview cards and charts
//! estate list --type Commercial --sort rent-desc
//! estate show 12 --json
//! estate serve --port 8080
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use estate_config::EstateConfig;
use estate_core::{Dataset, PropertyId};
use estate_listview::{SortKey, TypeFilter};
use estate_session::{PropertyCard, Session};
use estate_source::DatasetSource;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "estate")]
#[command(about = "Real-estate portfolio dashboard")]
#[command(version)]
struct Cli {
    /// Config file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Portfolio document: path, file:// or http(s):// URL
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Fetch timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show overview metrics, chart series and type distribution
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// List properties with a type filter and sort order
    List {
        /// Property type, or "all"
        #[arg(short = 't', long = "type")]
        property_type: Option<String>,

        /// value-desc, value-asc, yield-desc, yield-asc, rent-desc, rent-asc, surface-desc, surface-asc
        #[arg(long)]
        sort: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show every available field of one property
    Show {
        id: PropertyId,

        #[arg(long)]
        json: bool,
    },

    /// List the distinct property types
    Types,

    /// Start the web dashboard
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "estate=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn resolve_config(cli: &Cli) -> Result<EstateConfig> {
    let mut config = EstateConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(source) = &cli.source {
        config.source.location = source.clone();
    }
    if let Some(secs) = cli.timeout {
        config.source.timeout_secs = Some(secs);
    }
    Ok(config)
}

fn open_source(config: &EstateConfig) -> Result<DatasetSource> {
    DatasetSource::from_location(&config.source.location, config.source.timeout())
        .with_context(|| format!("Invalid source: {}", config.source.location))
}

async fn load_session(config: &EstateConfig) -> Result<Session> {
    let source = open_source(config)?;
    let dataset = source
        .load()
        .await
        .with_context(|| format!("Failed to load portfolio from {}", source.describe()))?;
    Ok(Session::new(dataset))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Summary { json } => {
            let session = load_session(&config).await?;
            cmd_summary(session.dataset(), json)
        }
        Commands::List {
            property_type,
            sort,
            json,
        } => {
            let filter: TypeFilter = match property_type {
                Some(raw) => raw.parse()?,
                None => config.view.default_filter.parse()?,
            };
            let sort: SortKey = match sort {
                Some(raw) => raw.parse()?,
                None => config.view.default_sort.parse()?,
            };
            let session = load_session(&config).await?;
            cmd_list(&session, filter, sort, json)
        }
        Commands::Show { id, json } => {
            let session = load_session(&config).await?;
            cmd_show(&session, id, json)
        }
        Commands::Types => {
            let session = load_session(&config).await?;
            for t in session.types() {
                println!("{t}");
            }
            Ok(())
        }
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_serve(config).await
        }
    }
}

// ============== Commands ==============

fn cmd_summary(dataset: &Dataset, json: bool) -> Result<()> {
    if json {
        let model = estate_dashboard::compose(dataset);
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        print!("{}", summary_text(dataset));
    }
    Ok(())
}

/// Overview cards, chart series and distribution lines as plain text
fn summary_text(dataset: &Dataset) -> String {
    let model = estate_dashboard::compose(dataset);
    let mut out = String::from("\nPortfolio Overview\n");
    out.push_str(&format!("{:=<60}\n", ""));
    for card in &model.cards {
        out.push_str(&format!(
            "  {:<28} {:>18}  {}\n",
            card.title, card.value, card.subtitle
        ));
    }

    for chart in &model.charts {
        out.push_str(&format!("\n{}\n{:-<60}\n", chart.title, ""));
        if chart.is_empty() {
            out.push_str("  No data\n");
            continue;
        }
        for (i, label) in chart.labels.iter().enumerate() {
            if let Some(tip) = chart.tooltip(i) {
                out.push_str(&format!("  {:<28} {}\n", label, tip));
            }
        }
    }

    out.push_str(&format!("\nProperty Type Distribution Details\n{:-<60}\n", ""));
    if model.distribution.is_empty() {
        out.push_str("  No property type data to display.\n");
    }
    for line in &model.distribution {
        out.push_str(&format!("  {}\n", line.text()));
    }
    out.push('\n');
    out
}

fn cmd_list(session: &Session, filter: TypeFilter, sort: SortKey, json: bool) -> Result<()> {
    let view = session.list_view(filter, sort);

    if json {
        let out = serde_json::json!({
            "filter": view.filter(),
            "sort": view.sort(),
            "count": view.visible().len(),
            "properties": view.visible(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "\n{} propert{} | filter: {} | sort: {}",
        view.visible().len(),
        if view.visible().len() == 1 { "y" } else { "ies" },
        view.filter(),
        view.sort().label()
    );
    println!("{:=<60}", "");

    if view.is_empty() {
        println!("No properties found\nTry adjusting your filters.");
        return Ok(());
    }

    for property in view.visible() {
        let card = PropertyCard::from_property(property);
        println!("\n#{} {} ({})", card.id, card.commune, card.property_type);
        println!("  {}", card.address);
        for field in &card.fields {
            println!("  {:<24} {}", field.label, field.value);
        }
    }
    println!();
    Ok(())
}

fn cmd_show(session: &Session, id: PropertyId, json: bool) -> Result<()> {
    let Some(property) = session.find(id) else {
        anyhow::bail!("Property details not found. (ID: {id})");
    };
    let detail = estate_session::PropertyDetail::from_property(property);

    if json {
        let out = serde_json::json!({ "property": property, "detail": detail });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", detail.to_text());
    }
    Ok(())
}

async fn cmd_serve(config: EstateConfig) -> Result<()> {
    let source = open_source(&config)?;
    let addr = config.server.bind_addr();
    let state = Arc::new(estate_web::AppState::new(source, config));

    // Load up front so the first request doesn't pay for it; failures show on the page
    if let estate_web::LoadState::Failed(message) = state.reload().await {
        tracing::warn!(%message, "initial load failed");
    }

    print!("{}", estate_web::routes::route_table());
    println!("\nServer ready at http://{}\n", addr);

    estate_web::serve(state, &addr)
        .await
        .with_context(|| format!("Server on {addr} stopped"))
}
