//! quire: serve, inspect or render the bundled demo site.
//!
//! ```text
//! quire serve              # HTTP host on server.bind_address
//! quire routes             # print the compiled route table
//! quire render /docs/intro # render one path to stdout
//! ```

mod demo;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use quire::config::{load_config, SiteConfig};
use quire::observability::{init_logging, init_metrics};
use quire::template::FileTemplateProvider;
use quire::{HttpServer, RequestContext, Shutdown, Site};

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Server-side page composition host", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load templates from this folder instead of the embedded demo templates.
    #[arg(short, long)]
    templates: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site over HTTP
    Serve,
    /// List compiled routes in match order
    Routes,
    /// Render one request path to stdout
    Render {
        path: String,
    },
}

fn build_site(config: SiteConfig, templates: Option<PathBuf>) -> Result<Site, quire::ConfigurationError> {
    let site = Site::builder(config);
    let site = match templates {
        Some(folder) => site.templates(FileTemplateProvider::new(Some(folder))),
        None => site.templates(demo::templates()),
    };
    demo::register(site).build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };

    init_logging(&config.observability)?;
    tracing::info!("quire v{} starting", env!("CARGO_PKG_VERSION"));

    let site = Arc::new(build_site(config, cli.templates)?);

    match cli.command {
        Commands::Serve => {
            let config = site.config();
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let listener = TcpListener::bind(&config.server.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");

            let shutdown = Shutdown::new();
            shutdown.trigger_on_signal();
            HttpServer::new(Arc::clone(&site))
                .run(listener, shutdown.subscribe())
                .await?;
            tracing::info!("Shutdown complete");
        }
        Commands::Routes => {
            for route in site.routes().routes() {
                println!(
                    "{:>4} {:>4}  {:<48} {}",
                    route.priority(),
                    route.id(),
                    route.pattern(),
                    route.handler().type_name()
                );
            }
            if let Some(fallback) = site.routes().fallback() {
                println!("   -    -  {:<48} {}", "(not found)", fallback.type_name());
            }
        }
        Commands::Render { path } => {
            let (dispatch, body) = site.render(RequestContext::new("GET", path))?;
            print!("{body}");
            match dispatch {
                Some(dispatch) => eprintln!(
                    "{} (route {}{})",
                    dispatch.builder,
                    dispatch.route_id,
                    if dispatch.fallback { ", not found" } else { "" }
                ),
                None => eprintln!("no handler"),
            }
        }
    }

    Ok(())
}
