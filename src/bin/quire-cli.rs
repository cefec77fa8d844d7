use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use quire::config::{load_config, SiteConfig};
use quire::template::{scan_reader, Event, MemoryTemplateProvider, ScanOptions};
use quire::{Context, Model, RequestContext, Site};

#[derive(Parser)]
#[command(name = "quire-cli")]
#[command(about = "Inspect and bind quire templates offline", long_about = None)]
struct Cli {
    /// TOML configuration file (scanner settings, virtual path).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tags a template contains, in order
    Tags { template: PathBuf },
    /// Bind a JSON model into a template and print the result
    Bind {
        template: PathBuf,
        /// JSON object whose properties fill the tags.
        #[arg(short, long)]
        model: String,
        /// Report tags the model has no value for on stderr.
        #[arg(long)]
        missing: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };

    match cli.command {
        Commands::Tags { template } => {
            let options = ScanOptions::from_config(
                &config.scanner,
                &config.app.virtual_path,
                config.scanner.strip_line_breaks_in_templates,
            );
            let name = template.display().to_string();
            let reader = BufReader::new(File::open(&template)?);
            scan_reader(&name, reader, &options, |event| {
                if let Event::Tag(tag) = event {
                    println!("{tag}");
                }
                Ok(())
            })?;
        }
        Commands::Bind {
            template,
            model,
            missing,
        } => {
            let model = Model::new(serde_json::from_str(&model)?);
            let name = template.display().to_string();
            let content = fs::read_to_string(&template)?;

            let site = Site::builder(config)
                .templates(MemoryTemplateProvider::new().with(name.as_str(), content))
                .build()?;
            let request = Arc::new(RequestContext::new("GET", "/"));
            let ctx = Context::new(&site, &request);

            let mut out = String::new();
            let mut report = |tag: &str, _: &mut dyn std::fmt::Write| -> quire::Result<()> {
                eprintln!("missing: {tag}");
                Ok(())
            };
            let unmatched: Option<quire::compose::UnmatchedTag<'_>> =
                if missing { Some(&mut report) } else { None };
            ctx.bind_model_to_template(&name, &mut out, &model, unmatched)?;
            print!("{out}");
        }
    }

    Ok(())
}
