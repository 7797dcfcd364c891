//! optidata CLI - material optical data server
//!
//! Serves normalized rows of an optical-properties workbook over HTTP, and
//! offers a few commands for inspecting a workbook from the terminal.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use optidata::config::DEFAULT_PORT;
use optidata::{DataService, ServiceConfig, WorkbookLoader};
use std::fs;
use std::io::{self, Write};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

/// Normalized material optical data from Excel workbooks
#[derive(Parser)]
#[command(
    name = "optidata",
    version,
    about = "Serve material optical data from Excel workbooks",
    long_about = "optidata - material optical properties over a small JSON API.\n\n\
                  Reads an .xlsx workbook once, normalizes each sheet into a fixed\n\
                  record schema and serves it at /api/data."
)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: IpAddr,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Spreadsheet to serve (default: data.xlsx next to the executable)
        #[arg(short, long, env = "DATA_FILE")]
        data_file: Option<PathBuf>,

        /// Document served for non-API paths (default: single_app.html next to the executable)
        #[arg(long, env = "STATIC_FILE")]
        static_file: Option<PathBuf>,

        /// Load and normalize every sheet before accepting requests
        #[arg(long)]
        preload: bool,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Input file path
        input: PathBuf,
    },

    /// Print normalized records of a sheet as JSON
    Dump {
        /// Input file path
        input: PathBuf,

        /// Sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, matches!(cli.command, Commands::Serve { .. }));

    if let Err(e) = run(cli).await {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, serving: bool) {
    let default_level = if serving { "info" } else { "warn" };
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Serve {
            host,
            port,
            data_file,
            static_file,
            preload,
        } => {
            let mut config = ServiceConfig::new().with_host(host).with_port(port);
            if let Some(path) = data_file {
                config = config.with_data_file(path);
            }
            if let Some(path) = static_file {
                config = config.with_static_file(path);
            }

            serve(config, preload).await?;
        }

        Commands::Sheets { input } => {
            let pb = create_spinner("Reading workbook...");
            let service = DataService::new(WorkbookLoader::new(&input));
            let names = service.list_sheet_names().await?;
            pb.finish_and_clear();

            println!("{}", "Sheets".cyan().bold());
            println!("{}", "─".repeat(40));
            for (idx, name) in names.iter().enumerate() {
                println!("{:>3}. {}", idx + 1, name);
            }
            if names.is_empty() {
                println!("{} Workbook contains no sheets", "!".yellow().bold());
            }
        }

        Commands::Dump {
            input,
            sheet,
            output,
            compact,
        } => {
            let pb = create_spinner("Reading workbook...");
            let service = DataService::new(WorkbookLoader::new(&input));
            let records = service.load_sheet(sheet.as_deref()).await?;
            pb.set_message("Rendering to JSON...");

            let json = if compact {
                serde_json::to_string(records.as_slice())?
            } else {
                serde_json::to_string_pretty(records.as_slice())?
            };

            pb.finish_and_clear();
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!(
                    "{} Wrote {} records: {}",
                    "✓".green().bold(),
                    records.len(),
                    path.display()
                );
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

async fn serve(config: ServiceConfig, preload: bool) -> Result<(), Box<dyn std::error::Error>> {
    let service = Arc::new(DataService::from_config(&config));

    if preload {
        preload_sheets(&service).await?;
    } else if !config.data_file.exists() {
        tracing::warn!(
            path = %config.data_file.display(),
            "data file not found, data requests will fail until it exists"
        );
    }

    let app = optidata::api::router(Arc::clone(&service), &config.static_file);
    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;

    println!(
        "{} Server listening on port {}",
        "✓".green().bold(),
        config.port
    );
    tracing::info!(
        addr = %config.socket_addr(),
        data_file = %config.data_file.display(),
        "server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn preload_sheets(service: &DataService) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_spinner("Loading workbook...");
    let names = service.list_sheet_names().await?;
    pb.finish_and_clear();

    let bar = ProgressBar::new(names.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    for name in &names {
        bar.set_message(name.clone());
        service.load_sheet(Some(name)).await?;
        bar.inc(1);
    }
    bar.finish_and_clear();

    println!(
        "{} Preloaded {} sheets from {}",
        "✓".green().bold(),
        names.len(),
        service.loader().path().display()
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn print_version() {
    println!("{} {}", "optidata".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Material optical data from Excel workbooks over a JSON API");
    println!();
    println!("Supported formats: XLSX, XLSM");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["optidata", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, preload, .. } => {
                // PORT may be set in the environment running the tests
                if std::env::var_os("PORT").is_none() {
                    assert_eq!(port, 3001);
                }
                assert!(!preload);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_dump_args() {
        let cli = Cli::try_parse_from([
            "optidata", "dump", "data.xlsx", "--sheet", "Au", "--compact", "-v",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Dump {
                input,
                sheet,
                compact,
                output,
            } => {
                assert_eq!(input, PathBuf::from("data.xlsx"));
                assert_eq!(sheet.as_deref(), Some("Au"));
                assert!(compact);
                assert!(output.is_none());
            }
            _ => panic!("expected dump"),
        }
    }
}
