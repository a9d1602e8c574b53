//! Tabula CLI
//!
//! Command-line interface for the Tabular Summary Pane:
//! - Summarize a CSV file locally
//! - Write the example file
//! - Group-sum a column
//! - Upload to a running API server
//! - Check server status

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};

use tabula::pane::{render, PaneConfig, SessionContext, UploadedFile};
use tabula::summary::{group_sum, DEFAULT_PREVIEW_ROWS};
use tabula::table::{parse_csv, sample_csv, CSV_MIME};

#[derive(Parser)]
#[command(name = "tabula")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Summarize CSV files: shape, missing values, describe statistics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8501", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a CSV file (without a path, show the no-file view)
    Summarize {
        /// Path to CSV file
        path: Option<PathBuf>,
        /// Rows in the head preview
        #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        preview: usize,
    },

    /// Write the example CSV file
    Sample {
        /// Output path
        #[arg(short, long, default_value = "sample.csv")]
        output: PathBuf,
    },

    /// Sum a numeric column per distinct key
    Group {
        /// Path to CSV file
        path: PathBuf,
        /// Key column
        #[arg(long)]
        by: String,
        /// Numeric column to sum
        #[arg(long)]
        value: String,
    },

    /// Upload a CSV file to the API server and show the pane
    Upload {
        /// Path to CSV file
        path: PathBuf,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize { path, preview } => {
            let file = match path {
                Some(path) => Some(read_upload(&path)?),
                None => None,
            };

            let mut ctx = SessionContext::new();
            let outcome = ctx.upload(file).map(|_| ());

            let view = render(&ctx, &PaneConfig {
                preview_rows: preview,
            });
            print_view(&serde_json::to_value(&view)?, &cli.format)?;

            if outcome.is_err() {
                std::process::exit(1);
            }
        }

        Commands::Sample { output } => {
            let bytes = sample_csv()?;
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, &bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Wrote example file to {:?} ({} bytes)", output, bytes.len());
        }

        Commands::Group { path, by, value } => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let table = parse_csv(&bytes)?;
            let groups = group_sum(&table, &by, &value)?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                let rows: Vec<Vec<String>> = groups
                    .iter()
                    .map(|g| vec![g.key.clone(), format_number(g.total), g.count.to_string()])
                    .collect();
                print_grid(&[by.as_str(), value.as_str(), "rows"], &rows);
            }
        }

        Commands::Upload { path } => {
            let file = read_upload(&path)?;
            let client = reqwest::Client::new();

            let created: Value = client
                .post(format!("{}/api/v1/sessions", cli.api_url))
                .send()
                .await
                .with_context(|| format!("connecting to {}", cli.api_url))?
                .error_for_status()?
                .json()
                .await?;
            let session_id = created["session_id"]
                .as_str()
                .context("server response has no session_id")?
                .to_string();

            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.name.unwrap_or_else(|| "upload.csv".to_string()))
                .mime_str(CSV_MIME)?;
            let form = reqwest::multipart::Form::new().part("file", part);

            let response = client
                .post(format!("{}/api/v1/sessions/{}/upload", cli.api_url, session_id))
                .multipart(form)
                .send()
                .await?;
            let status = response.status();

            let view: Value = if status.is_success() {
                response.json().await?
            } else {
                // Rejected uploads leave the session in its failed state
                client
                    .get(format!("{}/api/v1/sessions/{}", cli.api_url, session_id))
                    .send()
                    .await?
                    .json()
                    .await?
            };

            print_view(&view, &cli.format)?;

            let _ = client
                .delete(format!("{}/api/v1/sessions/{}", cli.api_url, session_id))
                .send()
                .await;

            if !status.is_success() {
                std::process::exit(1);
            }
        }

        Commands::Status => {
            let client = reqwest::Client::new();
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: Value = resp.json().await?;

                    println!("Tabula v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!("Sessions: {}", health["sessions"].as_u64().unwrap_or(0));
                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Tabula API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the Tabula API server is running:");
                    eprintln!("  cargo run --bin tabula-api");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = tabula::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    Ok(UploadedFile::new(name, bytes))
}

/// Print a serialized `PaneView`
fn print_view(view: &Value, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    match view["state"].as_str() {
        Some("no_file") => {
            println!("{}", view["message"].as_str().unwrap_or_default());
            println!();
            println!(
                "Example file: {} ({} bytes). Write it with: tabula sample",
                view["sample"]["file_name"].as_str().unwrap_or("sample.csv"),
                view["sample"]["size_bytes"].as_u64().unwrap_or(0)
            );
        }
        Some("failed") => {
            eprintln!(
                "Upload failed ({}): {}",
                view["file_name"].as_str().unwrap_or("<unnamed>"),
                view["error"].as_str().unwrap_or("unknown error")
            );
        }
        Some("loaded") => print_loaded(view),
        _ => println!("{}", view),
    }

    Ok(())
}

fn print_loaded(view: &Value) {
    let report = &view["report"];
    let preview = &view["preview"];

    if let Some(name) = view["file_name"].as_str() {
        println!("File: {}", name);
    }
    println!(
        "Rows: {}   Columns: {}   Missing values: {}",
        report["row_count"].as_u64().unwrap_or(0),
        report["column_count"].as_u64().unwrap_or(0),
        report["missing_count"].as_u64().unwrap_or(0)
    );

    println!();
    println!("Preview");
    let headers: Vec<&str> = preview["columns"]
        .as_array()
        .map(|cols| cols.iter().filter_map(|c| c["name"].as_str()).collect())
        .unwrap_or_default();
    let rows: Vec<Vec<String>> = preview["rows"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    row.as_array()
                        .map(|cells| {
                            cells
                                .iter()
                                .map(|c| c.as_str().unwrap_or("NaN").to_string())
                                .collect()
                        })
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default();
    print_grid(&headers, &rows);
    if preview["truncated"].as_bool().unwrap_or(false) {
        println!(
            "... {} rows total",
            preview["total_rows"].as_u64().unwrap_or(0)
        );
    }

    let stats = report["statistics"].as_array().cloned().unwrap_or_default();
    if stats.is_empty() {
        return;
    }

    println!();
    println!("Statistics");
    let mut headers = vec![""];
    headers.extend(stats.iter().filter_map(|s| s["column"].as_str()));

    let labels = [
        ("count", "count"),
        ("mean", "mean"),
        ("std_dev", "std"),
        ("min", "min"),
        ("p25", "25%"),
        ("p50", "50%"),
        ("p75", "75%"),
        ("max", "max"),
    ];
    let rows: Vec<Vec<String>> = labels
        .iter()
        .map(|(field, label)| {
            let mut row = vec![label.to_string()];
            row.extend(stats.iter().map(|s| match s[*field].as_f64() {
                Some(v) if *field == "count" => format!("{}", v as u64),
                Some(v) => format!("{:.6}", v),
                None => "NaN".to_string(),
            }));
            row
        })
        .collect();
    print_grid(&headers, &rows);
}

/// Print rows under headers with padded columns
fn print_grid(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", line(headers.to_vec()));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1)));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.4}", value)
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
