//! scholar-search - Google Scholar record extraction
//!
//! ## Usage
//!
//! ### CLI Mode
//! ```bash
//! scholar-search search "machine learning" --author "Ian Goodfellow" --years 2010-2021
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! scholar-search serve --port 3000
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scholar_search::{output, server, ClientOptions, Extraction, ScholarClient, SearchQuery};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Google Scholar keyword and filtered search
#[derive(Parser)]
#[command(name = "scholar-search")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search Google Scholar and print the extracted records
    Search {
        /// Search keywords
        keywords: String,

        /// Author filter
        #[arg(long)]
        author: Option<String>,

        /// Publication year range (e.g., "2010-2021" or "2019")
        #[arg(long)]
        years: Option<String>,

        /// Number of results to return
        #[arg(short = 'n', long, default_value = "5")]
        num_results: usize,

        /// Mirror site URL
        #[arg(long)]
        mirror: Option<String>,

        /// Proxy URL (e.g., http://127.0.0.1:7890)
        #[arg(long)]
        proxy: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Mirror site URL
        #[arg(long)]
        mirror: Option<String>,

        /// Proxy URL
        #[arg(long)]
        proxy: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Search {
            keywords,
            author,
            years,
            num_results,
            mirror,
            proxy,
            format,
            output,
        } => {
            let mut query = SearchQuery::new(keywords).with_max_results(num_results);
            if let Some(author) = author {
                query = query.with_author(author);
            }
            if let Some(years) = years {
                let (start, end) = parse_years(&years).context("Invalid --years format")?;
                query = query.with_year_range(start, end);
            }

            let client = ScholarClient::new(&ClientOptions {
                base_url: mirror,
                proxy,
                ..Default::default()
            })?;

            run_search(&client, &query, format, output).await
        }
        Commands::Serve {
            port,
            host,
            mirror,
            proxy,
        } => {
            let client = ScholarClient::new(&ClientOptions {
                base_url: mirror,
                proxy,
                ..Default::default()
            })?;

            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .context("Invalid host:port")?;

            info!(addr = %addr, "Starting HTTP server");
            server::run(client, addr).await.context("Server error")?;
            Ok(())
        }
    }
}

// ============================================================================
// Search
// ============================================================================

async fn run_search(
    client: &ScholarClient,
    query: &SearchQuery,
    format: OutputFormat,
    output_path: Option<PathBuf>,
) -> Result<()> {
    let records = match client.search(query).await? {
        Extraction::Records(records) => records,
        Extraction::Failed { status } => {
            anyhow::bail!("Failed to fetch data. HTTP status code: {}", status)
        }
    };

    if records.is_empty() {
        warn!("No results from Google Scholar.");
    }

    match (format, output_path) {
        (OutputFormat::Csv, Some(path)) => output::save_csv(&path, &records)?,
        (format, Some(path)) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_records(file, format, &records, client)?;
            info!(path = %path.display(), "Saved results");
        }
        (format, None) => {
            write_records(std::io::stdout().lock(), format, &records, client)?
        }
    }

    Ok(())
}

fn write_records<W: std::io::Write>(
    writer: W,
    format: OutputFormat,
    records: &[scholar_search::ResultRecord],
    client: &ScholarClient,
) -> Result<()> {
    match format {
        OutputFormat::Text => output::write_text(writer, records, client.extractor())?,
        OutputFormat::Json => output::write_json(writer, records)?,
        OutputFormat::Csv => output::write_csv(writer, records)?,
    }
    Ok(())
}

/// Parse year range string (e.g., "2019", "2010-2021")
fn parse_years(years_str: &str) -> Result<(i32, i32)> {
    if years_str.contains('-') {
        let parts: Vec<&str> = years_str.split('-').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid year range format");
        }
        let start: i32 = parts[0].trim().parse().context("Invalid start year")?;
        let end: i32 = parts[1].trim().parse().context("Invalid end year")?;
        Ok((start, end))
    } else {
        let year: i32 = years_str.trim().parse().context("Invalid year")?;
        Ok((year, year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_years() {
        assert_eq!(parse_years("2010-2021").expect("range"), (2010, 2021));
        assert_eq!(parse_years("2019").expect("single"), (2019, 2019));
        assert!(parse_years("2010-2015-2020").is_err());
        assert!(parse_years("abc").is_err());
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from([
            "scholar-search",
            "search",
            "machine learning",
            "--author",
            "Ian Goodfellow",
            "--years",
            "2010-2021",
            "-n",
            "3",
            "--format",
            "json",
        ])
        .expect("valid args");
        match cli.command {
            Commands::Search {
                keywords,
                author,
                num_results,
                ..
            } => {
                assert_eq!(keywords, "machine learning");
                assert_eq!(author.as_deref(), Some("Ian Goodfellow"));
                assert_eq!(num_results, 3);
            }
            Commands::Serve { .. } => panic!("expected search"),
        }
    }
}
