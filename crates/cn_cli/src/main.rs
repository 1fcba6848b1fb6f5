use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use cn_collector::{
    export_csv, render_report, save_json, CsvExport, NewsApiSource, NewsCollector, QueryMode,
};
use cn_core::Result;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "cn",
    version,
    about = "Collect prominent company news across lookback windows"
)]
struct Cli {
    /// Name of the company to search for
    company_name: String,

    /// NewsAPI key (optional if the NEWS_API_KEY env var is set)
    #[arg(long)]
    api_key: Option<String>,

    /// Output JSON file name
    #[arg(long, default_value = "company_news.json")]
    output: String,

    /// Output directory for all files, created if absent
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Also export articles to this CSV file name
    #[arg(long)]
    csv: Option<String>,

    /// Maximum articles per time window
    #[arg(long, default_value_t = 50)]
    max_articles: u32,

    /// Pause between window requests, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Search for the bare company phrase instead of financially
    /// relevant coverage only
    #[arg(long)]
    broad_query: bool,

    /// Only print the summary report, don't write any files
    #[arg(long)]
    summary_only: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let query_mode = if cli.broad_query {
        QueryMode::ExactPhrase
    } else {
        QueryMode::FinancialContext
    };
    let source = NewsApiSource::new(cli.api_key.clone())?.with_query_mode(query_mode);

    let collector = NewsCollector::new(Arc::new(source))
        .with_max_articles(cli.max_articles)
        .with_inter_request_delay(Duration::from_millis(cli.delay_ms));

    let results = collector.collect(&cli.company_name).await;

    println!("{}", render_report(&results));

    if cli.summary_only {
        return Ok(());
    }

    // Export failures are logged and never undo the collection run; the
    // report above has already been printed.
    if let Err(e) = std::fs::create_dir_all(&cli.output_dir) {
        warn!(
            "⚠️ Could not create output directory {}: {}",
            cli.output_dir.display(),
            e
        );
        return Ok(());
    }

    let json_path = cli.output_dir.join(&cli.output);
    match save_json(&results, &json_path) {
        Ok(()) => info!("💾 Results saved to {}", json_path.display()),
        Err(e) => warn!("⚠️ Failed to save JSON results: {}", e),
    }

    if let Some(csv_name) = &cli.csv {
        let csv_path = cli.output_dir.join(csv_name);
        match export_csv(&results, &csv_path) {
            Ok(CsvExport::Written(rows)) => {
                info!("💾 CSV export saved to {} ({} rows)", csv_path.display(), rows)
            }
            Ok(CsvExport::Empty) => info!("No articles to export to CSV"),
            Err(e) => warn!("⚠️ Failed to export CSV: {}", e),
        }
    }

    Ok(())
}
