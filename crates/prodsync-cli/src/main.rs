mod output;

use clap::{Parser, Subcommand, ValueEnum};

use prodsync_core::{SearchRequest, SortOrder};

#[derive(Debug, Parser)]
#[command(name = "prodsync-cli")]
#[command(about = "Product search pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a product search and print the results.
    Search {
        /// Brand or query term to search for.
        #[arg(long)]
        brand: String,

        /// Maximum number of records to collect (clamped to 1..=200).
        #[arg(long, default_value_t = 40)]
        max_items: usize,

        /// Result ordering.
        #[arg(long, value_enum, default_value_t = SortArg::BestMatch)]
        sort: SortArg,

        /// Output format.
        #[arg(long, value_enum, default_value_t = FormatArg::Json)]
        format: FormatArg,

        /// Write to this path instead of stdout.
        #[arg(long)]
        output: Option<std::path::PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    BestMatch,
    PriceLow,
    PriceHigh,
    Rating,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::BestMatch => SortOrder::BestMatch,
            SortArg::PriceLow => SortOrder::PriceLow,
            SortArg::PriceHigh => SortOrder::PriceHigh,
            SortArg::Rating => SortOrder::Rating,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            brand,
            max_items,
            sort,
            format,
            output,
        } => {
            let config = prodsync_core::load_app_config()?;
            let client = prodsync_scraper::SearchClient::new(
                &config.search_base_url,
                config.fetch_timeout_secs,
                &config.user_agent,
                config.proxy.clone(),
            )?;

            let request = SearchRequest::new(brand, max_items, sort.into());
            let records =
                prodsync_scraper::run_search(&client, &request, config.inter_page_delay_ms).await;
            tracing::info!(brand = %request.brand, count = records.len(), "search finished");

            let rendered = match format {
                FormatArg::Json => output::render_json(&records)?,
                FormatArg::Csv => output::render_csv(&records)?,
            };

            match output {
                Some(path) => std::fs::write(&path, rendered)?,
                None => print!("{rendered}"),
            }
        }
    }

    Ok(())
}
