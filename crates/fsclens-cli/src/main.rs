mod display;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use fsclens_client::{ClientConfig, DashboardSession, HttpSearchApi, SearchSession};
use fsclens_core::{DecisionKey, QueryBuilder, RequestState, SearchFilters, StatsAggregator};

#[derive(Parser, Debug)]
#[command(name = "fsclens", version, about = "Search and summarise financial regulator decisions")]
struct Cli {
    /// API root, e.g. http://localhost:8000/api/v1
    #[arg(long, global = true, env = "FSCLENS_API_URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "FSCLENS_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search decisions. Any filter switches to structured search.
    Search {
        query: String,
        #[arg(long = "category1")]
        category1: Option<String>,
        #[arg(long = "category2")]
        category2: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long)]
        action_type: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// Minimum fine in won
        #[arg(long)]
        min_amount: Option<u64>,
        /// Maximum fine in won
        #[arg(long)]
        max_amount: Option<u64>,
        #[arg(long, env = "FSCLENS_SEARCH_LIMIT")]
        limit: Option<u32>,
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show dashboard statistics.
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    /// Show document links for one decision.
    Links { year: i32, id: i32 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("reading FSCLENS_* environment")?;
    if let Some(url) = &cli.api_url {
        config.base_url = ClientConfig::new(url.as_str())?.base_url;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }
    tracing::info!(api = %config.base_url, "fsclens v{}", env!("CARGO_PKG_VERSION"));

    let api = HttpSearchApi::new(&config).context("building HTTP client")?;

    match cli.command {
        Command::Search {
            query,
            category1,
            category2,
            industry,
            action_type,
            year,
            min_amount,
            max_amount,
            limit,
            json,
        } => {
            let filters = SearchFilters {
                category1,
                category2,
                industry,
                action_type,
                year,
                min_amount,
                max_amount,
            };
            let builder = QueryBuilder::with_limit(limit.unwrap_or(config.search_limit));
            let mut session = SearchSession::new(builder);
            match session.run(&api, &query, Some(&filters)).await {
                RequestState::Success(results) if json => {
                    println!("{}", serde_json::to_string_pretty(results)?)
                }
                RequestState::Success(results) => display::print_search_results(results),
                RequestState::Failed(failure) => bail!("search failed: {failure}"),
                RequestState::Idle | RequestState::Loading => bail!("search did not complete"),
            }
        }
        Command::Dashboard { json } => {
            let mut session = DashboardSession::new(StatsAggregator::new(config.recent_limit));
            match session.run(&api).await {
                RequestState::Success(snapshot) if json => {
                    println!("{}", serde_json::to_string_pretty(snapshot)?)
                }
                RequestState::Success(snapshot) => display::print_dashboard(snapshot),
                RequestState::Failed(failure) => bail!("dashboard failed: {failure}"),
                RequestState::Idle | RequestState::Loading => bail!("dashboard did not complete"),
            }
        }
        Command::Links { year, id } => {
            let key = DecisionKey::new(year, id);
            let docs = api.documents();
            let companion = docs.probe_companion(key).await;
            display::print_links(key, &docs.download_url(key), companion.as_deref());
        }
    }

    Ok(())
}
