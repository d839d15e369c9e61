use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::{CatalogItem, InteractionKind, InteractionRepository, InteractionStore, UserId};
use pipeline::GenreProfile;
use rand::seq::IndexedRandom;
use rank_client::{OracleConfig, OracleRanker, Ranker, ScorerRanker};
use server::RecommendationOrchestrator;
use sources::Candidate;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// shelf-recs - Book Recommendation Engine
#[derive(Parser)]
#[command(name = "shelf-recs")]
#[command(about = "Personal-catalog book recommendations from likes, dislikes and completed reads", long_about = None)]
struct Cli {
    /// Directory containing books.dat and interactions.dat
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    #[command(flatten)]
    oracle: OracleArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Oracle flags. Anything not given on the command line comes from the
/// `SHELF_ORACLE_*` environment variables, then from the defaults.
#[derive(Args)]
struct OracleArgs {
    /// Base URL of the OpenAI-compatible ranking oracle [env: SHELF_ORACLE_URL]
    #[arg(long)]
    oracle_url: Option<String>,

    /// Model name sent to the oracle [env: SHELF_ORACLE_MODEL]
    #[arg(long)]
    oracle_model: Option<String>,

    /// Bearer token for the oracle [env: SHELF_ORACLE_API_KEY]
    #[arg(long)]
    oracle_api_key: Option<String>,

    /// Request deadline in seconds; a slow oracle counts as a failed one [env: SHELF_ORACLE_TIMEOUT_SECS]
    #[arg(long)]
    oracle_timeout_secs: Option<u64>,

    /// Rank with the genre scorer only, never contacting the oracle
    #[arg(long)]
    offline: bool,
}

impl OracleArgs {
    /// Environment first, then command-line overrides
    fn config(&self) -> OracleConfig {
        let mut config = OracleConfig::from_env();
        if let Some(url) = &self.oracle_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(model) = &self.oracle_model {
            config = config.with_model(model.clone());
        }
        if let Some(key) = self.oracle_api_key.as_ref().filter(|key| !key.is_empty()) {
            config = config.with_api_key(key.clone());
        }
        if let Some(secs) = self.oracle_timeout_secs {
            config = config.with_timeout_secs(secs);
        }
        config
    }

    fn build_ranker(&self) -> Result<Arc<dyn Ranker>> {
        if self.offline {
            return Ok(Arc::new(ScorerRanker::default()));
        }

        let ranker =
            OracleRanker::from_config(self.config()).context("Failed to build oracle client")?;
        Ok(Arc::new(ranker))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Get book recommendations for a reader
    Recommend {
        /// Reader ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return (0 means the default of 8)
        #[arg(long, default_value = "8")]
        limit: usize,
    },

    /// Show a reader's liked, disliked and completed books
    User {
        /// Reader ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Search for books by title
    Search {
        /// Book title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of concurrent recommend calls
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading catalog from {}...", cli.data_dir.display());
    let start = Instant::now();
    let store = Arc::new(
        InteractionStore::load_from_files(&cli.data_dir).context("Failed to load catalog")?,
    );
    let (items, log, _) = store.counts();
    println!(
        "{} Loaded {} books and {} interactions in {:?}",
        "✓".green(),
        items,
        log,
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend { user_id, limit } => {
            let ranker = cli.oracle.build_ranker()?;
            handle_recommend(store, ranker, user_id, limit).await?
        }
        Commands::User { user_id } => handle_user(&store, user_id)?,
        Commands::Search { title } => handle_search(&store, &title),
        Commands::Benchmark { requests } => {
            let ranker = cli.oracle.build_ranker()?;
            handle_benchmark(store, ranker, requests).await?
        }
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    store: Arc<InteractionStore>,
    ranker: Arc<dyn Ranker>,
    user_id: UserId,
    limit: usize,
) -> Result<()> {
    let repository: Arc<dyn InteractionRepository> = store.clone();
    let orchestrator = RecommendationOrchestrator::new(repository, ranker);

    let start = Instant::now();
    let recommendations = orchestrator.recommend_candidates(user_id, limit).await;
    let elapsed = start.elapsed();

    if recommendations.is_empty() {
        println!("{}", "Nothing left to recommend for this reader.".yellow());
        return Ok(());
    }

    print_recommendations(&store, &recommendations);
    println!("{}", format!("({:?})", elapsed).dimmed());
    Ok(())
}

/// Handle the 'user' command
fn handle_user(store: &InteractionStore, user_id: UserId) -> Result<()> {
    let history = store.history(user_id);
    if history.is_empty() {
        return Err(anyhow!("User {} has no interactions", user_id));
    }

    let liked = store.items_with_kind(user_id, InteractionKind::Liked);
    let disliked = store.items_with_kind(user_id, InteractionKind::Disliked);
    let completed = store.items_with_kind(user_id, InteractionKind::Completed);

    println!("{}", format!("Reader {}", user_id).bold().blue());
    println!(
        "{}Interactions recorded: {} ({} currently active)",
        "• ".green(),
        history.len(),
        liked.len() + disliked.len() + completed.len()
    );

    print_shelf("Liked", &liked);
    print_shelf("Disliked", &disliked);
    print_shelf("Completed", &completed);

    let profile = GenreProfile::from_items(&liked, &disliked);
    println!("Top liked genres:");
    if profile.liked_genre_count() == 0 {
        println!("  (none yet)");
    }
    for (genre, count) in profile.top_genres(5) {
        println!("  - {} ({} likes)", genre, count);
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(store: &InteractionStore, title: &str) {
    let needle = title.to_lowercase();
    let mut matches = store.search_title(title);

    // Exact matches first, otherwise catalog order
    matches.sort_by_key(|item| item.title.to_lowercase() != needle);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    let likes = store.like_counts();
    for item in matches.iter().take(20) {
        println!(
            "{}: {} [{}] {} likes",
            item.id,
            describe(item),
            item.genres,
            likes.get(&item.id).copied().unwrap_or(0)
        );
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    store: Arc<InteractionStore>,
    ranker: Arc<dyn Ranker>,
    requests: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }
    let readers = store.user_ids();
    if readers.is_empty() {
        bail!("No readers with interactions to benchmark");
    }

    let repository: Arc<dyn InteractionRepository> = store.clone();
    let orchestrator = RecommendationOrchestrator::new(repository, ranker);

    let user_ids: Vec<UserId> = {
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| readers.choose(&mut rng).copied())
            .collect()
    };

    let wall = Instant::now();
    let mut handles = Vec::with_capacity(user_ids.len());
    for user_id in user_ids {
        let orchestrator = orchestrator.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            orchestrator.recommend(user_id, 8).await;
            start.elapsed()
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await?);
    }
    let total_time = wall.elapsed();

    timings.sort();
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    let throughput = timings.len() as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {}", timings.len());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Nearest-rank percentile over sorted, non-empty timings
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let idx = ((sorted.len() - 1) as f64 * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_recommendations(store: &InteractionStore, recommendations: &[Candidate]) {
    println!("{}", "Book Recommendations:".bold().blue());
    for (rank, candidate) in recommendations.iter().enumerate() {
        let description = store
            .get_item(candidate.item_id)
            .map(|item| format!("{} [{}]", describe(item), item.genres))
            .unwrap_or_else(|| format!("#{}", candidate.item_id));
        println!(
            "{}. {} ({})",
            (rank + 1).to_string().green(),
            description,
            candidate.source.as_str().dimmed()
        );
    }
}

fn print_shelf(label: &str, items: &[CatalogItem]) {
    println!("{}{} ({}):", "• ".cyan(), label, items.len());
    for item in items.iter().take(10) {
        println!("  - {}", describe(item));
    }
    if items.len() > 10 {
        println!("  ... and {} more", items.len() - 10);
    }
}

fn describe(item: &CatalogItem) -> String {
    format!("{} by {}", item.title, item.author)
}
