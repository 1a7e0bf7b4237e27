mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use postsift_analysis::{ContentCategory, OllamaClient, OracleSettings, PipelineSettings};
use postsift_core::{Platform, TimeFilter};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "postsift")]
#[command(about = "Sift social media posts into pain points, trends and content ideas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check that the Ollama server is reachable
    Ping,
    /// Expand a query into six focus areas plus a custom slot
    Expand {
        /// Topic to expand
        query: String,
    },
    /// Keep only the posts relevant to a query
    Filter {
        query: String,
        #[command(flatten)]
        posts: PostArgs,
    },
    /// Split relevant posts into pain points, trending ideas and content ideas
    Analyze {
        query: String,
        #[command(flatten)]
        posts: PostArgs,
    },
    /// Pick the best posts for one category of a focus area
    Focus {
        /// Expanded query of the chosen focus area
        expanded_query: String,

        /// pain-points, trending-ideas or content-ideas
        #[arg(long)]
        category: ContentCategory,

        #[command(flatten)]
        posts: PostArgs,
    },
}

/// Where posts come from and which of them to use.
#[derive(Debug, Args)]
struct PostArgs {
    /// JSON file holding an array of collected posts
    #[arg(long = "posts", env = "POSTSIFT_POSTS_PATH")]
    path: PathBuf,

    /// Platforms to include, comma separated (default: all)
    #[arg(long = "platform", value_delimiter = ',')]
    platforms: Vec<Platform>,

    /// Recency window: day, week, month, year or all
    #[arg(long = "time", default_value = "week")]
    time_filter: TimeFilter,

    /// Maximum posts taken from the archive
    #[arg(long = "max", default_value_t = 200)]
    max_results: usize,

    /// Content language passed to acquisition
    #[arg(long, default_value = "en")]
    language: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = postsift_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(config.log_ansi())
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(
        env = %config.env,
        ollama_url = %config.ollama_url,
        retry_backoff = %config.retry_backoff,
        "configuration loaded"
    );

    let oracle = OllamaClient::new(OracleSettings::from_app_config(&config))?;
    let settings = PipelineSettings::from_app_config(&config);
    let feedback = commands::load_feedback_source(&config)?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling the running request");
            interrupt.cancel();
        }
    });

    let run = commands::Run {
        oracle: &oracle,
        settings: &settings,
        feedback: feedback.as_ref(),
        cancel: &cancel,
    };

    match cli.command {
        Commands::Ping => commands::run_ping(&oracle, &config.ollama_url).await,
        Commands::Expand { query } => commands::run_expand(&run, &query).await,
        Commands::Filter { query, posts } => commands::run_filter(&run, &query, &posts).await,
        Commands::Analyze { query, posts } => commands::run_analyze(&run, &query, &posts).await,
        Commands::Focus {
            expanded_query,
            category,
            posts,
        } => commands::run_focus(&run, &expanded_query, category, &posts).await,
    }
}
