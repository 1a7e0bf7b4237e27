//! Command handlers for the CLI.
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr.

use postsift_analysis::{
    analyze, analyze_focused, collect_posts, expand_query, filter_relevant, ContentCategory,
    FeedbackSource, OllamaClient, PipelineSettings, StageContext,
};
use postsift_core::{AppConfig, FeedbackFile, Post, SearchRequest};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::PostArgs;

/// Everything a pipeline command needs, borrowed from `main`.
pub(crate) struct Run<'a> {
    pub(crate) oracle: &'a OllamaClient,
    pub(crate) settings: &'a PipelineSettings,
    pub(crate) feedback: Option<&'a FeedbackFile>,
    pub(crate) cancel: &'a CancellationToken,
}

impl<'a> Run<'a> {
    fn context(&self) -> StageContext<'a, OllamaClient> {
        let ctx = StageContext::new(self.oracle, self.settings, self.cancel);
        match self.feedback {
            Some(feedback) => ctx.with_feedback(feedback as &dyn FeedbackSource),
            None => ctx,
        }
    }
}

/// Load the rating feedback file if `POSTSIFT_FEEDBACK_PATH` is set.
///
/// # Errors
///
/// Returns an error if the configured file cannot be read or parsed.
pub(crate) fn load_feedback_source(config: &AppConfig) -> anyhow::Result<Option<FeedbackFile>> {
    let Some(path) = config.feedback_path.as_deref() else {
        return Ok(None);
    };
    let feedback = postsift_core::load_feedback(path)?;
    tracing::info!(
        path = %path.display(),
        entries = feedback.insights.len(),
        "loaded rating feedback"
    );
    Ok(Some(feedback))
}

/// Check that the Ollama server answers its model listing.
///
/// # Errors
///
/// Returns an error if the server is unreachable or answers with an error.
pub(crate) async fn run_ping(oracle: &OllamaClient, url: &str) -> anyhow::Result<()> {
    let models = oracle.health_check().await?;
    println!("ollama reachable at {url} ({models} models installed)");
    Ok(())
}

pub(crate) async fn run_expand(run: &Run<'_>, query: &str) -> anyhow::Result<()> {
    let areas = expand_query(&run.context(), query).await?;
    print_json(&areas)
}

pub(crate) async fn run_filter(run: &Run<'_>, query: &str, args: &PostArgs) -> anyhow::Result<()> {
    let posts = load_posts(query, args).await?;
    let relevant = filter_relevant(&run.context(), &posts, query).await?;
    print_json(&relevant)
}

pub(crate) async fn run_analyze(run: &Run<'_>, query: &str, args: &PostArgs) -> anyhow::Result<()> {
    let posts = load_posts(query, args).await?;
    let analysis = analyze(&run.context(), &posts, query).await?;
    print_json(&analysis)
}

pub(crate) async fn run_focus(
    run: &Run<'_>,
    expanded_query: &str,
    category: ContentCategory,
    args: &PostArgs,
) -> anyhow::Result<()> {
    let posts = load_posts(expanded_query, args).await?;
    let outcome = analyze_focused(&run.context(), &posts, expanded_query, category).await?;
    print_json(&outcome)
}

/// Read the post archive and select the posts matching `args`.
async fn load_posts(query: &str, args: &PostArgs) -> anyhow::Result<Vec<Post>> {
    let archive = postsift_core::load_post_archive(&args.path)?;
    let request = search_request(query, args);
    let posts = collect_posts(&archive, &request).await;
    if posts.is_empty() {
        tracing::warn!(
            path = %args.path.display(),
            time_filter = %request.time_filter,
            "no posts matched; try --time all or a different --platform"
        );
    }
    Ok(posts)
}

pub(crate) fn search_request(query: &str, args: &PostArgs) -> SearchRequest {
    SearchRequest {
        query: query.to_string(),
        platforms: args.platforms.clone(),
        language: args.language.clone(),
        time_filter: args.time_filter,
        max_results: args.max_results,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
