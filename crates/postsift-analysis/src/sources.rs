//! Collaborator seams: post acquisition and historical rating feedback.

use std::future::Future;

use postsift_core::{FeedbackFile, Post, PostArchive, RatingInsight, SearchRequest};

/// Acquisition collaborator: returns engagement-annotated, platform-tagged posts.
///
/// The pipeline never retries or paginates acquisition.
pub trait PostSource: Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn search_posts(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send;
}

/// Read-only historical feedback collaborator.
///
/// `None` means "no history"; the pipeline result must not depend on it.
pub trait FeedbackSource: Send + Sync {
    fn rating_insights(&self, query: &str) -> Option<Vec<RatingInsight>>;
}

impl PostSource for PostArchive {
    type Error = std::convert::Infallible;

    async fn search_posts(&self, request: &SearchRequest) -> Result<Vec<Post>, Self::Error> {
        Ok(self.search(request, chrono::Utc::now()))
    }
}

impl FeedbackSource for FeedbackFile {
    fn rating_insights(&self, query: &str) -> Option<Vec<RatingInsight>> {
        self.insights_for(query)
    }
}

/// Fetch posts for `request`, logging and swallowing acquisition failures.
///
/// Returns an empty `Vec` if the source fails.
pub async fn collect_posts<S: PostSource>(source: &S, request: &SearchRequest) -> Vec<Post> {
    match source.search_posts(request).await {
        Ok(posts) => {
            tracing::debug!(
                query = %request.query,
                count = posts.len(),
                time_filter = %request.time_filter,
                "collected posts"
            );
            posts
        }
        Err(e) => {
            tracing::warn!(
                query = %request.query,
                error = %e,
                "post acquisition failed"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use postsift_core::{Platform, TimeFilter};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("platform API rejected the request")]
    struct Rejected;

    struct FailingSource;

    impl PostSource for FailingSource {
        type Error = Rejected;

        async fn search_posts(&self, _request: &SearchRequest) -> Result<Vec<Post>, Rejected> {
            Err(Rejected)
        }
    }

    fn request() -> SearchRequest {
        SearchRequest {
            query: "standing desks".to_string(),
            platforms: vec![Platform::Reddit],
            language: "en".to_string(),
            time_filter: TimeFilter::All,
            max_results: 10,
        }
    }

    #[tokio::test]
    async fn failing_source_yields_no_posts() {
        assert!(collect_posts(&FailingSource, &request()).await.is_empty());
    }

    #[tokio::test]
    async fn archive_source_returns_matching_posts() {
        let archive = PostArchive {
            posts: vec![Post {
                id: "1".to_string(),
                content: "my standing desk wobbles".to_string(),
                source: "u/desk".to_string(),
                platform: Platform::Reddit,
                engagement: 4.0,
                timestamp: "2026-01-01T00:00:00Z".to_string(),
                url: "https://reddit.com/1".to_string(),
            }],
        };
        let posts = collect_posts(&archive, &request()).await;
        assert_eq!(posts.len(), 1);
    }
}
