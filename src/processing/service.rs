//! Reduction pipeline turning arbitrary-length text into one bounded summary.

use crate::metrics::{GatewayMetrics, MetricsSnapshot};
use crate::processing::chunking::chunk_text;
use crate::summarization::{Summarizer, SummaryOutcome};
use async_trait::async_trait;
use std::sync::Arc;

/// Abstraction over the summarization pipeline used by the HTTP surface.
#[async_trait]
pub trait SummarizeApi: Send + Sync {
    /// Reduce extracted document text to a single summary outcome.
    async fn summarize_document(&self, text: String) -> SummaryOutcome;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Coordinates chunking and per-chunk summarization into one final summary.
///
/// The service owns the summarizer and metrics registry; construct it once
/// near process start and share it through an `Arc`.
pub struct SummarizeService {
    summarizer: Summarizer,
    chunk_max_tokens: usize,
    metrics: Arc<GatewayMetrics>,
}

impl SummarizeService {
    /// Build a service around the given summarizer and chunk token budget.
    pub fn new(summarizer: Summarizer, chunk_max_tokens: usize) -> Self {
        Self {
            summarizer,
            chunk_max_tokens,
            metrics: Arc::new(GatewayMetrics::new()),
        }
    }
}

#[async_trait]
impl SummarizeApi for SummarizeService {
    /// Chunk the text, summarize each chunk sequentially in order, and merge.
    ///
    /// A single chunk's outcome is returned unmodified, degraded or not. For
    /// multiple chunks, the rendered summaries are joined with a single space
    /// and reduced by exactly one more call. The merge is one level deep: a
    /// joined string larger than the chunk budget is still sent as one
    /// request, which caps the document size this pipeline can handle well.
    async fn summarize_document(&self, text: String) -> SummaryOutcome {
        let chunks = chunk_text(&text, self.chunk_max_tokens);
        tracing::debug!(
            chunks = chunks.len(),
            chars = text.chars().count(),
            "Partitioned document"
        );

        let mut outcomes = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            // Strictly sequential: chunk i completes before i+1 is issued.
            outcomes.push(self.summarizer.summarize(chunk).await);
        }

        let failed_calls = outcomes.iter().filter(|o| o.is_degraded()).count() as u64;
        self.metrics
            .record_document(outcomes.len() as u64, failed_calls);

        if outcomes.len() == 1 {
            return outcomes.remove(0);
        }

        let joined = outcomes
            .into_iter()
            .map(SummaryOutcome::into_text)
            .collect::<Vec<_>>()
            .join(" ");
        self.summarizer.summarize(&joined).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarization::{CompletionClient, CompletionClientError, CompletionRequest};
    use std::sync::Mutex;

    /// Records every user prompt it receives and replies from a script.
    struct RecordingClient {
        prompts: Mutex<Vec<String>>,
        responses: Mutex<Vec<Result<String, String>>>,
    }

    impl RecordingClient {
        fn new(responses: Vec<Result<String, String>>) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for RecordingClient {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<String, CompletionClientError> {
            self.prompts.lock().unwrap().push(request.user);
            self.responses
                .lock()
                .unwrap()
                .remove(0)
                .map_err(CompletionClientError::GenerationFailed)
        }
    }

    fn service_with(
        responses: Vec<Result<String, String>>,
        chunk_max_tokens: usize,
    ) -> (SummarizeService, Arc<RecordingClient>) {
        let client = Arc::new(RecordingClient::new(responses));
        let summarizer = Summarizer::new(Box::new(SharedClient(client.clone())));
        (SummarizeService::new(summarizer, chunk_max_tokens), client)
    }

    /// Lets the test keep a handle on the client the summarizer owns.
    struct SharedClient(Arc<RecordingClient>);

    #[async_trait]
    impl CompletionClient for SharedClient {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<String, CompletionClientError> {
            self.0.complete(request).await
        }
    }

    #[tokio::test]
    async fn single_chunk_returns_client_output_unmodified() {
        let (service, client) = service_with(vec![Ok("one summary".into())], 1500);

        let outcome = service.summarize_document("short document".into()).await;

        assert_eq!(outcome, SummaryOutcome::Generated("one summary".into()));
        assert_eq!(client.prompts.lock().unwrap().len(), 1);
        assert_eq!(service.metrics_snapshot().documents_summarized, 1);
        assert_eq!(service.metrics_snapshot().chunks_summarized, 1);
    }

    #[tokio::test]
    async fn single_chunk_degraded_outcome_passes_through() {
        let (service, _client) = service_with(vec![Err("rate limited".into())], 1500);

        let outcome = service.summarize_document("short document".into()).await;

        assert!(outcome.is_degraded());
        assert_eq!(
            outcome.into_text(),
            "Error during summarization: Failed to generate completion: rate limited"
        );
    }

    #[tokio::test]
    async fn multi_chunk_issues_n_calls_then_one_merge() {
        // Budget of 1 token = 4 chars per chunk; 10 chars -> 3 chunks.
        let (service, client) = service_with(
            vec![
                Ok("s1".into()),
                Ok("s2".into()),
                Ok("s3".into()),
                Ok("final".into()),
            ],
            1,
        );

        let outcome = service.summarize_document("abcdefghij".into()).await;

        assert_eq!(outcome, SummaryOutcome::Generated("final".into()));
        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 4);
        assert!(prompts[0].contains("abcd"));
        assert!(prompts[1].contains("efgh"));
        assert!(prompts[2].contains("ij"));
        // Merge input is the space-joined chunk summaries in order.
        assert!(prompts[3].contains("s1 s2 s3"));
        assert_eq!(service.metrics_snapshot().chunks_summarized, 3);
    }

    #[tokio::test]
    async fn default_budget_splits_twelve_thousand_chars_into_two_chunks() {
        // 1500 tokens = 6000 chars per chunk.
        let (service, client) = service_with(
            vec![Ok("s1".into()), Ok("s2".into()), Ok("final".into())],
            1500,
        );

        let outcome = service.summarize_document("y".repeat(12_000)).await;

        assert_eq!(outcome, SummaryOutcome::Generated("final".into()));
        assert_eq!(client.prompts.lock().unwrap().len(), 3);
        assert_eq!(service.metrics_snapshot().chunks_summarized, 2);
    }

    #[tokio::test]
    async fn degraded_chunk_summaries_join_the_merge_input() {
        let (service, client) = service_with(
            vec![
                Ok("s1".into()),
                Err("timeout".into()),
                Ok("merged".into()),
            ],
            1,
        );

        let outcome = service.summarize_document("abcdefgh".into()).await;

        assert_eq!(outcome, SummaryOutcome::Generated("merged".into()));
        let prompts = client.prompts.lock().unwrap();
        assert!(
            prompts[2].contains("s1 Error during summarization: Failed to generate completion: timeout")
        );
        assert_eq!(service.metrics_snapshot().provider_failures, 1);
    }

    #[tokio::test]
    async fn empty_text_still_makes_one_call() {
        let (service, client) = service_with(vec![Ok("nothing to see".into())], 1500);

        let outcome = service.summarize_document(String::new()).await;

        assert_eq!(outcome, SummaryOutcome::Generated("nothing to see".into()));
        assert_eq!(client.prompts.lock().unwrap().len(), 1);
    }
}
