use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing assistant activity.
#[derive(Default)]
pub struct AssistantMetrics {
    documents_extracted: AtomicU64,
    extraction_failures: AtomicU64,
    summaries_generated: AtomicU64,
    questions_answered: AtomicU64,
    inference_failures: AtomicU64,
}

impl AssistantMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a text extraction.
    pub fn record_extraction(&self, produced_text: bool) {
        let counter = if produced_text {
            &self.documents_extracted
        } else {
            &self.extraction_failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful summary.
    pub fn record_summary(&self) {
        self.summaries_generated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful answer.
    pub fn record_answer(&self) {
        self.questions_answered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed inference call, whichever operation issued it.
    pub fn record_inference_failure(&self) {
        self.inference_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_extracted: self.documents_extracted.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            summaries_generated: self.summaries_generated.load(Ordering::Relaxed),
            questions_answered: self.questions_answered.load(Ordering::Relaxed),
            inference_failures: self.inference_failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of assistant counters used for reporting.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Uploads that produced non-empty text.
    pub documents_extracted: u64,
    /// Uploads that were unparsable or textless.
    pub extraction_failures: u64,
    /// Summaries returned by the provider.
    pub summaries_generated: u64,
    /// Answers returned by the provider.
    pub questions_answered: u64,
    /// Completion calls that failed (transport, status, or body).
    pub inference_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_extractions_by_outcome() {
        let metrics = AssistantMetrics::new();
        metrics.record_extraction(true);
        metrics.record_extraction(true);
        metrics.record_extraction(false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.documents_extracted, 2);
        assert_eq!(snapshot.extraction_failures, 1);
    }

    #[test]
    fn inference_counters_are_independent() {
        let metrics = AssistantMetrics::new();
        metrics.record_summary();
        metrics.record_answer();
        metrics.record_answer();
        metrics.record_inference_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.summaries_generated, 1);
        assert_eq!(snapshot.questions_answered, 2);
        assert_eq!(snapshot.inference_failures, 1);
    }
}
