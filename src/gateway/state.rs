use std::sync::Arc;
use std::time::Duration;

use crate::completion::CompletionService;
use crate::config::Config;
use crate::corpus::CorpusStore;
use crate::pipeline::QuizAnalyzer;

#[derive(Clone, Debug)]
pub struct HandlerState {
    pub analyzer: Arc<QuizAnalyzer>,

    /// Upper bound for one POST, extraction through analysis.
    pub request_timeout: Duration,
}

impl HandlerState {
    pub fn new(analyzer: QuizAnalyzer, request_timeout: Duration) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            request_timeout,
        }
    }

    pub fn from_config(
        config: &Config,
        service: Arc<dyn CompletionService>,
        corpus: Arc<CorpusStore>,
    ) -> Self {
        let analyzer = QuizAnalyzer::new(service, corpus).context_chunks(config.context_chunks);
        Self::new(analyzer, config.request_timeout)
    }

    pub fn service(&self) -> &Arc<dyn CompletionService> {
        self.analyzer.service()
    }

    pub fn corpus(&self) -> &Arc<CorpusStore> {
        self.analyzer.corpus()
    }
}
