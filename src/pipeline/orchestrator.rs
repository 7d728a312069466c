use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::error::{PipelineError, PipelineResult};
use super::prompt::build_analysis_prompt;
use super::types::{AccuracyTier, AnalysisMetadata, AnalysisOutcome, Stage};
use crate::completion::{CompletionRequest, CompletionService, ImageSource};
use crate::constants::{
    ANALYSIS_MAX_TOKENS, ANALYSIS_TEMPERATURE, DEFAULT_CONTEXT_CHUNKS, PROCESSING_METHOD,
};
use crate::corpus::{Corpus, CorpusStore};
use crate::extraction::{ExtractionOutcome, Question, QuestionExtractor};
use crate::retrieval::{AnalysisContext, KeywordExtractor, RelevanceRanker};

/// Runs one image through extraction, retrieval and the final analysis call.
#[derive(Clone)]
pub struct QuizAnalyzer {
    service: Arc<dyn CompletionService>,
    corpus: Arc<CorpusStore>,
    extractor: QuestionExtractor,
    keywords: KeywordExtractor,
    ranker: RelevanceRanker,
    context_chunks: usize,
}

impl std::fmt::Debug for QuizAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizAnalyzer")
            .field("model", &self.service.model())
            .field("corpus", &self.corpus.location())
            .field("context_chunks", &self.context_chunks)
            .finish()
    }
}

impl QuizAnalyzer {
    pub fn new(service: Arc<dyn CompletionService>, corpus: Arc<CorpusStore>) -> Self {
        Self {
            extractor: QuestionExtractor::new(Arc::clone(&service)),
            service,
            corpus,
            keywords: KeywordExtractor::default(),
            ranker: RelevanceRanker::default(),
            context_chunks: DEFAULT_CONTEXT_CHUNKS,
        }
    }

    /// Ranker limit for the retrieval stage. Zero disables grounding.
    pub fn context_chunks(mut self, limit: usize) -> Self {
        self.context_chunks = limit;
        self
    }

    pub fn service(&self) -> &Arc<dyn CompletionService> {
        &self.service
    }

    pub fn corpus(&self) -> &Arc<CorpusStore> {
        &self.corpus
    }

    #[instrument(skip_all, fields(model = %self.service.model()))]
    pub async fn analyze(&self, image: &ImageSource) -> PipelineResult<AnalysisOutcome> {
        if !self.service.is_configured() {
            return Err(PipelineError::CredentialMissing);
        }

        let mut trail = Vec::with_capacity(6);
        enter(&mut trail, Stage::Start);

        let corpus = self.load_corpus().await;

        enter(&mut trail, Stage::ExtractQuestions);
        let extraction = self
            .extractor
            .extract(image)
            .await
            .map_err(|e| PipelineError::upstream(Stage::ExtractQuestions, e))?;

        match &extraction {
            ExtractionOutcome::QuestionsFound(_) => enter(&mut trail, Stage::QuestionsFound),
            ExtractionOutcome::TopicFallback(_) => {
                enter(&mut trail, Stage::TopicFallback);
                enter(&mut trail, Stage::QuestionsFound);
            }
            ExtractionOutcome::NoQuestions => {
                enter(&mut trail, Stage::TopicFallback);
                enter(&mut trail, Stage::NoQuestions);
            }
        }
        let questions = extraction.into_questions();

        enter(&mut trail, Stage::Retrieve);
        let context = self.retrieve(corpus.as_deref(), &questions);

        enter(&mut trail, Stage::Analyze);
        let prompt = build_analysis_prompt(&questions, &context);
        let request = CompletionRequest::vision(
            self.service.model(),
            image,
            prompt,
            ANALYSIS_MAX_TOKENS,
            ANALYSIS_TEMPERATURE,
        );
        let response = self
            .service
            .complete(&request)
            .await
            .map_err(|e| PipelineError::upstream(Stage::Analyze, e))?;

        enter(&mut trail, Stage::Done);

        let grounded = !context.is_empty();
        let metadata = AnalysisMetadata {
            model: self.service.model().to_string(),
            processing_method: PROCESSING_METHOD.to_string(),
            document_used: grounded,
            questions_analyzed: questions.len(),
            chunks_used: context.fragments(),
            accuracy: AccuracyTier::for_context(grounded),
        };

        info!(
            questions = metadata.questions_analyzed,
            chunks = metadata.chunks_used,
            accuracy = ?metadata.accuracy,
            "Analysis completed"
        );

        Ok(AnalysisOutcome {
            content: response.content,
            metadata,
            pages_referenced: context.pages().to_vec(),
            trail,
        })
    }

    /// Corpus for grounding; a failed load degrades to `None`.
    async fn load_corpus(&self) -> Option<Arc<Corpus>> {
        match self.corpus.load().await {
            Ok(corpus) => Some(corpus),
            Err(e) => {
                warn!(error = %e, "Corpus unavailable, answering without grounding");
                None
            }
        }
    }

    /// Builds the grounding context, empty when there is nothing to match.
    pub fn retrieve(&self, corpus: Option<&Corpus>, questions: &[Question]) -> AnalysisContext {
        let Some(corpus) = corpus else {
            debug!("No corpus, skipping retrieval");
            return AnalysisContext::empty();
        };
        if questions.is_empty() {
            debug!("No questions, skipping retrieval");
            return AnalysisContext::empty();
        }

        let keywords = self.keywords.extract(questions);
        debug!(keywords = keywords.len(), "Keywords extracted");

        let ranked = self.ranker.rank(corpus, &keywords, self.context_chunks);
        if ranked.is_empty() {
            info!("No relevant chunks found");
        }

        let context = AnalysisContext::from_ranked(&ranked);
        if !context.is_empty() {
            info!(
                chunks = context.fragments(),
                pages = ?context.pages(),
                "Grounding context assembled"
            );
        }
        context
    }
}

fn enter(trail: &mut Vec<Stage>, stage: Stage) {
    debug!(stage = %stage, "Stage entered");
    trail.push(stage);
}
