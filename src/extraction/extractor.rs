use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::parser::parse_questions;
use super::types::Question;
use crate::completion::{CompletionRequest, CompletionResult, CompletionService, ImageSource};
use crate::constants::{
    EXTRACTION_MAX_TOKENS, EXTRACTION_TEMPERATURE, TOPIC_MAX_TOKENS, TOPIC_TEMPERATURE,
};

pub const EXTRACTION_PROMPT: &str = "Analizza l'immagine del quiz ed estrai TUTTE le domande.

Per ogni domanda, scrivi ESATTAMENTE in questo formato:

DOMANDA_1
TESTO: [scrivi il testo della domanda]
OPZIONE_A: [testo opzione A]
OPZIONE_B: [testo opzione B]
OPZIONE_C: [testo opzione C]
OPZIONE_D: [testo opzione D]
---
DOMANDA_2
TESTO: [scrivi il testo della domanda]
OPZIONE_A: [testo opzione A]
OPZIONE_B: [testo opzione B]
OPZIONE_C: [testo opzione C]
OPZIONE_D: [testo opzione D]
---

IMPORTANTE:
- Usa ESATTAMENTE questo formato
- Separa ogni domanda con tre trattini ---
- NON usare virgolette o caratteri speciali
- Scrivi tutto il testo in modo semplice";

pub const TOPIC_PROMPT: &str = "Guarda l'immagine del quiz e identifica l'argomento principale \
(es: supply chain, marketing, finanza, etc.)";

/// Result of the extraction stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// At least one question was transcribed.
    QuestionsFound(Vec<Question>),
    /// Transcription produced nothing; a topic pseudo-question stands in.
    TopicFallback(Question),
    /// Neither transcription nor topic detection produced anything.
    NoQuestions,
}

impl ExtractionOutcome {
    pub fn questions(&self) -> &[Question] {
        match self {
            Self::QuestionsFound(questions) => questions,
            Self::TopicFallback(topic) => std::slice::from_ref(topic),
            Self::NoQuestions => &[],
        }
    }

    pub fn into_questions(self) -> Vec<Question> {
        match self {
            Self::QuestionsFound(questions) => questions,
            Self::TopicFallback(topic) => vec![topic],
            Self::NoQuestions => Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::QuestionsFound(_))
    }
}

/// Transcribes quiz questions from an image through a [`CompletionService`].
#[derive(Clone)]
pub struct QuestionExtractor {
    service: Arc<dyn CompletionService>,
}

impl std::fmt::Debug for QuestionExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionExtractor")
            .field("model", &self.service.model())
            .finish()
    }
}

impl QuestionExtractor {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    /// Runs transcription and, if it yields nothing, the topic fallback.
    ///
    /// Only a failed transcription call is an error. A failed topic call
    /// degrades to [`ExtractionOutcome::NoQuestions`].
    #[instrument(skip_all)]
    pub async fn extract(&self, image: &ImageSource) -> CompletionResult<ExtractionOutcome> {
        let questions = self.transcribe(image).await?;
        if !questions.is_empty() {
            info!(questions = questions.len(), "Questions extracted");
            return Ok(ExtractionOutcome::QuestionsFound(questions));
        }

        info!("No questions parsed, falling back to topic detection");
        Ok(match self.detect_topic(image).await {
            Some(topic) => {
                info!(topic = %topic, "Topic detected");
                ExtractionOutcome::TopicFallback(Question::topic(topic))
            }
            None => ExtractionOutcome::NoQuestions,
        })
    }

    pub async fn transcribe(&self, image: &ImageSource) -> CompletionResult<Vec<Question>> {
        let request = CompletionRequest::vision(
            self.service.model(),
            image,
            EXTRACTION_PROMPT,
            EXTRACTION_MAX_TOKENS,
            EXTRACTION_TEMPERATURE,
        );
        let response = self.service.complete(&request).await?;

        let Some(raw) = response.first_text() else {
            warn!("Extraction response carried no text block");
            return Ok(Vec::new());
        };
        debug!(chars = raw.chars().count(), "Extraction response received");

        Ok(parse_questions(raw))
    }

    /// Asks for the quiz's subject area; `None` on any failure or empty answer.
    pub async fn detect_topic(&self, image: &ImageSource) -> Option<String> {
        let request = CompletionRequest::vision(
            self.service.model(),
            image,
            TOPIC_PROMPT,
            TOPIC_MAX_TOKENS,
            TOPIC_TEMPERATURE,
        );

        let response = match self.service.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Topic detection failed");
                return None;
            }
        };

        let topic = response.first_text()?.trim().to_lowercase();
        (!topic.is_empty()).then_some(topic)
    }
}
