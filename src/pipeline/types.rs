use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// States of one analysis request.
///
/// `Start → ExtractQuestions → {QuestionsFound | TopicFallback → (QuestionsFound | NoQuestions)}
/// → Retrieve → Analyze → Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    ExtractQuestions,
    QuestionsFound,
    TopicFallback,
    NoQuestions,
    Retrieve,
    Analyze,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::ExtractQuestions => "question extraction",
            Stage::QuestionsFound => "questions found",
            Stage::TopicFallback => "topic fallback",
            Stage::NoQuestions => "no questions",
            Stage::Retrieve => "retrieval",
            Stage::Analyze => "final analysis",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse self-reported answer quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyTier {
    High,
    Medium,
}

impl AccuracyTier {
    /// `High` when grounding context was supplied.
    pub fn for_context(has_context: bool) -> Self {
        if has_context { Self::High } else { Self::Medium }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub model: String,
    pub processing_method: String,
    pub document_used: bool,
    pub questions_analyzed: usize,
    pub chunks_used: usize,
    pub accuracy: AccuracyTier,
}

/// Final payload of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    /// Content blocks of the analysis response, untouched.
    pub content: Vec<Value>,
    pub metadata: AnalysisMetadata,
    /// Distinct pages cited by the grounding context, first-seen order.
    pub pages_referenced: Vec<i64>,
    /// Stages visited, in order.
    pub trail: Vec<Stage>,
}
