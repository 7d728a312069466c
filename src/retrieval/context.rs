use super::ranker::ScoredChunk;

/// Separator placed between fragments in the grounding context.
pub const FRAGMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Grounding text assembled from ranked chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisContext {
    text: String,
    pages: Vec<i64>,
    fragments: usize,
}

impl AnalysisContext {
    /// Context with no grounding (general-knowledge answering).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Renders each chunk as `[Pagina <page>] <text>` in rank order.
    pub fn from_ranked(chunks: &[ScoredChunk]) -> Self {
        let text = chunks
            .iter()
            .map(|c| format!("[Pagina {}] {}", c.page(), c.chunk.text))
            .collect::<Vec<_>>()
            .join(FRAGMENT_SEPARATOR);

        let mut pages = Vec::new();
        for c in chunks {
            if !pages.contains(&c.page()) {
                pages.push(c.page());
            }
        }

        Self {
            text,
            pages,
            fragments: chunks.len(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Distinct referenced pages, in order of first appearance.
    pub fn pages(&self) -> &[i64] {
        &self.pages
    }

    /// Number of chunks placed in the context.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments == 0
    }
}
