//! Grammar for the delimited extraction format.
//!
//! ```text
//! response := block ("---" block)*
//! block    := line*            (whitespace-only blocks are dropped)
//! line     := "TESTO:" rest | "OPZIONE_" label ":" rest | anything else
//! label    := "A" | "B" | "C" | "D"
//! ```
//!
//! Recovery rule: a block without text, or with fewer than two option
//! entries, is discarded. An option line with an empty value still counts as
//! an entry. The model is asked for this format but does not
//! always follow it, so parsing stays best-effort.

use tracing::debug;

use super::types::{OptionLabel, Question};

pub const BLOCK_DELIMITER: &str = "---";

const TEXT_PREFIX: &str = "TESTO:";
const OPTION_PREFIX: &str = "OPZIONE_";

/// Minimum option entries for a transcribed question to be kept.
pub const MIN_OPTIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldLine<'a> {
    Text(&'a str),
    Option(OptionLabel, &'a str),
}

fn parse_field_line(line: &str) -> Option<FieldLine<'_>> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix(TEXT_PREFIX) {
        return Some(FieldLine::Text(rest.trim()));
    }

    let rest = line.strip_prefix(OPTION_PREFIX)?;
    let mut chars = rest.chars();
    let label = OptionLabel::from_char(chars.next()?)?;
    let value = chars.as_str().strip_prefix(':')?;
    Some(FieldLine::Option(label, value.trim()))
}

fn parse_block(number: u32, block: &str) -> Option<Question> {
    let mut question = Question::new(number, "");

    for field in block.lines().filter_map(parse_field_line) {
        match field {
            FieldLine::Text(text) => question.text = text.to_string(),
            FieldLine::Option(label, value) => {
                question.options.insert(label, value.to_string());
            }
        }
    }

    if question.text.is_empty() || question.options.len() < MIN_OPTIONS {
        debug!(
            number,
            options = question.options.len(),
            "Discarding incomplete question block"
        );
        return None;
    }

    Some(question)
}

/// Parses a raw extraction response into questions numbered by block position.
pub fn parse_questions(raw: &str) -> Vec<Question> {
    raw.split(BLOCK_DELIMITER)
        .filter(|block| !block.trim().is_empty())
        .zip(1u32..)
        .filter_map(|(block, number)| parse_block(number, block))
        .collect()
}
