use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Answer-option label recognized in extraction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A quiz question transcribed from the image, or a synthetic topic question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub number: u32,
    pub text: String,
    pub options: BTreeMap<OptionLabel, String>,
}

impl Question {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, label: OptionLabel, text: impl Into<String>) -> Self {
        self.options.insert(label, text.into());
        self
    }

    /// Single pseudo-question carrying a detected subject area and no options.
    pub fn topic(topic: impl Into<String>) -> Self {
        Self::new(1, topic)
    }

    pub fn is_synthetic(&self) -> bool {
        self.options.is_empty()
    }
}
