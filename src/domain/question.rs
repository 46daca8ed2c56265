//! Questionnaire question bank.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    SingleChoice,
    Text,
    Numeric,
    Boolean,
    FileUpload,
    Date,
}

impl QuestionType {
    pub const ALL: [QuestionType; 7] = [
        QuestionType::MultipleChoice,
        QuestionType::SingleChoice,
        QuestionType::Text,
        QuestionType::Numeric,
        QuestionType::Boolean,
        QuestionType::FileUpload,
        QuestionType::Date,
    ];

    /// Name used by the question form.
    pub fn form_name(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::SingleChoice => "single_choice",
            Self::Text => "text",
            Self::Numeric => "number",
            Self::Boolean => "boolean",
            Self::FileUpload => "file_upload",
            Self::Date => "date",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "MULTIPLE_CHOICE",
            Self::SingleChoice => "SINGLE_CHOICE",
            Self::Text => "TEXT",
            Self::Numeric => "NUMERIC",
            Self::Boolean => "BOOLEAN",
            Self::FileUpload => "FILE_UPLOAD",
            Self::Date => "DATE",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = QuestionError;

    /// Accepts the form names (`number`, `file_upload`, ...) only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.form_name() == s.trim())
            .ok_or_else(|| QuestionError::InvalidType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionError {
    MissingFields,
    InvalidWeight(String),
    InvalidType(String),
    NotFound(String),
}

impl fmt::Display for QuestionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionError::MissingFields => write!(f, "Missing required fields"),
            QuestionError::InvalidWeight(weight) => {
                write!(f, "Weight must be a number between 0 and 100, got '{}'", weight)
            }
            QuestionError::InvalidType(t) => write!(f, "Invalid question type '{}'", t),
            QuestionError::NotFound(id) => write!(f, "Question not found: {}", id),
        }
    }
}

impl std::error::Error for QuestionError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub category: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub weight: u8,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Raw question input as submitted by the form or CLI.
#[derive(Debug, Clone, Default)]
pub struct NewQuestion {
    pub text: String,
    pub category: String,
    pub question_type: String,
    pub weight: String,
    pub mandatory: bool,
    pub active: bool,
    /// JSON array of option labels
    pub options: Option<String>,
}

impl Question {
    /// Validate raw input and build a question.
    pub fn new(id: String, input: NewQuestion, now: DateTime<Utc>) -> Result<Self, QuestionError> {
        let text = input.text.trim();
        let category = input.category.trim();
        if text.is_empty() || category.is_empty() || input.question_type.trim().is_empty() {
            return Err(QuestionError::MissingFields);
        }

        let weight = parse_weight(&input.weight)?;
        let question_type: QuestionType = input.question_type.parse()?;

        Ok(Self {
            id,
            text: text.to_string(),
            category: category.to_string(),
            question_type,
            weight,
            mandatory: input.mandatory,
            active: input.active,
            options: input.options.as_deref().map(parse_options).unwrap_or_default(),
            created_at: now,
        })
    }

    /// Soft delete: the question stays on record but is no longer listed.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

fn parse_weight(raw: &str) -> Result<u8, QuestionError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|w| (0..=100).contains(w))
        .map(|w| w as u8)
        .ok_or_else(|| QuestionError::InvalidWeight(raw.to_string()))
}

/// Parse a JSON array of options. Malformed input yields no options.
pub fn parse_options(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(options) => options,
        Err(e) => {
            log::warn!("Ignoring malformed question options {:?}: {}", raw, e);
            Vec::new()
        }
    }
}
