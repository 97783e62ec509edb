use serde::{Deserialize, Serialize};

/// Structured assessment returned by the model for one recipe image.
///
/// The prompt asks for a rating between 1 and 5, but the value is passed
/// through as the model produced it; nothing clamps or rejects out-of-range
/// ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeFeedback {
    pub rating: i64,
    pub opinions: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Body shape for every non-200 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
