#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub raw_text: String,
    pub confidence: Option<f32>,
}

impl RecognitionResult {
    pub fn new(raw_text: impl Into<String>, confidence: Option<f32>) -> Self {
        Self {
            raw_text: raw_text.into(),
            confidence,
        }
    }

    pub fn text_only(raw_text: impl Into<String>) -> Self {
        Self::new(raw_text, None)
    }
}
