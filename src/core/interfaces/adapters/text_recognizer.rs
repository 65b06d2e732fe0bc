use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::{FrameBuffer, RecognitionResult};

#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, frame: &FrameBuffer) -> Result<RecognitionResult>;
}
