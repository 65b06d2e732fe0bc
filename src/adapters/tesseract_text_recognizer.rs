use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::DynamicImage;
use rusty_tesseract::{Args, Image as TesseractImage};
use uuid::Uuid;

use crate::core::interfaces::adapters::TextRecognizer;
use crate::core::models::{FrameBuffer, RecognitionResult};
use crate::global_constants::LOG_TAG_OCR;

#[derive(Debug, Clone, PartialEq)]
struct RecognizedWord {
    line_key: (i32, i32, i32),
    text: String,
    confidence: f32,
}

pub struct TesseractTextRecognizer {
    language: String,
}

impl TesseractTextRecognizer {
    pub fn build(language: &str) -> Result<Self> {
        log::info!(
            "{} Initializing Tesseract recognizer (lang={})",
            LOG_TAG_OCR,
            language
        );

        if language.trim().is_empty() {
            anyhow::bail!("OCR language hint must not be empty");
        }

        Ok(Self {
            language: language.trim().to_string(),
        })
    }

    fn write_temporary_png(image: &DynamicImage) -> Result<PathBuf> {
        let image_path = std::env::temp_dir().join(format!("plate-scanner-{}.png", Uuid::new_v4()));

        log::debug!("{} Writing frame to {:?}", LOG_TAG_OCR, image_path);
        image
            .save_with_format(&image_path, image::ImageFormat::Png)
            .context("Failed to convert frame to PNG format")?;

        Ok(image_path)
    }

    fn run_tesseract(image: DynamicImage, language: String) -> Result<RecognitionResult> {
        let image_path = Self::write_temporary_png(&image)?;

        let outcome: Result<RecognitionResult> = (|| {
            let tesseract_image = TesseractImage::from_path(&image_path)
                .context("Failed to create Tesseract image")?;

            let args = Args {
                lang: language,
                ..Args::default()
            };

            let data_output = rusty_tesseract::image_to_data(&tesseract_image, &args)
                .context("Failed to extract text from image")?;

            let words: Vec<RecognizedWord> = data_output
                .data
                .into_iter()
                .map(|row| RecognizedWord {
                    line_key: (row.block_num, row.par_num, row.line_num),
                    text: row.text,
                    confidence: row.conf,
                })
                .collect();

            Ok(assemble_recognition(&words))
        })();

        if let Err(error) = std::fs::remove_file(&image_path) {
            log::warn!("{} Failed to remove {:?}: {}", LOG_TAG_OCR, image_path, error);
        }

        outcome
    }
}

/// Tesseract reports confidence on a 0-100 scale and uses -1 for rows that
/// are not words.
fn assemble_recognition(words: &[RecognizedWord]) -> RecognitionResult {
    let mut lines: Vec<String> = Vec::new();
    let mut current_line: Option<(i32, i32, i32)> = None;
    let mut confidences: Vec<f32> = Vec::new();

    for word in words {
        let text = word.text.trim();
        if word.confidence < 0.0 || text.is_empty() {
            continue;
        }

        confidences.push(word.confidence.clamp(0.0, 100.0) / 100.0);

        match lines.last_mut() {
            Some(line) if current_line == Some(word.line_key) => {
                line.push(' ');
                line.push_str(text);
            }
            _ => {
                lines.push(text.to_string());
                current_line = Some(word.line_key);
            }
        }
    }

    let confidence = if confidences.is_empty() {
        None
    } else {
        Some(confidences.iter().sum::<f32>() / confidences.len() as f32)
    };

    RecognitionResult::new(lines.join("\n"), confidence)
}

#[async_trait]
impl TextRecognizer for TesseractTextRecognizer {
    async fn recognize(&self, frame: &FrameBuffer) -> Result<RecognitionResult> {
        log::info!("{} Starting text extraction", LOG_TAG_OCR);
        log::debug!(
            "{} Frame dimensions: {}x{}",
            LOG_TAG_OCR,
            frame.width,
            frame.height
        );

        let image = frame
            .to_dynamic_image()
            .context("Failed to prepare frame for OCR")?;
        let language = self.language.clone();

        let recognition = tokio::task::spawn_blocking(move || Self::run_tesseract(image, language))
            .await
            .context("OCR worker stopped unexpectedly")??;

        log::info!(
            "{} Text extraction complete. Extracted {} characters",
            LOG_TAG_OCR,
            recognition.raw_text.len()
        );
        log::debug!("{} Extracted text: {}", LOG_TAG_OCR, recognition.raw_text);

        Ok(recognition)
    }
}
