use anyhow::Result;
use image::{DynamicImage, RgbaImage};

pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    raw_data: Vec<u8>,
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl FrameBuffer {
    pub fn build_from_raw_data(
        width_pixels: u32,
        height_pixels: u32,
        raw_rgba_data: Vec<u8>,
    ) -> Result<Self> {
        let expected_len = width_pixels as usize * height_pixels as usize * 4;

        if width_pixels == 0 || height_pixels == 0 {
            anyhow::bail!("Frame dimensions must be greater than zero");
        }

        if raw_rgba_data.len() != expected_len {
            anyhow::bail!(
                "Frame data length {} does not match {}x{} RGBA ({} bytes)",
                raw_rgba_data.len(),
                width_pixels,
                height_pixels,
                expected_len
            );
        }

        log::debug!(
            "[FRAME_BUFFER] building buffer: {}x{}",
            width_pixels,
            height_pixels
        );

        Ok(Self {
            width: width_pixels,
            height: height_pixels,
            raw_data: raw_rgba_data,
        })
    }

    pub fn from_rgba_image(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::build_from_raw_data(width, height, image.into_raw())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    pub fn to_dynamic_image(&self) -> Result<DynamicImage> {
        let rgba = RgbaImage::from_raw(self.width, self.height, self.raw_data.clone())
            .ok_or_else(|| anyhow::anyhow!("Failed to create image from frame data"))?;
        Ok(DynamicImage::ImageRgba8(rgba))
    }
}
