use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{debug, info, warn};

use crate::rect::Region;

const REGION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const TEXT_SCALE: f32 = 20.0;
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
/// Rectangle outline thickness in pixels.
const OUTLINE: u32 = 2;

/// Renders the threshold region and value onto a frame for visual checking.
pub struct RegionOverlay {
    font: Option<FontVec>,
}

impl RegionOverlay {
    /// Without a font path (or with an unreadable one) only the rectangle is drawn.
    pub fn new(font_path: Option<&Path>) -> Self {
        let font = font_path.and_then(Self::load_font);
        Self { font }
    }

    pub fn render(&self, frame: &GrayImage, region: Region, threshold: Option<u32>) -> RgbImage {
        let mut img = image::DynamicImage::ImageLuma8(frame.clone()).into_rgb8();

        for inset in 0..OUTLINE {
            let w = region.width().saturating_sub(2 * inset);
            let h = region.height().saturating_sub(2 * inset);
            if w == 0 || h == 0 {
                break;
            }
            let rect = Rect::at((region.x() + inset) as i32, (region.y() + inset) as i32).of_size(w, h);
            draw_hollow_rect_mut(&mut img, rect, REGION_COLOR);
        }

        if let (Some(font), Some(threshold)) = (&self.font, threshold) {
            let text = format!("threshold: {threshold}");
            let y = region.bottom().saturating_add(4) as i32;
            draw_text_mut(&mut img, TEXT_COLOR, region.x() as i32, y, PxScale::from(TEXT_SCALE), font, &text);
        }

        img
    }

    pub fn save(&self, frame: &GrayImage, region: Region, threshold: Option<u32>, path: &Path) -> Result<()> {
        let img = self.render(frame, region, threshold);
        img.save(path)
            .with_context(|| format!("failed to save region overlay to {}", path.display()))?;
        debug!(?path, %region, "saved region overlay");
        Ok(())
    }

    fn load_font(path: &Path) -> Option<FontVec> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!(?path, error = %e, "failed to read font file");
                return None;
            }
        };
        match FontVec::try_from_vec(data) {
            Ok(font) => {
                info!(?path, "loaded overlay font");
                Some(font)
            }
            Err(e) => {
                warn!(?path, error = %e, "failed to parse font file");
                None
            }
        }
    }
}
