use crate::errors::AppError;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Byte order of the three color channels in a packed 8-bit frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Native order delivered by capture devices.
    Bgr,
    /// Order used by the frame buffer and the JPEG encoder.
    Rgb,
}

/// Packed 8-bit, 3-channel frame as read from a device.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub order: ChannelOrder,
    pub data: Vec<u8>, // width * height * 3 bytes, no row padding
}

impl RawFrame {
    pub fn new(width: u32, height: u32, order: ChannelOrder, data: Vec<u8>) -> Result<Self, AppError> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 {
            return Err(AppError::FrameRead(format!("frame has empty dimensions {}x{}", width, height)));
        }
        if data.len() != expected {
            return Err(AppError::FrameRead(format!(
                "frame {}x{} should carry {} bytes, got {}",
                width, height, expected, data.len()
            )));
        }
        Ok(RawFrame { width, height, order, data })
    }
}

/// Upper bounds of the preview region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for DisplayBounds {
    fn default() -> Self {
        DisplayBounds { max_width: 640, max_height: 480 }
    }
}

/// Scales `width`x`height` to the bounds keeping the aspect ratio.
///
/// The width is set to the bound first; if the derived height does not fit,
/// the height is clamped and the width derived from it instead. Derived sides
/// are truncated, never below one pixel.
pub fn display_size(width: u32, height: u32, bounds: DisplayBounds) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let (w, h) = (width as u64, height as u64);
    let mut new_width = bounds.max_width as u64;
    let mut new_height = new_width * h / w;
    if new_height > bounds.max_height as u64 {
        new_height = bounds.max_height as u64;
        new_width = new_height * w / h;
    }
    Some((new_width.max(1) as u32, new_height.max(1) as u32))
}

/// Swaps the first and third channel of every pixel when the orders differ.
pub fn convert_order(data: &[u8], from: ChannelOrder, to: ChannelOrder) -> Vec<u8> {
    if from == to {
        return data.to_vec();
    }
    let mut out = Vec::with_capacity(data.len());
    for px in data.chunks_exact(3) {
        out.extend_from_slice(&[px[2], px[1], px[0]]);
    }
    out
}

/// The latest decoded frame, in display order and already scaled.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    image: RgbImage,
    source_width: u32,
    source_height: u32,
}

impl FrameBuffer {
    pub fn from_raw(raw: RawFrame, bounds: DisplayBounds) -> Result<Self, AppError> {
        let (source_width, source_height) = (raw.width, raw.height);
        let (width, height) = display_size(source_width, source_height, bounds)
            .ok_or_else(|| AppError::FrameRead("frame has no pixels".to_string()))?;

        let rgb = match raw.order {
            ChannelOrder::Rgb => raw.data,
            ChannelOrder::Bgr => convert_order(&raw.data, ChannelOrder::Bgr, ChannelOrder::Rgb),
        };
        let native = RgbImage::from_raw(source_width, source_height, rgb)
            .ok_or_else(|| AppError::FrameRead("frame buffer size mismatch".to_string()))?;

        let image = if (width, height) == (source_width, source_height) {
            native
        } else {
            imageops::resize(&native, width, height, FilterType::Triangle)
        };
        Ok(FrameBuffer { image, source_width, source_height })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn source_size(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Pixel bytes re-ordered for a consumer expecting `order`.
    pub fn pixels_in(&self, order: ChannelOrder) -> Vec<u8> {
        convert_order(self.image.as_raw(), ChannelOrder::Rgb, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, bgr: [u8; 3]) -> RawFrame {
        let data = bgr.iter().copied().cycle().take((width * height * 3) as usize).collect();
        RawFrame::new(width, height, ChannelOrder::Bgr, data).unwrap()
    }

    #[test]
    fn landscape_hd_fits_width() {
        assert_eq!(display_size(1280, 720, DisplayBounds::default()), Some((640, 360)));
    }

    #[test]
    fn portrait_is_height_bound() {
        assert_eq!(display_size(480, 1280, DisplayBounds::default()), Some((180, 480)));
    }

    #[test]
    fn four_by_three_fills_the_box() {
        assert_eq!(display_size(1920, 1440, DisplayBounds::default()), Some((640, 480)));
        assert_eq!(display_size(320, 240, DisplayBounds::default()), Some((640, 480)));
    }

    #[test]
    fn degenerate_sizes() {
        assert_eq!(display_size(0, 480, DisplayBounds::default()), None);
        // Extremely tall sources still get a one pixel wide column.
        assert_eq!(display_size(1, 100_000, DisplayBounds::default()), Some((1, 480)));
    }

    #[test]
    fn bgr_is_converted_to_display_order() {
        let frame = FrameBuffer::from_raw(solid(4, 3, [10, 20, 30]), DisplayBounds::default()).unwrap();
        assert_eq!(frame.source_size(), (4, 3));
        assert_eq!((frame.width(), frame.height()), (640, 480));
        assert_eq!(frame.image().get_pixel(0, 0).0, [30, 20, 10]);
        assert_eq!(&frame.pixels_in(ChannelOrder::Bgr)[..3], &[10, 20, 30]);
    }

    #[test]
    fn rejects_short_buffers() {
        assert!(RawFrame::new(2, 2, ChannelOrder::Bgr, vec![0; 11]).is_err());
        assert!(RawFrame::new(0, 2, ChannelOrder::Bgr, vec![]).is_err());
    }
}
