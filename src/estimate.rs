//! Background color estimation around a detected region.

use image::{Rgb, RgbImage};

use crate::regions::BoundingBox;

/// Default sampling margin around the box, in pixels.
pub const DEFAULT_PADDING: u32 = 10;

/// Fill color used when the sampling region is empty.
const FALLBACK: Rgb<u8> = Rgb([128, 128, 128]);

/// Average the colors in a band of `padding` pixels around `bbox`.
///
/// The sampling rectangle is the box grown by `padding` on every side and
/// clamped to the image; pixels inside the box itself are excluded. Channels
/// are averaged independently with integer-truncated division. If clamping
/// leaves nothing to sample (a box covering the whole image), the fallback
/// mid-gray (128, 128, 128) is returned instead of dividing by zero.
#[must_use]
pub fn average_color_around(image: &RgbImage, bbox: BoundingBox, padding: u32) -> Rgb<u8> {
    let sample = bbox.expand(padding, image.width(), image.height());

    let mut sums = [0u64; 3];
    let mut count = 0u64;

    for y in sample.y_min..sample.y_max {
        for x in sample.x_min..sample.x_max {
            if bbox.contains(x, y) {
                continue;
            }
            let px = image.get_pixel(x, y);
            sums[0] += u64::from(px[0]);
            sums[1] += u64::from(px[1]);
            sums[2] += u64::from(px[2]);
            count += 1;
        }
    }

    if count == 0 {
        return FALLBACK;
    }

    #[allow(clippy::cast_possible_truncation)] // channel averages fit in u8
    Rgb([
        (sums[0] / count) as u8,
        (sums[1] / count) as u8,
        (sums[2] / count) as u8,
    ])
}
