//! Grayscale-to-alpha conversion.
//!
//! Maps pixel luminance onto an alpha channel: everything at or below
//! `min_gray` becomes fully transparent, everything at or above `max_gray`
//! fully opaque, with linear interpolation in between. Useful for turning
//! sprites rendered on black into transparent overlays.

use image::{Rgb, Rgba, RgbaImage, RgbImage};

/// Luminance of an RGB pixel, truncated to an integer.
///
/// Standard weighting: `0.299*R + 0.587*G + 0.114*B`.
#[must_use]
pub fn luminance(pixel: Rgb<u8>) -> u8 {
    let lum =
        0.299 * f32::from(pixel[0]) + 0.587 * f32::from(pixel[1]) + 0.114 * f32::from(pixel[2]);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        lum as u8
    }
}

/// Map a gray value onto an alpha value given the transparency window.
///
/// `min_gray` maps to 0, `max_gray` to 255, values between interpolate
/// linearly (truncated). A degenerate window (`min_gray >= max_gray`)
/// becomes a step function at `min_gray`.
#[must_use]
pub fn alpha_for_gray(gray: u8, min_gray: u8, max_gray: u8) -> u8 {
    if min_gray >= max_gray {
        return if gray >= min_gray { 255 } else { 0 };
    }

    if gray <= min_gray {
        0
    } else if gray >= max_gray {
        255
    } else {
        let span = u32::from(max_gray) - u32::from(min_gray);
        let offset = u32::from(gray) - u32::from(min_gray);
        #[allow(clippy::cast_possible_truncation)] // result is < 255 here
        {
            (255 * offset / span) as u8
        }
    }
}

/// Convert an RGB image to RGBA with luminance-derived alpha.
#[must_use]
pub fn grayscale_to_alpha(image: &RgbImage, min_gray: u8, max_gray: u8) -> RgbaImage {
    let mut out = RgbaImage::new(image.width(), image.height());
    for (x, y, px) in image.enumerate_pixels() {
        let a = alpha_for_gray(luminance(*px), min_gray, max_gray);
        out.put_pixel(x, y, Rgba([px[0], px[1], px[2], a]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luminance_of_primaries() {
        assert_eq!(luminance(Rgb([255, 0, 0])), 76); // 0.299 * 255
        assert_eq!(luminance(Rgb([0, 255, 0])), 149); // 0.587 * 255
        assert_eq!(luminance(Rgb([0, 0, 255])), 29); // 0.114 * 255
        // The weights sum to 1.0 only up to float rounding, so allow 254.
        assert!(luminance(Rgb([255, 255, 255])) >= 254);
        assert_eq!(luminance(Rgb([0, 0, 0])), 0);
    }

    #[test]
    fn alpha_clamps_outside_window() {
        assert_eq!(alpha_for_gray(0, 50, 200), 0);
        assert_eq!(alpha_for_gray(50, 50, 200), 0);
        assert_eq!(alpha_for_gray(200, 50, 200), 255);
        assert_eq!(alpha_for_gray(255, 50, 200), 255);
    }

    #[test]
    fn alpha_interpolates_linearly() {
        // Midpoint of [0, 255] window
        assert_eq!(alpha_for_gray(128, 0, 255), 128);
        // 255 * (100 - 50) / (200 - 50) = 85
        assert_eq!(alpha_for_gray(100, 50, 200), 85);
    }

    #[test]
    fn degenerate_window_is_step_function() {
        assert_eq!(alpha_for_gray(99, 100, 100), 0);
        assert_eq!(alpha_for_gray(100, 100, 100), 255);
        assert_eq!(alpha_for_gray(150, 200, 100), 0);
        assert_eq!(alpha_for_gray(201, 200, 100), 255);
    }

    #[test]
    fn conversion_keeps_rgb_channels() {
        let img = RgbImage::from_pixel(4, 4, Rgb([30, 60, 90]));
        let out = grayscale_to_alpha(&img, 0, 255);
        let px = out.get_pixel(0, 0);
        assert_eq!([px[0], px[1], px[2]], [30, 60, 90]);
        assert_eq!(px[3], luminance(Rgb([30, 60, 90])));
    }
}
