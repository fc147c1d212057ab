//! Per-pixel gray classification.
//!
//! A pixel counts as "target gray" if it is either close to the target color
//! channel-by-channel, or internally gray (all channels near each other) with
//! a mean near the target. The second branch tolerates compression and
//! antialiasing noise that shifts individual channels off the exact value.

use image::Rgb;

/// Default target gray color.
pub const DEFAULT_TARGET: Rgb<u8> = Rgb([128, 128, 128]);

/// Default per-channel matching threshold.
pub const DEFAULT_THRESHOLD: u8 = 5;

/// Check whether a pixel matches the target gray within `threshold`.
///
/// Two independent sufficient conditions:
/// 1. every channel is within `threshold` of the corresponding target channel
/// 2. all three channels are within `threshold` of each other AND the
///    integer-truncated channel mean is within `threshold` of the target's
///    red channel
///
/// Collapsing these into one check changes behavior on boundary pixels, so
/// both are kept.
#[must_use]
pub fn is_target_gray(pixel: Rgb<u8>, target: Rgb<u8>, threshold: u8) -> bool {
    let [r, g, b] = pixel.0.map(i32::from);
    let [tr, tg, tb] = target.0.map(i32::from);
    let t = i32::from(threshold);

    let close_to_target = (r - tr).abs() <= t && (g - tg).abs() <= t && (b - tb).abs() <= t;

    let internally_gray = (r - g).abs() <= t && (g - b).abs() <= t && (r - b).abs() <= t;
    let mean = (r + g + b) / 3;
    let mean_close = (mean - tr).abs() <= t;

    close_to_target || (internally_gray && mean_close)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_target_matches() {
        assert!(is_target_gray(Rgb([128, 128, 128]), DEFAULT_TARGET, 5));
    }

    #[test]
    fn channelwise_branch_alone_matches() {
        // Each channel within 5 of target, but pairwise spread r-b = 10 > 5,
        // so only the close-to-target branch holds.
        assert!(is_target_gray(Rgb([123, 128, 133]), DEFAULT_TARGET, 5));
    }

    #[test]
    fn internally_gray_branch_alone_matches() {
        // (134, 130, 129): red is 6 off the target, so the channelwise check
        // fails; pairwise diffs are at most 5 and the mean (134+130+129)/3 = 131
        // is within 5 of 128, so the internally-gray branch accepts it.
        assert!(is_target_gray(Rgb([134, 130, 129]), DEFAULT_TARGET, 5));
    }

    #[test]
    fn neither_branch_matches() {
        assert!(!is_target_gray(Rgb([200, 50, 90]), DEFAULT_TARGET, 5));
        // Uniform gray but mean far from target
        assert!(!is_target_gray(Rgb([180, 180, 180]), DEFAULT_TARGET, 5));
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        assert!(is_target_gray(Rgb([133, 133, 133]), DEFAULT_TARGET, 5));
        assert!(!is_target_gray(Rgb([134, 134, 134]), DEFAULT_TARGET, 5));
    }

    #[test]
    fn zero_threshold_requires_exact_match() {
        assert!(is_target_gray(Rgb([128, 128, 128]), DEFAULT_TARGET, 0));
        assert!(!is_target_gray(Rgb([129, 128, 128]), DEFAULT_TARGET, 0));
    }

    #[test]
    fn custom_target_is_honored() {
        let target = Rgb([200, 200, 200]);
        assert!(is_target_gray(Rgb([198, 202, 200]), target, 5));
        assert!(!is_target_gray(Rgb([128, 128, 128]), target, 5));
    }
}
