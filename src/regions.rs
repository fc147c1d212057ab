//! Connected-component labeling and geometric region filtering.
//!
//! The artifact shows up as a connected blob of classified pixels. This module
//! scans the image into a boolean mask, groups adjacent matches into bounding
//! boxes with an iterative flood fill, and narrows the boxes down by the size
//! and position priors (roughly 64px square, right third of the image).

use image::{Rgb, RgbImage};

use crate::classify::is_target_gray;

/// Axis-aligned bounding box, half-open on the max side.
///
/// Invariant: `x_min < x_max <= image width` and `y_min < y_max <= image
/// height`, so `x_max - x_min` is the width in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Leftmost column (inclusive).
    pub x_min: u32,
    /// Topmost row (inclusive).
    pub y_min: u32,
    /// One past the rightmost column (exclusive).
    pub x_max: u32,
    /// One past the bottommost row (exclusive).
    pub y_max: u32,
}

impl BoundingBox {
    /// Box width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.x_max - self.x_min
    }

    /// Box height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.y_max - self.y_min
    }

    /// Whether the pixel at `(x, y)` lies inside the box.
    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.x_min <= x && x < self.x_max && self.y_min <= y && y < self.y_max
    }

    /// Grow the box by `margin` pixels on every side, clamped to an
    /// `img_w` x `img_h` image.
    #[must_use]
    pub fn expand(&self, margin: u32, img_w: u32, img_h: u32) -> Self {
        Self {
            x_min: self.x_min.saturating_sub(margin),
            y_min: self.y_min.saturating_sub(margin),
            x_max: (self.x_max + margin).min(img_w),
            y_max: (self.y_max + margin).min(img_h),
        }
    }
}

/// Find the bounding box of every connected component of target-gray pixels.
///
/// Builds a classification mask over the whole image, then flood-fills each
/// unvisited matching cell. Components use 4-connectivity (no diagonals). The
/// fill is an explicit worklist rather than recursion so that large blobs
/// cannot exhaust the call stack; every cell is visited once, so the whole
/// scan is O(width * height).
///
/// Boxes are returned in discovery order (row-major over each component's
/// first-visited pixel).
#[must_use]
pub fn find_regions(image: &RgbImage, target: Rgb<u8>, threshold: u8) -> Vec<BoundingBox> {
    let w = image.width() as usize;
    let h = image.height() as usize;

    let mut mask = vec![false; w * h];
    for (x, y, px) in image.enumerate_pixels() {
        mask[y as usize * w + x as usize] = is_target_gray(*px, target, threshold);
    }

    label_mask(&mask, w, h)
}

/// Connected-component labeling over a flat row-major boolean mask.
fn label_mask(mask: &[bool], w: usize, h: usize) -> Vec<BoundingBox> {
    debug_assert_eq!(mask.len(), w * h);

    let mut visited = vec![false; w * h];
    let mut stack: Vec<usize> = Vec::new();
    let mut boxes = Vec::new();

    for start in 0..w * h {
        if !mask[start] || visited[start] {
            continue;
        }

        visited[start] = true;
        stack.push(start);

        let (mut x_min, mut y_min) = (start % w, start / w);
        let (mut x_max, mut y_max) = (x_min, y_min);

        while let Some(idx) = stack.pop() {
            let x = idx % w;
            let y = idx / w;
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);

            // 4-connected neighbors; mark visited at push time so no cell
            // enters the worklist twice.
            if x > 0 && mask[idx - 1] && !visited[idx - 1] {
                visited[idx - 1] = true;
                stack.push(idx - 1);
            }
            if x + 1 < w && mask[idx + 1] && !visited[idx + 1] {
                visited[idx + 1] = true;
                stack.push(idx + 1);
            }
            if y > 0 && mask[idx - w] && !visited[idx - w] {
                visited[idx - w] = true;
                stack.push(idx - w);
            }
            if y + 1 < h && mask[idx + w] && !visited[idx + w] {
                visited[idx + w] = true;
                stack.push(idx + w);
            }
        }

        #[allow(clippy::cast_possible_truncation)] // indices come from u32 dims
        boxes.push(BoundingBox {
            x_min: x_min as u32,
            y_min: y_min as u32,
            x_max: (x_max + 1) as u32,
            y_max: (y_max + 1) as u32,
        });
    }

    boxes
}

/// Keep only boxes matching the expected artifact size and screen position.
///
/// Position: the box must reach into the right third of the image, either by
/// its right edge or by its horizontal center crossing `floor(width * 2/3)`.
///
/// Size: both dimensions must fall in `[min_size, max_size]` inclusive, or
/// both in the relaxed range `[min_size * 0.8, max_size * 1.2]`. The relaxed
/// bounds are compared as real numbers without rounding, so e.g. a width of
/// exactly 40 passes when `min_size` is 50.
///
/// Relative order of surviving boxes is preserved.
#[must_use]
pub fn filter_regions(
    boxes: &[BoundingBox],
    width: u32,
    height: u32,
    min_size: u32,
    max_size: u32,
) -> Vec<BoundingBox> {
    debug_assert!(boxes.iter().all(|b| b.x_max <= width && b.y_max <= height));

    let right_third = width * 2 / 3;
    let relaxed_lo = f64::from(min_size) * 0.8;
    let relaxed_hi = f64::from(max_size) * 1.2;

    boxes
        .iter()
        .copied()
        .filter(|b| {
            let center_x = (b.x_min + b.x_max) / 2;
            let in_right_third = b.x_max >= right_third || center_x >= right_third;

            let (bw, bh) = (b.width(), b.height());
            let strict = (min_size..=max_size).contains(&bw)
                && (min_size..=max_size).contains(&bh);
            let relaxed = (relaxed_lo..=relaxed_hi).contains(&f64::from(bw))
                && (relaxed_lo..=relaxed_hi).contains(&f64::from(bh));

            in_right_third && (strict || relaxed)
        })
        .collect()
}

/// Pick the surviving box most likely to be the artifact.
///
/// The artifact sits toward the bottom-right, so among candidates we take the
/// box maximizing `(x_max, y_max)` lexicographically: furthest right wins,
/// furthest down breaks ties. When two boxes share the full key, the earlier
/// one is kept. Returns `None` on an empty slice.
#[must_use]
pub fn select_candidate(boxes: &[BoundingBox]) -> Option<BoundingBox> {
    boxes.iter().copied().fold(None, |best, b| match best {
        Some(cur) if (b.x_max, b.y_max) <= (cur.x_max, cur.y_max) => Some(cur),
        _ => Some(b),
    })
}
