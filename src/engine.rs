//! Artifact removal pipeline and batch processing.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};

use crate::classify::{DEFAULT_TARGET, DEFAULT_THRESHOLD};
use crate::error::{Error, Result};
use crate::estimate::{average_color_around, DEFAULT_PADDING};
use crate::regions::{filter_regions, find_regions, select_candidate, BoundingBox};

/// Configuration for artifact detection and removal.
///
/// Every knob the pipeline reads lives here; there is no process-wide mutable
/// state, so two cleaners with different options can run side by side.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Target gray color of the artifact.
    pub target: Rgb<u8>,
    /// Per-channel color matching threshold.
    pub threshold: u8,
    /// Minimum artifact dimension in pixels.
    pub min_size: u32,
    /// Maximum artifact dimension in pixels.
    pub max_size: u32,
    /// Pixels to grow the selected box by before filling, to catch
    /// antialiased edge pixels the classifier missed.
    pub expand_box: u32,
    /// Width of the band around the box sampled for the fill color.
    pub padding: u32,
    /// Print per-stage diagnostics to stderr.
    pub debug: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            threshold: DEFAULT_THRESHOLD,
            min_size: 50,
            max_size: 70,
            expand_box: 2,
            padding: DEFAULT_PADDING,
            debug: false,
            quiet: false,
        }
    }
}

/// Outcome of running the removal pipeline on one image.
///
/// All three variants are ordinary results. The two negative outcomes leave
/// the image untouched and are expected on images that never had an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    /// An artifact was found and painted over.
    Removed {
        /// The box the detector selected (tight around classified pixels).
        selected: BoundingBox,
        /// The expanded box that was actually overwritten.
        filled: BoundingBox,
        /// The fill color estimated from the surrounding background.
        fill: Rgb<u8>,
        /// Number of connected gray regions found before filtering.
        regions: usize,
        /// Number of regions that survived size/position filtering.
        candidates: usize,
    },
    /// No pixel anywhere matched the target gray.
    NoArtifactFound,
    /// Gray regions existed but none matched the size/position priors.
    NoMatchingRegion {
        /// Number of connected gray regions that were all filtered out.
        regions: usize,
    },
}

impl CleanOutcome {
    /// Whether an artifact was removed.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed { .. })
    }
}

/// Per-file result of batch processing.
#[derive(Debug)]
pub struct FileReport {
    /// Path of the input file.
    pub path: PathBuf,
    /// Whether an artifact was removed and the cleaned image written.
    pub cleaned: bool,
    /// False only on a real I/O or codec failure.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
}

/// The artifact removal engine.
///
/// Holds a [`CleanOptions`] and applies the detection pipeline to images,
/// single files, or whole directories. Stateless between calls, so one
/// cleaner can process many images (in parallel, with the `cli` feature).
#[derive(Debug, Default)]
pub struct ArtifactCleaner {
    options: CleanOptions,
}

impl ArtifactCleaner {
    /// Create a cleaner with the given options.
    #[must_use]
    pub fn new(options: CleanOptions) -> Self {
        Self { options }
    }

    /// The options this cleaner was built with.
    #[must_use]
    pub fn options(&self) -> &CleanOptions {
        &self.options
    }

    /// Detect and remove the artifact from an in-memory image.
    ///
    /// Runs the full pipeline: classify pixels, label connected regions,
    /// filter by size and position, select the bottom-right-most candidate,
    /// estimate the background from a band around the unexpanded box, then
    /// overwrite the expanded box with that color. The image is modified only
    /// when the outcome is [`CleanOutcome::Removed`].
    pub fn clean(&self, image: &mut RgbImage) -> CleanOutcome {
        let o = &self.options;
        let (width, height) = image.dimensions();

        let boxes = find_regions(image, o.target, o.threshold);
        if boxes.is_empty() {
            return CleanOutcome::NoArtifactFound;
        }

        let candidates = filter_regions(&boxes, width, height, o.min_size, o.max_size);
        let Some(selected) = select_candidate(&candidates) else {
            return CleanOutcome::NoMatchingRegion {
                regions: boxes.len(),
            };
        };

        let filled = selected.expand(o.expand_box, width, height);
        // Sample around the tight box, not the expanded one, so the fill
        // estimate never includes artifact edge pixels.
        let fill = average_color_around(image, selected, o.padding);

        for y in filled.y_min..filled.y_max {
            for x in filled.x_min..filled.x_max {
                image.put_pixel(x, y, fill);
            }
        }

        CleanOutcome::Removed {
            selected,
            filled,
            fill,
            regions: boxes.len(),
            candidates: candidates.len(),
        }
    }

    /// Process a single image file: load, clean, save.
    ///
    /// The output file is written only when an artifact was removed; `output`
    /// may equal `input` to overwrite in place. Load and save failures are
    /// reported in the returned [`FileReport`], never panicked or propagated,
    /// so a batch caller can simply continue with the next file.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path) -> FileReport {
        let mut report = FileReport {
            path: input.to_path_buf(),
            cleaned: false,
            success: false,
            message: String::new(),
        };

        let dyn_img = match image::open(input) {
            Ok(img) => img,
            Err(e) => {
                report.message = format!("failed to load: {e}");
                return report;
            }
        };

        // Normalize to 3-channel RGB; alpha and palette data are dropped.
        let mut rgb = dyn_img.to_rgb8();

        if self.options.debug {
            eprintln!(
                "processing {} ({}x{})",
                input.display(),
                rgb.width(),
                rgb.height()
            );
        }

        match self.clean(&mut rgb) {
            CleanOutcome::NoArtifactFound => {
                report.success = true;
                report.message = String::from("no gray regions found");
                return report;
            }
            CleanOutcome::NoMatchingRegion { regions } => {
                report.success = true;
                report.message =
                    format!("{regions} gray region(s) found, none matched size/position");
                return report;
            }
            CleanOutcome::Removed {
                selected,
                filled,
                fill,
                regions,
                candidates,
            } => {
                if self.options.debug {
                    eprintln!(
                        "  {regions} region(s), {candidates} candidate(s) after filtering"
                    );
                    eprintln!(
                        "  selected ({}, {}, {}, {}), filled ({}, {}, {}, {}) with ({}, {}, {})",
                        selected.x_min,
                        selected.y_min,
                        selected.x_max,
                        selected.y_max,
                        filled.x_min,
                        filled.y_min,
                        filled.x_max,
                        filled.y_max,
                        fill[0],
                        fill[1],
                        fill[2],
                    );
                }
                report.message = format!(
                    "artifact at ({}, {}, {}, {}) removed",
                    selected.x_min, selected.y_min, selected.x_max, selected.y_max
                );
            }
        }

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    report.message = format!("failed to create output directory: {e}");
                    return report;
                }
            }
        }

        match save_image(&rgb, output) {
            Ok(()) => {
                report.success = true;
                report.cleaned = true;
            }
            Err(e) => {
                report.message = format!("failed to save: {e}");
            }
        }

        report
    }

    /// Process every supported image in a directory.
    ///
    /// Enumerates `.png`/`.jpg`/`.jpeg` files (case-insensitive), processes
    /// them in parallel when the `cli` feature is enabled, and returns one
    /// [`FileReport`] per file. With `output_dir = None`, cleaned images
    /// overwrite their originals.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputPathMissing`] if `input_dir` does not exist and
    /// [`Error::NoImagesFound`] if it holds no supported images; per-file
    /// failures are reported, not propagated.
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
    ) -> Result<Vec<FileReport>> {
        if !input_dir.exists() {
            return Err(Error::InputPathMissing(input_dir.to_path_buf()));
        }

        let mut files: Vec<PathBuf> = fs::read_dir(input_dir)?
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| is_supported_image(p))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(Error::NoImagesFound(input_dir.to_path_buf()));
        }

        if let Some(dir) = output_dir {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let run = |input: &PathBuf| {
            let output = output_dir.map_or_else(
                || input.clone(),
                |dir| dir.join(input.file_name().unwrap_or_default()),
            );
            self.process_file(input, &output)
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            Ok(files.par_iter().map(run).collect())
        }

        #[cfg(not(feature = "cli"))]
        {
            Ok(files.iter().map(run).collect())
        }
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(ext.to_lowercase().as_str(), "png" | "jpg" | "jpeg"),
        None => false,
    }
}

/// Save an RGB image atomically with format-specific settings.
///
/// Encodes into a hidden temporary sibling file and renames it over `path`,
/// so an interrupted run never leaves a half-written image behind.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    let tmp = temp_sibling(path);
    match write_image(img, &tmp, format) {
        Ok(()) => {
            fs::rename(&tmp, path)?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn write_image(img: &RgbImage, path: &Path, format: ImageFormat) -> Result<()> {
    match format {
        ImageFormat::Jpeg => {
            let file = fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(img)?;
        }
        ImageFormat::Png => {
            img.save_with_format(path, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }
    Ok(())
}

/// Temporary sibling path used for atomic saves, e.g. `dir/.photo.png.tmp`.
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path.file_name().map_or_else(
        || OsString::from(".artifact-cleaner.tmp"),
        |f| {
            let mut n = OsString::from(".");
            n.push(f);
            n.push(".tmp");
            n
        },
    );
    path.with_file_name(name)
}
