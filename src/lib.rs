//! Detect and remove gray rectangular artifacts from images.
//!
//! Some export pipelines stamp a near-uniform gray blob (roughly 64px square,
//! color (128, 128, 128)) into the right third of generated images. This crate
//! finds that blob by classifying gray pixels, flood-filling them into
//! connected regions, filtering the regions by size and position priors, and
//! painting the best candidate over with the average color of its
//! surroundings.
//!
//! # Quick Start
//!
//! ```no_run
//! use artifact_cleaner::{ArtifactCleaner, CleanOptions};
//!
//! let cleaner = ArtifactCleaner::new(CleanOptions::default());
//! let mut img = image::open("photo.png").unwrap().to_rgb8();
//! let outcome = cleaner.clean(&mut img);
//! if outcome.is_removed() {
//!     img.save("cleaned.png").unwrap();
//! }
//! ```
//!
//! # Batch processing
//!
//! ```no_run
//! use artifact_cleaner::{ArtifactCleaner, CleanOptions};
//! use std::path::Path;
//!
//! let cleaner = ArtifactCleaner::new(CleanOptions::default());
//! let reports = cleaner
//!     .process_directory(Path::new("input"), Some(Path::new("output")))
//!     .expect("input folder should exist");
//! let cleaned = reports.iter().filter(|r| r.cleaned).count();
//! println!("Cleaned {cleaned} out of {} image(s)", reports.len());
//! ```
//!
//! Images where nothing is detected are reported as ordinary outcomes, not
//! errors; a batch run keeps going past both "no artifact" images and files
//! that fail to decode.

#![deny(missing_docs)]

pub mod alpha;
pub mod classify;
mod engine;
pub mod error;
pub mod estimate;
pub mod regions;

pub use engine::{
    is_supported_image, save_image, ArtifactCleaner, CleanOptions, CleanOutcome, FileReport,
};
pub use error::{Error, Result};
pub use regions::BoundingBox;
