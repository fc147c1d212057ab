use std::fs;
use std::path::PathBuf;

use artifact_cleaner::{ArtifactCleaner, CleanOptions, CleanOutcome, Error};
use image::{Rgb, RgbImage};

/// Fresh scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "artifact-cleaner-test-{}-{name}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// 300x200 background (10, 10, 10) with a 60x60 gray artifact at
/// x in [220, 280), y in [130, 190).
fn artifact_image() -> RgbImage {
    let mut img = RgbImage::from_pixel(300, 200, Rgb([10, 10, 10]));
    for y in 130..190 {
        for x in 220..280 {
            img.put_pixel(x, y, Rgb([128, 128, 128]));
        }
    }
    img
}

#[test]
fn end_to_end_removes_artifact_and_fills_expanded_box() {
    let cleaner = ArtifactCleaner::default();
    let mut img = artifact_image();

    let outcome = cleaner.clean(&mut img);
    match outcome {
        CleanOutcome::Removed {
            selected, filled, ..
        } => {
            assert_eq!((selected.x_min, selected.y_min), (220, 130));
            assert_eq!((selected.x_max, selected.y_max), (280, 190));
            assert_eq!((filled.x_min, filled.y_min), (218, 128));
            assert_eq!((filled.x_max, filled.y_max), (282, 192));
        }
        other => panic!("expected removal, got {other:?}"),
    }

    // Every pixel of the image is now background-colored.
    for px in img.pixels() {
        assert_eq!(*px, Rgb([10, 10, 10]));
    }
}

#[test]
fn process_file_round_trips_through_png() {
    let dir = scratch_dir("single-file");
    let input = dir.join("photo.png");
    let output = dir.join("cleaned.png");
    artifact_image().save(&input).unwrap();

    let cleaner = ArtifactCleaner::default();
    let report = cleaner.process_file(&input, &output);

    assert!(report.success, "{}", report.message);
    assert!(report.cleaned);
    assert!(report.message.contains("220, 130, 280, 190"));

    let cleaned = image::open(&output).unwrap().to_rgb8();
    for y in 128..192 {
        for x in 218..282 {
            assert_eq!(*cleaned.get_pixel(x, y), Rgb([10, 10, 10]));
        }
    }

    // Atomic save leaves no temporary file behind.
    let leftovers: Vec<_> = fs::read_dir(&dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn process_file_overwrites_in_place() {
    let dir = scratch_dir("in-place");
    let path = dir.join("photo.png");
    artifact_image().save(&path).unwrap();

    let cleaner = ArtifactCleaner::default();
    let report = cleaner.process_file(&path, &path);
    assert!(report.cleaned, "{}", report.message);

    let cleaned = image::open(&path).unwrap().to_rgb8();
    assert_eq!(*cleaned.get_pixel(250, 160), Rgb([10, 10, 10]));
}

#[test]
fn process_file_reports_unreadable_input_without_panicking() {
    let dir = scratch_dir("bad-input");
    let input = dir.join("not-an-image.png");
    fs::write(&input, b"definitely not a png").unwrap();

    let cleaner = ArtifactCleaner::default();
    let report = cleaner.process_file(&input, &dir.join("out.png"));

    assert!(!report.success);
    assert!(!report.cleaned);
    assert!(report.message.contains("failed to load"));
}

#[test]
fn process_directory_continues_past_bad_files() {
    let in_dir = scratch_dir("batch-in");
    let out_dir = scratch_dir("batch-out");

    artifact_image().save(in_dir.join("dirty.png")).unwrap();
    RgbImage::from_pixel(300, 200, Rgb([10, 10, 10]))
        .save(in_dir.join("clean.png"))
        .unwrap();
    fs::write(in_dir.join("broken.jpg"), b"garbage").unwrap();
    fs::write(in_dir.join("notes.txt"), b"ignored").unwrap();

    let cleaner = ArtifactCleaner::default();
    let reports = cleaner
        .process_directory(&in_dir, Some(out_dir.as_path()))
        .unwrap();

    // The .txt file is not enumerated at all.
    assert_eq!(reports.len(), 3);

    let cleaned: Vec<_> = reports.iter().filter(|r| r.cleaned).collect();
    assert_eq!(cleaned.len(), 1);
    assert!(cleaned[0].path.ends_with("dirty.png"));

    let failed: Vec<_> = reports.iter().filter(|r| !r.success).collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].path.ends_with("broken.jpg"));

    // Only the cleaned image is written to the output folder.
    assert!(out_dir.join("dirty.png").exists());
    assert!(!out_dir.join("clean.png").exists());
}

#[test]
fn process_directory_rejects_missing_folder() {
    let cleaner = ArtifactCleaner::default();
    let err = cleaner
        .process_directory(&PathBuf::from("/no/such/folder"), None)
        .unwrap_err();
    assert!(matches!(err, Error::InputPathMissing(_)));
}

#[test]
fn process_directory_rejects_folder_without_images() {
    let dir = scratch_dir("no-images");
    fs::write(dir.join("readme.md"), b"no images here").unwrap();

    let cleaner = ArtifactCleaner::default();
    let err = cleaner.process_directory(&dir, None).unwrap_err();
    assert!(matches!(err, Error::NoImagesFound(_)));
}

#[test]
fn cleaning_is_idempotent_on_non_gray_background() {
    let cleaner = ArtifactCleaner::default();
    let mut img = artifact_image();

    assert!(cleaner.clean(&mut img).is_removed());
    assert_eq!(cleaner.clean(&mut img), CleanOutcome::NoArtifactFound);
}

#[test]
fn custom_options_are_honored() {
    // Shrink the size window so the 60x60 block no longer qualifies.
    let cleaner = ArtifactCleaner::new(CleanOptions {
        min_size: 10,
        max_size: 20,
        ..CleanOptions::default()
    });
    let mut img = artifact_image();

    assert_eq!(
        cleaner.clean(&mut img),
        CleanOutcome::NoMatchingRegion { regions: 1 }
    );
}
