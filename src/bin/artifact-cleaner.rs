use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use artifact_cleaner::{ArtifactCleaner, CleanOptions, FileReport};

#[derive(Parser)]
#[command(
    name = "artifact-cleaner",
    about = "Remove gray rectangular artifacts from images",
    version,
    after_help = "The artifact is assumed to be near-uniform gray (128, 128, 128),\n\
                  roughly 50-70px square, in the right third of the image.\n\
                  Without -o, cleaned images overwrite the originals."
)]
struct Cli {
    /// Input folder (or a single image file)
    input: String,

    /// Output folder (default: overwrite in place)
    #[arg(short, long)]
    output: Option<String>,

    /// Color matching threshold
    #[arg(short, long, default_value = "5")]
    threshold: u8,

    /// Minimum artifact size in pixels
    #[arg(long, default_value = "50")]
    min_size: u32,

    /// Maximum artifact size in pixels
    #[arg(long, default_value = "70")]
    max_size: u32,

    /// Pixels to expand the detected box by before filling
    #[arg(long, default_value = "2")]
    expand_box: u32,

    /// Enable per-stage debug output
    #[arg(short, long)]
    debug: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.min_size > cli.max_size {
        eprintln!("Error: --min-size must not exceed --max-size");
        process::exit(1);
    }

    let options = CleanOptions {
        threshold: cli.threshold,
        min_size: cli.min_size,
        max_size: cli.max_size,
        expand_box: cli.expand_box,
        debug: cli.debug,
        quiet: cli.quiet,
        ..CleanOptions::default()
    };
    let cleaner = ArtifactCleaner::new(options);

    let input_path = Path::new(&cli.input);
    let output_dir = cli.output.as_deref().map(Path::new);

    let results = if input_path.is_dir() {
        match cleaner.process_directory(input_path, output_dir) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    } else {
        if !input_path.exists() {
            eprintln!("Error: input path does not exist: {}", cli.input);
            process::exit(1);
        }
        let output_path = match output_dir {
            Some(dir) => dir.join(input_path.file_name().unwrap_or_default()),
            None => PathBuf::from(input_path),
        };
        vec![cleaner.process_file(input_path, &output_path)]
    };

    let mut cleaned_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_report(r, cli.quiet);
        if r.cleaned {
            cleaned_count += 1;
        }
        if !r.success {
            fail_count += 1;
        }
    }

    if !cli.quiet {
        eprintln!(
            "\nProcessing complete. Cleaned {cleaned_count} out of {} image(s)",
            results.len()
        );
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_report(report: &FileReport, quiet: bool) {
    let filename = report.path.file_name().map_or_else(
        || report.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if report.cleaned {
        if !quiet {
            eprintln!("[CLEANED] {filename}: {}", report.message);
        }
    } else if report.success {
        if !quiet {
            eprintln!("[SKIP] {filename}: {}", report.message);
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", report.message);
    }
}
