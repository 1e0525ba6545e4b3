use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use site_assets::{
    AssetPipeline, PipelineOptions, ProcessResult, DESKTOP_HEROES, NEW_DESKTOP_HEROES,
};

#[derive(Parser)]
#[command(
    name = "site-assets",
    about = "Prepare website image assets: hero banners, transparent logos, favicons",
    version,
    after_help = "Sources are read from the working directory (--dir) and outputs are written \
                  next to them.\nSome outputs are mirrored into <dir>/public."
)]
struct Cli {
    /// Job to run
    #[command(subcommand)]
    job: Job,

    /// Working directory holding the source images
    #[arg(short, long, default_value = ".", global = true)]
    dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum Job {
    /// Render the desktop hero banners (1920x480)
    Heroes,
    /// Render the replacement desktop hero banners, letterboxed
    NewHeroes,
    /// Make logo backgrounds transparent and regenerate web sizes
    Logos,
    /// Generate favicons and header icons
    Icons,
    /// Generate white and red rounded icon variants
    Variants,
    /// Re-derive every asset from the new brand sources
    Brand,
}

impl Job {
    fn title(self) -> &'static str {
        match self {
            Job::Heroes => "Desktop heroes",
            Job::NewHeroes => "New desktop heroes",
            Job::Logos => "Logo backgrounds",
            Job::Icons => "Favicons and header icons",
            Job::Variants => "Icon variants",
            Job::Brand => "Brand assets",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose && cli.quiet {
        eprintln!("Error: Cannot specify both --verbose and --quiet");
        process::exit(1);
    }

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if !cli.dir.is_dir() {
        eprintln!("Error: Working directory does not exist: {}", cli.dir.display());
        process::exit(1);
    }

    let opts = PipelineOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    let pipeline = AssetPipeline::new(&cli.dir, opts);

    if !pipeline.options().quiet {
        eprintln!("=== {} ===", cli.job.title());
        eprintln!();
    }

    let results = match cli.job {
        Job::Heroes => pipeline.desktop_heroes(DESKTOP_HEROES),
        Job::NewHeroes => pipeline.desktop_heroes(NEW_DESKTOP_HEROES),
        Job::Logos => pipeline.logos(),
        Job::Icons => pipeline.icons(),
        Job::Variants => pipeline.variants(),
        Job::Brand => pipeline.brand(),
    };

    for r in &results {
        print_result(r, pipeline.options());
    }

    let summary = Summary::from_results(&results);
    if !pipeline.options().quiet {
        eprintln!();
    }
    eprintln!("{summary}");

    if summary.failed > 0 {
        process::exit(1);
    }
}

/// Per-run counts for the `[Summary]` line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    processed: usize,
    skipped: usize,
    failed: usize,
    total: usize,
}

impl Summary {
    fn from_results(results: &[ProcessResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for r in results {
            if r.skipped {
                summary.skipped += 1;
            } else if r.success {
                summary.processed += 1;
            } else {
                summary.failed += 1;
            }
        }
        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Summary] Processed: {}", self.processed)?;
        if self.skipped > 0 {
            write!(f, ", Skipped: {}", self.skipped)?;
        }
        if self.failed > 0 {
            write!(f, ", Failed: {}", self.failed)?;
        }
        write!(f, " (Total: {})", self.total)
    }
}

fn print_result(result: &ProcessResult, opts: &PipelineOptions) {
    if opts.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.skipped {
        eprintln!("[SKIP] {filename}: {}", result.message);
    } else if result.success {
        eprintln!("[OK] {filename} ({})", result.message);
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if opts.verbose {
        eprintln!("  -> {}", result.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(success: bool, skipped: bool) -> ProcessResult {
        ProcessResult {
            path: PathBuf::from("logo.png"),
            success,
            skipped,
            message: String::new(),
        }
    }

    #[test]
    fn summary_counts_each_outcome() {
        let results = [
            result(true, false),
            result(true, false),
            result(true, true),
            result(false, false),
        ];
        assert_eq!(
            Summary::from_results(&results).to_string(),
            "[Summary] Processed: 2, Skipped: 1, Failed: 1 (Total: 4)"
        );
    }

    #[test]
    fn summary_is_rendered_for_clean_runs() {
        let summary = Summary::from_results(&[result(true, false)]);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.to_string(), "[Summary] Processed: 1 (Total: 1)");
    }
}
