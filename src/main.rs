use clap::{Parser, Subcommand};
use screenshot_manifest::imaging::RustBackend;
use screenshot_manifest::ocr::TesseractEngine;
use screenshot_manifest::{config, output, process};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "screenshot-manifest")]
#[command(about = "Analyze a directory of screenshots into a JSON manifest")]
#[command(long_about = "\
Analyze a directory of screenshots into a JSON manifest

Every matching image under ROOT is analyzed for its dimensions, alpha channel,
OCR text, dominant colors and the WCAG contrast between the lightest and
darkest of those colors. Results are written to ROOT/manifest.json, replacing
any previous manifest.

  screens/
  ├── config.toml          # Optional settings (see 'gen-config')
  ├── manifest.json        # Written by this tool
  ├── home.png
  └── settings/
      └── dark.png         # Recorded as \"settings/dark.png\"

Files that cannot be decoded or recognized are reported and left out of the
manifest; they do not stop the run.

Run 'screenshot-manifest gen-config' to generate a documented config.toml.")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Cli {
    /// Directory of screenshots to analyze
    #[arg(required = true)]
    root: Option<PathBuf>,

    /// Log every analysis step to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Maximum parallel workers (overrides processing.max_processes)
    #[arg(short, long)]
    jobs: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::GenConfig) = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    init_logging(cli.verbose);

    let root = cli.root.ok_or("missing ROOT argument")?;
    let mut pipeline_config = config::load_config(&root)?;
    if let Some(jobs) = cli.jobs {
        pipeline_config.processing.max_processes = Some(jobs);
    }
    init_thread_pool(&pipeline_config.processing);

    let backend = RustBackend::new();
    let ocr_engine = TesseractEngine::new(&pipeline_config.ocr.command);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });
    let result = process::process(&root, &pipeline_config, &backend, &ocr_engine, Some(tx));
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;

    let report = result?;
    output::print_summary(&report);
    Ok(())
}

/// Diagnostics go to stderr so stdout stays progress-only.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
