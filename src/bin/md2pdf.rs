//! CLI binary for md2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, drives a progress bar from the pipeline's state
//! transitions, and wires Ctrl-C to the cooperative cancellation flag.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use md2pdf::{
    CancelFlag, ConversionConfig, ConversionProgressCallback, ConversionRequest, ConversionState,
    Converter, Md2PdfError, PageSize, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: one bar spanning 0–100, positioned from the
/// pipeline's state percentages with the state label as the message.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} [{bar:42.green/238}] {pos:>3}%  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message("Starting…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgress {
    fn on_state(&self, state: ConversionState) {
        self.bar.set_position(u64::from(state.progress_percent()));
        self.bar.set_message(state.label());
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert next to the input: notes.md -> notes.pdf
  md2pdf notes.md

  # Explicit output path
  md2pdf notes.md -o out/report.pdf

  # US Letter with narrow margins and a custom title
  md2pdf --page-size letter --margin 12 --title "Weekly report" notes.md

  # Machine-readable receipt
  md2pdf --json notes.md > receipt.json

ENVIRONMENT VARIABLES:
  WKHTMLTOPDF_PATH   Path to the wkhtmltopdf binary — skips discovery
  MD2PDF_OUTPUT      Default for --output
  MD2PDF_PAGE_SIZE   Default for --page-size
  MD2PDF_MARGIN      Default for --margin
  RUST_LOG           Log filter (overrides -v / -q)

SETUP:
  md2pdf shells out to wkhtmltopdf and needs it installed once:
    https://wkhtmltopdf.org/downloads.html
  Discovery order: WKHTMLTOPDF_PATH, well-known install paths, then PATH.

CANCELLATION:
  Ctrl-C requests a cooperative cancel. It takes effect at the next stage
  boundary; a wkhtmltopdf process that is already running finishes first.
"#;

/// Convert a Markdown file to a styled PDF via wkhtmltopdf.
#[derive(Parser, Debug)]
#[command(
    name = "md2pdf",
    version,
    about = "Convert Markdown files to styled PDFs via wkhtmltopdf",
    long_about = "Convert a Markdown (or plain text) file to a styled PDF document. \
The input is rendered to HTML with GFM tables and fenced code blocks, staged to a \
temporary file, and handed to the external wkhtmltopdf renderer.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown (or plain text) input file.
    input: PathBuf,

    /// Output PDF path. Default: the input with a .pdf extension.
    #[arg(short, long, env = "MD2PDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Paper size.
    #[arg(long, env = "MD2PDF_PAGE_SIZE", value_enum, default_value = "a4")]
    page_size: PageSizeArg,

    /// Page margin in millimetres, applied to all four edges.
    #[arg(long, env = "MD2PDF_MARGIN", default_value_t = 20,
          value_parser = clap::value_parser!(u32).range(0..=100))]
    margin: u32,

    /// Document title. Default: the input file's stem.
    #[arg(long)]
    title: Option<String>,

    /// Print the conversion receipt as JSON instead of a summary line.
    #[arg(long, env = "MD2PDF_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "MD2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum PageSizeArg {
    A4,
    A5,
    Letter,
    Legal,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::A5 => PageSize::A5,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library info logs duplicate what the progress bar already shows, so
    // they are suppressed whenever the bar is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress: Option<Arc<CliProgress>> = show_progress.then(CliProgress::new);

    let mut builder = ConversionConfig::builder()
        .page_size(cli.page_size.clone().into())
        .margin_mm(cli.margin);
    if let Some(title) = &cli.title {
        builder = builder.title(title.clone());
    }
    if let Some(cb) = &progress {
        builder = builder.progress_callback(Arc::clone(cb) as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Locate the renderer ──────────────────────────────────────────────
    let converter = Converter::new(config);
    if converter.renderer().is_none() {
        if let Some(p) = &progress {
            p.bar.finish_and_clear();
        }
        eprintln!(
            "{} wkhtmltopdf is required but was not found.",
            red("✘")
        );
        eprintln!("  Download it from {}", bold(wkhtml_locate::DOWNLOAD_URL));
        eprintln!(
            "  {} point {} at an existing binary.",
            dim("…or"),
            bold(wkhtml_locate::ENV_OVERRIDE)
        );
        std::process::exit(2);
    }

    // ── Wire cancellation ────────────────────────────────────────────────
    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        let quiet = cli.quiet;
        ctrlc::set_handler(move || {
            if !quiet {
                eprintln!("\n{} cancel requested — stopping at the next stage…", cyan("⚠"));
            }
            cancel.cancel();
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    // ── Run the conversion on a worker thread ────────────────────────────
    let request = match &cli.output {
        Some(output) => ConversionRequest::new(cli.input.clone(), output.clone()),
        None => ConversionRequest::with_default_output(cli.input.clone()),
    };

    let worker = {
        let cancel = cancel.clone();
        let request = request.clone();
        std::thread::spawn(move || converter.convert(&request, &cancel))
    };
    let outcome = worker
        .join()
        .map_err(|_| anyhow::anyhow!("conversion worker panicked"))?;

    if let Some(p) = &progress {
        p.bar.finish_and_clear();
    }

    // ── Report ───────────────────────────────────────────────────────────
    match outcome {
        Ok(receipt) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&receipt)
                        .context("Failed to serialise receipt")?
                );
            } else if !cli.quiet {
                eprintln!(
                    "{}  {}  {}  {}",
                    green("✔"),
                    bold(&receipt.output_path.display().to_string()),
                    dim(&format!("{} bytes", receipt.output_bytes)),
                    dim(&format!("{}ms", receipt.duration_ms)),
                );
            }
            Ok(())
        }
        Err(Md2PdfError::Cancelled) => {
            if !cli.quiet {
                eprintln!("{} conversion cancelled — no output written", red("✘"));
            }
            std::process::exit(130);
        }
        Err(e) => Err(anyhow::Error::new(e).context("Conversion failed")),
    }
}
