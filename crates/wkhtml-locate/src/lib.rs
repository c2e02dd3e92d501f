//! # wkhtml-locate
//!
//! Find the [wkhtmltopdf](https://wkhtmltopdf.org/) executable on the host
//! system, so that callers shelling out to it don't have to hard-code an
//! install path or require the user to fix their `PATH` first.
//!
//! ## How it works
//!
//! [`locate`] tries three sources in order and returns the first hit:
//!
//! 1. The `WKHTMLTOPDF_PATH` environment variable, if it names an existing
//!    file. This is the escape hatch for non-standard installs, CI images,
//!    and air-gapped machines.
//! 2. A fixed list of well-known installation directories for the current
//!    OS family (Windows `Program Files` variants, macOS Homebrew prefixes,
//!    common Linux binary directories).
//! 3. The operating system's own executable search: `where wkhtmltopdf` on
//!    Windows, `which wkhtmltopdf` everywhere else.
//!
//! If all three miss, [`locate`] returns `None`. It never panics and never
//! returns an error — absence of the renderer is an ordinary, recoverable
//! condition that the caller reports to the user (see [`DOWNLOAD_URL`]).
//!
//! ## Bare name vs. resolved path
//!
//! A binary found through the generic PATH lookup is invoked by bare name
//! ([`RendererBinary::program`] returns `"wkhtmltopdf"`), letting the OS
//! re-resolve it at spawn time. A binary found via the override or a
//! well-known directory is invoked by its full path, which keeps working
//! even when the process `PATH` doesn't include that directory.
//!
//! ## Usage
//!
//! ```rust,no_run
//! match wkhtml_locate::locate() {
//!     Some(renderer) => println!("using {}", renderer.path().display()),
//!     None => eprintln!("wkhtmltopdf not installed — get it from {}", wkhtml_locate::DOWNLOAD_URL),
//! }
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

// ── Public constants ─────────────────────────────────────────────────────────

/// Name of the renderer executable searched for on `PATH`.
pub const BINARY_NAME: &str = "wkhtmltopdf";

/// Environment variable that overrides all discovery.
pub const ENV_OVERRIDE: &str = "WKHTMLTOPDF_PATH";

/// Official download page, for error messages and missing-dependency hints.
pub const DOWNLOAD_URL: &str = "https://wkhtmltopdf.org/downloads.html";

// ── Types ────────────────────────────────────────────────────────────────────

/// How a [`RendererBinary`] was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// Explicit path: the `WKHTMLTOPDF_PATH` override or a caller-supplied
    /// location ([`RendererBinary::at`]).
    Configured,
    /// One of the fixed per-OS installation directories.
    WellKnownPath,
    /// Resolved through the OS executable search (`where` / `which`).
    PathLookup,
}

/// A located wkhtmltopdf executable.
#[derive(Debug, Clone)]
pub struct RendererBinary {
    path: PathBuf,
    discovery: Discovery,
}

impl RendererBinary {
    /// Wrap an explicit path as the renderer binary, bypassing discovery.
    ///
    /// No validation is performed; a bad path surfaces as a spawn error
    /// when the caller runs the binary.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            discovery: Discovery::Configured,
        }
    }

    /// Resolved filesystem path of the executable.
    ///
    /// For [`Discovery::PathLookup`] this is the path `where`/`which`
    /// printed; prefer [`program`](Self::program) when spawning.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How this binary was discovered.
    pub fn discovery(&self) -> Discovery {
        self.discovery
    }

    /// The program name to hand to `std::process::Command`.
    ///
    /// Bare `wkhtmltopdf` when the binary came from a PATH lookup (the OS
    /// resolves it again at spawn time), the full path otherwise.
    pub fn program(&self) -> OsString {
        match self.discovery {
            Discovery::PathLookup => OsString::from(BINARY_NAME),
            Discovery::Configured | Discovery::WellKnownPath => {
                self.path.clone().into_os_string()
            }
        }
    }
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Locate the wkhtmltopdf executable, or return `None` if it is not
/// installed anywhere we can see.
///
/// See the crate docs for the search order. Each step logs its outcome at
/// `debug` level; a hit is logged at `info`.
pub fn locate() -> Option<RendererBinary> {
    locate_from(
        std::env::var_os(ENV_OVERRIDE),
        &well_known_paths(),
        lookup_on_path,
    )
}

// ── Internal: the ordered search ─────────────────────────────────────────────

/// The deterministic search over injected candidates.
///
/// Split out from [`locate`] so tests can exercise the priority order
/// without touching the process environment or the real filesystem layout.
fn locate_from(
    override_path: Option<OsString>,
    well_known: &[PathBuf],
    path_lookup: impl FnOnce() -> Option<PathBuf>,
) -> Option<RendererBinary> {
    // 1. Environment override, accepted only if the file exists.
    if let Some(raw) = override_path {
        let candidate = PathBuf::from(raw);
        if candidate.is_file() {
            info!("using {} from {}", BINARY_NAME, ENV_OVERRIDE);
            return Some(RendererBinary {
                path: candidate,
                discovery: Discovery::Configured,
            });
        }
        debug!(
            "{} is set but '{}' is not a file; continuing discovery",
            ENV_OVERRIDE,
            candidate.display()
        );
    }

    // 2. Well-known installation directories.
    for candidate in well_known {
        if candidate.is_file() {
            info!("found {} at {}", BINARY_NAME, candidate.display());
            return Some(RendererBinary {
                path: candidate.clone(),
                discovery: Discovery::WellKnownPath,
            });
        }
    }
    debug!("{} not present in any well-known install path", BINARY_NAME);

    // 3. The OS executable search.
    if let Some(resolved) = path_lookup() {
        info!("found {} on PATH at {}", BINARY_NAME, resolved.display());
        return Some(RendererBinary {
            path: resolved,
            discovery: Discovery::PathLookup,
        });
    }

    debug!("{} not found anywhere", BINARY_NAME);
    None
}

/// Fixed installation paths checked for the current OS family.
fn well_known_paths() -> Vec<PathBuf> {
    match std::env::consts::OS {
        "windows" => vec![
            PathBuf::from(r"C:\Program Files\wkhtmltopdf\bin\wkhtmltopdf.exe"),
            PathBuf::from(r"C:\Program Files (x86)\wkhtmltopdf\bin\wkhtmltopdf.exe"),
        ],
        "macos" => vec![
            PathBuf::from("/usr/local/bin/wkhtmltopdf"),
            PathBuf::from("/opt/homebrew/bin/wkhtmltopdf"),
        ],
        _ => vec![
            PathBuf::from("/usr/bin/wkhtmltopdf"),
            PathBuf::from("/usr/local/bin/wkhtmltopdf"),
        ],
    }
}

/// Ask the OS executable search (`where` on Windows, `which` elsewhere).
///
/// Returns the first line of stdout on exit 0; any failure — tool missing,
/// non-zero exit, empty output — collapses to `None`.
fn lookup_on_path() -> Option<PathBuf> {
    let finder = if cfg!(windows) { "where" } else { "which" };

    let output = match Command::new(finder).arg(BINARY_NAME).output() {
        Ok(output) => output,
        Err(e) => {
            debug!("could not run '{} {}': {}", finder, BINARY_NAME, e);
            return None;
        }
    };

    if !output.status.success() {
        return None;
    }

    // `where` can print several matches, one per line; take the first.
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}
