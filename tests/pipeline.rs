//! End-to-end pipeline tests for md2pdf.
//!
//! A real wkhtmltopdf is deliberately not required: the external renderer
//! is played by small shell scripts (gated to Unix) injected through
//! `Converter::with_renderer`. A script that copies its staged-HTML
//! argument to its output argument makes the HTML handed to the renderer
//! fully observable, which is how the content assertions below work.
//!
//! Every test points `staging_dir` at a scratch directory so "no staged
//! file left behind" is checked by simply counting directory entries.

use md2pdf::{
    CancelFlag, ConversionConfig, ConversionProgressCallback, ConversionRequest, ConversionState,
    Converter, Md2PdfError, ProgressCallback, RendererBinary, SourceEncoding,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

#[cfg(unix)]
const GFM_INPUT: &str = "\
# Minutes

| item | owner |
|------|-------|
| demo | ada   |

```sh
make release
```

> decisions are final
";

struct Workspace {
    root: TempDir,
    staging: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().expect("create workspace");
        let staging = root.path().join("staging");
        fs::create_dir(&staging).expect("create staging dir");
        Self { root, staging }
    }

    fn write_input(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, contents).expect("write input");
        path
    }

    fn output_path(&self) -> PathBuf {
        self.root.path().join("out").join("result.pdf")
    }

    fn config(&self) -> ConversionConfig {
        ConversionConfig::builder()
            .staging_dir(&self.staging)
            .build()
            .expect("valid config")
    }

    fn staging_is_empty(&self) -> bool {
        fs::read_dir(&self.staging).expect("read staging dir").count() == 0
    }
}

/// Install an executable shell script standing in for wkhtmltopdf.
#[cfg(unix)]
fn fake_renderer(dir: &Path, name: &str, body: &str) -> RendererBinary {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake renderer");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake renderer");
    RendererBinary::at(path)
}

/// A fake renderer that copies the staged HTML to the output path.
///
/// The last two arguments of the wkhtmltopdf invocation are the input and
/// output files; the options before them are ignored.
#[cfg(unix)]
fn copying_renderer(dir: &Path) -> RendererBinary {
    fake_renderer(
        dir,
        "fake-wkhtmltopdf",
        r#"prev=""; last=""
for arg in "$@"; do prev="$last"; last="$arg"; done
cp "$prev" "$last""#,
    )
}

/// Records every state transition the pipeline reports.
#[cfg(unix)]
struct StateRecorder(Mutex<Vec<ConversionState>>);

#[cfg(unix)]
impl StateRecorder {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Vec::new())))
    }

    fn seen(&self) -> Vec<ConversionState> {
        self.0.lock().unwrap().clone()
    }
}

#[cfg(unix)]
impl ConversionProgressCallback for StateRecorder {
    fn on_state(&self, state: ConversionState) {
        self.0.lock().unwrap().push(state);
    }
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[cfg(unix)]
#[test]
fn staged_html_carries_tables_fences_and_blockquotes_to_the_renderer() {
    let ws = Workspace::new();
    let input = ws.write_input("minutes.md", GFM_INPUT.as_bytes());
    let renderer = copying_renderer(ws.root.path());

    let converter = Converter::with_renderer(ws.config(), Some(renderer));
    let receipt = converter
        .convert(
            &ConversionRequest::new(&input, ws.output_path()),
            &CancelFlag::new(),
        )
        .expect("conversion should succeed");

    // The copying renderer makes the output the exact HTML it was given.
    let html = fs::read_to_string(&receipt.output_path).unwrap();
    assert!(html.contains("<table>"), "missing <table>: {html}");
    assert!(html.contains("<pre><code"), "missing code block: {html}");
    assert!(html.contains("<blockquote>"), "missing blockquote: {html}");
    assert!(html.contains("<title>minutes</title>"), "title from stem");

    assert!(receipt.output_bytes > 0);
    assert_eq!(receipt.source_encoding, SourceEncoding::Utf8);
    assert!(ws.staging_is_empty(), "staged HTML left behind");
    assert_eq!(converter.state().get(), ConversionState::Completed);
}

#[cfg(unix)]
#[test]
fn output_parent_directories_are_created() {
    let ws = Workspace::new();
    let input = ws.write_input("n.md", b"# hi\n");
    let output = ws.root.path().join("deeply/nested/dirs/n.pdf");

    let converter =
        Converter::with_renderer(ws.config(), Some(copying_renderer(ws.root.path())));
    converter
        .convert(
            &ConversionRequest::new(&input, &output),
            &CancelFlag::new(),
        )
        .expect("conversion should succeed");

    assert!(output.is_file());
}

#[cfg(unix)]
#[test]
fn converting_twice_to_the_same_output_succeeds_both_times() {
    let ws = Workspace::new();
    let input = ws.write_input("n.md", b"# hi\n");
    let request = ConversionRequest::new(&input, ws.output_path());

    let converter =
        Converter::with_renderer(ws.config(), Some(copying_renderer(ws.root.path())));

    for round in 1..=2 {
        let receipt = converter
            .convert(&request, &CancelFlag::new())
            .unwrap_or_else(|e| panic!("round {round} failed: {e}"));
        assert!(receipt.output_bytes > 0, "round {round} empty");
        assert!(ws.staging_is_empty(), "round {round} left staged HTML");
    }
}

#[cfg(unix)]
#[test]
fn progress_states_arrive_in_strictly_increasing_order() {
    let ws = Workspace::new();
    let input = ws.write_input("n.md", b"# hi\n");

    let recorder = StateRecorder::new();
    let config = ConversionConfig::builder()
        .staging_dir(&ws.staging)
        .progress_callback(Arc::clone(&recorder) as ProgressCallback)
        .build()
        .unwrap();

    let converter =
        Converter::with_renderer(config, Some(copying_renderer(ws.root.path())));
    converter
        .convert(
            &ConversionRequest::new(&input, ws.output_path()),
            &CancelFlag::new(),
        )
        .expect("conversion should succeed");

    let seen = recorder.seen();
    assert_eq!(
        seen,
        vec![
            ConversionState::CheckingDependencies,
            ConversionState::Reading,
            ConversionState::Rendering,
            ConversionState::Staging,
            ConversionState::Invoking,
            ConversionState::Completed,
        ]
    );
    for pair in seen.windows(2) {
        assert!(
            pair[0].progress_percent() < pair[1].progress_percent(),
            "{:?} -> {:?} did not increase",
            pair[0],
            pair[1]
        );
    }
}

// ── Encoding fallback ────────────────────────────────────────────────────────

#[cfg(unix)]
#[test]
fn latin1_input_converts_with_the_fallback_decoding() {
    let ws = Workspace::new();
    // "résumé" with 0xE9 bytes: invalid UTF-8, valid Windows-1252.
    let input = ws.write_input("cv.md", b"# r\xe9sum\xe9\n");

    let converter =
        Converter::with_renderer(ws.config(), Some(copying_renderer(ws.root.path())));
    let receipt = converter
        .convert(
            &ConversionRequest::new(&input, ws.output_path()),
            &CancelFlag::new(),
        )
        .expect("fallback decoding should succeed");

    assert_eq!(receipt.source_encoding, SourceEncoding::Windows1252);
    let html = fs::read_to_string(&receipt.output_path).unwrap();
    assert!(html.contains("résumé"), "fallback text lost: {html}");
}

// ── Failure paths ────────────────────────────────────────────────────────────

#[test]
fn missing_renderer_fails_fast_with_missing_dependency() {
    let ws = Workspace::new();
    // Nonexistent input proves no file I/O precedes the dependency check.
    let request = ConversionRequest::new(
        ws.root.path().join("never-written.md"),
        ws.output_path(),
    );

    let converter = Converter::with_renderer(ws.config(), None);
    let err = converter
        .convert(&request, &CancelFlag::new())
        .unwrap_err();

    assert!(matches!(err, Md2PdfError::MissingDependency));
    assert!(!ws.output_path().exists());
}

#[test]
fn unreadable_input_is_reported_as_such() {
    let ws = Workspace::new();
    let request = ConversionRequest::new(
        ws.root.path().join("never-written.md"),
        ws.output_path(),
    );

    // Renderer "exists" but is never reached.
    let converter = Converter::with_renderer(
        ws.config(),
        Some(RendererBinary::at("/fake/wkhtmltopdf")),
    );
    let err = converter
        .convert(&request, &CancelFlag::new())
        .unwrap_err();

    assert!(matches!(err, Md2PdfError::UnreadableInput { .. }));
    assert!(ws.staging_is_empty());
    assert!(!ws.output_path().exists());
}

#[cfg(unix)]
#[test]
fn failing_renderer_surfaces_render_failure_and_cleans_up() {
    let ws = Workspace::new();
    let input = ws.write_input("n.md", b"# hi\n");
    let renderer = fake_renderer(
        ws.root.path(),
        "broken-wkhtmltopdf",
        r#"echo "ContentNotFoundError" >&2; exit 1"#,
    );

    let converter = Converter::with_renderer(ws.config(), Some(renderer));
    let err = converter
        .convert(
            &ConversionRequest::new(&input, ws.output_path()),
            &CancelFlag::new(),
        )
        .unwrap_err();

    match err {
        Md2PdfError::RenderFailure { detail } => {
            assert!(detail.contains("ContentNotFoundError"), "got: {detail}");
        }
        other => panic!("expected RenderFailure, got {other:?}"),
    }
    assert!(ws.staging_is_empty(), "staged HTML left behind on failure");
    assert!(!ws.output_path().exists());
    assert_eq!(converter.state().get(), ConversionState::Failed);
}

#[cfg(unix)]
#[test]
fn zero_byte_output_from_a_clean_exit_is_output_not_produced() {
    let ws = Workspace::new();
    let input = ws.write_input("n.md", b"# hi\n");
    // Exits 0 but only touches an empty output file.
    let renderer = fake_renderer(
        ws.root.path(),
        "hollow-wkhtmltopdf",
        r#"prev=""; last=""
for arg in "$@"; do prev="$last"; last="$arg"; done
: > "$last""#,
    );

    let converter = Converter::with_renderer(ws.config(), Some(renderer));
    let err = converter
        .convert(
            &ConversionRequest::new(&input, ws.output_path()),
            &CancelFlag::new(),
        )
        .unwrap_err();

    assert!(matches!(err, Md2PdfError::OutputNotProduced { .. }));
    assert!(ws.staging_is_empty());
}

// ── Cancellation ─────────────────────────────────────────────────────────────

/// Sets the cancel flag the moment a chosen state is reported.
struct CancelAt {
    at: ConversionState,
    flag: CancelFlag,
}

impl ConversionProgressCallback for CancelAt {
    fn on_state(&self, state: ConversionState) {
        if state == self.at {
            self.flag.cancel();
        }
    }
}

#[test]
fn cancelling_during_staging_stops_before_the_renderer_runs() {
    let ws = Workspace::new();
    let input = ws.write_input("n.md", b"# hi\n");

    let cancel = CancelFlag::new();
    let config = ConversionConfig::builder()
        .staging_dir(&ws.staging)
        .progress_callback(Arc::new(CancelAt {
            at: ConversionState::Staging,
            flag: cancel.clone(),
        }) as ProgressCallback)
        .build()
        .unwrap();

    // A renderer path that would fail loudly if it were ever spawned.
    let converter = Converter::with_renderer(
        config,
        Some(RendererBinary::at("/definitely/not/spawned")),
    );
    let err = converter
        .convert(&ConversionRequest::new(&input, ws.output_path()), &cancel)
        .unwrap_err();

    assert!(matches!(err, Md2PdfError::Cancelled));
    assert!(!ws.output_path().exists(), "output must not exist");
    assert!(ws.staging_is_empty(), "staged HTML left behind on cancel");
    assert_eq!(converter.state().get(), ConversionState::Cancelled);
}

#[test]
fn cancelling_before_the_read_leaves_no_trace() {
    let ws = Workspace::new();
    let input = ws.write_input("n.md", b"# hi\n");

    let cancel = CancelFlag::new();
    cancel.cancel();

    let converter = Converter::with_renderer(
        ws.config(),
        Some(RendererBinary::at("/definitely/not/spawned")),
    );
    let err = converter
        .convert(&ConversionRequest::new(&input, ws.output_path()), &cancel)
        .unwrap_err();

    assert!(matches!(err, Md2PdfError::Cancelled));
    assert!(ws.staging_is_empty());
    assert!(!ws.output_path().exists());
}
