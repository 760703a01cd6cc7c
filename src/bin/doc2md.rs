//! CLI binary for doc2md.
//!
//! A thin shim over the library crate: maps CLI flags to `ClientConfig`,
//! drives a `ConversionController` and prints the page it would show.

use anyhow::{Context, Result};
use clap::Parser;
use doc2md::render::{self, OutputPane};
use doc2md::{
    distinct_updates, ClientConfig, ConversionController, CopyIcon, CopyOutcome, Doc2MdError,
    ProgressCallback, SessionSnapshot, Status, SubmitProgressCallback, Theme, UploadFile,
};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
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
fn italic(s: &str) -> String {
    format!("\x1b[3m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner shown while the request is in flight.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::hidden();
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(spinner_style);
        bar.set_prefix("Converting");
        Arc::new(Self { bar })
    }
}

impl SubmitProgressCallback for CliProgressCallback {
    fn on_submit_start(&self, file_name: &str, size: usize) {
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_message(format!("{file_name} ({})", human_size(size)));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_submit_complete(&self, file_name: &str, markdown_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {}  {}",
            green("✔"),
            bold(file_name),
            dim(&format!("{markdown_len} chars of Markdown")),
        );
    }

    fn on_submit_error(&self, file_name: &str, error: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}  {}", red("✘"), bold(file_name), red(error));
    }
}

fn human_size(bytes: usize) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{b} B"),
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a PDF, Markdown to stdout
  doc2md report.pdf

  # Convert a scanned image to a file
  doc2md scan.png -o scan.md

  # Convert and copy the result to the clipboard
  doc2md --copy invoice.jpg

  # Final session state as JSON
  doc2md --json report.pdf > session.json

  # Watch every state change (JSON lines on stderr)
  doc2md --events report.pdf

  # The interactive page: open, convert, copy, show
  doc2md --interactive

INTERACTIVE COMMANDS:
  open <path>   choose the file to upload (.pdf, .png, .jpg, .jpeg)
  convert       send it to the conversion endpoint (runs in the background)
  copy          copy the output to the clipboard
  show          draw the page
  status        print the session as JSON
  help          list commands
  quit          leave

ENVIRONMENT VARIABLES:
  DOC2MD_ENDPOINT   Conversion endpoint (default: https://llm.arc53.com/doc2md)
  DOC2MD_THEME      light or dark
  RUST_LOG          Override the log filter (e.g. doc2md=debug)
"#;

/// Convert PDFs and images to Markdown with a remote conversion service.
#[derive(Parser, Debug)]
#[command(
    name = "doc2md",
    version,
    about = "Convert PDFs and images into structured Markdown",
    long_about = "Upload a PDF or image file to a document-conversion endpoint and print the \
Markdown it returns. Run with --interactive for a terminal rendition of the Doc2MD page.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF or image file to convert.
    #[arg(required_unless_present = "interactive")]
    input: Option<PathBuf>,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "DOC2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Copy the Markdown to the system clipboard after a successful conversion.
    #[arg(long, env = "DOC2MD_COPY")]
    copy: bool,

    /// Conversion endpoint URL.
    #[arg(long, env = "DOC2MD_ENDPOINT", default_value = doc2md::config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Whole-request timeout in seconds (0 = wait for the transport).
    #[arg(long, env = "DOC2MD_TIMEOUT", default_value_t = 0)]
    timeout: u64,

    /// Page theme: light or dark.
    #[arg(long, env = "DOC2MD_THEME", value_enum, default_value = "light")]
    theme: ThemeArg,

    /// Print the final session as JSON instead of Markdown.
    #[arg(long, env = "DOC2MD_JSON")]
    json: bool,

    /// Print every session change as a JSON line on stderr.
    #[arg(long, env = "DOC2MD_EVENTS")]
    events: bool,

    /// Run the interactive page on stdin.
    #[arg(short, long)]
    interactive: bool,

    /// Disable the spinner.
    #[arg(long, env = "DOC2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOC2MD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(v: ThemeArg) -> Self {
        match v {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner and the interactive page provide the feedback that
    // matters; library INFO logs would only interleave with them.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.interactive;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.interactive {
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

    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn SubmitProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress)?;

    if cli.interactive {
        let controller =
            ConversionController::from_config(config).context("Failed to set up the client")?;
        return run_interactive(controller).await;
    }

    run_once(&cli, config).await
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ClientConfig> {
    let timeout = (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout));
    let mut builder = ClientConfig::builder()
        .endpoint(&cli.endpoint)
        .request_timeout(timeout)
        .theme(cli.theme.into());
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}

// ── One-shot mode ────────────────────────────────────────────────────────────

async fn run_once(cli: &Cli, config: ClientConfig) -> Result<()> {
    let input = cli
        .input
        .as_ref()
        .context("No input file given (use --interactive for the page)")?;

    let file = UploadFile::from_path(input)
        .await
        .with_context(|| format!("Failed to open {}", input.display()))?;
    if !file.is_accepted() && !cli.quiet {
        eprintln!(
            "{} {} is not one of {}; sending it anyway",
            cyan("⚠"),
            bold(&file.name),
            doc2md::upload::accept_hint()
        );
    }

    let controller =
        ConversionController::from_config(config).context("Failed to set up the client")?;

    let events = cli.events.then(|| {
        let mut updates = distinct_updates(&controller);
        tokio::spawn(async move {
            while let Some(snap) = updates.next().await {
                if let Ok(line) = serde_json::to_string(&snap) {
                    eprintln!("{line}");
                }
            }
        })
    });

    let status = controller.submit_file(file).await?;

    let copied = if status == Status::Succeeded && cli.copy {
        Some(controller.copy_result().await)
    } else {
        None
    };
    let snapshot = controller.snapshot();
    drop(controller);
    if let Some(events) = events {
        events.await.ok();
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("Failed to serialise session")?
        );
    } else if status == Status::Succeeded {
        if let Some(ref path) = cli.output {
            doc2md::write_markdown(path, &snapshot.markdown)
                .await
                .context("Failed to write output")?;
            if !cli.quiet {
                eprintln!(
                    "{}  {} chars  →  {}",
                    green("✔"),
                    snapshot.markdown.len(),
                    bold(&path.display().to_string())
                );
            }
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(snapshot.markdown.as_bytes())
                .context("Failed to write to stdout")?;
            handle.flush().ok();
        }
    }

    if let Some(outcome) = copied {
        if !cli.quiet {
            match outcome {
                CopyOutcome::Copied => eprintln!("{} copied to clipboard", green("✔")),
                _ => eprintln!("{}", dim("clipboard not available; nothing copied")),
            }
        }
    }

    if status == Status::Failed {
        anyhow::bail!("Conversion failed: {}", snapshot.error_message);
    }
    Ok(())
}

// ── Interactive page ─────────────────────────────────────────────────────────

const INTERACTIVE_HELP: &str =
    "commands: open <path> | convert | copy | show | status | help | quit";

async fn run_interactive(controller: ConversionController) -> Result<()> {
    let theme = controller.config().theme;
    print_page(&controller.snapshot(), theme);
    println!("{}", dim(INTERACTIVE_HELP));

    // Announce transitions as they happen, including the timed ones.
    let mut updates = distinct_updates(&controller);
    let announcer = tokio::spawn(async move {
        let mut last: Option<SessionSnapshot> = None;
        while let Some(snap) = updates.next().await {
            if let Some(ref prev) = last {
                announce(prev, &snap);
            }
            last = Some(snap);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
        match cmd {
            "" => {}
            "open" => open_file(&controller, arg.trim()).await,
            "convert" => start_convert(&controller),
            "copy" => match controller.copy_result().await {
                CopyOutcome::Skipped => println!("{}", dim("nothing to copy yet")),
                CopyOutcome::Copied => {}
                CopyOutcome::Failed => {}
            },
            "show" => print_page(&controller.snapshot(), theme),
            "status" => println!(
                "{}",
                serde_json::to_string_pretty(&controller.snapshot())
                    .context("Failed to serialise session")?
            ),
            "help" => println!("{}", dim(INTERACTIVE_HELP)),
            "quit" | "exit" => break,
            other => println!("{} unknown command '{other}'", red("?")),
        }
        prompt();
    }

    announcer.abort();
    Ok(())
}

fn prompt() {
    print!("{} ", cyan("doc2md>"));
    io::stdout().flush().ok();
}

async fn open_file(controller: &ConversionController, path: &str) {
    if path.is_empty() {
        println!("{} usage: open <path>", red("?"));
        return;
    }
    match UploadFile::from_path(path).await {
        Ok(file) => {
            let note = if file.is_accepted() {
                String::new()
            } else {
                format!("  {}", cyan("(not a PDF/PNG/JPEG; will be sent anyway)"))
            };
            println!(
                "selected {}  {}{}",
                bold(&file.name),
                dim(&format!("{}, {}", file.mime_type, human_size(file.len()))),
                note
            );
            controller.select_file(file);
        }
        Err(e) => println!("{} {}", red("✘"), e),
    }
}

/// Fire the request in the background; the page stays responsive.
fn start_convert(controller: &ConversionController) {
    let controller = controller.clone();
    tokio::spawn(async move {
        match controller.submit().await {
            Ok(_) => {}
            Err(e @ (Doc2MdError::NoFileSelected | Doc2MdError::SubmissionInProgress)) => {
                println!("\n{} {}", cyan("⚠"), e);
                prompt();
            }
            Err(e) => {
                println!("\n{} {}", red("✘"), e);
                prompt();
            }
        }
    });
}

/// Print what changed, then re-prompt.
fn announce(prev: &SessionSnapshot, next: &SessionSnapshot) {
    let lines = transition_lines(prev, next);
    for line in &lines {
        println!("\n{line}");
    }
    if !lines.is_empty() {
        prompt();
    }
}

/// One line per visible change.
fn transition_lines(prev: &SessionSnapshot, next: &SessionSnapshot) -> Vec<String> {
    let mut lines = Vec::new();
    let just_failed = prev.status != next.status && next.status == Status::Failed;
    if prev.status != next.status {
        match next.status {
            Status::Submitting => lines.push(format!("{} converting…", cyan("◆"))),
            Status::Succeeded => lines.push(format!(
                "{} done: {} chars (type `show` to view, `copy` to copy)",
                green("✔"),
                next.markdown.len()
            )),
            Status::Failed => {
                let reason = render::error_banner(next).unwrap_or("conversion failed");
                lines.push(format!("{} {}", red("✘"), red(reason)));
            }
            Status::Idle => {}
        }
    }
    if prev.error_message != next.error_message && !just_failed {
        if next.error_message.is_empty() {
            lines.push(dim("(error cleared)"));
        } else {
            lines.push(format!("{} {}", red("✘"), red(&next.error_message)));
        }
    }
    if prev.copy_feedback_active != next.copy_feedback_active {
        lines.push(if next.copy_feedback_active {
            green("✔ copied")
        } else {
            dim("⧉ copy")
        });
    }
    lines
}

fn print_page(snap: &SessionSnapshot, theme: Theme) {
    let width = terminal_width();
    let rule = dim(&"─".repeat(width));

    println!("{}", bold(render::PAGE_TITLE));
    println!("{}", render::PAGE_SUBTITLE);
    println!();
    println!("{} {}", bold(render::UPLOAD_HEADING), dim(&doc2md::upload::accept_hint()));
    match snap.selected_file {
        Some(ref f) => println!("  file: {}  {}", f.name, dim(&human_size(f.size))),
        None => println!("  file: {}", dim("(none selected)")),
    }

    let submit = render::submit_control(snap, theme);
    let label = match submit.label() {
        Some(label) => format!("[ {label} ]"),
        None => "[  ⠿  ]".to_string(),
    };
    let label = match submit.variant {
        doc2md::ButtonVariant::Default => bold(&label),
        doc2md::ButtonVariant::Secondary => cyan(&label),
    };
    println!("  {label}");
    if let Some(err) = render::error_banner(snap) {
        println!("  {}", red(err));
    }

    println!();
    let copy = match render::copy_control(snap) {
        Some(CopyIcon::Copy) => dim("⧉ copy"),
        Some(CopyIcon::CheckMark) => green("✔ copied"),
        None => String::new(),
    };
    println!("{}  {}", bold(render::OUTPUT_HEADING), copy);
    println!("{rule}");
    let pane = render::output_pane(snap);
    match pane {
        OutputPane::Markdown(md) => {
            print!("{md}");
            if !md.ends_with('\n') {
                println!();
            }
        }
        OutputPane::Placeholder => println!("{}", italic(&pane.to_text(width))),
        OutputPane::Skeleton { .. } => print!("{}", dim(&pane.to_text(width))),
    }
    println!("{rule}");
}

fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(72)
        .clamp(20, 160)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(status: Status, error: &str) -> SessionSnapshot {
        SessionSnapshot {
            status,
            markdown: String::new(),
            error_message: error.into(),
            copy_feedback_active: false,
            selected_file: None,
        }
    }

    #[test]
    fn failure_without_message_is_still_announced() {
        let lines = transition_lines(&snap(Status::Submitting, ""), &snap(Status::Failed, ""));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("conversion failed"), "got: {lines:?}");
    }

    #[test]
    fn failure_with_message_is_announced_once() {
        let lines = transition_lines(
            &snap(Status::Submitting, ""),
            &snap(Status::Failed, "Failed to upload file"),
        );
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Failed to upload file"));
    }

    #[test]
    fn repeated_failure_with_same_banner_is_announced() {
        let lines = transition_lines(
            &snap(Status::Submitting, "timeout"),
            &snap(Status::Failed, "timeout"),
        );
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("timeout"));
    }

    #[test]
    fn banner_clearing_is_announced() {
        let lines = transition_lines(&snap(Status::Failed, "timeout"), &snap(Status::Failed, ""));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("error cleared"));
    }

    #[test]
    fn human_size_units() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }
}
