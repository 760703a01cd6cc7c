//! End-to-end tests against the hosted conversion endpoint.
//!
//! These make a live upload, so they are gated behind `E2E_ENABLED` and only
//! run when a sample document is available.
//!
//! Run with:
//!   E2E_ENABLED=1 DOC2MD_E2E_FILE=./test_cases/sample.pdf cargo test --test e2e -- --nocapture
//!
//! `DOC2MD_ENDPOINT` points the tests at a different deployment.

use doc2md::{convert, ClientConfig, ConversionController, OutputPane, Status, UploadFile};
use std::path::PathBuf;
use std::time::Duration;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn sample_file() -> PathBuf {
    std::env::var("DOC2MD_E2E_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases/sample.pdf"))
}

fn live_config() -> ClientConfig {
    let mut builder = ClientConfig::builder().request_timeout(Some(Duration::from_secs(180)));
    if let Ok(endpoint) = std::env::var("DOC2MD_ENDPOINT") {
        builder = builder.endpoint(endpoint);
    }
    builder.build().expect("live config")
}

/// Skip this test if E2E_ENABLED is not set *or* the sample file is missing.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — sample file not found: {}", p.display());
            println!("       Set DOC2MD_E2E_FILE to a PDF, PNG or JPEG");
            return;
        }
        p
    }};
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_live_convert_returns_markdown() {
    let path = e2e_skip_unless_ready!(sample_file());

    let md = convert(&path, &live_config()).await.expect("live conversion");

    println!("── {} → {} bytes of markdown", path.display(), md.len());
    println!("{}", md.chars().take(400).collect::<String>());
    assert!(!md.trim().is_empty(), "service returned empty markdown");
}

#[tokio::test]
async fn test_live_session_reaches_succeeded() {
    let path = e2e_skip_unless_ready!(sample_file());

    let controller = ConversionController::from_config(live_config()).expect("controller");
    let file = UploadFile::from_path(&path).await.expect("read sample");
    let status = controller.submit_file(file).await.expect("submit");

    assert_eq!(
        status,
        Status::Succeeded,
        "error banner: {:?}",
        controller.error_message()
    );
    assert_eq!(controller.error_message(), "");

    let snap = controller.snapshot();
    match doc2md::render::output_pane(&snap) {
        OutputPane::Markdown(md) => assert_eq!(md, controller.markdown()),
        other => panic!("expected markdown pane, got {other:?}"),
    }
}
