//! # doc2md
//!
//! Upload a PDF or image to a document-conversion service and get Markdown
//! back.
//!
//! The crate is the client side of the Doc2MD page: one file picker, one
//! Convert button, one output pane. The interesting part is the small state
//! machine around the single network call: a loading state while the request
//! runs, an error banner that clears itself after three seconds, and a copy
//! button whose check mark disappears after two.
//!
//! ## Flow
//!
//! ```text
//! file
//!  │
//!  ├─ 1. Select   UploadFile { name, mime_type, bytes }
//!  ├─ 2. Submit   status → Submitting
//!  ├─ 3. POST     multipart field "file" → conversion endpoint
//!  ├─ 4. Outcome  2xx {"markdown": …} → Succeeded
//!  │              anything else       → Failed (banner, auto-clears)
//!  └─ 5. Copy     clipboard write → check mark, auto-clears
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2md::{ClientConfig, ConversionController, Status, UploadFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let controller = ConversionController::from_config(ClientConfig::default())?;
//!     let file = UploadFile::from_path("scan.png").await?;
//!
//!     match controller.submit_file(file).await? {
//!         Status::Succeeded => println!("{}", controller.markdown()),
//!         _ => eprintln!("error: {}", controller.error_message()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Or, when the session does not matter:
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), doc2md::Doc2MdError> {
//! let markdown = doc2md::convert("report.pdf", &doc2md::ClientConfig::default()).await?;
//! # Ok(()) }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2md` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `system-clipboard` | on | Copy to the OS clipboard through arboard |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod clipboard;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod progress;
pub mod render;
pub mod session;
pub mod stream;
pub mod timer;
pub mod transport;
pub mod upload;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use clipboard::{Clipboard, SystemClipboard, UnavailableClipboard};
pub use config::{ButtonVariant, ClientConfig, ClientConfigBuilder, Theme};
pub use controller::{ConversionController, CopyOutcome};
pub use convert::{convert, convert_file, convert_sync, convert_to_file, write_markdown};
pub use error::{ClipboardError, ConversionFailure, Doc2MdError};
pub use progress::{NoopProgressCallback, ProgressCallback, SubmitProgressCallback};
pub use render::{CopyIcon, OutputPane, SubmitControl};
pub use session::{ConversionSession, SessionSnapshot, Status};
pub use stream::{distinct_updates, session_updates, SessionStream};
pub use transport::{ConversionTransport, HttpTransport};
pub use upload::{FileSummary, UploadFile};
