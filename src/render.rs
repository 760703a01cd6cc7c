//! What the page shows for a given session.
//!
//! The page has four live regions: the submit control, the error banner
//! under the form, the copy control next to the output heading, and the
//! output pane. Each is a pure function of the session (and, for the
//! submit control, the theme), so any front end renders the same thing.
//!
//! | status     | output pane                                 |
//! |------------|---------------------------------------------|
//! | Idle       | placeholder prompt                          |
//! | Submitting | [`SKELETON_BLOCKS`] skeleton blocks         |
//! | Succeeded  | the Markdown, verbatim                      |
//! | Failed     | unchanged: prior Markdown or the placeholder |

use crate::config::{ButtonVariant, Theme};
use crate::session::{SessionSnapshot, Status};

pub const PAGE_TITLE: &str = "Documents to Markdown";
pub const PAGE_SUBTITLE: &str = "Convert PDFs and Images into structured Markdown";
pub const UPLOAD_HEADING: &str = "Upload PDF or Image File";
pub const OUTPUT_HEADING: &str = "Output";
pub const SUBMIT_LABEL: &str = "Convert";
pub const PLACEHOLDER: &str = "Your markdown output will appear here..";

/// Number of skeleton blocks shown while a conversion is running.
pub const SKELETON_BLOCKS: usize = 6;

/// Relative widths of the bars inside one skeleton block.
const SKELETON_LINE_WIDTHS: [(usize, usize); 4] = [(1, 1), (1, 1), (3, 4), (1, 2)];

/// The output pane's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPane<'a> {
    Placeholder,
    Skeleton { blocks: usize },
    Markdown(&'a str),
}

impl OutputPane<'_> {
    /// Literal text of the pane for a terminal `width` columns wide.
    ///
    /// Markdown is returned untouched; no escaping, wrapping or trimming.
    pub fn to_text(&self, width: usize) -> String {
        match self {
            OutputPane::Placeholder => PLACEHOLDER.to_string(),
            OutputPane::Skeleton { blocks } => skeleton_text(*blocks, width),
            OutputPane::Markdown(md) => (*md).to_string(),
        }
    }
}

/// The submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitControl {
    pub variant: ButtonVariant,
    pub busy: bool,
}

impl SubmitControl {
    /// The label, or `None` while the spinner replaces it.
    pub fn label(&self) -> Option<&'static str> {
        (!self.busy).then_some(SUBMIT_LABEL)
    }
}

/// Icon shown by the copy control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyIcon {
    Copy,
    CheckMark,
}

pub fn output_pane(session: &SessionSnapshot) -> OutputPane<'_> {
    match session.status {
        Status::Submitting => OutputPane::Skeleton {
            blocks: SKELETON_BLOCKS,
        },
        _ if !session.markdown.is_empty() => OutputPane::Markdown(&session.markdown),
        _ => OutputPane::Placeholder,
    }
}

/// Text under the form, if any.
pub fn error_banner(session: &SessionSnapshot) -> Option<&str> {
    (!session.error_message.is_empty()).then_some(session.error_message.as_str())
}

/// The copy control appears once there is output to copy.
pub fn copy_control(session: &SessionSnapshot) -> Option<CopyIcon> {
    if session.markdown.is_empty() {
        None
    } else if session.copy_feedback_active {
        Some(CopyIcon::CheckMark)
    } else {
        Some(CopyIcon::Copy)
    }
}

pub fn submit_control(session: &SessionSnapshot, theme: Theme) -> SubmitControl {
    SubmitControl {
        variant: theme.button_variant(),
        busy: session.is_loading(),
    }
}

fn skeleton_text(blocks: usize, width: usize) -> String {
    let width = width.max(8);
    let mut out = String::new();
    for block in 0..blocks {
        if block > 0 {
            out.push('\n');
        }
        for (num, den) in SKELETON_LINE_WIDTHS {
            out.push_str(&"░".repeat(width * num / den));
            out.push('\n');
        }
    }
    out
}
