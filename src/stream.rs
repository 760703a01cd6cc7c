//! Session updates as a `Stream`.
//!
//! Every transition the controller makes (selection, `Submitting`, the
//! outcome, the error banner clearing, copy feedback on and off) is
//! published through its `watch` channel. [`session_updates`] adapts that
//! channel into a stream of [`SessionSnapshot`]s so a front end can redraw
//! from a single `while let Some(..) = stream.next().await` loop.
//!
//! `watch` keeps only the latest value: a slow consumer sees the newest
//! state rather than every intermediate one, which is exactly what a
//! renderer wants.

use crate::controller::ConversionController;
use crate::session::SessionSnapshot;
use futures::stream::StreamExt;
use std::pin::Pin;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::Stream;

/// A boxed stream of session snapshots.
pub type SessionStream = Pin<Box<dyn Stream<Item = SessionSnapshot> + Send>>;

/// Stream the controller's session, starting with its current state.
///
/// The stream ends once every clone of the controller has been dropped.
pub fn session_updates(controller: &ConversionController) -> SessionStream {
    WatchStream::new(controller.subscribe())
        .map(|session| session.snapshot())
        .boxed()
}

/// Like [`session_updates`] but only yields when something visible changed.
///
/// The controller's internal bookkeeping (timer epochs) bumps the channel
/// without changing what a user would see; this filters those out.
pub fn distinct_updates(controller: &ConversionController) -> SessionStream {
    let mut last: Option<SessionSnapshot> = None;
    session_updates(controller)
        .filter_map(move |snap| {
            let changed = last.as_ref() != Some(&snap);
            if changed {
                last = Some(snap.clone());
            }
            futures::future::ready(changed.then_some(snap))
        })
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::UnavailableClipboard;
    use crate::config::ClientConfig;
    use crate::error::ConversionFailure;
    use crate::session::Status;
    use crate::transport::ConversionTransport;
    use crate::upload::UploadFile;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl ConversionTransport for Echo {
        async fn convert(&self, file: &UploadFile) -> Result<String, ConversionFailure> {
            Ok(format!("# {}", file.name))
        }
    }

    #[tokio::test]
    async fn stream_starts_with_current_state() {
        let c = ConversionController::new(
            ClientConfig::default(),
            Arc::new(Echo),
            Arc::new(UnavailableClipboard),
        );
        let mut updates = c.updates();
        let first = updates.next().await.unwrap();
        assert_eq!(first.status, Status::Idle);
    }

    #[tokio::test]
    async fn stream_sees_final_state_after_submit() {
        let c = ConversionController::new(
            ClientConfig::default(),
            Arc::new(Echo),
            Arc::new(UnavailableClipboard),
        );
        let mut updates = distinct_updates(&c);
        assert_eq!(updates.next().await.unwrap().status, Status::Idle);

        c.submit_file(UploadFile::from_bytes("doc.pdf", vec![1]))
            .await
            .unwrap();

        let latest = updates.next().await.unwrap();
        assert_eq!(latest.status, Status::Succeeded);
        assert_eq!(latest.markdown, "# doc.pdf");
    }

    #[tokio::test]
    async fn stream_ends_when_controller_dropped() {
        let c = ConversionController::new(
            ClientConfig::default(),
            Arc::new(Echo),
            Arc::new(UnavailableClipboard),
        );
        let mut updates = session_updates(&c);
        updates.next().await.unwrap();
        drop(c);
        assert!(updates.next().await.is_none());
    }
}
