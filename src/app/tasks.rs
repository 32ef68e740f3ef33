//! Spawning of API calls as background tasks.

use super::{AppEvent, TaskKind};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Wraps a future to catch panics and convert them to errors.
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic payload".to_string()
            }
        })
}

/// Run `work` on a new task and send the event it produces to `tx`.
///
/// A panic inside `work` is reported as [`AppEvent::TaskPanicked`] so the
/// controller can release whatever the task was holding.
pub(super) fn spawn_api_task<F>(
    tx: &mpsc::Sender<AppEvent>,
    task: TaskKind,
    work: F,
) -> JoinHandle<()>
where
    F: Future<Output = AppEvent> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match catch_task_panic(work).await {
            Ok(event) => event,
            Err(error) => {
                tracing::error!(task = %task, error = %error, "Background task panicked");
                AppEvent::TaskPanicked { task, error }
            }
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(task = %task, error = %e, "Failed to send task result (receiver dropped)");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catch_task_panic_ok() {
        assert_eq!(catch_task_panic(async { 5 }).await, Ok(5));
    }

    #[tokio::test]
    async fn test_catch_task_panic_messages() {
        let err = catch_task_panic(async { panic!("static message") })
            .await
            .unwrap_err();
        assert_eq!(err, "static message");

        let id = 9;
        let err = catch_task_panic(async move {
            if id > 0 {
                panic!("formatted {}", id);
            }
        })
        .await
        .unwrap_err();
        assert_eq!(err, "formatted 9");
    }

    #[tokio::test]
    async fn test_spawned_panic_becomes_event() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = spawn_api_task(&tx, TaskKind::Delete(2), async {
            panic!("boom")
        });
        handle.await.unwrap();

        match rx.recv().await {
            Some(AppEvent::TaskPanicked { task, error }) => {
                assert_eq!(task, TaskKind::Delete(2));
                assert_eq!(error, "boom");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawned_result_is_forwarded() {
        let (tx, mut rx) = mpsc::channel(4);
        spawn_api_task(&tx, TaskKind::Load, async {
            AppEvent::TodosLoaded(Ok(Vec::new()))
        })
        .await
        .unwrap();

        assert!(matches!(rx.recv().await, Some(AppEvent::TodosLoaded(Ok(v))) if v.is_empty()));
    }
}
