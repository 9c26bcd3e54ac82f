//! Периодическое автосохранение черновика.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::api::BlogApi;
use crate::blog_editor::{BlogEditorSession, SaveMode, SaveOutcome};

/// Интервал автосохранения по умолчанию.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Фоновая задача автосохранения.
///
/// Первое сохранение происходит через один период после запуска.
#[derive(Debug)]
pub struct Autosave {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl Autosave {
    /// Запускает автосохранение сессии с периодом `period`.
    pub fn spawn<A>(session: Arc<BlogEditorSession<A>>, period: Duration) -> Self
    where
        A: BlogApi + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        match session.save(SaveMode::Auto).await {
                            SaveOutcome::Skipped => tracing::debug!("autosave skipped: save in flight"),
                            outcome => tracing::debug!(?outcome, "autosave tick"),
                        }
                    }
                }
            }
            tracing::debug!("autosave stopped");
        });

        Self {
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    /// Останавливает таймер и дожидается завершения текущего сохранения.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(err) = (&mut self.handle).await {
            tracing::warn!(error = %err, "autosave task ended abnormally");
        }
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        if self.shutdown.is_some() {
            self.handle.abort();
        }
    }
}
