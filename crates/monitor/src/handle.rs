use anyhow::Result;
use tokio::sync::{mpsc, oneshot};

use tapewatch_core::{InstrumentKey, WatchReport};
use tapewatch_signals::AddReport;

use crate::commands::WatchCommand;

/// Cloneable handle to the detector actor.
#[derive(Clone)]
pub struct WatchHandle {
    tx: mpsc::Sender<WatchCommand>,
}

impl WatchHandle {
    #[must_use]
    pub const fn new(tx: mpsc::Sender<WatchCommand>) -> Self {
        Self { tx }
    }

    /// Start watching the given instrument specs.
    ///
    /// # Errors
    /// Returns an error if the actor is unreachable or a spec is
    /// unparseable.
    pub async fn watch(&self, specs: Vec<String>) -> Result<AddReport> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(WatchCommand::Watch {
                specs,
                respond_to: tx,
            })
            .await?;
        Ok(rx.await??)
    }

    /// Snapshot of every watched instrument, on demand.
    ///
    /// # Errors
    /// Returns an error if the actor is unreachable.
    pub async fn snapshot(&self) -> Result<WatchReport> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(WatchCommand::Snapshot { respond_to: tx })
            .await?;
        Ok(rx.await?)
    }

    /// Normalized return series for one instrument, oldest first.
    ///
    /// # Errors
    /// Returns an error if the actor is unreachable, the instrument is
    /// unknown, or it has no usable history.
    pub async fn relative_series(&self, key: InstrumentKey) -> Result<Vec<f64>> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(WatchCommand::RelativeSeries {
                key,
                respond_to: tx,
            })
            .await?;
        Ok(rx.await??)
    }

    /// Stop the detector at its next loop boundary.
    ///
    /// # Errors
    /// Returns an error if the actor has already stopped.
    pub async fn shutdown(&self) -> Result<()> {
        self.tx.send(WatchCommand::Shutdown).await?;
        Ok(())
    }
}
