//! Debounced stake simulation.
//!
//! The stake form pushes a draft on every edit; the simulate endpoint is
//! called only once the drafts have been quiet for the debounce period.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

use super::client::DashboardSource;
use crate::state::SimulationView;
use crate::units::apt_to_octas;

/// Current contents of the stake form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeDraft {
    /// APT amount as typed.
    pub amount: String,
    pub duration_seconds: u64,
}

/// Handle to the simulation task. Dropping it stops the task.
pub struct Simulator {
    drafts: mpsc::UnboundedSender<StakeDraft>,
    /// Latest preview; `None` while the amount is empty or zero.
    pub preview: watch::Receiver<Option<SimulationView>>,
    task: JoinHandle<()>,
}

impl Simulator {
    pub fn spawn<S: DashboardSource>(source: Arc<S>, debounce: Duration) -> Self {
        let (drafts, rx) = mpsc::unbounded_channel();
        let (tx, preview) = watch::channel(None);
        let task = tokio::spawn(run(source, debounce, rx, tx));
        Self {
            drafts,
            preview,
            task,
        }
    }

    /// Queues a draft for simulation. Returns `false` once the task has
    /// stopped and the draft can no longer be previewed.
    pub fn update(&self, draft: StakeDraft) -> bool {
        if let Err(err) = self.drafts.send(draft) {
            tracing::debug!(amount = %err.0.amount, "simulation task stopped, draft dropped");
            return false;
        }
        true
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<S: DashboardSource>(
    source: Arc<S>,
    debounce: Duration,
    mut drafts: mpsc::UnboundedReceiver<StakeDraft>,
    preview: watch::Sender<Option<SimulationView>>,
) {
    while let Some(first) = drafts.recv().await {
        let mut latest = first;
        let quiet = sleep(debounce);
        tokio::pin!(quiet);

        loop {
            tokio::select! {
                _ = &mut quiet => break,
                next = drafts.recv() => match next {
                    Some(draft) => {
                        latest = draft;
                        quiet.as_mut().reset(Instant::now() + debounce);
                    }
                    None => return,
                },
            }
        }

        let amount = match apt_to_octas(&latest.amount) {
            Ok(octas) if octas > 0 => octas,
            _ => {
                preview.send_replace(None);
                continue;
            }
        };

        match source.simulate(amount, latest.duration_seconds).await {
            Ok(view) => {
                preview.send_replace(Some(view));
            }
            Err(err) => tracing::warn!(error = %err, amount, "stake simulation failed"),
        }
    }
}
