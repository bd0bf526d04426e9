//! Transient user notices (PRD-14).
//!
//! One background task owns the notice queue outright. Views and flows
//! talk to it through commands and observe it through watch snapshots, so
//! there is exactly one writer and the 5 second lifetime cannot race with
//! renders. Notices carry no routing or styling; severity is the only
//! hint a view gets.

use std::time::Duration;

use canopy_core::types::Timestamp;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// How long a notice stays up unless dismissed first.
pub const NOTICE_TTL: Duration = Duration::from_millis(5000);

/// Visual weight of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// One on-screen notice.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Strictly increasing across the notifier's lifetime; dismissal is
    /// addressed by id, never by position.
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub created_at: Timestamp,
}

enum Command {
    Publish { message: String, severity: Severity },
    Dismiss { id: u64 },
    /// Sent by a notice's own timer when its lifetime elapses.
    Expire { id: u64 },
}

/// Handle to the notice queue.
///
/// Dropping the handle cancels the owning task and every pending timer.
pub struct Notifier {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<Vec<Notice>>,
    cancel: CancellationToken,
}

impl Notifier {
    /// Spawn the owning task on the current runtime.
    pub fn spawn() -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot) = watch::channel(Vec::new());
        let cancel = CancellationToken::new();

        tokio::spawn(run(
            command_rx,
            commands.clone(),
            snapshot_tx,
            cancel.clone(),
        ));

        Self {
            commands,
            snapshot,
            cancel,
        }
    }

    pub fn publish(&self, severity: Severity, message: impl Into<String>) {
        // A send error only means the task is already shut down.
        let _ = self.commands.send(Command::Publish {
            message: message.into(),
            severity,
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(Severity::Error, message);
    }

    /// Remove a notice ahead of its timer. Unknown ids are a no-op, so a
    /// dismiss racing an expiry is harmless.
    pub fn dismiss(&self, id: u64) {
        let _ = self.commands.send(Command::Dismiss { id });
    }

    /// Receiver over queue snapshots, insertion-ordered.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notice>> {
        self.snapshot.clone()
    }

    /// Current queue contents.
    pub fn current(&self) -> Vec<Notice> {
        self.snapshot.borrow().clone()
    }

    /// Stop the owning task and all pending expiry timers.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// The owning task: single writer of the queue.
async fn run(
    mut commands: mpsc::UnboundedReceiver<Command>,
    command_tx: mpsc::UnboundedSender<Command>,
    snapshot: watch::Sender<Vec<Notice>>,
    cancel: CancellationToken,
) {
    let mut notices: Vec<Notice> = Vec::new();
    let mut next_id: u64 = 1;

    loop {
        let command = tokio::select! {
            // Cancellation wins over queued commands, so shutdown is
            // immediate rather than best-effort.
            biased;
            _ = cancel.cancelled() => break,
            cmd = commands.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };

        match command {
            Command::Publish { message, severity } => {
                let id = next_id;
                next_id += 1;
                notices.push(Notice {
                    id,
                    message,
                    severity,
                    created_at: chrono::Utc::now(),
                });

                // Each notice gets its own timer measured from its own
                // creation; a later notice never extends an earlier one.
                let timer_tx = command_tx.clone();
                let timer_cancel = cancel.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = timer_cancel.cancelled() => {}
                        _ = tokio::time::sleep(NOTICE_TTL) => {
                            let _ = timer_tx.send(Command::Expire { id });
                        }
                    }
                });

                snapshot.send_replace(notices.clone());
            }
            Command::Dismiss { id } | Command::Expire { id } => {
                let before = notices.len();
                notices.retain(|n| n.id != id);
                if notices.len() != before {
                    snapshot.send_replace(notices.clone());
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
