//! src/eventbus/audit_logger.rs
//!
//! Spawns a task that receives audit entries over a channel and appends
//! them to the store. The reply path only ever enqueues; a failed write
//! is logged and dropped.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info, trace, warn};

use clinibot_common::models::AuditEntry;
use clinibot_common::traits::UserStore;
use crate::Error;

/// Commands understood by the audit task's main loop.
#[derive(Debug)]
pub enum AuditCommand {
    Record(AuditEntry),
    /// Signalled once every entry queued before it has been written.
    FlushNow(oneshot::Sender<()>),
}

/// Cheap-to-clone sender side of the audit task.
#[derive(Clone)]
pub struct AuditLoggerHandle {
    cmd_tx: mpsc::Sender<AuditCommand>,
}

impl AuditLoggerHandle {
    pub fn new(cmd_tx: mpsc::Sender<AuditCommand>) -> Self {
        Self { cmd_tx }
    }

    /// Queues an entry without waiting. A full queue or a stopped task
    /// loses the entry; the caller is never told.
    pub fn record(&self, entry: AuditEntry) {
        let action = entry.action;
        if let Err(e) = self.cmd_tx.try_send(AuditCommand::Record(entry)) {
            warn!("Dropping audit entry {}: {}", action, e);
        }
    }

    /// Waits until everything recorded so far has been handed to the store.
    pub async fn flush_now(&self) -> Result<(), Error> {
        trace!("AuditLoggerHandle: flush_now() called.");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(AuditCommand::FlushNow(reply_tx))
            .await
            .map_err(|_| Error::AuditLog("audit logger task is not running".into()))?;
        reply_rx
            .await
            .map_err(|_| Error::AuditLog("audit logger flush was dropped".into()))
    }
}

/// Starts the writer. The task ends once every handle has been dropped
/// and the queue is drained.
pub fn spawn_audit_logger(
    store: Arc<dyn UserStore>,
    buffer_size: usize,
) -> (AuditLoggerHandle, JoinHandle<()>) {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<AuditCommand>(buffer_size.max(1));

    let handle = tokio::spawn(async move {
        info!("Audit logger task started with buffer_size={}", buffer_size);
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                AuditCommand::Record(entry) => {
                    if let Err(e) = store.append_audit(&entry).await {
                        error!(
                            "Audit write failed for user {} action {}: {:?}",
                            entry.user_id, entry.action, e
                        );
                    }
                }
                AuditCommand::FlushNow(reply) => {
                    let _ = reply.send(());
                }
            }
        }
        info!("Audit logger task exited.");
    });

    (AuditLoggerHandle::new(cmd_tx), handle)
}
