use tokio::sync::oneshot;

use crate::{
    domain::entities::transaction::{QueueError, Transaction},
    errors::IapError,
};

pub(crate) type RestoreReply = oneshot::Sender<Result<Vec<Transaction>, IapError>>;

struct RestoreSession {
    reply: RestoreReply,
    accumulated: Vec<Transaction>,
}

/// Holds the single active "restore purchases" session.
///
/// A terminal event fires at most once per session and clears the slot;
/// restored transactions delivered afterwards accumulate nowhere.
#[derive(Default)]
pub(crate) struct RestoreSessionSlot {
    active: Option<RestoreSession>,
}

impl RestoreSessionSlot {
    /// Installs a new session. Fails when one is already in flight rather
    /// than silently orphaning its caller.
    pub fn begin(&mut self, reply: RestoreReply) -> Result<(), RestoreReply> {
        if self.active.is_some() {
            return Err(reply);
        }
        self.active = Some(RestoreSession {
            reply,
            accumulated: Vec::new(),
        });
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Drops everything accumulated so far. Called at the start of every
    /// event batch, not only at session boundaries: restored transactions
    /// split across batches before the terminal event are lost. This
    /// mirrors the upstream behavior exactly; see DESIGN.md.
    pub fn clear_accumulated(&mut self) {
        if let Some(session) = self.active.as_mut() {
            session.accumulated.clear();
        }
    }

    pub fn accumulate(&mut self, transaction: Transaction) {
        if let Some(session) = self.active.as_mut() {
            session.accumulated.push(transaction);
        }
    }

    /// Resolves the session with everything accumulated, possibly empty.
    pub fn finish(&mut self) {
        if let Some(session) = self.active.take() {
            tracing::info!(
                restored = session.accumulated.len(),
                "restore completed transactions finished"
            );
            let _ = session.reply.send(Ok(session.accumulated));
        } else {
            tracing::debug!("restore finished event without an active session");
        }
    }

    pub fn fail(&mut self, error: QueueError) {
        if let Some(session) = self.active.take() {
            tracing::warn!(%error, "restore completed transactions failed");
            let _ = session.reply.send(Err(IapError::RestoreFailed(error)));
        } else {
            tracing::debug!(%error, "restore failed event without an active session");
        }
    }
}
