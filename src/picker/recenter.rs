//! Deferred re-center after mount.
//!
//! The host's first layout pass can reset the scroll position, so the picker
//! re-applies its initial offset once after a short delay. The delay runs on
//! a spawned tokio timer that posts a command back to the owning event loop;
//! the loop applies commands synchronously and in order.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Commands posted back to the event loop that owns a picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerCommand {
    /// Scroll the picker with this id back to its committed value.
    Recenter { picker: Uuid },
}

impl PickerCommand {
    pub fn picker_id(&self) -> Uuid {
        match self {
            Self::Recenter { picker } => *picker,
        }
    }
}

pub type CommandSender = mpsc::UnboundedSender<PickerCommand>;
pub type CommandReceiver = mpsc::UnboundedReceiver<PickerCommand>;

/// Create the command channel an event loop drains.
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    mpsc::unbounded_channel()
}

/// A pending re-center. Dropping it cancels the timer.
#[derive(Debug)]
pub struct RecenterTimer {
    handle: JoinHandle<()>,
}

impl RecenterTimer {
    /// Spawn the timer on the current tokio runtime.
    ///
    /// Returns `None` when called outside a runtime; the caller then
    /// re-centers immediately.
    pub fn spawn(picker: Uuid, delay: Duration, tx: CommandSender) -> Option<Self> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the wizard was torn down.
            let _ = tx.send(PickerCommand::Recenter { picker });
        });
        Some(Self { handle })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for RecenterTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
