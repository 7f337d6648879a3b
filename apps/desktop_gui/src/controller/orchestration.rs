//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd`; returns false (and explains why in `status`) when the backend
/// cannot take it.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;
    use shared::domain::Code;

    use super::*;

    fn lookup() -> BackendCommand {
        BackendCommand::Lookup {
            code: Code::parse("ABC").expect("code"),
        }
    }

    #[test]
    fn queues_command_when_backend_is_listening() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();

        assert!(dispatch_backend_command(&tx, lookup(), &mut status));
        assert!(matches!(rx.try_recv(), Ok(BackendCommand::Lookup { .. })));
        assert!(status.is_empty());
    }

    #[test]
    fn reports_full_queue() {
        let (tx, _rx) = bounded(1);
        let mut status = String::new();

        assert!(dispatch_backend_command(&tx, lookup(), &mut status));
        assert!(!dispatch_backend_command(&tx, lookup(), &mut status));
        assert!(status.contains("queue is full"));
    }

    #[test]
    fn reports_disconnected_backend() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut status = String::new();

        assert!(!dispatch_backend_command(&tx, lookup(), &mut status));
        assert!(status.contains("disconnected"));
    }
}
