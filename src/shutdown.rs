//! Interrupt handling for a running command.
//!
//! A command is raced against SIGINT/SIGTERM. When the signal wins, the
//! command future is dropped (which kills any build step it was running) and
//! the cleanup hook runs before the caller exits.

use std::future::{Future, pending};

/// How a guarded command ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// The command ran to completion
    Finished(T),
    /// An interrupt arrived first; the cleanup hook has run
    Interrupted,
}

/// Runs `task` until it finishes or `interrupt` resolves.
///
/// `on_interrupt` only runs in the second case.
pub async fn run_with_hook<F, S, H, HF>(task: F, interrupt: S, on_interrupt: H) -> Completion<F::Output>
where
    F: Future,
    S: Future<Output = ()>,
    H: FnOnce() -> HF,
    HF: Future<Output = ()>,
{
    let finished = tokio::select! {
        biased;
        output = task => Some(output),
        () = interrupt => None,
    };

    match finished {
        Some(output) => Completion::Finished(output),
        None => {
            tracing::warn!("Interrupted, running shutdown hook");
            on_interrupt().await;
            Completion::Interrupted
        }
    }
}

/// Resolves on the first SIGINT or SIGTERM delivered to this process.
///
/// A signal whose handler cannot be installed is ignored; the other one
/// still fires.
pub async fn interrupt_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            pending::<()>().await;
        }
    };

    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
