//! Manual test tools for a board's Ethernet port: a periodic frame sender and a responder that
//! completes quotations sent by the board.
#![cfg(target_os = "linux")]

pub mod config;
mod error;
pub mod link;
pub mod logging;
pub mod quotes;
pub mod responder;
pub mod sender;

pub use error::ProbeError;

use std::future::Future;
use tokio::{runtime, signal};
use tracing::info;

/// A single-threaded runtime with the I/O and time drivers enabled.
pub fn runtime() -> Result<runtime::Runtime, ProbeError> {
    runtime::Builder::new()
        .basic_scheduler()
        .enable_all()
        .build()
        .map_err(|e| ProbeError::io("starting runtime", e))
}

/// Runs `task` until it finishes or the operator hits Ctrl-C.
pub async fn until_interrupted<F>(task: F) -> Result<(), ProbeError>
where
    F: Future<Output = Result<(), ProbeError>>,
{
    tokio::select! {
        result = task => result,
        interrupted = signal::ctrl_c() => {
            interrupted.map_err(|e| ProbeError::io("waiting for Ctrl-C", e))?;
            info!("program exiting gracefully");
            Ok(())
        }
    }
}
