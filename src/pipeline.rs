//! Per-symbol worker pipeline.
//!
//! Each monitored symbol gets one task owning one detector and its buffers;
//! snapshots arrive on that symbol's inbound channel and emitted signals go
//! out on a shared outbound channel. No state is shared across symbols, so
//! N symbols run as N independent pipelines. Dropping a symbol's sender
//! ends its worker; there is no in-flight work to cancel.

use crate::config::EngineConfig;
use crate::detector::ReversalDetector;
use crate::error::EngineError;
use crate::models::{MarketSnapshot, Signal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Spawn one worker task for a symbol. The worker consumes snapshots until
/// the sender side is dropped, forwarding every emitted signal.
pub fn spawn_symbol_worker(
    symbol: String,
    cfg: EngineConfig,
    mut snapshots: mpsc::Receiver<MarketSnapshot>,
    signals: mpsc::Sender<Signal>,
) -> Result<JoinHandle<()>, EngineError> {
    let mut detector = ReversalDetector::new(symbol.clone(), cfg)?;
    let handle = tokio::spawn(async move {
        info!(symbol = %symbol, "symbol worker started");
        let mut processed: u64 = 0;
        while let Some(snapshot) = snapshots.recv().await {
            processed += 1;
            if let Some(signal) = detector.update(&snapshot) {
                if let Err(e) = signals.send(signal).await {
                    error!(symbol = %symbol, error = %e, "signal consumer gone");
                    break;
                }
            }
        }
        info!(symbol = %symbol, processed, "symbol worker stopped");
    });
    Ok(handle)
}
