//! Run context passed into nodes.
//!
//! Lets a node tag its logs with the run id and observe cancellation around its own I/O.

use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
pub struct RunContext {
    /// Correlation id of the current run.
    pub run_id: String,
    /// Step being executed.
    pub step: String,
    /// 1-based count of node invocations in this run, including the current one.
    pub iteration: usize,
    /// Fires when the run is cancelled or hits its deadline. Child of the caller's token, if any.
    pub cancel: CancellationToken,
}
