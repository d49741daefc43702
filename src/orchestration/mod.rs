//! Contract evaluation pipeline and the directory batch scanner built on it.

pub mod batch;
pub mod evaluator;

pub use batch::{run_batch, spawn_ctrl_c_listener, BatchError, BatchOptions, BatchSummary, ScanRow, ScanStatus};
pub use evaluator::{ContractResult, Evaluator};
