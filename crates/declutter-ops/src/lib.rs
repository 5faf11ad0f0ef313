//! Plan building and execution for declutter.
//!
//! The planner turns analysis results into an [`OperationPlan`], a plain
//! list of move/delete operations scoped to one root. The executor replays
//! a plan against the filesystem; by default it runs dry, reporting what
//! would happen without touching anything. Only [`ExecuteOptions::commit`]
//! makes a plan take effect.

mod executor;
mod operation;
mod planner;
mod report;

pub use executor::{ExecuteOptions, Executor};
pub use operation::{Operation, OperationPlan, PlanError};
pub use planner::{KeepPolicy, Planner, DEFAULT_DATE_FORMAT};
pub use report::{ExecutionReport, OperationOutcome, OperationStatus};

pub use declutter_core::{FileRecord, ScanError, Snapshot};
