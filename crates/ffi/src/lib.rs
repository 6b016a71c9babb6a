//! C ABI for the cirrus curtain classifier
//!
//! Instances are opaque `CirrusInstance` pointers created by `cirrus_new` and
//! released by `cirrus_destroy`. Every fallible entry point returns a
//! `CirrusErrorCode` (0 = success); details of the last failure on the calling
//! thread are available through `cirrus_get_last_error`.

mod control;
mod error;
mod helpers;
mod instance;
mod queries;

pub use control::{
    cirrus_pause, cirrus_reset, cirrus_run_to_convergence, cirrus_start, cirrus_step,
    CirrusRunState,
};
pub use error::{cirrus_get_last_error, cirrus_get_last_error_code, CirrusErrorCode};
pub use instance::{cirrus_destroy, cirrus_new, CirrusInstance};
pub use queries::{
    cirrus_copy_states, cirrus_get_cell, cirrus_get_dimensions, cirrus_get_iteration,
    cirrus_get_run_state, cirrus_get_stats, CellView, StatsView,
};
