use cirrus_core::{ClassificationRun, RunState};

use crate::error::{CirrusErrorCode, DefaultCirrusError};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, with_run_mut};
use crate::instance::CirrusInstance;

/// Run lifecycle as seen from C.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CirrusRunState {
    /// Not iterating (fresh, paused, or reset).
    Idle = 0,
    /// Expansion steps may be taken.
    Running = 1,
    /// Growth stalled and finalization ran. Only `cirrus_reset` leaves this state.
    Converged = 2,
}

impl From<RunState> for CirrusRunState {
    fn from(state: RunState) -> Self {
        match state {
            RunState::Idle => CirrusRunState::Idle,
            RunState::Running => CirrusRunState::Running,
            RunState::Converged => CirrusRunState::Converged,
        }
    }
}

/// Begin (or resume) iterating.
///
/// Returns
/// - `CirrusErrorCode::Ok` (0) on success, also when already running
/// - `CirrusErrorCode::InvalidState` if the run has converged
/// - `CirrusErrorCode::NullPointer` if `ptr` is null
///
/// # Safety
///
/// `ptr` must be null or a valid pointer returned by `cirrus_new`.
#[no_mangle]
pub unsafe extern "C" fn cirrus_start(ptr: *const CirrusInstance) -> CirrusErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        with_run_mut(instance, ClassificationRun::start)??;
        Ok::<(), DefaultCirrusError>(())
    })
}

/// Stop iterating, keeping the grid and iteration counter. A no-op unless running.
///
/// # Safety
///
/// `ptr` must be null or a valid pointer returned by `cirrus_new`.
#[no_mangle]
pub unsafe extern "C" fn cirrus_pause(ptr: *const CirrusInstance) -> CirrusErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        with_run_mut(instance, ClassificationRun::pause)?;
        Ok::<(), DefaultCirrusError>(())
    })
}

/// Restore the initial curtain, return to idle, and zero the iteration counter.
///
/// # Safety
///
/// `ptr` must be null or a valid pointer returned by `cirrus_new`.
#[no_mangle]
pub unsafe extern "C" fn cirrus_reset(ptr: *const CirrusInstance) -> CirrusErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        with_run_mut(instance, ClassificationRun::reset)??;
        Ok::<(), DefaultCirrusError>(())
    })
}

/// Take a single expansion step (finalizing on the step that stalls).
///
/// - `out_changed` (optional) receives whether the step grew the anvil.
/// - `out_state` (optional) receives the run state after the step.
///
/// Returns
/// - `CirrusErrorCode::Ok` (0) on success
/// - `CirrusErrorCode::InvalidState` if the run is idle or converged
/// - `CirrusErrorCode::NullPointer` if `ptr` is null
///
/// # Safety
///
/// - `ptr` must be null or a valid pointer returned by `cirrus_new`.
/// - `out_changed` and `out_state`, if non-null, must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn cirrus_step(
    ptr: *const CirrusInstance,
    out_changed: *mut bool,
    out_state: *mut CirrusRunState,
) -> CirrusErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let outcome = with_run_mut(instance, ClassificationRun::step)??;

        unsafe {
            if !out_changed.is_null() {
                *out_changed = outcome.changed;
            }
            if !out_state.is_null() {
                *out_state = outcome.state.into();
            }
        }
        Ok::<(), DefaultCirrusError>(())
    })
}

/// Start (if idle) and step until converged.
///
/// - `out_iterations` (optional) receives the final iteration count.
///
/// # Safety
///
/// - `ptr` must be null or a valid pointer returned by `cirrus_new`.
/// - `out_iterations`, if non-null, must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn cirrus_run_to_convergence(
    ptr: *const CirrusInstance,
    out_iterations: *mut usize,
) -> CirrusErrorCode {
    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let outcome = with_run_mut(instance, ClassificationRun::run_to_convergence)??;

        if !out_iterations.is_null() {
            unsafe {
                *out_iterations = outcome.iteration;
            }
        }
        Ok::<(), DefaultCirrusError>(())
    })
}
