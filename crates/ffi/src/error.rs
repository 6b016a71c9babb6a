use cirrus_core::{GridError, RunError};
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait CirrusError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> CirrusErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `CirrusError` carrying a code and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultCirrusError {
    code: CirrusErrorCode,
    msg: String,
}

impl DefaultCirrusError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: CirrusErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"run"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: CirrusErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for invalid parameter.
    ///
    /// # Arguments
    /// * `param_name` - The name of the invalid parameter (e.g., `"states"`, `"len"`)
    /// * `message` - Description of the error
    pub fn invalid_parameter(param_name: &str, message: &str) -> Self {
        Self {
            code: CirrusErrorCode::InvalidParameter,
            msg: format!("Parameter '{param_name}': {message}"),
        }
    }
}

impl CirrusError for DefaultCirrusError {
    fn code(&self) -> CirrusErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<GridError> for DefaultCirrusError {
    fn from(error: GridError) -> Self {
        let code = match error {
            GridError::OutOfBounds { .. } => CirrusErrorCode::OutOfBounds,
            _ => CirrusErrorCode::InvalidGrid,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl From<RunError> for DefaultCirrusError {
    fn from(error: RunError) -> Self {
        match error {
            RunError::Initializer(grid_error) => grid_error.into(),
            other => Self {
                code: CirrusErrorCode::InvalidState,
                msg: other.to_string(),
            },
        }
    }
}

/// FFI error codes returned by classifier functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CirrusErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Invalid grid: dimensions, cell count, state codes, or physical values
    /// rejected at construction.
    InvalidGrid = 3,

    /// Coordinate outside the grid.
    OutOfBounds = 4,

    /// Operation not allowed in the current run state (e.g., stepping while
    /// idle or after convergence).
    InvalidState = 5,

    /// Invalid parameter passed to function.
    InvalidParameter = 6,
}

impl From<DefaultCirrusError> for CirrusErrorCode {
    fn from(error: DefaultCirrusError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is kept here so the pointer handed to C stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, CirrusErrorCode)> = const { RefCell::new((None, CirrusErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, CirrusErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, CirrusErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// # Thread Safety
/// Error messages are stored per-thread, so each thread has its own
/// independent error state.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// CirrusInstance* run = nullptr;
/// CirrusErrorCode err = cirrus_new(w, h, states, temps, iwc, &run);
/// if (err != CirrusErrorCode::Ok) {
///     const char* error = cirrus_get_last_error();
///     if (error) {
///         printf("Curtain rejected: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn cirrus_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `CirrusErrorCode::Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn cirrus_get_last_error_code() -> CirrusErrorCode {
    with_last_error(|(_cstring, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_core::Position;

    #[test]
    fn test_grid_errors_map_to_codes() {
        let oob: DefaultCirrusError = GridError::OutOfBounds {
            x: 9,
            y: 0,
            width: 3,
            height: 1,
        }
        .into();
        assert_eq!(oob.code(), CirrusErrorCode::OutOfBounds);
        assert_eq!(oob.msg(), "Coordinate (9, 0) out of bounds for 3x1 grid");

        let invalid: DefaultCirrusError = GridError::InvalidTemperature {
            position: Position::new(0, 0),
            value: f64::NAN,
        }
        .into();
        assert_eq!(invalid.code(), CirrusErrorCode::InvalidGrid);
    }

    #[test]
    fn test_run_errors_map_to_codes() {
        let state: DefaultCirrusError = RunError::NotRunning.into();
        assert_eq!(state.code(), CirrusErrorCode::InvalidState);

        let init: DefaultCirrusError = RunError::Initializer(GridError::CellCountMismatch {
            expected: 4,
            actual: 1,
        })
        .into();
        assert_eq!(init.code(), CirrusErrorCode::InvalidGrid);
    }

    #[test]
    fn test_null_pointer_message() {
        let err = DefaultCirrusError::null_pointer("ptr");
        assert_eq!(err.code(), CirrusErrorCode::NullPointer);
        assert_eq!(err.msg(), "Parameter 'ptr' cannot be null");
        assert_eq!(CirrusErrorCode::from(err), CirrusErrorCode::NullPointer);
    }
}
