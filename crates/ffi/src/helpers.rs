use crate::error::{with_last_error_mut, CirrusError, CirrusErrorCode, DefaultCirrusError};
use crate::instance::CirrusInstance;
use cirrus_core::ClassificationRun;
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `CirrusError` trait.
pub(crate) fn set_last_error(error: &impl CirrusError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl CirrusError) -> CirrusErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = CirrusErrorCode::Ok;
    });
}

/// Record the outcome of `result` in thread-local storage and reduce the
/// error to its code.
pub(crate) fn track_result<T, E: CirrusError>(result: Result<T, E>) -> Result<T, CirrusErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Run a fallible FFI body and translate its result to an error code.
pub(crate) fn handle_ffi_result_error<F, E>(body: F) -> CirrusErrorCode
where
    F: FnOnce() -> Result<(), E>,
    E: CirrusError,
{
    match track_result(body()) {
        Ok(()) => CirrusErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow the instance behind `ptr`.
///
/// # Safety
///
/// `ptr` must be null or a live pointer returned by `cirrus_new`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const CirrusInstance,
) -> Result<&'a CirrusInstance, DefaultCirrusError> {
    // SAFETY: caller guarantees a non-null `ptr` came from `Box::into_raw`
    // in `cirrus_new` and has not been destroyed.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultCirrusError::null_pointer("ptr"))
}

/// Run `func` with a shared read lock on the classification run.
pub(crate) fn with_run<F, R>(instance: &CirrusInstance, func: F) -> Result<R, DefaultCirrusError>
where
    F: FnOnce(&ClassificationRun) -> R,
{
    let run = instance
        .run
        .read()
        .map_err(|_| DefaultCirrusError::lock_poisoned("run"))?;
    Ok(func(&run))
}

/// Run `func` with an exclusive write lock on the classification run.
pub(crate) fn with_run_mut<F, R>(
    instance: &CirrusInstance,
    func: F,
) -> Result<R, DefaultCirrusError>
where
    F: FnOnce(&mut ClassificationRun) -> R,
{
    let mut run = instance
        .run
        .write()
        .map_err(|_| DefaultCirrusError::lock_poisoned("run"))?;
    Ok(func(&mut run))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{cirrus_get_last_error, cirrus_get_last_error_code};
    use std::ffi::CStr;

    #[test]
    fn test_track_result_sets_and_clears() {
        let failed: Result<(), _> = Err(DefaultCirrusError::null_pointer("buffer"));
        assert_eq!(track_result(failed), Err(CirrusErrorCode::NullPointer));
        assert_eq!(cirrus_get_last_error_code(), CirrusErrorCode::NullPointer);

        let message = unsafe { CStr::from_ptr(cirrus_get_last_error()) };
        assert_eq!(
            message.to_str().unwrap(),
            "Parameter 'buffer' cannot be null"
        );

        let ok: Result<u8, DefaultCirrusError> = Ok(7);
        assert_eq!(track_result(ok), Ok(7));
        assert_eq!(cirrus_get_last_error_code(), CirrusErrorCode::Ok);
        assert!(cirrus_get_last_error().is_null());
    }

    #[test]
    fn test_null_instance_is_rejected() {
        let code = handle_ffi_result_error(|| {
            unsafe { instance_from_ptr(std::ptr::null()) }?;
            Ok::<(), DefaultCirrusError>(())
        });
        assert_eq!(code, CirrusErrorCode::NullPointer);
    }
}
