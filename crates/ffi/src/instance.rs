use cirrus_core::{Cell, CellState, Celsius, ClassificationRun, Grid, IceWaterContent, Position};
use std::ptr;
use std::sync::RwLock;

use crate::error::{CirrusErrorCode, DefaultCirrusError};
use crate::helpers::{track_error, track_result};

/// A classification run owned by a C caller.
///
/// # Thread Safety
/// The run is protected by an `RwLock`, allowing:
/// - **Multiple concurrent readers** (cell, stats and state queries): `.read()` lock
/// - **Exclusive writer** (start, pause, reset, step): `.write()` lock
///
/// A renderer thread can therefore poll `cirrus_copy_states` while a worker
/// thread calls `cirrus_step`.
pub struct CirrusInstance {
    pub(crate) run: RwLock<ClassificationRun>,
}

impl CirrusInstance {
    /// Build an instance from caller-owned columns of per-cell data in
    /// row-major order.
    ///
    /// # Errors
    ///
    /// Returns `CirrusErrorCode::InvalidParameter` for unknown state codes and
    /// `CirrusErrorCode::InvalidGrid` for anything the grid constructor rejects.
    pub(crate) fn new(
        width: usize,
        height: usize,
        states: &[u8],
        temperatures: &[f64],
        ice_water_content: &[f64],
    ) -> Result<Box<Self>, DefaultCirrusError> {
        let cells = states
            .iter()
            .zip(temperatures)
            .zip(ice_water_content)
            .enumerate()
            .map(|(index, ((&code, &temperature), &iwc))| {
                let state = CellState::from_code(code).ok_or_else(|| {
                    DefaultCirrusError::invalid_parameter(
                        "states",
                        &format!("unknown state code {code} at index {index}"),
                    )
                })?;
                Ok(Cell::new(
                    Position::new(index % width, index / width),
                    state,
                    Celsius::new(temperature),
                    IceWaterContent::new(iwc),
                ))
            })
            .collect::<Result<Vec<_>, DefaultCirrusError>>()?;

        let grid = Grid::new(width, height, cells)?;

        Ok(Box::new(Self {
            run: RwLock::new(ClassificationRun::from_grid(grid)),
        }))
    }
}

/// Create a new classification run and return it via out-parameter.
///
/// Parameters
/// - `width`, `height`: curtain dimensions (columns along track, rows in altitude).
/// - `states`: `width * height` state codes, row-major (0 = Clear,
///   1 = `ConvectionCore`, 2 = `UnclassifiedIce`). Classified codes are rejected.
/// - `temperatures`: `width * height` temperatures in °C.
/// - `ice_water_content`: `width * height` ice water contents in mg/m³.
/// - `out_instance`: receives the instance on success, null on failure.
///
/// The arrays are copied; the caller may free them after this call.
///
/// Returns
/// - `CirrusErrorCode::Ok` (0): success, `out_instance` contains valid pointer
/// - `CirrusErrorCode::NullPointer`: an array or `out_instance` is null
/// - `CirrusErrorCode::InvalidParameter`: unknown state code
/// - `CirrusErrorCode::InvalidGrid`: zero or overflowing dimensions, classified or
///   unphysical cells
///
/// # Safety
///
/// - Each array pointer must be valid for reads of `width * height` elements.
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller takes ownership of the returned instance and MUST call
///   `cirrus_destroy` exactly once.
///
/// Example (C)
/// ```c
/// CirrusInstance* run = NULL;
/// if (cirrus_new(w, h, states, temps, iwc, &run) != Ok) {
///     fprintf(stderr, "%s\n", cirrus_get_last_error());
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn cirrus_new(
    width: usize,
    height: usize,
    states: *const u8,
    temperatures: *const f64,
    ice_water_content: *const f64,
    out_instance: *mut *mut CirrusInstance,
) -> CirrusErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultCirrusError::null_pointer("out_instance"));
    }
    unsafe {
        *out_instance = ptr::null_mut();
    }

    for (name, is_null) in [
        ("states", states.is_null()),
        ("temperatures", temperatures.is_null()),
        ("ice_water_content", ice_water_content.is_null()),
    ] {
        if is_null {
            return track_error(&DefaultCirrusError::null_pointer(name));
        }
    }

    let Some(len) = width.checked_mul(height) else {
        return track_error(&DefaultCirrusError::from(
            cirrus_core::GridError::DimensionsOverflow { width, height },
        ));
    };

    // SAFETY: pointers checked non-null above; the caller guarantees each is
    // valid for `width * height` reads.
    let (states, temperatures, ice_water_content) = unsafe {
        (
            std::slice::from_raw_parts(states, len),
            std::slice::from_raw_parts(temperatures, len),
            std::slice::from_raw_parts(ice_water_content, len),
        )
    };

    match track_result(CirrusInstance::new(
        width,
        height,
        states,
        temperatures,
        ice_water_content,
    )) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            CirrusErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Destroy an instance previously created by `cirrus_new`.
///
/// A null `ptr` is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `cirrus_new`.
/// - The pointer MUST NOT be used after this call (double-free or use-after-free).
#[no_mangle]
pub unsafe extern "C" fn cirrus_destroy(ptr: *mut CirrusInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: `ptr` came from `Box::into_raw` in `cirrus_new` and has not
    // been freed; reclaiming the Box drops the run.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
