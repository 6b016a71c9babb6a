use cirrus_core::{Cell, ClassificationRun, ClassificationStats};

use crate::control::CirrusRunState;
use crate::error::{CirrusErrorCode, DefaultCirrusError};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_run};
use crate::instance::CirrusInstance;

#[repr(C)]
/// FFI-friendly snapshot of a single cell.
/// Keep this layout stable for C/C++/C# consumers.
pub struct CellView {
    /// Column (along-track index).
    pub x: usize,

    /// Row (altitude index).
    pub y: usize,

    /// State code: 0 Clear, 1 `ConvectionCore`, 2 `UnclassifiedIce`, 3 Anvil, 4 `InSitu`.
    pub state: u8,

    /// Temperature (Celsius).
    pub temperature: f64,

    /// Ice water content (mg/m³).
    pub ice_water_content: f64,

    /// Whether the cell changed on the most recent step.
    pub just_changed: bool,
}

impl From<&Cell> for CellView {
    fn from(cell: &Cell) -> Self {
        let position = cell.position();
        Self {
            x: position.x,
            y: position.y,
            state: cell.state().code(),
            temperature: cell.temperature().value(),
            ice_water_content: cell.ice_water_content().value(),
            just_changed: cell.just_changed(),
        }
    }
}

#[repr(C)]
/// FFI-friendly per-state cell counts.
pub struct StatsView {
    pub clear: usize,
    pub convection_core: usize,
    pub unclassified_ice: usize,
    pub anvil: usize,
    pub in_situ: usize,
    /// Sum of all counts (`width * height`).
    pub total: usize,
}

impl From<ClassificationStats> for StatsView {
    fn from(stats: ClassificationStats) -> Self {
        Self {
            clear: stats.clear,
            convection_core: stats.convection_core,
            unclassified_ice: stats.unclassified_ice,
            anvil: stats.anvil,
            in_situ: stats.in_situ,
            total: stats.total(),
        }
    }
}

#[no_mangle]
/// Fill `out_cell` with the cell at column `x`, row `y`.
///
/// Returns
/// - `CirrusErrorCode::Ok` (0) on success
/// - `CirrusErrorCode::OutOfBounds` if `(x, y)` lies outside the grid
/// - `CirrusErrorCode::NullPointer` if `ptr` or `out_cell` is null
/// - `CirrusErrorCode::LockPoisoned` if the internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be null or a valid pointer returned by `cirrus_new`.
/// - `out_cell` must be a valid, non-null pointer to a `CellView`.
pub unsafe extern "C" fn cirrus_get_cell(
    ptr: *const CirrusInstance,
    x: usize,
    y: usize,
    out_cell: *mut CellView,
) -> CirrusErrorCode {
    if out_cell.is_null() {
        return track_error(&DefaultCirrusError::null_pointer("out_cell"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let view = with_run(instance, |run| run.grid().get(x, y).map(CellView::from))??;
        unsafe {
            *out_cell = view;
        }
        Ok::<(), DefaultCirrusError>(())
    })
}

#[no_mangle]
/// Fill `out_stats` with the current per-state counts.
///
/// # Safety
///
/// - `ptr` must be null or a valid pointer returned by `cirrus_new`.
/// - `out_stats` must be a valid, non-null pointer to a `StatsView`.
pub unsafe extern "C" fn cirrus_get_stats(
    ptr: *const CirrusInstance,
    out_stats: *mut StatsView,
) -> CirrusErrorCode {
    if out_stats.is_null() {
        return track_error(&DefaultCirrusError::null_pointer("out_stats"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let stats = with_run(instance, ClassificationRun::stats)?;
        unsafe {
            *out_stats = stats.into();
        }
        Ok::<(), DefaultCirrusError>(())
    })
}

#[no_mangle]
/// Write the number of expansion steps taken since the last reset.
///
/// # Safety
///
/// - `ptr` must be null or a valid pointer returned by `cirrus_new`.
/// - `out_iteration` must be a valid, non-null pointer to a `usize`.
pub unsafe extern "C" fn cirrus_get_iteration(
    ptr: *const CirrusInstance,
    out_iteration: *mut usize,
) -> CirrusErrorCode {
    if out_iteration.is_null() {
        return track_error(&DefaultCirrusError::null_pointer("out_iteration"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let iteration = with_run(instance, ClassificationRun::iteration)?;
        unsafe {
            *out_iteration = iteration;
        }
        Ok::<(), DefaultCirrusError>(())
    })
}

#[no_mangle]
/// Write the current run state.
///
/// # Safety
///
/// - `ptr` must be null or a valid pointer returned by `cirrus_new`.
/// - `out_state` must be a valid, non-null pointer to a `CirrusRunState`.
pub unsafe extern "C" fn cirrus_get_run_state(
    ptr: *const CirrusInstance,
    out_state: *mut CirrusRunState,
) -> CirrusErrorCode {
    if out_state.is_null() {
        return track_error(&DefaultCirrusError::null_pointer("out_state"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let state = with_run(instance, ClassificationRun::state)?;
        unsafe {
            *out_state = state.into();
        }
        Ok::<(), DefaultCirrusError>(())
    })
}

#[no_mangle]
/// Write the grid dimensions.
///
/// # Safety
///
/// - `ptr` must be null or a valid pointer returned by `cirrus_new`.
/// - `out_width` and `out_height` must be valid, non-null pointers to `usize`.
pub unsafe extern "C" fn cirrus_get_dimensions(
    ptr: *const CirrusInstance,
    out_width: *mut usize,
    out_height: *mut usize,
) -> CirrusErrorCode {
    if out_width.is_null() {
        return track_error(&DefaultCirrusError::null_pointer("out_width"));
    }
    if out_height.is_null() {
        return track_error(&DefaultCirrusError::null_pointer("out_height"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let (width, height) = with_run(instance, |run| (run.grid().width(), run.grid().height()))?;
        unsafe {
            *out_width = width;
            *out_height = height;
        }
        Ok::<(), DefaultCirrusError>(())
    })
}

#[no_mangle]
/// Copy every cell's state code into `buffer` in row-major order.
///
/// Intended for whole-grid rendering. `len` must be at least `width * height`;
/// only the first `width * height` entries are written.
///
/// Returns
/// - `CirrusErrorCode::Ok` (0) on success
/// - `CirrusErrorCode::InvalidParameter` if `len` is too small
/// - `CirrusErrorCode::NullPointer` if `ptr` or `buffer` is null
///
/// # Safety
///
/// - `ptr` must be null or a valid pointer returned by `cirrus_new`.
/// - `buffer` must be valid for writes of `len` bytes.
pub unsafe extern "C" fn cirrus_copy_states(
    ptr: *const CirrusInstance,
    buffer: *mut u8,
    len: usize,
) -> CirrusErrorCode {
    if buffer.is_null() {
        return track_error(&DefaultCirrusError::null_pointer("buffer"));
    }

    handle_ffi_result_error(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        with_run(instance, |run| {
            let cells = run.grid().cells();
            if len < cells.len() {
                return Err(DefaultCirrusError::invalid_parameter(
                    "len",
                    &format!("buffer holds {len} entries, grid has {}", cells.len()),
                ));
            }

            // SAFETY: caller guarantees `buffer` is valid for `len` writes and
            // we write at most `cells.len() <= len` entries.
            let out = unsafe { std::slice::from_raw_parts_mut(buffer, cells.len()) };
            for (slot, cell) in out.iter_mut().zip(cells) {
                *slot = cell.state().code();
            }
            Ok(())
        })?
    })
}
