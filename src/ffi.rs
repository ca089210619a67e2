//! C-compatible FFI for geocluster.
//!
//! A registry handle owns any number of named sessions. Query results are
//! returned as JSON strings that the caller releases with
//! `geocluster_free_string`.
//!
//! The API follows a status-code pattern: `0` indicates success, negative
//! numbers indicate errors, and positive numbers are reserved for
//! non-error states such as “not found”.

use crate::error::{ClusterError, ErrorKind};
use crate::{ClusterRegistry, GeoBounds};
use serde::Serialize;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};

/// Generic success status.
const GEOCLUSTER_OK: c_int = 0;
/// Returned when the provided arguments are null or otherwise invalid.
const GEOCLUSTER_ERR_INVALID_ARGUMENT: c_int = -1;
/// Returned when a result cannot be marshalled.
const GEOCLUSTER_ERR_OPERATION_FAILED: c_int = -2;
/// Returned when a session name or cluster id is unknown.
pub const GEOCLUSTER_STATUS_NOT_FOUND: c_int = 1;

/// Opaque registry handle exposed to C callers.
#[repr(C)]
pub struct GeoclusterHandle {
    registry: ClusterRegistry,
}

fn status_of(err: &ClusterError) -> c_int {
    match err.kind() {
        ErrorKind::NotFound => GEOCLUSTER_STATUS_NOT_FOUND,
        ErrorKind::InvalidInput => GEOCLUSTER_ERR_INVALID_ARGUMENT,
    }
}

/// # Safety
/// `ptr` must be null or point to a valid, null-terminated string.
unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// # Safety
/// `out` must be a valid pointer to receive the string pointer.
unsafe fn write_json<T: Serialize>(value: &T, out: *mut *mut c_char) -> c_int {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(_) => return GEOCLUSTER_ERR_OPERATION_FAILED,
    };
    match CString::new(json) {
        Ok(s) => {
            unsafe {
                *out = s.into_raw();
            }
            GEOCLUSTER_OK
        }
        Err(_) => GEOCLUSTER_ERR_OPERATION_FAILED,
    }
}

/// # Safety
/// `handle` must be valid or null, `name` a valid C string or null, and
/// `out_json` valid or null. Returns the session name and handle when all
/// of them are non-null.
unsafe fn query_args<'a>(
    handle: *mut GeoclusterHandle,
    name: *const c_char,
    out_json: *mut *mut c_char,
) -> Option<(&'a GeoclusterHandle, &'a str)> {
    if handle.is_null() || out_json.is_null() {
        return None;
    }
    let name = unsafe { str_arg(name) }?;
    Some((unsafe { &*handle }, name))
}

/// Create an empty registry.
#[unsafe(no_mangle)]
pub extern "C" fn geocluster_registry_new() -> *mut GeoclusterHandle {
    Box::into_raw(Box::new(GeoclusterHandle {
        registry: ClusterRegistry::new(),
    }))
}

/// # Safety
/// `handle` must be a pointer obtained from `geocluster_registry_new` that has
/// not been freed yet, or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn geocluster_registry_free(handle: *mut GeoclusterHandle) {
    if handle.is_null() {
        return;
    }

    // Reconstruct the Box so it is dropped at the end of the scope.
    let boxed = unsafe { Box::from_raw(handle) };
    boxed.registry.destroy_all();
}

/// Build a session from a GeoJSON feature array / collection.
///
/// # Safety
/// `handle` must be valid. `name` and `features_json` must be null-terminated
/// UTF-8 strings; `options_json` may be null for default options.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn geocluster_init(
    handle: *mut GeoclusterHandle,
    name: *const c_char,
    features_json: *const c_char,
    options_json: *const c_char,
) -> c_int {
    if handle.is_null() {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    }
    let (Some(name), Some(features)) = (unsafe { str_arg(name) }, unsafe { str_arg(features_json) })
    else {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    };
    let options = if options_json.is_null() {
        None
    } else {
        match unsafe { str_arg(options_json) } {
            Some(s) => Some(s),
            None => return GEOCLUSTER_ERR_INVALID_ARGUMENT,
        }
    };

    let handle = unsafe { &*handle };
    match handle.registry.load_geojson(name, features, options) {
        Ok(_) => GEOCLUSTER_OK,
        Err(e) => status_of(&e),
    }
}

/// # Safety
/// `handle` and `out_json` must be valid; `name` a null-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn geocluster_get_tile(
    handle: *mut GeoclusterHandle,
    name: *const c_char,
    z: c_int,
    x: c_int,
    y: c_int,
    out_json: *mut *mut c_char,
) -> c_int {
    let Some((handle, name)) = (unsafe { query_args(handle, name, out_json) }) else {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    };
    let (Ok(z), Ok(x), Ok(y)) = (u8::try_from(z), u32::try_from(x), u32::try_from(y)) else {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    };

    match handle.registry.get_tile(name, z, x, y) {
        Ok(features) => unsafe { write_json(&features, out_json) },
        Err(e) => status_of(&e),
    }
}

/// # Safety
/// `handle` and `out_json` must be valid; `name` a null-terminated string;
/// `bbox` must point to four doubles `[west, south, east, north]`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn geocluster_get_clusters(
    handle: *mut GeoclusterHandle,
    name: *const c_char,
    bbox: *const f64,
    zoom: c_int,
    out_json: *mut *mut c_char,
) -> c_int {
    let Some((handle, name)) = (unsafe { query_args(handle, name, out_json) }) else {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    };
    if bbox.is_null() {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    }
    let values = unsafe { std::slice::from_raw_parts(bbox, 4) };
    let bounds = GeoBounds::new(values[0], values[1], values[2], values[3]);

    match handle.registry.get_clusters(name, bounds, zoom) {
        Ok(features) => unsafe { write_json(&features, out_json) },
        Err(e) => status_of(&e),
    }
}

/// # Safety
/// `handle` and `out_json` must be valid; `name` a null-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn geocluster_get_children(
    handle: *mut GeoclusterHandle,
    name: *const c_char,
    cluster_id: u64,
    out_json: *mut *mut c_char,
) -> c_int {
    let Some((handle, name)) = (unsafe { query_args(handle, name, out_json) }) else {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    };

    match handle.registry.get_children(name, cluster_id) {
        Ok(features) => unsafe { write_json(&features, out_json) },
        Err(e) => status_of(&e),
    }
}

/// # Safety
/// `handle` and `out_json` must be valid; `name` a null-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn geocluster_get_leaves(
    handle: *mut GeoclusterHandle,
    name: *const c_char,
    cluster_id: u64,
    limit: u64,
    offset: u64,
    out_json: *mut *mut c_char,
) -> c_int {
    let Some((handle, name)) = (unsafe { query_args(handle, name, out_json) }) else {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    };
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);

    match handle.registry.get_leaves(name, cluster_id, limit, offset) {
        Ok(features) => unsafe { write_json(&features, out_json) },
        Err(e) => status_of(&e),
    }
}

/// # Safety
/// `handle` and `out_zoom` must be valid; `name` a null-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn geocluster_get_cluster_expansion_zoom(
    handle: *mut GeoclusterHandle,
    name: *const c_char,
    cluster_id: u64,
    out_zoom: *mut c_int,
) -> c_int {
    if handle.is_null() || out_zoom.is_null() {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    }
    let Some(name) = (unsafe { str_arg(name) }) else {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    };
    let handle = unsafe { &*handle };

    match handle.registry.get_cluster_expansion_zoom(name, cluster_id) {
        Ok(zoom) => {
            unsafe {
                *out_zoom = zoom as c_int;
            }
            GEOCLUSTER_OK
        }
        Err(e) => status_of(&e),
    }
}

/// # Safety
/// `handle` must be valid; `name` a null-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn geocluster_destroy(
    handle: *mut GeoclusterHandle,
    name: *const c_char,
) -> c_int {
    if handle.is_null() {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    }
    let Some(name) = (unsafe { str_arg(name) }) else {
        return GEOCLUSTER_ERR_INVALID_ARGUMENT;
    };

    match unsafe { &*handle }.registry.destroy(name) {
        Ok(()) => GEOCLUSTER_OK,
        Err(e) => status_of(&e),
    }
}

/// # Safety
/// `handle` must be valid or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn geocluster_destroy_all(handle: *mut GeoclusterHandle) {
    if handle.is_null() {
        return;
    }
    unsafe { &*handle }.registry.destroy_all();
}

/// # Safety
/// `s` must be a string previously produced by this library and not yet
/// freed, or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn geocluster_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(s) });
}
