//! C entry points handed to libsysrepo.
//!
//! Each trampoline is a single forwarding call into the current
//! [`ForwardTable`]. Arguments pass through untouched and the target's return
//! value comes back verbatim; no validation or error handling happens here.
//! The default table points at the handler dispatch in [`crate::handlers`]
//! and [`crate::log`].

use std::ffi::{c_char, c_int, c_void};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::handlers::{dispatch_module_change, dispatch_subtree_change};
use crate::log::dispatch_log;
use crate::native::{
    sr_log_cb, sr_log_level_t, sr_module_change_cb, sr_notif_event_t, sr_session_ctx_t,
    sr_subtree_change_cb, sr_val_t,
};

/// Targets the trampolines forward to.
#[derive(Clone, Copy)]
pub struct ForwardTable {
    pub module_change: sr_module_change_cb,
    pub subtree_change: sr_subtree_change_cb,
    pub log: sr_log_cb,
}

impl Default for ForwardTable {
    fn default() -> Self {
        Self {
            module_change: dispatch_module_change,
            subtree_change: dispatch_subtree_change,
            log: dispatch_log,
        }
    }
}

static FORWARD_TABLE: Lazy<RwLock<ForwardTable>> =
    Lazy::new(|| RwLock::new(ForwardTable::default()));

/// Returns a copy of the current forward table.
pub fn forward_table() -> ForwardTable {
    *FORWARD_TABLE.read()
}

/// Replaces the forward table, returning the previous one.
pub fn install_forward_table(table: ForwardTable) -> ForwardTable {
    std::mem::replace(&mut *FORWARD_TABLE.write(), table)
}

/// Restores the default forward table, returning the previous one.
pub fn reset_forward_table() -> ForwardTable {
    install_forward_table(ForwardTable::default())
}

/// Module-change trampoline (`sr_module_change_cb`).
///
/// # Safety
///
/// Arguments must satisfy whatever the installed module-change target
/// requires; the default target expects sysrepo's own arguments.
#[no_mangle]
pub unsafe extern "C" fn module_change_cb(
    s: *mut sr_session_ctx_t,
    module_name: *const c_char,
    e: sr_notif_event_t,
    p: *mut c_void,
) -> c_int {
    (forward_table().module_change)(s, module_name, e, p)
}

/// Subtree-change trampoline (`sr_subtree_change_cb`).
///
/// # Safety
///
/// As for [`module_change_cb`].
#[no_mangle]
pub unsafe extern "C" fn subtree_change_cb(
    s: *mut sr_session_ctx_t,
    xpath: *const c_char,
    e: sr_notif_event_t,
    p: *mut c_void,
) -> c_int {
    (forward_table().subtree_change)(s, xpath, e, p)
}

/// Log trampoline (`sr_log_cb`).
///
/// # Safety
///
/// `message` must satisfy the installed log target; the default target
/// accepts null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn log_cb(level: sr_log_level_t, message: *const c_char) {
    (forward_table().log)(level, message)
}

/// Returns the address of element `i` of a value array.
///
/// # Safety
///
/// `i` must be within the array `val` points to. Out-of-bounds indices are
/// undefined behaviour, not a reported error.
#[no_mangle]
pub unsafe extern "C" fn get_val(val: *mut sr_val_t, i: usize) -> *mut sr_val_t {
    val.add(i)
}

/// Trampoline for passing to `sr_module_change_subscribe`.
pub fn module_change_callback() -> sr_module_change_cb {
    module_change_cb
}

/// Trampoline for passing to `sr_subtree_change_subscribe`.
pub fn subtree_change_callback() -> sr_subtree_change_cb {
    subtree_change_cb
}

/// Trampoline for passing to `sr_log_set_cb`.
pub fn log_callback() -> sr_log_cb {
    log_cb
}
