//! Raw definitions of the sysrepo C API.
//!
//! Names follow `sysrepo.h` so the declarations can be checked against the
//! header line by line. C enums are carried as `c_int` rather than Rust
//! enums: the library may hand over discriminants this crate does not know,
//! and a Rust enum cannot hold those. Use the `sysrepo_types` enums'
//! `from_raw` to interpret them.
//!
//! Only the functions a change callback needs are declared here; session and
//! subscription lifecycle belong to the caller.
#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_int, c_void};

/// Opaque session context.
#[repr(C)]
pub struct sr_session_ctx_t {
    _private: [u8; 0],
}

/// Opaque change iterator.
#[repr(C)]
pub struct sr_change_iter_t {
    _private: [u8; 0],
}

/// Opaque memory context owning a value's allocations.
#[repr(C)]
pub struct sr_mem_ctx_t {
    _private: [u8; 0],
}

pub type sr_type_t = c_int;
pub type sr_error_t = c_int;
pub type sr_notif_event_t = c_int;
pub type sr_change_oper_t = c_int;
pub type sr_log_level_t = c_int;

/// Payload of a value; which member is live depends on `sr_val_t::type_`.
#[repr(C)]
#[derive(Clone, Copy)]
pub union sr_data_t {
    pub binary_val: *mut c_char,
    pub bits_val: *mut c_char,
    pub bool_val: bool,
    pub decimal64_val: f64,
    pub enum_val: *mut c_char,
    pub identityref_val: *mut c_char,
    pub instanceid_val: *mut c_char,
    pub int8_val: i8,
    pub int16_val: i16,
    pub int32_val: i32,
    pub int64_val: i64,
    pub string_val: *mut c_char,
    pub uint8_val: u8,
    pub uint16_val: u16,
    pub uint32_val: u32,
    pub uint64_val: u64,
    pub anyxml_val: *mut c_char,
    pub anydata_val: *mut c_char,
}

/// A value as laid out by libsysrepo.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct sr_val_t {
    pub _sr_mem: *mut sr_mem_ctx_t,
    pub xpath: *mut c_char,
    pub type_: sr_type_t,
    pub dflt: bool,
    pub data: sr_data_t,
}

/// `sr_module_change_cb`
pub type sr_module_change_cb = unsafe extern "C" fn(
    session: *mut sr_session_ctx_t,
    module_name: *const c_char,
    event: sr_notif_event_t,
    private_ctx: *mut c_void,
) -> c_int;

/// `sr_subtree_change_cb`
pub type sr_subtree_change_cb = unsafe extern "C" fn(
    session: *mut sr_session_ctx_t,
    xpath: *const c_char,
    event: sr_notif_event_t,
    private_ctx: *mut c_void,
) -> c_int;

/// `sr_log_cb`
pub type sr_log_cb = unsafe extern "C" fn(level: sr_log_level_t, message: *const c_char);

#[cfg(feature = "sysrepo-link")]
extern "C" {
    pub fn sr_set_error(
        session: *mut sr_session_ctx_t,
        message: *const c_char,
        xpath: *const c_char,
    ) -> c_int;

    pub fn sr_get_items(
        session: *mut sr_session_ctx_t,
        xpath: *const c_char,
        values: *mut *mut sr_val_t,
        value_cnt: *mut usize,
    ) -> c_int;

    pub fn sr_free_values(values: *mut sr_val_t, count: usize);

    pub fn sr_free_val(value: *mut sr_val_t);

    pub fn sr_get_changes_iter(
        session: *mut sr_session_ctx_t,
        xpath: *const c_char,
        iter: *mut *mut sr_change_iter_t,
    ) -> c_int;

    pub fn sr_get_change_next(
        session: *mut sr_session_ctx_t,
        iter: *mut sr_change_iter_t,
        operation: *mut sr_change_oper_t,
        old_value: *mut *mut sr_val_t,
        new_value: *mut *mut sr_val_t,
    ) -> c_int;

    pub fn sr_free_change_iter(iter: *mut sr_change_iter_t);

    pub fn sr_log_stderr(log_level: sr_log_level_t);

    pub fn sr_log_syslog(log_level: sr_log_level_t);

    pub fn sr_log_set_cb(log_callback: Option<sr_log_cb>);
}
