//! Non-owning session handle passed to change handlers.
//!
//! The session belongs to libsysrepo for the duration of the callback.
//! Handlers may report errors on it and read data through it; starting and
//! stopping sessions is the caller's business.

use std::ffi::CString;

use sysrepo_types::{SrChangeVal, SrStatus, SrVal};
#[cfg(feature = "sysrepo-link")]
use sysrepo_types::SrChangeOper;
#[cfg(feature = "sysrepo-link")]
use tracing::debug;
use tracing::warn;

use crate::error::{BridgeError, BridgeResult};
use crate::native::sr_session_ctx_t;
#[cfg(feature = "sysrepo-link")]
use crate::native::{self, sr_change_iter_t, sr_change_oper_t, sr_val_t};
#[cfg(feature = "sysrepo-link")]
use crate::values::{FromRawVal, ValArray};

/// Borrowed `sr_session_ctx_t*` as received by a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRef {
    raw: *mut sr_session_ctx_t,
}

impl SessionRef {
    /// Wraps a raw session pointer.
    pub fn from_raw(raw: *mut sr_session_ctx_t) -> Self {
        Self { raw }
    }

    /// Returns the raw session pointer.
    pub fn as_raw(&self) -> *mut sr_session_ctx_t {
        self.raw
    }

    /// Returns true if the callback was given no session.
    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    #[cfg_attr(not(feature = "sysrepo-link"), allow(dead_code))]
    fn checked(&self) -> BridgeResult<*mut sr_session_ctx_t> {
        if self.raw.is_null() {
            Err(BridgeError::NullPointer)
        } else {
            Ok(self.raw)
        }
    }

    /// Attaches an error message to the session so sysrepo returns it to
    /// the client that made the change.
    #[cfg(feature = "sysrepo-link")]
    pub fn set_error(&self, message: &str, xpath: &str) -> BridgeResult<()> {
        let session = self.checked()?;
        let c_msg = to_cstring(message);
        let c_xpath = to_cstring(xpath);

        // Safety: session is non-null and owned by sysrepo for this callback.
        let rc = unsafe { native::sr_set_error(session, c_msg.as_ptr(), c_xpath.as_ptr()) };
        if rc == SrStatus::Ok.as_raw() {
            Ok(())
        } else {
            Err(BridgeError::native("sr_set_error", rc))
        }
    }

    #[cfg(not(feature = "sysrepo-link"))]
    pub fn set_error(&self, _message: &str, _xpath: &str) -> BridgeResult<()> {
        warn!("SessionRef::set_error called without sysrepo-link feature");
        Err(BridgeError::not_linked("sr_set_error"))
    }

    /// Reports a handler failure on the session, logging if that fails.
    ///
    /// Does nothing on a null session.
    pub fn report(&self, message: &str, xpath: &str) {
        if self.is_null() {
            return;
        }
        if let Err(err) = self.set_error(message, xpath) {
            warn!("Failed to report error on session for {}: {}", xpath, err);
        }
    }

    /// Reads all values matching `xpath`.
    ///
    /// An xpath that matches nothing yields an empty list.
    #[cfg(feature = "sysrepo-link")]
    pub fn get_items(&self, xpath: &str) -> BridgeResult<Vec<SrVal>> {
        let c_xpath = CString::new(xpath).map_err(|_| BridgeError::InteriorNul)?;
        let session = self.checked()?;

        let mut values: *mut sr_val_t = std::ptr::null_mut();
        let mut count: usize = 0;
        // Safety: session is valid for this callback; out-params are locals.
        let rc = unsafe { native::sr_get_items(session, c_xpath.as_ptr(), &mut values, &mut count) };
        match SrStatus::from_raw(rc) {
            Some(SrStatus::Ok) => {}
            Some(SrStatus::NotFound) => return Ok(Vec::new()),
            _ => return Err(BridgeError::native("sr_get_items", rc)),
        }

        // Safety: sysrepo returned `count` contiguous values at `values`.
        let items = unsafe { ValArray::from_raw_parts(values, count) }.to_vec();
        unsafe { native::sr_free_values(values, count) };

        debug!("sr_get_items({}) returned {} values", xpath, items.len());
        Ok(items)
    }

    #[cfg(not(feature = "sysrepo-link"))]
    pub fn get_items(&self, xpath: &str) -> BridgeResult<Vec<SrVal>> {
        CString::new(xpath).map_err(|_| BridgeError::InteriorNul)?;
        warn!("SessionRef::get_items called without sysrepo-link feature");
        Err(BridgeError::not_linked("sr_get_items"))
    }

    /// Reads the pending changes under `xpath`.
    ///
    /// Only meaningful inside a change callback.
    #[cfg(feature = "sysrepo-link")]
    pub fn changes(&self, xpath: &str) -> BridgeResult<Vec<SrChangeVal>> {
        let c_xpath = CString::new(xpath).map_err(|_| BridgeError::InteriorNul)?;
        let session = self.checked()?;

        let mut iter: *mut sr_change_iter_t = std::ptr::null_mut();
        // Safety: session is valid for this callback; iter is a local out-param.
        let rc = unsafe { native::sr_get_changes_iter(session, c_xpath.as_ptr(), &mut iter) };
        if rc != SrStatus::Ok.as_raw() {
            return Err(BridgeError::native("sr_get_changes_iter", rc));
        }

        let mut changes = Vec::new();
        loop {
            let mut oper: sr_change_oper_t = 0;
            let mut old_val: *mut sr_val_t = std::ptr::null_mut();
            let mut new_val: *mut sr_val_t = std::ptr::null_mut();

            // Safety: iter came from sr_get_changes_iter on this session.
            let rc = unsafe {
                native::sr_get_change_next(session, iter, &mut oper, &mut old_val, &mut new_val)
            };
            match next_change_status(rc) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    unsafe { native::sr_free_change_iter(iter) };
                    return Err(err);
                }
            }

            // Safety: sysrepo hands over ownership of both values.
            let change = unsafe {
                let change = SrChangeOper::from_raw(oper).map(|oper| {
                    SrChangeVal::new(oper, SrVal::from_raw(old_val), SrVal::from_raw(new_val))
                });
                native::sr_free_val(old_val);
                native::sr_free_val(new_val);
                change
            };

            match change {
                Some(change) => changes.push(change),
                None => warn!(
                    "Skipping change with unknown operation {}",
                    SrChangeOper::describe_raw(oper)
                ),
            }
        }

        unsafe { native::sr_free_change_iter(iter) };
        debug!("{} changes under {}", changes.len(), xpath);
        Ok(changes)
    }

    #[cfg(not(feature = "sysrepo-link"))]
    pub fn changes(&self, xpath: &str) -> BridgeResult<Vec<SrChangeVal>> {
        CString::new(xpath).map_err(|_| BridgeError::InteriorNul)?;
        warn!("SessionRef::changes called without sysrepo-link feature");
        Err(BridgeError::not_linked("sr_get_changes_iter"))
    }
}

/// Interprets the return code of `sr_get_change_next`: `Ok(true)` for another
/// change, `Ok(false)` once the iterator is exhausted.
#[cfg_attr(not(feature = "sysrepo-link"), allow(dead_code))]
fn next_change_status(rc: i32) -> BridgeResult<bool> {
    match SrStatus::from_raw(rc) {
        Some(SrStatus::Ok) => Ok(true),
        Some(SrStatus::NotFound) => Ok(false),
        _ => Err(BridgeError::native("sr_get_change_next", rc)),
    }
}

/// Converts to a C string, replacing interior NULs so the message survives.
#[cfg_attr(not(feature = "sysrepo-link"), allow(dead_code))]
fn to_cstring(s: &str) -> CString {
    CString::new(s.replace('\0', " ")).unwrap_or_default()
}
