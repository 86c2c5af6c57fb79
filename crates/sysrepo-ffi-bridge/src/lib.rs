//! FFI bridge between libsysrepo callbacks and Rust handlers.
//!
//! libsysrepo delivers change notifications and log messages through C
//! function pointers. This crate exports the C symbols handed to it and
//! routes each call to Rust:
//!
//! ```text
//! libsysrepo --> module_change_cb / subtree_change_cb / log_cb   (trampolines)
//!            --> ForwardTable                                    (swappable targets)
//!            --> dispatch_module_change / dispatch_subtree_change / dispatch_log
//!            --> registered handler / log sink
//! ```
//!
//! C callers walking a value array use the exported `get_val(vals, i)`.
//!
//! # Usage
//!
//! ```
//! use sysrepo_ffi_bridge::{register_module_change_handler, SessionRef, SrNotifEvent};
//!
//! register_module_change_handler(
//!     "ietf-interfaces",
//!     |_session: &SessionRef, module: &str, event: SrNotifEvent| -> anyhow::Result<()> {
//!         println!("{} changed ({})", module, event);
//!         Ok(())
//!     },
//! )
//! .unwrap();
//! ```
//!
//! The subscription itself is made by the caller, passing
//! [`module_change_callback()`] as the callback and the module name as the
//! key sysrepo hands back.
//!
//! # Safety
//!
//! The trampolines pass pointers through untouched. The dispatch functions
//! accept null names and messages, treat session pointers as borrowed for
//! the duration of the call, and never unwind across the C boundary.
//!
//! # Linking
//!
//! Calls into libsysrepo (`sr_set_error`, `sr_get_items`, log setup) are only
//! compiled with the `sysrepo-link` feature. Without it they return
//! [`BridgeError::NotLinked`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod log;
pub mod native;
pub mod session;
pub mod trampolines;
pub mod values;

pub use config::{LogConfig, DEFAULT_CONFIG_PATH};
pub use error::{BridgeError, BridgeResult};
pub use handlers::{
    dispatch_module_change, dispatch_subtree_change, module_change_registered,
    register_module_change_handler, register_subtree_change_handler, status_for_failure,
    subtree_change_registered, unregister_module_change_handler,
    unregister_subtree_change_handler, ModuleChangeHandler, SubtreeChangeHandler,
};
pub use log::{
    clear_log_sink, dispatch_log, emit_to_tracing, forward_level, init_tracing,
    install_log_callback, log_stderr, log_syslog, set_forward_level, set_log_sink, LogSink,
};
pub use session::SessionRef;
pub use trampolines::{
    forward_table, get_val, install_forward_table, log_callback, log_cb, module_change_callback,
    module_change_cb, reset_forward_table, subtree_change_callback, subtree_change_cb,
    ForwardTable,
};
pub use values::{decode_data, FromRawVal, ValArray};

pub use sysrepo_types::{SrChangeOper, SrChangeVal, SrLogLevel, SrNotifEvent, SrStatus, SrType, SrVal};
