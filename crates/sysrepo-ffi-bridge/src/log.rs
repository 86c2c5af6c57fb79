//! Forwarding of libsysrepo's log output into Rust.
//!
//! libsysrepo reports through `log_cb`, which lands in [`dispatch_log`].
//! Messages more verbose than the forward level are dropped; the rest go to
//! the installed sink, or to `tracing` under the `sysrepo` target when no
//! sink is installed.

use std::ffi::{c_char, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use sysrepo_types::SrLogLevel;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::{BridgeError, BridgeResult};
use crate::native::sr_log_level_t;

/// Receives forwarded log messages.
pub type LogSink = Arc<dyn Fn(SrLogLevel, &str) + Send + Sync>;

static LOG_SINK: Lazy<RwLock<Option<LogSink>>> = Lazy::new(|| RwLock::new(None));

static FORWARD_LEVEL: AtomicI32 = AtomicI32::new(SrLogLevel::Dbg.as_raw());

/// Installs `sink` in place of the default `tracing` sink.
///
/// The sink only sees messages at `ERR` through `DBG` that pass the forward
/// level. Messages tagged `SR_LL_NONE` are dropped, and messages with a level
/// outside `sr_log_level_t` go to `tracing` at debug level instead.
pub fn set_log_sink(sink: impl Fn(SrLogLevel, &str) + Send + Sync + 'static) {
    *LOG_SINK.write() = Some(Arc::new(sink));
}

/// Restores the default `tracing` sink.
pub fn clear_log_sink() {
    *LOG_SINK.write() = None;
}

/// Sets the most verbose level that is forwarded. `None` drops everything.
pub fn set_forward_level(level: SrLogLevel) {
    FORWARD_LEVEL.store(level.as_raw(), Ordering::Relaxed);
}

/// Returns the current forward level.
pub fn forward_level() -> SrLogLevel {
    SrLogLevel::from_raw(FORWARD_LEVEL.load(Ordering::Relaxed)).unwrap_or(SrLogLevel::Dbg)
}

/// Default sink.
pub fn emit_to_tracing(level: SrLogLevel, message: &str) {
    match level {
        SrLogLevel::Err => error!(target: "sysrepo", "{}", message),
        SrLogLevel::Wrn => warn!(target: "sysrepo", "{}", message),
        SrLogLevel::Inf => info!(target: "sysrepo", "{}", message),
        SrLogLevel::Dbg => debug!(target: "sysrepo", "{}", message),
        SrLogLevel::None => {}
    }
}

/// Default log target.
///
/// # Safety
///
/// `message` must be null or a valid C string.
pub unsafe extern "C" fn dispatch_log(level: sr_log_level_t, message: *const c_char) {
    let message = if message.is_null() {
        std::borrow::Cow::Borrowed("")
    } else {
        CStr::from_ptr(message).to_string_lossy()
    };

    let Some(level) = SrLogLevel::from_raw(level) else {
        debug!(target: "sysrepo", "[{}] {}", level, message);
        return;
    };

    if !forward_level().admits(level) {
        return;
    }

    let sink = LOG_SINK.read().clone();
    match sink {
        Some(sink) => {
            if panic::catch_unwind(AssertUnwindSafe(|| sink(level, &*message))).is_err() {
                error!("Log sink panicked while handling a {} message", level);
            }
        }
        None => emit_to_tracing(level, &message),
    }
}

/// Sets the level libsysrepo prints to stderr.
#[cfg(feature = "sysrepo-link")]
pub fn log_stderr(level: SrLogLevel) -> BridgeResult<()> {
    // Safety: plain value argument.
    unsafe { crate::native::sr_log_stderr(level.as_raw()) };
    info!("sysrepo stderr logging set to {}", level);
    Ok(())
}

#[cfg(not(feature = "sysrepo-link"))]
pub fn log_stderr(_level: SrLogLevel) -> BridgeResult<()> {
    warn!("log_stderr called without sysrepo-link feature");
    Err(BridgeError::not_linked("sr_log_stderr"))
}

/// Sets the level libsysrepo sends to syslog.
#[cfg(feature = "sysrepo-link")]
pub fn log_syslog(level: SrLogLevel) -> BridgeResult<()> {
    // Safety: plain value argument.
    unsafe { crate::native::sr_log_syslog(level.as_raw()) };
    info!("sysrepo syslog logging set to {}", level);
    Ok(())
}

#[cfg(not(feature = "sysrepo-link"))]
pub fn log_syslog(_level: SrLogLevel) -> BridgeResult<()> {
    warn!("log_syslog called without sysrepo-link feature");
    Err(BridgeError::not_linked("sr_log_syslog"))
}

/// Registers the `log_cb` trampoline with libsysrepo.
#[cfg(feature = "sysrepo-link")]
pub fn install_log_callback() -> BridgeResult<()> {
    // Safety: log_cb is a 'static extern "C" fn.
    unsafe { crate::native::sr_log_set_cb(Some(crate::trampolines::log_callback())) };
    info!("sysrepo log callback installed");
    Ok(())
}

#[cfg(not(feature = "sysrepo-link"))]
pub fn install_log_callback() -> BridgeResult<()> {
    warn!("install_log_callback called without sysrepo-link feature");
    Err(BridgeError::not_linked("sr_log_set_cb"))
}

/// Installs a global `fmt` subscriber filtered by `filter`.
///
/// `filter` uses `EnvFilter` directive syntax, e.g. `info,sysrepo=debug`.
pub fn init_tracing(filter: &str) -> BridgeResult<()> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| BridgeError::config(format!("invalid tracing filter {:?}: {}", filter, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .try_init()
        .map_err(|e| BridgeError::config(format!("failed to install subscriber: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::ffi::CString;

    fn recording_sink() -> Arc<Mutex<Vec<(SrLogLevel, String)>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        set_log_sink(move |level, msg| sink_seen.lock().push((level, msg.to_string())));
        seen
    }

    fn send(level: i32, msg: &str) {
        let msg = CString::new(msg).unwrap();
        unsafe { dispatch_log(level, msg.as_ptr()) };
    }

    #[test]
    #[serial]
    fn test_threshold_filters() {
        let seen = recording_sink();
        set_forward_level(SrLogLevel::Wrn);

        send(SrLogLevel::Err.as_raw(), "e");
        send(SrLogLevel::Wrn.as_raw(), "w");
        send(SrLogLevel::Inf.as_raw(), "i");
        send(SrLogLevel::Dbg.as_raw(), "d");
        send(SrLogLevel::None.as_raw(), "n");

        assert_eq!(
            *seen.lock(),
            vec![
                (SrLogLevel::Err, "e".to_string()),
                (SrLogLevel::Wrn, "w".to_string())
            ]
        );

        set_forward_level(SrLogLevel::Dbg);
        clear_log_sink();
    }

    #[test]
    #[serial]
    fn test_null_message_and_unknown_level() {
        let seen = recording_sink();
        set_forward_level(SrLogLevel::Dbg);

        unsafe { dispatch_log(SrLogLevel::Inf.as_raw(), std::ptr::null()) };
        send(9, "ignored");

        assert_eq!(*seen.lock(), vec![(SrLogLevel::Inf, String::new())]);
        clear_log_sink();
    }

    #[test]
    #[serial]
    fn test_sink_skips_none_and_unknown_levels() {
        let seen = recording_sink();
        set_forward_level(SrLogLevel::Dbg);

        send(SrLogLevel::None.as_raw(), "none");
        send(-1, "negative");
        send(SrLogLevel::Dbg.as_raw() + 1, "too verbose");
        send(SrLogLevel::Dbg.as_raw(), "debug");

        assert_eq!(*seen.lock(), vec![(SrLogLevel::Dbg, "debug".to_string())]);
        clear_log_sink();
    }

    #[test]
    #[serial]
    fn test_forward_level_none_drops_all() {
        let seen = recording_sink();
        set_forward_level(SrLogLevel::None);
        assert_eq!(forward_level(), SrLogLevel::None);

        send(SrLogLevel::Err.as_raw(), "dropped");
        assert!(seen.lock().is_empty());

        set_forward_level(SrLogLevel::Dbg);
        clear_log_sink();
    }

    #[test]
    #[serial]
    fn test_sink_panic_contained() {
        set_forward_level(SrLogLevel::Dbg);
        set_log_sink(|_, _| panic!("sink bug"));
        send(SrLogLevel::Err.as_raw(), "boom");
        clear_log_sink();
        // default sink after clearing
        send(SrLogLevel::Inf.as_raw(), "to tracing");
    }

    #[test]
    fn test_init_tracing_rejects_bad_filter() {
        let err = init_tracing("sysrepo=notalevel").unwrap_err();
        assert!(matches!(err, BridgeError::Config { .. }));
    }

    #[cfg(not(feature = "sysrepo-link"))]
    #[test]
    fn test_native_log_stubs() {
        assert_eq!(
            log_stderr(SrLogLevel::Err),
            Err(BridgeError::not_linked("sr_log_stderr"))
        );
        assert_eq!(
            log_syslog(SrLogLevel::Wrn),
            Err(BridgeError::not_linked("sr_log_syslog"))
        );
        assert_eq!(
            install_log_callback(),
            Err(BridgeError::not_linked("sr_log_set_cb"))
        );
    }
}
