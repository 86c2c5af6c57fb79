//! Rust-side targets of the change trampolines.
//!
//! Handlers are registered per module name (module-change) or per xpath
//! (subtree-change). When sysrepo fires a callback, the dispatch functions
//! look up the handler by the name/xpath sysrepo passes back, run it, and
//! translate the outcome into a status code:
//!
//! | outcome | status |
//! |---------|--------|
//! | handler succeeded | `SR_ERR_OK` |
//! | handler failed during `SR_EV_VERIFY` | `SR_ERR_VALIDATION_FAILED` |
//! | handler failed in any other phase | `SR_ERR_INTERNAL` |
//! | no handler registered | `SR_ERR_INTERNAL` |
//! | null name or unknown event | `SR_ERR_INVAL_ARG` |
//!
//! Failures are also reported on the session so the client that made the
//! change sees the message.

use std::any::Any;
use std::ffi::{c_char, c_int, c_void, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::anyhow;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use sysrepo_types::{SrNotifEvent, SrStatus};
use tracing::{debug, error, info};

use crate::error::{BridgeError, BridgeResult};
use crate::native::{sr_notif_event_t, sr_session_ctx_t};
use crate::session::SessionRef;

/// Handles change notifications for a whole module.
pub trait ModuleChangeHandler: Send + Sync {
    fn notify(&self, session: &SessionRef, module: &str, event: SrNotifEvent) -> anyhow::Result<()>;
}

/// Handles change notifications for a subtree.
pub trait SubtreeChangeHandler: Send + Sync {
    fn notify(&self, session: &SessionRef, xpath: &str, event: SrNotifEvent) -> anyhow::Result<()>;
}

impl<F> ModuleChangeHandler for F
where
    F: Fn(&SessionRef, &str, SrNotifEvent) -> anyhow::Result<()> + Send + Sync,
{
    fn notify(&self, session: &SessionRef, module: &str, event: SrNotifEvent) -> anyhow::Result<()> {
        self(session, module, event)
    }
}

impl<F> SubtreeChangeHandler for F
where
    F: Fn(&SessionRef, &str, SrNotifEvent) -> anyhow::Result<()> + Send + Sync,
{
    fn notify(&self, session: &SessionRef, xpath: &str, event: SrNotifEvent) -> anyhow::Result<()> {
        self(session, xpath, event)
    }
}

static MODULE_CHANGE_HANDLERS: Lazy<DashMap<String, Arc<dyn ModuleChangeHandler>>> =
    Lazy::new(DashMap::new);
static SUBTREE_CHANGE_HANDLERS: Lazy<DashMap<String, Arc<dyn SubtreeChangeHandler>>> =
    Lazy::new(DashMap::new);

fn register<H: ?Sized>(
    registry: &DashMap<String, Arc<H>>,
    kind: &str,
    key: String,
    handler: Arc<H>,
) -> BridgeResult<()> {
    match registry.entry(key) {
        Entry::Occupied(entry) => Err(BridgeError::already_registered(entry.key().clone())),
        Entry::Vacant(entry) => {
            info!("Registered {} handler for {}", kind, entry.key());
            entry.insert(handler);
            Ok(())
        }
    }
}

/// Registers the handler for `module`.
///
/// Fails if a handler is already registered for that module.
pub fn register_module_change_handler(
    module: impl Into<String>,
    handler: impl ModuleChangeHandler + 'static,
) -> BridgeResult<()> {
    register(
        &MODULE_CHANGE_HANDLERS,
        "module-change",
        module.into(),
        Arc::new(handler) as Arc<dyn ModuleChangeHandler>,
    )
}

/// Removes the handler for `module`, returning true if one was registered.
pub fn unregister_module_change_handler(module: &str) -> bool {
    MODULE_CHANGE_HANDLERS.remove(module).is_some()
}

/// Returns true if a handler is registered for `module`.
pub fn module_change_registered(module: &str) -> bool {
    MODULE_CHANGE_HANDLERS.contains_key(module)
}

/// Registers the handler for `xpath`.
///
/// Fails if a handler is already registered for that xpath.
pub fn register_subtree_change_handler(
    xpath: impl Into<String>,
    handler: impl SubtreeChangeHandler + 'static,
) -> BridgeResult<()> {
    register(
        &SUBTREE_CHANGE_HANDLERS,
        "subtree-change",
        xpath.into(),
        Arc::new(handler) as Arc<dyn SubtreeChangeHandler>,
    )
}

/// Removes the handler for `xpath`, returning true if one was registered.
pub fn unregister_subtree_change_handler(xpath: &str) -> bool {
    SUBTREE_CHANGE_HANDLERS.remove(xpath).is_some()
}

/// Returns true if a handler is registered for `xpath`.
pub fn subtree_change_registered(xpath: &str) -> bool {
    SUBTREE_CHANGE_HANDLERS.contains_key(xpath)
}

/// Default module-change target.
///
/// # Safety
///
/// `module_name` must be null or a valid C string; `session` must be null or
/// a session that stays valid for the duration of the call.
pub unsafe extern "C" fn dispatch_module_change(
    session: *mut sr_session_ctx_t,
    module_name: *const c_char,
    event: sr_notif_event_t,
    _private_ctx: *mut c_void,
) -> c_int {
    dispatch(
        "module-change",
        &MODULE_CHANGE_HANDLERS,
        session,
        module_name,
        event,
        |handler, session, key, event| handler.notify(session, key, event),
    )
}

/// Default subtree-change target.
///
/// # Safety
///
/// As for [`dispatch_module_change`].
pub unsafe extern "C" fn dispatch_subtree_change(
    session: *mut sr_session_ctx_t,
    xpath: *const c_char,
    event: sr_notif_event_t,
    _private_ctx: *mut c_void,
) -> c_int {
    dispatch(
        "subtree-change",
        &SUBTREE_CHANGE_HANDLERS,
        session,
        xpath,
        event,
        |handler, session, key, event| handler.notify(session, key, event),
    )
}

unsafe fn dispatch<H: ?Sized>(
    kind: &str,
    registry: &DashMap<String, Arc<H>>,
    session: *mut sr_session_ctx_t,
    key: *const c_char,
    event: sr_notif_event_t,
    notify: impl Fn(&H, &SessionRef, &str, SrNotifEvent) -> anyhow::Result<()>,
) -> c_int {
    if key.is_null() {
        error!("{} callback failed: {}", kind, BridgeError::NullPointer);
        return BridgeError::NullPointer.status().as_raw();
    }

    let key = CStr::from_ptr(key).to_string_lossy().into_owned();
    let session = SessionRef::from_raw(session);

    let Some(event) = SrNotifEvent::from_raw(event) else {
        let err = BridgeError::UnknownValue {
            what: "sr_notif_event_t",
            raw: event,
        };
        error!("{} callback for {} failed: {}", kind, key, err);
        session.report(&err.to_string(), &key);
        return err.status().as_raw();
    };

    // Clone out of the map so the handler may (un)register without deadlocking.
    let handler = match registry.get(&key) {
        Some(entry) => Arc::clone(entry.value()),
        None => {
            let err = BridgeError::not_registered(key.as_str());
            error!("{} callback error. {}", kind, err);
            session.report(&err.to_string(), &key);
            return err.status().as_raw();
        }
    };

    debug!("{} {} event={}", kind, key, event);

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        notify(&*handler, &session, &key, event)
    }))
    .unwrap_or_else(|payload| Err(anyhow!("handler panicked: {}", panic_message(&*payload))));

    match result {
        Ok(()) => SrStatus::Ok.as_raw(),
        Err(err) => {
            error!("{} handler for {} failed on {}: {:#}", kind, key, event, err);
            session.report(&format!("{:#}", err), &key);
            status_for_failure(event).as_raw()
        }
    }
}

/// Status returned to sysrepo when a handler fails during `event`.
pub fn status_for_failure(event: SrNotifEvent) -> SrStatus {
    if event == SrNotifEvent::Verify {
        SrStatus::ValidationFailed
    } else {
        SrStatus::Internal
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::ffi::CString;
    use std::ptr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn call_module(name: &str, event: SrNotifEvent) -> c_int {
        let c_name = CString::new(name).unwrap();
        unsafe {
            dispatch_module_change(
                ptr::null_mut(),
                c_name.as_ptr(),
                event.as_raw(),
                ptr::null_mut(),
            )
        }
    }

    fn call_subtree(xpath: &str, event: SrNotifEvent) -> c_int {
        let c_xpath = CString::new(xpath).unwrap();
        unsafe {
            dispatch_subtree_change(
                ptr::null_mut(),
                c_xpath.as_ptr(),
                event.as_raw(),
                ptr::null_mut(),
            )
        }
    }

    #[test]
    fn test_register_twice_fails() {
        let ok = |_: &SessionRef, _: &str, _: SrNotifEvent| -> anyhow::Result<()> { Ok(()) };
        register_module_change_handler("unit-dup", ok).unwrap();
        assert_eq!(
            register_module_change_handler("unit-dup", ok),
            Err(BridgeError::already_registered("unit-dup"))
        );
        assert!(module_change_registered("unit-dup"));
        assert!(unregister_module_change_handler("unit-dup"));
        assert!(!unregister_module_change_handler("unit-dup"));
        assert!(!module_change_registered("unit-dup"));
    }

    #[test]
    fn test_success_and_arguments() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        register_module_change_handler(
            "unit-ok",
            move |session: &SessionRef, module: &str, event: SrNotifEvent| -> anyhow::Result<()> {
                assert!(session.is_null());
                assert_eq!(module, "unit-ok");
                assert_eq!(event, SrNotifEvent::Apply);
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(call_module("unit-ok", SrNotifEvent::Apply), SrStatus::Ok.as_raw());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        unregister_module_change_handler("unit-ok");
    }

    #[test]
    fn test_failure_status_depends_on_event() {
        register_module_change_handler(
            "unit-fail",
            |_: &SessionRef, _: &str, _: SrNotifEvent| -> anyhow::Result<()> { bail!("bad mtu") },
        )
        .unwrap();

        assert_eq!(
            call_module("unit-fail", SrNotifEvent::Verify),
            SrStatus::ValidationFailed.as_raw()
        );
        assert_eq!(
            call_module("unit-fail", SrNotifEvent::Apply),
            SrStatus::Internal.as_raw()
        );
        assert_eq!(
            call_module("unit-fail", SrNotifEvent::Abort),
            SrStatus::Internal.as_raw()
        );
        unregister_module_change_handler("unit-fail");
    }

    #[test]
    fn test_missing_handler() {
        assert_eq!(
            call_module("unit-nobody", SrNotifEvent::Apply),
            SrStatus::Internal.as_raw()
        );
        assert_eq!(
            call_subtree("/unit-nobody:*", SrNotifEvent::Verify),
            SrStatus::Internal.as_raw()
        );
    }

    #[test]
    fn test_null_name_and_bad_event() {
        let rc = unsafe {
            dispatch_module_change(ptr::null_mut(), ptr::null(), 0, ptr::null_mut())
        };
        assert_eq!(rc, SrStatus::InvalArg.as_raw());

        let c_name = CString::new("unit-bad-event").unwrap();
        let rc = unsafe {
            dispatch_module_change(ptr::null_mut(), c_name.as_ptr(), 42, ptr::null_mut())
        };
        assert_eq!(rc, SrStatus::InvalArg.as_raw());
    }

    #[test]
    fn test_panic_is_contained() {
        register_subtree_change_handler(
            "/unit-panic:a",
            |_: &SessionRef, _: &str, _: SrNotifEvent| -> anyhow::Result<()> {
                panic!("handler bug")
            },
        )
        .unwrap();

        assert_eq!(
            call_subtree("/unit-panic:a", SrNotifEvent::Verify),
            SrStatus::ValidationFailed.as_raw()
        );
        unregister_subtree_change_handler("/unit-panic:a");
    }

    #[test]
    fn test_handler_may_unregister_itself() {
        register_subtree_change_handler(
            "/unit-once:a",
            |_: &SessionRef, xpath: &str, _: SrNotifEvent| -> anyhow::Result<()> {
                unregister_subtree_change_handler(xpath);
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(
            call_subtree("/unit-once:a", SrNotifEvent::Enabled),
            SrStatus::Ok.as_raw()
        );
        assert!(!subtree_change_registered("/unit-once:a"));
        assert_eq!(
            call_subtree("/unit-once:a", SrNotifEvent::Apply),
            SrStatus::Internal.as_raw()
        );
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*payload), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*payload), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(&*payload), "non-string panic payload");
    }
}
