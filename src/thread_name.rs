//! # Thread Identity
//!
//! Every record carries the name of the thread that emitted it. Names are
//! strictly per-thread: a name set on thread T is only ever observed by
//! queries made from T, so no synchronization is needed beyond what
//! thread-local storage and the OS already provide.
//!
//! Two strategies implement [`ThreadNaming`]:
//!
//! - [`NativeThreadName`] (glibc Linux, macOS) stores the name with
//!   `pthread_setname_np` and reads it back with `pthread_getname_np`, so the
//!   name also shows up in `top`, debuggers and core dumps. The OS bounds the
//!   length (15 bytes on Linux, 63 on macOS); longer names are cut on a UTF-8
//!   boundary before the call.
//! - [`ThreadLocalName`] (everywhere else) keeps the name in a `thread_local!`
//!   slot. Until a name is set it reports the std thread name (`"main"` for
//!   the main thread) or [`UNKNOWN_THREAD_NAME`].
//!
//! The strategy is fixed per target at compile time through
//! [`PlatformThreadName`]. A native rename that fails stores the name in the
//! thread-local slot instead, without surfacing an error; that slot is read
//! first until a later native rename succeeds.

use std::cell::RefCell;

/// Name reported for threads that were never named
pub const UNKNOWN_THREAD_NAME: &str = "<unknown>";

/// A way of attaching a name to the calling thread
pub trait ThreadNaming {
    /// Name the calling thread, replacing any previous name.
    fn set_name(name: &str);

    /// The calling thread's current name.
    fn name() -> String;
}

thread_local! {
    static LOCAL_NAME: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Names kept in a slot owned by each thread
#[derive(Debug, Clone, Copy)]
pub struct ThreadLocalName;

impl ThreadNaming for ThreadLocalName {
    fn set_name(name: &str) {
        // Fails only while the thread's TLS is being torn down.
        let _ = LOCAL_NAME.try_with(|slot| *slot.borrow_mut() = Some(name.to_owned()));
    }

    fn name() -> String {
        explicit_local_name()
            .or_else(|| std::thread::current().name().map(str::to_owned))
            .unwrap_or_else(|| UNKNOWN_THREAD_NAME.to_owned())
    }
}

/// The name stored in the calling thread's slot, if one was set.
fn explicit_local_name() -> Option<String> {
    LOCAL_NAME.try_with(|slot| slot.borrow().clone()).ok().flatten()
}

/// Empty the calling thread's slot.
#[cfg_attr(
    not(any(all(target_os = "linux", target_env = "gnu"), target_os = "macos")),
    allow(dead_code)
)]
fn clear_local_name() {
    let _ = LOCAL_NAME.try_with(|slot| slot.borrow_mut().take());
}

#[cfg(any(all(target_os = "linux", target_env = "gnu"), target_os = "macos"))]
pub use native::NativeThreadName;

#[cfg(any(all(target_os = "linux", target_env = "gnu"), target_os = "macos"))]
mod native {
    use super::{clear_local_name, explicit_local_name, ThreadLocalName, ThreadNaming};
    use std::ffi::{CStr, CString};

    #[cfg(target_os = "linux")]
    pub(super) const NATIVE_NAME_MAX: usize = 15;
    #[cfg(target_os = "macos")]
    pub(super) const NATIVE_NAME_MAX: usize = 63;

    /// Names stored by the operating system's pthread facility
    #[derive(Debug, Clone, Copy)]
    pub struct NativeThreadName;

    /// Cut `name` at the first NUL and to the OS limit on a char boundary.
    pub(super) fn native_name(name: &str) -> CString {
        let name = name.split('\0').next().unwrap_or_default();
        let mut end = name.len().min(NATIVE_NAME_MAX);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        CString::new(&name[..end]).unwrap_or_default()
    }

    impl ThreadNaming for NativeThreadName {
        fn set_name(name: &str) {
            let cname = native_name(name);

            #[cfg(target_os = "linux")]
            let rc = unsafe { libc::pthread_setname_np(libc::pthread_self(), cname.as_ptr()) };
            #[cfg(target_os = "macos")]
            let rc = unsafe { libc::pthread_setname_np(cname.as_ptr()) };

            // The slot shadows the OS name only while the OS refused ours.
            if rc == 0 {
                clear_local_name();
            } else {
                ThreadLocalName::set_name(name);
            }
        }

        fn name() -> String {
            if let Some(name) = explicit_local_name() {
                return name;
            }

            let mut buffer = [0 as libc::c_char; 128];
            // The last byte stays zero so the buffer is always terminated.
            let rc = unsafe {
                libc::pthread_getname_np(
                    libc::pthread_self(),
                    buffer.as_mut_ptr(),
                    buffer.len() - 1,
                )
            };

            if rc == 0 {
                let name = unsafe { CStr::from_ptr(buffer.as_ptr()) };
                return name.to_string_lossy().into_owned();
            }

            ThreadLocalName::name()
        }
    }
}

/// Strategy used on this target
#[cfg(any(all(target_os = "linux", target_env = "gnu"), target_os = "macos"))]
pub type PlatformThreadName = NativeThreadName;

/// Strategy used on this target
#[cfg(not(any(all(target_os = "linux", target_env = "gnu"), target_os = "macos")))]
pub type PlatformThreadName = ThreadLocalName;

/// Name the calling thread for log records.
///
/// Calling it again overwrites the previous name.
pub fn set_thread_name(name: &str) {
    PlatformThreadName::set_name(name);
}

/// The name of the calling thread as it appears in log records.
pub fn thread_name() -> String {
    PlatformThreadName::name()
}
