//! Type aliases for shared state.
//!
//! The scene is read and written from UI handlers and from the completion of
//! an async layout request, so it lives behind a `parking_lot` lock.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-task sharing.
///
/// # Example
/// ```rust
/// use layerkit_core::types::{thread_safe, ThreadSafe};
///
/// let counter: ThreadSafe<u32> = thread_safe(0);
/// *counter.lock() += 1;
/// assert_eq!(*counter.lock(), 1);
/// ```
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A thread-safe read-write lock for read-heavy state.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// Boxed error that can cross task boundaries.
pub type BoxedSendError = Box<dyn std::error::Error + Send + Sync>;

/// Create a new `ThreadSafe<T>`.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

/// Create a new `ThreadSafeRw<T>`.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}
