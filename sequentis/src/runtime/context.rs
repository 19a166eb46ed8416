use crate::runtime::Handle;

use std::cell::RefCell;

thread_local! {
    /// Handle of the runtime driving the current thread.
    ///
    /// Set for the duration of [`Runtime::block_on`](crate::Runtime::block_on)
    /// so timers and `spawn` can reach the runtime without explicit
    /// parameter passing.
    static CURRENT: RefCell<Option<Handle>> = const { RefCell::new(None) };
}

/// Installs `handle` as the current runtime while `f` runs.
///
/// The previous context is restored afterwards, so nested runtimes on the
/// same thread see their own handle.
pub(crate) fn enter_context<R>(handle: Handle, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<Handle>);

    impl Drop for Restore {
        fn drop(&mut self) {
            let prev = self.0.take();
            CURRENT.with(|cell| *cell.borrow_mut() = prev);
        }
    }

    let prev = CURRENT.with(|cell| cell.borrow_mut().replace(handle));
    let _restore = Restore(prev);

    f()
}

/// Runs `f` with the current runtime handle.
///
/// Returns `None` when called outside of a runtime.
pub(crate) fn with_current<R>(f: impl FnOnce(&Handle) -> R) -> Option<R> {
    let handle = CURRENT.with(|cell| cell.borrow().clone())?;
    Some(f(&handle))
}
