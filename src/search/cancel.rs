//! Cooperative cancellation shared between a planner and its controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A clonable cancellation flag.
///
/// Clones share the same flag, so a controller thread can hold one clone
/// and cancel a search that polls another.
///
/// # Examples
///
/// ```
/// use u_transport::search::CancellationToken;
///
/// let token = CancellationToken::new();
/// let remote = token.clone();
/// assert!(!token.is_cancelled());
///
/// remote.cancel();
/// assert!(token.is_cancelled());
///
/// token.reset();
/// assert!(!remote.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Clears a previous request.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_cancel_across_threads() {
        let token = CancellationToken::new();
        let remote = token.clone();
        thread::spawn(move || remote.cancel())
            .join()
            .expect("thread finished");
        assert!(token.is_cancelled());
    }
}
