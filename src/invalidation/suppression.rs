//! Purge Suppression Module
//!
//! Scoped, nestable switch that disables cache invalidation.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

// == Purge Suppression ==
/// Switch that disables invalidation while any scope is active.
///
/// Scopes are counted, so nested and overlapping scopes may close in any
/// order. Invalidation resumes once the last open scope ends, including when
/// a scope unwinds from a panic.
#[derive(Debug, Default)]
pub struct PurgeSuppression {
    depth: AtomicUsize,
}

impl PurgeSuppression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while any suppression scope is active.
    pub fn is_suppressed(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }

    /// Opens a suppression scope that lasts until the guard is dropped.
    pub fn suppress(&self) -> SuppressionGuard<'_> {
        self.depth.fetch_add(1, Ordering::SeqCst);
        SuppressionGuard { depth: &self.depth }
    }

    /// Runs `f` with invalidation suppressed.
    pub fn without_cache_purge<T>(&self, f: impl FnOnce() -> T) -> T {
        let _guard = self.suppress();
        f()
    }

    /// Awaits `fut` with invalidation suppressed.
    pub async fn without_cache_purge_async<F: Future>(&self, fut: F) -> F::Output {
        let _guard = self.suppress();
        fut.await
    }
}

// == Suppression Guard ==
/// Closes one suppression scope on drop.
#[must_use = "suppression ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SuppressionGuard<'a> {
    depth: &'a AtomicUsize,
}

impl Drop for SuppressionGuard<'_> {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[test]
    fn test_not_suppressed_by_default() {
        assert!(!PurgeSuppression::new().is_suppressed());
    }

    #[test]
    fn test_scope_suppresses_and_restores() {
        let suppression = PurgeSuppression::new();

        let inside = suppression.without_cache_purge(|| suppression.is_suppressed());

        assert!(inside);
        assert!(!suppression.is_suppressed());
    }

    #[test]
    fn test_nested_scopes_restore_outer_state() {
        let suppression = PurgeSuppression::new();

        suppression.without_cache_purge(|| {
            suppression.without_cache_purge(|| {
                assert!(suppression.is_suppressed());
            });
            // Inner scope must not force the flag back to false
            assert!(suppression.is_suppressed());
        });

        assert!(!suppression.is_suppressed());
    }

    #[test]
    fn test_returns_closure_value() {
        let suppression = PurgeSuppression::new();
        assert_eq!(suppression.without_cache_purge(|| 42), 42);
    }

    #[test]
    fn test_restores_after_panic() {
        let suppression = PurgeSuppression::new();

        let result = catch_unwind(AssertUnwindSafe(|| {
            suppression.without_cache_purge(|| panic!("boom"));
        }));

        assert!(result.is_err());
        assert!(!suppression.is_suppressed());
    }

    #[test]
    fn test_restores_after_error_return() {
        let suppression = PurgeSuppression::new();

        let result: Result<(), &str> = suppression.without_cache_purge(|| Err("failed"));

        assert!(result.is_err());
        assert!(!suppression.is_suppressed());
    }

    #[tokio::test]
    async fn test_async_scope() {
        let suppression = PurgeSuppression::new();

        let inside = suppression
            .without_cache_purge_async(async { suppression.is_suppressed() })
            .await;

        assert!(inside);
        assert!(!suppression.is_suppressed());
    }

    #[test]
    fn test_guard_drop_order() {
        let suppression = PurgeSuppression::new();
        let outer = suppression.suppress();
        let inner = suppression.suppress();
        drop(inner);
        assert!(suppression.is_suppressed());
        drop(outer);
        assert!(!suppression.is_suppressed());
    }

    #[test]
    fn test_overlapping_scopes_closed_out_of_order() {
        let suppression = PurgeSuppression::new();
        let first = suppression.suppress();
        let second = suppression.suppress();

        drop(first);
        assert!(suppression.is_suppressed(), "second scope is still open");

        drop(second);
        assert!(!suppression.is_suppressed());
    }

    #[tokio::test]
    async fn test_concurrent_scopes_release_when_all_exit() {
        let suppression = Arc::new(PurgeSuppression::new());
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());

        let task = {
            let suppression = suppression.clone();
            let entered = entered.clone();
            let release = release.clone();
            tokio::spawn(async move {
                suppression
                    .without_cache_purge_async(async {
                        entered.notify_one();
                        release.notified().await;
                    })
                    .await;
            })
        };

        entered.notified().await;
        let guard = suppression.suppress();
        release.notify_one();
        task.await.unwrap();

        assert!(suppression.is_suppressed(), "open scope lost suppression");
        drop(guard);
        assert!(!suppression.is_suppressed());
    }
}
