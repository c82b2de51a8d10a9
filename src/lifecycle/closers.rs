//! Ordered release of process-owned resources.

use std::io;
use std::sync::{Arc, Mutex};

/// A resource that can be released at shutdown.
///
/// `close` takes a shared reference so one `Arc` can serve both as the
/// live handle and as the registered resource.
pub trait Closeable: Send + Sync {
    fn close(&self) -> io::Result<()>;
}

/// Ordered list of releasable resources.
///
/// Append-only while the process runs; drained once at shutdown. Every
/// resource provisioned during bootstrap is registered before bootstrap
/// returns, so nothing leaks on the success path.
#[derive(Default)]
pub struct CloserRegistry {
    closers: Mutex<Vec<Arc<dyn Closeable>>>,
}

impl std::fmt::Debug for CloserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloserRegistry")
            .field("closers", &self.len())
            .finish()
    }
}

impl CloserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource. Never fails.
    pub fn register(&self, closer: Arc<dyn Closeable>) {
        self.closers.lock().unwrap().push(closer);
    }

    pub fn len(&self) -> usize {
        self.closers.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.closers.lock().unwrap().is_empty()
    }

    /// Release everything in registration order.
    ///
    /// A failing close is logged and skipped; iteration always reaches the
    /// last resource. A second call finds an empty registry.
    pub fn close_all(&self) {
        let closers: Vec<_> = {
            let mut guard = self.closers.lock().unwrap();
            guard.drain(..).collect()
        };

        for closer in closers {
            if let Err(e) = closer.close() {
                tracing::error!(error = %e, "failed to close resource");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct OrderedCloser {
        id: usize,
        order: Arc<Mutex<Vec<usize>>>,
        fail: bool,
    }

    impl Closeable for OrderedCloser {
        fn close(&self) -> io::Result<()> {
            self.order.lock().unwrap().push(self.id);
            if self.fail {
                Err(io::Error::new(io::ErrorKind::Other, "release failed"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_close_all_runs_in_registration_order() {
        let registry = CloserRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for id in 0..3 {
            registry.register(Arc::new(OrderedCloser {
                id,
                order: order.clone(),
                fail: false,
            }));
        }

        registry.close_all();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_failing_close_does_not_stop_iteration() {
        let registry = CloserRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        registry.register(Arc::new(OrderedCloser {
            id: 0,
            order: order.clone(),
            fail: true,
        }));
        registry.register(Arc::new(OrderedCloser {
            id: 1,
            order: order.clone(),
            fail: true,
        }));
        registry.register(Arc::new(OrderedCloser {
            id: 2,
            order: order.clone(),
            fail: false,
        }));

        registry.close_all();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_close_all_drains_the_registry() {
        let registry = CloserRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        registry.register(Arc::new(OrderedCloser {
            id: 0,
            order: order.clone(),
            fail: false,
        }));

        registry.close_all();
        registry.close_all();
        assert_eq!(order.lock().unwrap().len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(CloserRegistry::new());
        let counter = Arc::new(AtomicUsize::new(0));

        struct CountingCloser(Arc<AtomicUsize>);
        impl Closeable for CountingCloser {
            fn close(&self) -> io::Result<()> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let counter = counter.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        registry.register(Arc::new(CountingCloser(counter.clone())));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 80);
        registry.close_all();
        assert_eq!(counter.load(Ordering::SeqCst), 80);
    }
}
