use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use fxhash::FxHashMap;
use lattice_resolve::{Resolution, Resolver};
use lattice_source::{Fetch, FetchError, FetchRequest, MemoryFetcher, ModulePath};
use parking_lot::Mutex;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A resolver over in-memory files, plus a handle for inspecting fetch counts.
pub fn memory_resolver(files: &[(&str, &str)]) -> (Arc<MemoryFetcher>, Resolver) {
    init_logger();
    let mut fetcher = MemoryFetcher::new();
    for (path, contents) in files {
        fetcher.insert(path, *contents);
    }
    let fetcher = Arc::new(fetcher);
    let resolver = Resolver::new(fetcher.clone(), ".");
    (fetcher, resolver)
}

pub fn order(resolution: &Resolution) -> Vec<&str> {
    resolution.order.iter().map(|p| p.as_str()).collect()
}

/// Serves in-memory files after a per-file delay, recording the order in
/// which fetches complete.
pub struct DelayedFetcher {
    inner: MemoryFetcher,
    delays: FxHashMap<ModulePath, Duration>,
    completed: Mutex<Vec<ModulePath>>,
}

impl DelayedFetcher {
    pub fn new(files: &[(&str, &str, u64)]) -> Self {
        let mut inner = MemoryFetcher::new();
        let mut delays = FxHashMap::default();
        for (path, contents, millis) in files {
            inner.insert(path, *contents);
            delays.insert(ModulePath::new(path), Duration::from_millis(*millis));
        }
        Self {
            inner,
            delays,
            completed: Mutex::new(Vec::new()),
        }
    }

    pub fn fetch_count(&self, path: &str) -> usize {
        self.inner.fetch_count(path)
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().iter().map(|p| p.to_string()).collect()
    }
}

impl Fetch for DelayedFetcher {
    fn fetch<'a>(&'a self, request: FetchRequest<'a>) -> BoxFuture<'a, Result<String, FetchError>> {
        let target = request.target();
        let delay = self.delays.get(&target).copied().unwrap_or_default();
        async move {
            tokio::time::sleep(delay).await;
            let result = self.inner.fetch(request).await;
            self.completed.lock().push(target);
            result
        }
        .boxed()
    }
}
