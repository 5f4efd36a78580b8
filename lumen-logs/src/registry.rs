//! Construct-once cache of per-scope components.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::scope::InstrumentationScope;

/// A concurrency-safe cache mapping an [`InstrumentationScope`] to a lazily
/// constructed component.
///
/// The factory runs at most once per unique scope, even under concurrent
/// first access; every later lookup with an equal scope returns the same
/// `Arc`. Entries are never evicted.
pub(crate) struct ScopeRegistry<T> {
    components: RwLock<HashMap<InstrumentationScope, Arc<T>>>,
    factory: Box<dyn Fn(InstrumentationScope) -> T + Send + Sync>,
}

impl<T> ScopeRegistry<T> {
    pub(crate) fn new<F>(factory: F) -> Self
    where
        F: Fn(InstrumentationScope) -> T + Send + Sync + 'static,
    {
        Self {
            components: RwLock::new(HashMap::new()),
            factory: Box::new(factory),
        }
    }

    /// Returns the cached component for `scope`, constructing it first if
    /// this is the scope's first access.
    pub(crate) fn get_or_create(&self, scope: &InstrumentationScope) -> Arc<T> {
        if let Some(existing) = self.components.read().unwrap().get(scope) {
            return Arc::clone(existing);
        }

        // Racing first accesses serialize here; `entry` makes the loser
        // reuse the winner's component instead of constructing a second.
        let mut components = self.components.write().unwrap();
        Arc::clone(
            components
                .entry(scope.clone())
                .or_insert_with(|| Arc::new((self.factory)(scope.clone()))),
        )
    }
}

impl<T> core::fmt::Debug for ScopeRegistry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScopeRegistry")
            .field("len", &self.components.read().unwrap().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn equal_scopes_return_the_identical_instance() {
        let registry = ScopeRegistry::new(|scope: InstrumentationScope| scope.name().to_owned());

        let scope = InstrumentationScope::builder("lib").version("1.0").build();
        let first = registry.get_or_create(&scope);
        let second = registry.get_or_create(&scope);

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn distinct_scopes_get_distinct_instances() {
        let registry = ScopeRegistry::new(|scope: InstrumentationScope| scope.name().to_owned());

        let a = registry.get_or_create(&InstrumentationScope::builder("a").build());
        let b = registry.get_or_create(&InstrumentationScope::builder("b").build());

        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn concurrent_first_access_constructs_exactly_once() {
        let constructions = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&constructions);
        let registry = Arc::new(ScopeRegistry::new(move |_scope| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let scope = InstrumentationScope::builder("contended").build();

        let threads: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let scope = scope.clone();
                std::thread::spawn(move || registry.get_or_create(&scope))
            })
            .collect();

        let instances: Vec<_> = threads
            .into_iter()
            .map(|thread| thread.join().unwrap())
            .collect();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    }
}
