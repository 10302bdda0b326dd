//! Resource loading and caching per locale/module pair
//!
//! The store owns the active selection (locales in priority order and
//! modules) and one load record per pair ever selected. Records are never
//! evicted: a pair dropped from the selection keeps its resource for reuse if
//! it is selected again.

use crate::error::I18nError;
use crate::loader::ResourceLoader;
use crate::resource::Resource;
use arc_swap::ArcSwap;
use dashmap::DashMap;
use futures::future::{join_all, BoxFuture, Shared};
use futures::FutureExt;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tolk_common::{dedup_ordered, Locale, Module};
use tracing::{debug, error, info};

/// Settlement of one pair's load; resolves to the loaded (or empty) resource.
pub type LoadFuture = Shared<BoxFuture<'static, Arc<Resource>>>;

/// Observes key accesses under one pair: receives the key path and the raw
/// node found there, if any.
pub type Notifier = Arc<dyn Fn(&[String], Option<&Resource>) + Send + Sync>;

/// Builds the [`Notifier`] for a pair when its load starts.
pub type NotifyFn = Arc<dyn Fn(&Locale, &Module, LoadFuture) -> Notifier + Send + Sync>;

/// Receives the selection on subscription and after every change.
pub type SubscribeFn = Arc<dyn Fn(&Selection) + Send + Sync>;

/// Immutable snapshot of the active locales and modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Locales in priority order
    pub locales: Arc<[Locale]>,
    /// Active modules
    pub modules: Arc<[Module]>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            locales: Arc::from(Vec::new()),
            modules: Arc::from(Vec::new()),
        }
    }
}

impl Selection {
    /// Every (locale, module) pair of the selection, locale-major.
    pub fn pairs(&self) -> impl Iterator<Item = (&Locale, &Module)> {
        self.locales
            .iter()
            .flat_map(move |locale| self.modules.iter().map(move |module| (locale, module)))
    }
}

/// Handle returned by [`ResourceStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct LoadRecord {
    settled: Arc<OnceCell<Arc<Resource>>>,
    future: LoadFuture,
    notifier: Option<Notifier>,
}

/// Loads and caches resources for the active selection.
pub struct ResourceStore {
    loader: Arc<dyn ResourceLoader>,
    notify: Option<NotifyFn>,
    selection: ArcSwap<Selection>,
    records: DashMap<(Locale, Module), Arc<LoadRecord>>,
    subscribers: Mutex<Vec<(SubscriptionId, SubscribeFn)>>,
    next_subscription: AtomicU64,
    reconcile_lock: Mutex<()>,
}

impl fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStore")
            .field("selection", &*self.selection.load_full())
            .field("records", &self.records.len())
            .field("subscribers", &self.subscribers.lock().len())
            .finish_non_exhaustive()
    }
}

impl ResourceStore {
    /// Create a new store with an empty selection
    pub fn new(loader: Arc<dyn ResourceLoader>, notify: Option<NotifyFn>) -> Self {
        Self {
            loader,
            notify,
            selection: ArcSwap::from_pointee(Selection::default()),
            records: DashMap::new(),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            reconcile_lock: Mutex::new(()),
        }
    }

    /// Replaces the active locales, keeping the first occurrence of duplicates.
    pub fn set_locales<I, L>(&self, locales: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<Locale>,
    {
        let locales: Arc<[Locale]> = dedup_ordered(locales.into_iter().map(Into::into)).into();
        self.selection.rcu(|current| Selection {
            locales: Arc::clone(&locales),
            modules: Arc::clone(&current.modules),
        });
        self.apply();
    }

    /// Replaces the active modules, keeping the first occurrence of duplicates.
    pub fn set_modules<I, M>(&self, modules: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<Module>,
    {
        let modules: Arc<[Module]> = dedup_ordered(modules.into_iter().map(Into::into)).into();
        self.selection.rcu(|current| Selection {
            locales: Arc::clone(&current.locales),
            modules: Arc::clone(&modules),
        });
        self.apply();
    }

    /// Current selection snapshot.
    pub fn selection(&self) -> Arc<Selection> {
        self.selection.load_full()
    }

    /// A future resolving once every pair selected *now* has settled.
    ///
    /// Pairs added after this call are not awaited.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let selection = self.selection();
        let pending: Vec<LoadFuture> = selection
            .pairs()
            .filter_map(|(locale, module)| self.record(locale, module))
            .map(|record| record.future.clone())
            .collect();

        async move {
            join_all(pending).await;
        }
    }

    /// Registers a selection handler, invoking it immediately.
    pub fn subscribe(&self, handler: SubscribeFn) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::clone(&handler)));
        handler(&*self.selection());
        id
    }

    /// Removes a handler. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// The settled resource for a pair, if its load has finished.
    pub fn resource(&self, locale: &Locale, module: &Module) -> Option<Arc<Resource>> {
        self.record(locale, module)
            .and_then(|record| record.settled.get().cloned())
    }

    /// Whether the pair's load has settled, successfully or not.
    pub fn is_loaded(&self, locale: &Locale, module: &Module) -> bool {
        self.record(locale, module)
            .is_some_and(|record| record.settled.get().is_some())
    }

    /// Whether a load has ever been started for the pair.
    pub fn is_requested(&self, locale: &Locale, module: &Module) -> bool {
        self.records.contains_key(&(locale.clone(), module.clone()))
    }

    /// The access notifier bound to a pair, if a notify hook is installed.
    pub fn notifier(&self, locale: &Locale, module: &Module) -> Option<Notifier> {
        self.record(locale, module)
            .and_then(|record| record.notifier.clone())
    }

    fn record(&self, locale: &Locale, module: &Module) -> Option<Arc<LoadRecord>> {
        self.records
            .get(&(locale.clone(), module.clone()))
            .map(|entry| Arc::clone(entry.value()))
    }

    fn apply(&self) {
        let selection = self.selection();
        self.reconcile(&selection);

        let handlers: Vec<SubscribeFn> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(&*selection);
        }
    }

    fn reconcile(&self, selection: &Selection) {
        let guard = self.reconcile_lock.lock();
        let mut started = Vec::new();

        for (locale, module) in selection.pairs() {
            if self.is_requested(locale, module) {
                continue;
            }
            debug!(%locale, %module, "Scheduling resource load");
            let record = Arc::new(self.start_load(locale, module));
            started.push(record.future.clone());
            self.records.insert((locale.clone(), module.clone()), record);
        }
        drop(guard);

        // Without a runtime the first `wait()` drives the loads instead.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            for future in started {
                handle.spawn(future);
            }
        }
    }

    fn start_load(&self, locale: &Locale, module: &Module) -> LoadRecord {
        let loader = Arc::clone(&self.loader);
        let settled = Arc::new(OnceCell::new());
        let slot = Arc::clone(&settled);
        let (owned_locale, owned_module) = (locale.clone(), module.clone());

        let future = async move {
            let resource = match loader.load(&owned_locale, &owned_module).await {
                Ok(resource) => {
                    info!(locale = %owned_locale, module = %owned_module, "Loaded resource");
                    resource
                }
                Err(err) => {
                    let failure = I18nError::LoadFailure {
                        locale: owned_locale.to_string(),
                        module: owned_module.to_string(),
                        message: format!("{err:#}"),
                    };
                    error!("{failure}");
                    Resource::empty()
                }
            };
            let resource = Arc::new(resource);
            let _ = slot.set(Arc::clone(&resource));
            resource
        }
        .boxed()
        .shared();

        let notifier = self
            .notify
            .as_ref()
            .map(|notify| notify(locale, module, future.clone()));

        LoadRecord {
            settled,
            future,
            notifier,
        }
    }
}
