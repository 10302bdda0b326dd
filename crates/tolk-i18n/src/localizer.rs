//! The localizer facade
//!
//! One [`Localizer`] owns every cache of a session: load records, compiled
//! templates and key-path nodes. Clones share that state.

use crate::args::Args;
use crate::formatter::Formatter;
use crate::loader::{DirectoryLoader, ResourceLoader};
use crate::parser::{FluentParser, Interpolator, TemplateParser};
use crate::proxy::KeyPath;
use crate::store::{LoadFuture, Notifier, NotifyFn, ResourceStore, Selection, SubscriptionId};
use crate::tags::{concat_tag, parse_tags, Markup, TagFn, TagMap};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tolk_common::{split_key_path, Locale, Module};
use tolk_config::defaults::DEFAULT_MAX_NESTING_DEPTH;
use tolk_config::{LocalizerConfig, TemplateEngine};
use tracing::info;

pub(crate) struct Core<T> {
    pub(crate) store: Arc<ResourceStore>,
    pub(crate) formatter: Formatter,
    pub(crate) fallback_tag: TagFn<T>,
}

/// Builder for [`Localizer`].
pub struct LocalizerBuilder<T = String> {
    loader: Arc<dyn ResourceLoader>,
    parser: Arc<dyn TemplateParser>,
    notify: Option<NotifyFn>,
    fallback_tag: TagFn<T>,
    max_nesting_depth: usize,
}

impl LocalizerBuilder<String> {
    /// Starts a builder producing plain string markup.
    pub fn new(loader: impl ResourceLoader + 'static) -> Self {
        Self::with_shared_loader(Arc::new(loader))
    }

    /// Like [`LocalizerBuilder::new`] for an already shared loader.
    pub fn with_shared_loader(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            loader,
            parser: Arc::new(Interpolator),
            notify: None,
            fallback_tag: concat_tag(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl<T> LocalizerBuilder<T> {
    /// Sets the template parser (default: [`Interpolator`]).
    #[must_use]
    pub fn parser(mut self, parser: impl TemplateParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// Installs a hook building one access notifier per loaded pair.
    #[must_use]
    pub fn notify(
        mut self,
        notify: impl Fn(&Locale, &Module, LoadFuture) -> Notifier + Send + Sync + 'static,
    ) -> Self {
        self.notify = Some(Arc::new(notify));
        self
    }

    /// Limits `<:ref/>` expansion depth (default 32).
    #[must_use]
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Sets the fallback tag wrapper, which also renders the root of every
    /// parsed string, changing the markup output type.
    pub fn tag<U>(
        self,
        fallback: impl Fn(Vec<Markup<U>>, &str) -> Markup<U> + Send + Sync + 'static,
    ) -> LocalizerBuilder<U> {
        LocalizerBuilder {
            loader: self.loader,
            parser: self.parser,
            notify: self.notify,
            fallback_tag: Arc::new(fallback),
            max_nesting_depth: self.max_nesting_depth,
        }
    }

    /// Builds the localizer with an empty selection.
    pub fn build(self) -> Localizer<T> {
        let store = Arc::new(ResourceStore::new(self.loader, self.notify));
        let formatter = Formatter::new(Arc::clone(&store), self.parser, self.max_nesting_depth);
        let core = Arc::new(Core {
            store,
            formatter,
            fallback_tag: self.fallback_tag,
        });

        Localizer {
            root: KeyPath::root(Arc::clone(&core)),
            core,
        }
    }
}

/// Resolves translations for the active locales and modules.
pub struct Localizer<T = String> {
    core: Arc<Core<T>>,
    root: KeyPath<T>,
}

impl<T> Clone for Localizer<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            root: self.root.clone(),
        }
    }
}

impl<T> fmt::Debug for Localizer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("store", &self.core.store)
            .field("formatter", &self.core.formatter)
            .finish_non_exhaustive()
    }
}

impl Localizer<String> {
    /// Starts building a localizer over `loader`.
    pub fn builder(loader: impl ResourceLoader + 'static) -> LocalizerBuilder<String> {
        LocalizerBuilder::new(loader)
    }

    /// Builds a localizer reading resource files as configured and applies
    /// the configured selection.
    pub fn from_config(config: &LocalizerConfig) -> Self {
        let loader = DirectoryLoader::new(&config.resources.dir, config.resources.format);
        let builder =
            LocalizerBuilder::new(loader).max_nesting_depth(config.templates.max_nesting_depth);
        let builder = match config.templates.engine {
            TemplateEngine::Interpolate => builder.parser(Interpolator),
            TemplateEngine::Fluent => builder.parser(FluentParser),
        };

        let localizer = builder.build();
        localizer.set_modules(config.module_ids());
        localizer.set_locales(config.locale_ids());
        info!(
            locales = ?config.locales,
            modules = ?config.modules,
            "Localizer initialized from configuration"
        );
        localizer
    }
}

impl<T> Localizer<T> {
    /// Replaces the active locales (priority order) and starts any missing loads.
    pub fn set_locales<I, L>(&self, locales: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<Locale>,
    {
        self.core.store.set_locales(locales);
    }

    /// Replaces the active modules and starts any missing loads.
    pub fn set_modules<I, M>(&self, modules: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<Module>,
    {
        self.core.store.set_modules(modules);
    }

    /// Active locales in priority order.
    pub fn locales(&self) -> Arc<[Locale]> {
        Arc::clone(&self.core.store.selection().locales)
    }

    /// Active modules.
    pub fn modules(&self) -> Arc<[Module]> {
        Arc::clone(&self.core.store.selection().modules)
    }

    /// Resolves once every currently selected pair has settled.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        self.core.store.wait()
    }

    /// Calls `handler` now and after every selection change.
    pub fn subscribe(
        &self,
        handler: impl Fn(&Selection) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.core.store.subscribe(Arc::new(handler))
    }

    /// Removes a selection handler.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.core.store.unsubscribe(id)
    }

    /// Whether the pair's load has settled.
    pub fn is_loaded(&self, locale: &Locale, module: &Module) -> bool {
        self.core.store.is_loaded(locale, module)
    }

    /// Formats the dotted `key` in `module`; never fails.
    pub fn format(&self, module: impl Into<Module>, key: &str, args: Option<&Args>) -> String {
        self.core
            .formatter
            .format(&module.into(), &split_key_path(key), args)
    }

    /// Formats the dotted `key` in `module` and renders its inline tags.
    pub fn format_tagged(
        &self,
        module: impl Into<Module>,
        key: &str,
        args: Option<&Args>,
        tags: &TagMap<T>,
    ) -> Markup<T> {
        let text = self.format(module, key, args);
        parse_tags(&text, tags, &self.core.fallback_tag)
    }

    /// Root of the key-path tree.
    pub fn t(&self) -> KeyPath<T> {
        self.root.clone()
    }

    /// The resource store backing this localizer.
    pub fn store(&self) -> &ResourceStore {
        &self.core.store
    }

    /// The formatter backing this localizer.
    pub fn formatter(&self) -> &Formatter {
        &self.core.formatter
    }
}
