//! Resource loading collaborators

use crate::resource::Resource;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tolk_common::{Locale, Module};
use tolk_config::ResourceFormat;
use tracing::debug;

/// Loads the resource tree for one locale/module pair.
///
/// The result is cached for the lifetime of the localizer, so a loader must
/// return the same tree for the same pair. Errors are logged and replaced by
/// an empty resource.
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    /// Loads one resource.
    async fn load(&self, locale: &Locale, module: &Module) -> anyhow::Result<Resource>;
}

/// Adapts an async closure into a [`ResourceLoader`].
pub struct FnLoader<F>(F);

impl<F> FnLoader<F> {
    /// Wraps `f`, which receives owned copies of the pair.
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> ResourceLoader for FnLoader<F>
where
    F: Fn(Locale, Module) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Resource>> + Send + 'static,
{
    async fn load(&self, locale: &Locale, module: &Module) -> anyhow::Result<Resource> {
        (self.0)(locale.clone(), module.clone()).await
    }
}

/// Adapts a synchronous closure into a [`ResourceLoader`].
pub struct SyncFnLoader<F>(F);

impl<F> SyncFnLoader<F> {
    /// Wraps `f`.
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> ResourceLoader for SyncFnLoader<F>
where
    F: Fn(&Locale, &Module) -> anyhow::Result<Resource> + Send + Sync,
{
    async fn load(&self, locale: &Locale, module: &Module) -> anyhow::Result<Resource> {
        (self.0)(locale, module)
    }
}

/// In-memory resources keyed by pair.
///
/// Pairs without an entry fail to load. Every invocation is counted, which
/// makes the loader handy for checking load deduplication.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    resources: HashMap<(Locale, Module), Resource>,
    loads: AtomicUsize,
}

impl MemoryLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the resource for a pair.
    #[must_use]
    pub fn with(
        mut self,
        locale: impl Into<Locale>,
        module: impl Into<Module>,
        resource: Resource,
    ) -> Self {
        self.resources
            .insert((locale.into(), module.into()), resource);
        self
    }

    /// Number of times [`ResourceLoader::load`] has been called.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceLoader for MemoryLoader {
    async fn load(&self, locale: &Locale, module: &Module) -> anyhow::Result<Resource> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.resources
            .get(&(locale.clone(), module.clone()))
            .cloned()
            .ok_or_else(|| anyhow!("no resource registered for {locale}/{module}"))
    }
}

/// Reads resources from `{base_dir}/{locale}/{module}.{ext}`.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    base_dir: PathBuf,
    format: ResourceFormat,
}

impl DirectoryLoader {
    /// Create a new loader over `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P, format: ResourceFormat) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            format,
        }
    }

    /// Get the base directory for resources
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File holding the resource for a pair.
    pub fn resource_path(&self, locale: &Locale, module: &Module) -> PathBuf {
        self.base_dir
            .join(locale.as_str())
            .join(format!("{}.{}", module, self.format.extension()))
    }

    /// Parses resource text in this loader's format.
    pub fn parse(&self, text: &str) -> anyhow::Result<Resource> {
        let resource: Resource = match self.format {
            ResourceFormat::Json => serde_json::from_str(text)?,
            ResourceFormat::Yaml => serde_yaml::from_str(text)?,
            ResourceFormat::Toml => toml::from_str(text)?,
        };
        Ok(resource)
    }
}

#[async_trait]
impl ResourceLoader for DirectoryLoader {
    async fn load(&self, locale: &Locale, module: &Module) -> anyhow::Result<Resource> {
        let path = self.resource_path(locale, module);
        debug!("Loading resource file: {:?}", path);

        // tokio::fs needs a runtime; loads driven by another executor read inline.
        let text = if tokio::runtime::Handle::try_current().is_ok() {
            tokio::fs::read_to_string(&path).await
        } else {
            std::fs::read_to_string(&path)
        }
        .with_context(|| format!("failed to read {}", path.display()))?;
        self.parse(&text)
            .with_context(|| format!("failed to parse {}", path.display()))
    }
}
