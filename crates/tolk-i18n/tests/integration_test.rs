//! Integration tests for tolk-i18n crate.
//!
//! These tests drive a [`Localizer`] end to end: scheduling loads, looking up
//! keys, falling back across locales and reading resources from disk.

use parking_lot::Mutex;
use serde_json::json;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tolk_common::join_key_path;
use tolk_common::test_utils::{create_temp_dir, create_test_runtime, init_test_logging};
use tolk_config::{LocalizerConfig, ResourceFormat, TemplateEngine};
use tolk_i18n::{
    args, FnLoader, LoadFuture, Locale, Localizer, LocalizerBuilder, MemoryLoader, Module,
    Notifier, Resource, Selection,
};

fn resource(value: serde_json::Value) -> Resource {
    serde_json::from_value(value).unwrap()
}

fn shop_loader() -> MemoryLoader {
    MemoryLoader::new()
        .with(
            "en-US",
            "common",
            resource(json!({
                "app": "Shop",
                "welcome": "Welcome to <:app/>, {name}!",
                "only_en": "English only",
                "menu": { "open": "Open", "close": "Close" },
                "menu.open": "Open (flat)"
            })),
        )
        .with(
            "pt-BR",
            "common",
            resource(json!({
                "app": "Loja",
                "welcome": "Bem-vindo à <:app/>, {name}!"
            })),
        )
        .with(
            "en-US",
            "checkout",
            resource(json!({ "pay": "Pay with <:common:app/>" })),
        )
}

async fn ready(loader: MemoryLoader, locales: &[&str], modules: &[&str]) -> Localizer {
    init_test_logging();
    let localizer = Localizer::builder(loader).build();
    localizer.set_modules(modules.iter().copied());
    localizer.set_locales(locales.iter().copied());
    localizer.wait().await;
    localizer
}

#[tokio::test]
async fn test_every_selected_pair_settles_after_wait() {
    let localizer = ready(
        shop_loader(),
        &["pt-BR", "en-US", "de-DE"],
        &["common", "checkout"],
    )
    .await;

    for locale in ["pt-BR", "en-US", "de-DE"] {
        for module in ["common", "checkout"] {
            assert!(
                localizer.is_loaded(&Locale::from(locale), &Module::from(module)),
                "{locale}/{module} should be settled"
            );
        }
    }
    // Failed loads settle with an empty resource.
    let missing = localizer
        .store()
        .resource(&"de-DE".into(), &"checkout".into())
        .unwrap();
    assert!(missing.is_empty());
}

#[tokio::test]
async fn test_each_pair_is_loaded_once() {
    let loader = Arc::new(shop_loader());
    let localizer = LocalizerBuilder::with_shared_loader(loader.clone()).build();

    localizer.set_modules(["common"]);
    localizer.set_locales(["en-US"]);
    localizer.set_locales(["en-US", "pt-BR"]);
    localizer.wait().await;
    localizer.set_locales(["pt-BR"]);
    localizer.set_modules(["common", "common"]);
    localizer.set_locales(["en-US", "pt-BR"]);
    localizer.wait().await;

    assert_eq!(loader.load_count(), 2);
    assert_eq!(localizer.modules().len(), 1);
}

#[tokio::test]
async fn test_translations_are_unavailable_until_loaded() {
    init_test_logging();
    let localizer = Localizer::builder(shop_loader()).build();
    localizer.set_modules(["common"]);
    localizer.set_locales(["en-US"]);

    assert_eq!(localizer.format("common", "app", None), "en-US:common:app");
    localizer.wait().await;
    assert_eq!(localizer.format("common", "app", None), "Shop");
}

#[tokio::test]
async fn test_flat_key_wins_over_nested_path() {
    let localizer = ready(shop_loader(), &["en-US"], &["common"]).await;

    assert_eq!(localizer.format("common", "menu.open", None), "Open (flat)");
    assert_eq!(localizer.format("common", "menu.close", None), "Close");
}

#[tokio::test]
async fn test_nesting_within_and_across_modules() {
    let localizer = ready(shop_loader(), &["pt-BR", "en-US"], &["common", "checkout"]).await;
    let args = args!["name" => "Ana"];

    assert_eq!(
        localizer.format("common", "welcome", Some(&args)),
        "Bem-vindo à Loja, Ana!"
    );
    // Nested references resolve in the locale that is being tried.
    assert_eq!(localizer.format("checkout", "pay", None), "Pay with Shop");
}

#[tokio::test]
async fn test_locale_fallback_and_missing_marker() {
    let localizer = ready(shop_loader(), &["pt-BR", "en-US"], &["common"]).await;

    assert_eq!(localizer.format("common", "only_en", None), "English only");
    assert_eq!(localizer.format("common", "menu", None), "pt-BR|en-US:common:menu");
    assert_eq!(
        localizer.format("common", "nav.home", None),
        "pt-BR|en-US:common:nav.home"
    );
    assert_eq!(
        localizer.format("unselected", "x", None),
        "pt-BR|en-US:unselected:x"
    );
}

#[tokio::test]
async fn test_cycles_fall_back_to_the_marker() {
    let loader = MemoryLoader::new().with(
        "en",
        "app",
        resource(json!({ "ping": "<:pong/>", "pong": "<:ping/>" })),
    );
    let localizer = ready(loader, &["en"], &["app"]).await;
    assert_eq!(localizer.format("app", "ping", None), "en:app:ping");
}

#[tokio::test]
async fn test_changing_locales_switches_output() {
    let localizer = ready(shop_loader(), &["en-US"], &["common"]).await;
    assert_eq!(localizer.format("common", "app", None), "Shop");

    localizer.set_locales(["pt-BR", "en-US"]);
    localizer.wait().await;
    assert_eq!(localizer.format("common", "app", None), "Loja");
    assert_eq!(
        localizer.locales().as_ref(),
        &[Locale::from("pt-BR"), Locale::from("en-US")]
    );
}

#[tokio::test]
async fn test_async_closure_loader() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let loader = FnLoader::new(move |locale: Locale, module: Module| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::task::yield_now().await;
            Ok::<_, anyhow::Error>(resource(json!({ "id": format!("{locale}/{module}") })))
        }
    });

    let localizer = Localizer::builder(loader).build();
    localizer.set_modules(["a", "b"]);
    localizer.set_locales(["en"]);
    localizer.wait().await;

    assert_eq!(localizer.format("b", "id", None), "en/b");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_notify_hook_observes_loads_and_accesses() {
    let accesses = Arc::new(Mutex::new(Vec::new()));
    let hooks = Arc::new(AtomicUsize::new(0));
    let (sink, counter) = (Arc::clone(&accesses), Arc::clone(&hooks));

    let localizer = Localizer::builder(shop_loader())
        .notify(move |locale: &Locale, module: &Module, _load: LoadFuture| {
            counter.fetch_add(1, Ordering::SeqCst);
            let (sink, pair) = (Arc::clone(&sink), format!("{locale}/{module}"));
            let notifier: Notifier = Arc::new(move |path: &[String], raw: Option<&Resource>| {
                sink.lock()
                    .push(format!("{pair}:{}:{}", join_key_path(path), raw.is_some()));
            });
            notifier
        })
        .build();
    localizer.set_modules(["common"]);
    localizer.set_locales(["pt-BR", "en-US"]);
    localizer.wait().await;

    assert_eq!(localizer.format("common", "only_en", None), "English only");
    assert_eq!(hooks.load(Ordering::SeqCst), 2);
    assert_eq!(
        *accesses.lock(),
        vec![
            "pt-BR/common:only_en:false".to_string(),
            "en-US/common:only_en:true".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_notify_hook_receives_settling_future() {
    let settled = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&settled);

    let localizer = Localizer::builder(shop_loader())
        .notify(move |_locale: &Locale, _module: &Module, load: LoadFuture| {
            let sink = Arc::clone(&sink);
            tokio::spawn(async move {
                let resource = load.await;
                sink.lock().push(resource.is_empty());
            });
            let notifier: Notifier = Arc::new(|_path: &[String], _raw: Option<&Resource>| {});
            notifier
        })
        .build();
    localizer.set_modules(["checkout"]);
    localizer.set_locales(["en-US", "pt-BR"]);
    localizer.wait().await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    let mut seen = settled.lock().clone();
    seen.sort_unstable();
    assert_eq!(seen, vec![false, true]);
}

#[tokio::test]
async fn test_subscribers_follow_selection_changes() {
    let localizer = Localizer::builder(shop_loader()).build();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let id = localizer.subscribe(move |selection: &Selection| {
        let locales: Vec<&str> = selection.locales.iter().map(Locale::as_str).collect();
        sink.lock().push(locales.join(","));
    });
    localizer.set_locales(["en-US"]);
    localizer.set_locales(["pt-BR", "en-US"]);
    assert!(localizer.unsubscribe(id));
    localizer.set_locales(["de-DE"]);

    assert_eq!(*seen.lock(), vec!["", "en-US", "pt-BR,en-US"]);
}

#[tokio::test]
async fn test_directory_loader_via_config() {
    init_test_logging();
    let dir = create_temp_dir();
    let english = concat!(
        "greeting: \"Hello, { $name }!\"\n",
        "items: |-\n",
        "  { $count ->\n",
        "      [one] One item\n",
        "     *[other] { $count } items\n",
        "  }\n",
    );
    for (locale, body) in [("en-US", english), ("pt-BR", "greeting: \"Olá, { $name }!\"\n")] {
        fs::create_dir_all(dir.path().join(locale)).unwrap();
        fs::write(dir.path().join(locale).join("common.yaml"), body).unwrap();
    }

    let mut config = LocalizerConfig::default();
    config.locales = vec!["pt-BR".to_string(), "en-US".to_string()];
    config.modules = vec!["common".to_string()];
    config.resources.dir = dir.path().to_path_buf();
    config.resources.format = ResourceFormat::Yaml;
    config.templates.engine = TemplateEngine::Fluent;

    let localizer = Localizer::from_config(&config);
    localizer.wait().await;

    assert_eq!(
        localizer.format("common", "greeting", Some(&args!["name" => "Ana"])),
        "Olá, Ana!"
    );
    assert_eq!(
        localizer.format("common", "items", Some(&args!["count" => 1])),
        "One item"
    );
    assert_eq!(
        localizer.format("common", "items", Some(&args!["count" => 4])),
        "4 items"
    );
    // A Fluent formatting error falls through to the marker.
    assert_eq!(
        localizer.format("common", "greeting", None),
        "pt-BR|en-US:common:greeting"
    );
}

#[tokio::test]
async fn test_directory_loader_missing_file_settles_empty() {
    let dir = create_temp_dir();
    let mut config = LocalizerConfig::default();
    config.locales = vec!["en-US".to_string()];
    config.modules = vec!["common".to_string()];
    config.resources.dir = dir.path().to_path_buf();

    let localizer = Localizer::from_config(&config);
    localizer.wait().await;

    assert!(localizer.is_loaded(&"en-US".into(), &"common".into()));
    assert_eq!(localizer.format("common", "x", None), "en-US:common:x");
}

fn directory_config(dir: &std::path::Path) -> LocalizerConfig {
    fs::create_dir_all(dir.join("en-US")).unwrap();
    fs::write(dir.join("en-US").join("common.json"), r#"{ "app": "Shop" }"#).unwrap();

    let mut config = LocalizerConfig::default();
    config.locales = vec!["pt-BR".to_string(), "en-US".to_string()];
    config.modules = vec!["common".to_string()];
    config.resources.dir = dir.to_path_buf();
    config
}

#[test]
fn test_wait_settles_directory_loads_on_any_executor() {
    let dir = create_temp_dir();
    let localizer = Localizer::from_config(&directory_config(dir.path()));

    futures::executor::block_on(localizer.wait());

    assert!(localizer.is_loaded(&"pt-BR".into(), &"common".into()));
    assert_eq!(localizer.format("common", "app", None), "Shop");
    assert_eq!(localizer.format("common", "x", None), "pt-BR|en-US:common:x");
}

#[test]
fn test_wait_settles_loads_scheduled_outside_the_runtime() {
    let dir = create_temp_dir();
    let localizer = Localizer::from_config(&directory_config(dir.path()));
    assert!(!localizer.is_loaded(&"en-US".into(), &"common".into()));

    let runtime = create_test_runtime();
    runtime.block_on(localizer.wait());

    assert!(localizer.is_loaded(&"en-US".into(), &"common".into()));
    assert_eq!(localizer.format("common", "app", None), "Shop");
}
