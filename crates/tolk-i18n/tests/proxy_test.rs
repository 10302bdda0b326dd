//! Key-path navigation and markup rendering through a [`Localizer`].

use serde_json::json;
use std::sync::Arc;
use tolk_i18n::{
    args, Args, CompiledTemplate, FnParser, I18nError, I18nResult, Locale, Localizer, Markup,
    MemoryLoader, Module, Resource, TagFn, TagMap,
};

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Element { name: String, children: Vec<Markup<Node>> },
}

fn loader() -> MemoryLoader {
    let resource: Resource = serde_json::from_value(json!({
        "greeting": "Hello, {name}!",
        "settings": {
            "billing": { "title": "Billing" },
            "privacy": { "title": "Privacy" }
        },
        "terms": "Accept the <link>terms of <b>service</b></link><br/>now",
        "nested": "0<a>1<b/>2</a>3"
    }))
    .unwrap();
    MemoryLoader::new().with("en", "app", resource)
}

async fn localizer() -> Localizer {
    let localizer = Localizer::builder(loader()).build();
    localizer.set_modules(["app"]);
    localizer.set_locales(["en"]);
    localizer.wait().await;
    localizer
}

fn wrapper(open: &'static str, close: &'static str) -> TagFn<String> {
    Arc::new(move |children: Vec<Markup<String>>, _name: &str| {
        let inner: String = children.into_iter().map(Markup::into_string).collect();
        Markup::Tag(format!("{open}{inner}{close}"))
    })
}

#[tokio::test]
async fn test_navigation_is_memoized() {
    let localizer = localizer().await;
    let t = localizer.t();

    let first = t.get("app").get("settings").get("billing");
    let second = t.get("app").get("settings").get("billing");
    assert!(first.ptr_eq(&second));
    assert!(first.ptr_eq(&t.path("app.settings.billing")));
    assert!(!first.ptr_eq(&t.get("app").get("settings").get("privacy")));
    assert!(t.ptr_eq(&localizer.t()));
}

#[tokio::test]
async fn test_first_segment_selects_module() {
    let localizer = localizer().await;
    let t = localizer.t();

    assert!(t.module().is_none());
    let node = t.get("app").get("settings").get("billing");
    assert_eq!(node.module(), Some(&Module::from("app")));
    assert_eq!(node.key(), ["settings".to_string(), "billing".to_string()]);
    assert_eq!(node.to_string(), "app:settings.billing");
}

#[tokio::test]
async fn test_call_formats_the_path() {
    let localizer = localizer().await;
    let app = localizer.t().get("app");

    assert_eq!(
        app.get("greeting").call(Some(&args!["name" => "Ana"])),
        "Hello, Ana!"
    );
    assert_eq!(app.path("settings.privacy.title").call(None), "Privacy");
    assert_eq!(app.get("settings").call(None), "en:app:settings");
    assert_eq!(app.get("nope").get("deeper").call(None), "en:app:nope.deeper");
}

#[tokio::test]
async fn test_this_allows_computed_segments() {
    let localizer = localizer().await;
    let settings = localizer.t().get("app").get("settings");

    let titles: Vec<String> = ["billing", "privacy"]
        .into_iter()
        .map(|section| settings.this().get(section).get("title").call(None))
        .collect();
    assert_eq!(titles, vec!["Billing", "Privacy"]);
    assert!(settings.this().ptr_eq(&settings));
}

#[tokio::test]
async fn test_tags_render_with_supplied_wrappers() {
    let localizer = localizer().await;
    let tags: TagMap<String> = [
        ("a".to_string(), wrapper("[", "]")),
        ("b".to_string(), wrapper("*", "*")),
    ]
    .into_iter()
    .collect();

    let out = localizer.t().path("app.nested").call_tagged(None, &tags);
    assert_eq!(out.into_string(), "0[1**2]3");

    // Unknown tags fall back to plain concatenation.
    let out = localizer.format_tagged("app", "terms", None, &TagMap::new());
    assert_eq!(out.into_string(), "Accept the terms of servicenow");
}

#[tokio::test]
async fn test_custom_markup_type() {
    let localizer = Localizer::builder(loader())
        .tag(|children: Vec<Markup<Node>>, name: &str| {
            Markup::Tag(Node::Element {
                name: name.to_string(),
                children,
            })
        })
        .build();
    localizer.set_modules(["app"]);
    localizer.set_locales(["en"]);
    localizer.wait().await;

    let out = localizer.t().get("app").get("nested").call_tagged(None, &TagMap::new());
    let element = |name: &str, children: Vec<Markup<Node>>| {
        Markup::Tag(Node::Element {
            name: name.to_string(),
            children,
        })
    };
    assert_eq!(
        out,
        element(
            "",
            vec![
                Markup::Text("0".to_string()),
                element(
                    "a",
                    vec![
                        Markup::Text("1".to_string()),
                        element("b", Vec::new()),
                        Markup::Text("2".to_string()),
                    ],
                ),
                Markup::Text("3".to_string()),
            ],
        )
    );
}

#[tokio::test]
async fn test_unbalanced_markup_keeps_text() {
    let loader = MemoryLoader::new().with(
        "en",
        "app",
        [("open", "x<a>y<b>z"), ("close", "x</a></b>y")]
            .into_iter()
            .collect::<Resource>(),
    );
    let localizer = Localizer::builder(loader).build();
    localizer.set_modules(["app"]);
    localizer.set_locales(["en"]);
    localizer.wait().await;

    let tags: TagMap<String> = [("a".to_string(), wrapper("[", "]"))].into_iter().collect();
    assert_eq!(
        localizer.format_tagged("app", "open", None, &tags).into_string(),
        "xyz"
    );
    assert_eq!(
        localizer.format_tagged("app", "close", None, &tags).into_string(),
        "x[]y"
    );
}

#[tokio::test]
async fn test_parser_markup_is_rendered_by_the_tag_stage() {
    // Emphasizes the `name` argument by emitting tag syntax around it.
    let parser = FnParser::new(|_: &Locale, _: &Module, _: &[String], raw: &str| {
        let raw = raw.to_string();
        let template: CompiledTemplate =
            Arc::new(move |args: Option<&Args>| -> I18nResult<String> {
                let name = args
                    .and_then(|args| args.get("name"))
                    .map(ToString::to_string)
                    .unwrap_or_default();
                Ok(raw.replace("{name}", &format!("<em>{name}</em>")))
            });
        Ok::<_, I18nError>(template)
    });
    let localizer = Localizer::builder(loader()).parser(parser).build();
    localizer.set_modules(["app"]);
    localizer.set_locales(["en"]);
    localizer.wait().await;

    let greeting = localizer.t().path("app.greeting");
    let args = args!["name" => "Ana"];
    assert_eq!(greeting.call(Some(&args)), "Hello, <em>Ana</em>!");

    let tags: TagMap<String> = [("em".to_string(), wrapper("_", "_"))].into_iter().collect();
    assert_eq!(
        greeting.call_tagged(Some(&args), &tags).into_string(),
        "Hello, _Ana_!"
    );
}
