//! Template compilation collaborators
//!
//! A [`TemplateParser`] turns a resolved, fully expanded string into a
//! callable [`CompiledTemplate`]. The formatter caches the compiled value per
//! (locale, module, key), so parsers should do their heavy lifting up front.

use crate::args::Args;
use crate::error::{I18nError, I18nResult};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::FluentResource;
use std::sync::Arc;
use tolk_common::{join_key_path, Locale, Module};
use unic_langid::LanguageIdentifier;

/// A compiled template: produces the final string from optional arguments.
pub type CompiledTemplate = Arc<dyn Fn(Option<&Args>) -> I18nResult<String> + Send + Sync>;

/// Compiles resolved strings into templates.
pub trait TemplateParser: Send + Sync {
    /// Compiles `raw`, found at `key` in `module` for `locale`.
    fn parse(
        &self,
        locale: &Locale,
        module: &Module,
        key: &[String],
        raw: &str,
    ) -> I18nResult<CompiledTemplate>;
}

/// Adapts a closure into a [`TemplateParser`].
pub struct FnParser<F>(F);

impl<F> FnParser<F> {
    /// Wraps `f`.
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> TemplateParser for FnParser<F>
where
    F: Fn(&Locale, &Module, &[String], &str) -> I18nResult<CompiledTemplate> + Send + Sync,
{
    fn parse(
        &self,
        locale: &Locale,
        module: &Module,
        key: &[String],
        raw: &str,
    ) -> I18nResult<CompiledTemplate> {
        (self.0)(locale, module, key, raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder { name: String, source: String },
}

/// Replaces `{name}` placeholders with argument values.
///
/// Placeholders without a matching argument are left verbatim; text that
/// does not form a placeholder (`{`, `{}`, `{ a {`) is literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolator;

impl Interpolator {
    fn segments(raw: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let placeholder = after
                .find(['{', '}'])
                .filter(|&close| after[close..].starts_with('}'))
                .map(|close| (after[..close].trim(), close));

            match placeholder {
                Some((name, close)) if !name.is_empty() => {
                    literal.push_str(&rest[..open]);
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder {
                        name: name.to_string(),
                        source: rest[open..open + close + 2].to_string(),
                    });
                    rest = &after[close + 1..];
                }
                _ => {
                    literal.push_str(&rest[..=open]);
                    rest = after;
                }
            }
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        segments
    }
}

impl TemplateParser for Interpolator {
    fn parse(
        &self,
        _locale: &Locale,
        _module: &Module,
        _key: &[String],
        raw: &str,
    ) -> I18nResult<CompiledTemplate> {
        let segments = Self::segments(raw);
        Ok(Arc::new(move |args: Option<&Args>| -> I18nResult<String> {
            let mut output = String::new();
            for segment in &segments {
                match segment {
                    Segment::Literal(text) => output.push_str(text),
                    Segment::Placeholder { name, source } => {
                        match args.and_then(|args| args.get(name)) {
                            Some(value) => output.push_str(&value.to_string()),
                            None => output.push_str(source),
                        }
                    }
                }
            }
            Ok(output)
        }))
    }
}

const FLUENT_MESSAGE_ID: &str = "tolk-message";

/// Compiles strings as Fluent patterns, so plural and select expressions
/// (`{ $count -> [one] ... *[other] ... }`) are handled by Fluent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FluentParser;

impl FluentParser {
    fn language(locale: &Locale) -> I18nResult<LanguageIdentifier> {
        locale
            .as_str()
            .parse()
            .map_err(|_| I18nError::InvalidLocale(locale.to_string()))
    }

    fn source(raw: &str) -> String {
        format!("{FLUENT_MESSAGE_ID} = {}\n", raw.replace('\n', "\n    "))
    }
}

impl TemplateParser for FluentParser {
    fn parse(
        &self,
        locale: &Locale,
        _module: &Module,
        key: &[String],
        raw: &str,
    ) -> I18nResult<CompiledTemplate> {
        if raw.trim().is_empty() {
            let raw = raw.to_string();
            return Ok(Arc::new(move |_args: Option<&Args>| -> I18nResult<String> {
                Ok(raw.clone())
            }));
        }

        let dotted = join_key_path(key);
        let resource = FluentResource::try_new(Self::source(raw)).map_err(|(_, errors)| {
            I18nError::Parse {
                key: dotted.clone(),
                message: errors
                    .iter()
                    .map(|e| format!("{e:?}"))
                    .collect::<Vec<_>>()
                    .join("; "),
            }
        })?;

        let mut bundle = FluentBundle::new_concurrent(vec![Self::language(locale)?]);
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| I18nError::Parse {
            key: dotted.clone(),
            message: format!("{errors:?}"),
        })?;
        let bundle = Arc::new(bundle);

        Ok(Arc::new(move |args: Option<&Args>| -> I18nResult<String> {
            let pattern = bundle
                .get_message(FLUENT_MESSAGE_ID)
                .and_then(|message| message.value())
                .ok_or_else(|| I18nError::Parse {
                    key: dotted.clone(),
                    message: "template has no value".to_string(),
                })?;

            let fluent_args = args.map(Args::to_fluent_args);
            let mut errors = Vec::new();
            let formatted = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);

            if !errors.is_empty() {
                return Err(I18nError::Format {
                    key: dotted.clone(),
                    errors: errors.iter().map(|e| format!("{e:?}")).collect(),
                });
            }
            Ok(formatted.into_owned())
        }))
    }
}
