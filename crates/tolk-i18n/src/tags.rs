//! Inline markup parsing
//!
//! Resolved strings may carry lightweight tags such as `Read the <b>terms</b>`
//! or `Line<br/>break`. [`parse_tags`] turns them into caller-defined values by
//! invoking one wrapper per tag.
//!
//! Closing tags are matched by stack depth only, never by name, and malformed
//! input never fails: excess closers are absorbed at the root and unclosed
//! openers are flattened into the root aggregate.

use std::collections::HashMap;
use std::sync::Arc;

/// A node of parsed markup: literal text or a wrapped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup<T> {
    /// Literal text
    Text(String),
    /// Value produced by a tag wrapper
    Tag(T),
}

impl<T> Markup<T> {
    /// Returns the text if this is a literal.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Tag(_) => None,
        }
    }
}

impl Markup<String> {
    /// Collapses to a plain string.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Text(text) | Self::Tag(text) => text,
        }
    }
}

/// Renders a tag from its children and name.
///
/// The root aggregate is rendered with the fallback wrapper and an empty name.
pub type TagFn<T> = Arc<dyn Fn(Vec<Markup<T>>, &str) -> Markup<T> + Send + Sync>;

/// Per-call tag wrappers, keyed by tag name.
pub type TagMap<T> = HashMap<String, TagFn<T>>;

/// Fallback wrapper for string output: concatenates the children and drops
/// the tag itself.
pub fn concat_tag() -> TagFn<String> {
    Arc::new(|children: Vec<Markup<String>>, _name: &str| {
        Markup::Text(children.into_iter().map(Markup::into_string).collect())
    })
}

enum Token<'a> {
    Open,
    Close(&'a str),
    SelfClosing(&'a str),
}

/// Matches `<name>`, `</name>` or `<name/>` at the start of `input`,
/// returning the token and its byte length.
fn match_token(input: &str) -> Option<(Token<'_>, usize)> {
    let rest = input.strip_prefix('<')?;
    let (closing, rest) = match rest.strip_prefix('/') {
        Some(after) => (true, after),
        None => (false, rest),
    };

    let name_len = rest
        .char_indices()
        .find(|&(_, c)| c == ':' || c == '>' || c == '/' || c.is_whitespace())
        .map_or(rest.len(), |(index, _)| index);
    if name_len == 0 {
        return None;
    }
    let name = &rest[..name_len];
    let rest = &rest[name_len..];

    let (self_closing, rest) = match rest.strip_prefix('/') {
        Some(after) => (true, after),
        None => (false, rest),
    };
    rest.strip_prefix('>')?;

    let len = input.len() - rest.len() + 1;
    let token = if self_closing {
        Token::SelfClosing(name)
    } else if closing {
        Token::Close(name)
    } else {
        Token::Open
    };
    Some((token, len))
}

/// Parses inline markup in `text`.
///
/// Tags found in `tags` use their wrapper; every other tag, and the root
/// aggregate, uses `fallback`. The scan is a single left-to-right pass that
/// cannot fail.
pub fn parse_tags<T>(text: &str, tags: &TagMap<T>, fallback: &TagFn<T>) -> Markup<T> {
    let render = |children: Vec<Markup<T>>, name: &str| {
        let wrapper = tags.get(name).unwrap_or(fallback);
        wrapper(children, name)
    };

    let mut stack: Vec<Vec<Markup<T>>> = vec![Vec::new()];
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('<') {
        let start = cursor + offset;
        let Some((token, len)) = match_token(&text[start..]) else {
            cursor = start + 1;
            continue;
        };

        if start > literal_start {
            push(&mut stack, Markup::Text(text[literal_start..start].to_string()));
        }

        match token {
            Token::SelfClosing(name) => {
                let node = render(Vec::new(), name);
                push(&mut stack, node);
            }
            Token::Open => stack.push(Vec::new()),
            Token::Close(name) => {
                let children = if stack.len() > 1 {
                    stack.pop().unwrap_or_default()
                } else {
                    Vec::new()
                };
                let node = render(children, name);
                push(&mut stack, node);
            }
        }

        cursor = start + len;
        literal_start = cursor;
    }

    if literal_start < text.len() {
        push(&mut stack, Markup::Text(text[literal_start..].to_string()));
    }

    let children = stack.into_iter().flatten().collect();
    fallback(children, "")
}

fn push<T>(stack: &mut [Vec<Markup<T>>], node: Markup<T>) {
    if let Some(frame) = stack.last_mut() {
        frame.push(node);
    }
}
