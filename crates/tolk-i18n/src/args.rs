//! Named arguments passed to compiled templates

use fluent_bundle::{FluentArgs, FluentValue};
use std::collections::BTreeMap;
use std::fmt;

/// A single argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Text argument
    Str(String),
    /// Numeric argument, used by plural selection
    Number(f64),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

macro_rules! number_arg {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for ArgValue {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )+
    };
}

number_arg!(i32, i64, u32, u64, usize, f32, f64);

/// Named template arguments, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(BTreeMap<String, ArgValue>);

impl Args {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an argument, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder form of [`Args::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Looks up an argument.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    /// Iterates arguments in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Converts into Fluent arguments.
    #[must_use]
    pub fn to_fluent_args(&self) -> FluentArgs<'_> {
        let mut args = FluentArgs::new();
        for (name, value) in self.iter() {
            let value = match value {
                ArgValue::Str(text) => FluentValue::from(text.as_str()),
                ArgValue::Number(number) => FluentValue::from(*number),
            };
            args.set(name, value);
        }
        args
    }
}

/// Macro to create [`Args`] more easily
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::Args::new();
        $(
            args.set($key, $value);
        )+
        args
    }};
}
