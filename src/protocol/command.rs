//! Command definitions
//!
//! A command is an ordered list of typed arguments; the first one is
//! conventionally the verb (`get`, `set`, `scan`, `multi_set`, ...).

use bytes::Bytes;

/// A single positional command argument
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Raw bytes, written unchanged
    Bytes(Bytes),

    /// UTF-8 text, written unchanged
    Text(String),

    /// Signed integer, written in base 10
    Int(i64),

    /// Unsigned integer, written in base 10
    Uint(u64),

    /// Floating point, written in fixed-point with six decimals
    Float(f64),

    /// Written as `1` or `0`
    Bool(bool),

    /// Written as an empty field
    Null,

    /// Expanded into one field per element
    TextList(Vec<String>),

    /// Expanded into one field per element
    BytesList(Vec<Bytes>),
}

/// A command ready to be encoded
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Command {
    args: Vec<Arg>,
}

impl Command {
    /// Start a command with its verb
    pub fn new(verb: impl Into<Arg>) -> Self {
        Self {
            args: vec![verb.into()],
        }
    }

    /// Build a command from a verb followed by arguments
    pub fn with_args<I, A>(verb: impl Into<Arg>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        let mut command = Self::new(verb);
        command.args.extend(args.into_iter().map(Into::into));
        command
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append one argument in place
    pub fn push(&mut self, arg: impl Into<Arg>) {
        self.args.push(arg.into());
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// The verb as text, when the first argument is textual
    pub fn verb(&self) -> Option<&str> {
        match self.args.first()? {
            Arg::Text(s) => Some(s.as_str()),
            Arg::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl From<Vec<Arg>> for Command {
    fn from(args: Vec<Arg>) -> Self {
        Self { args }
    }
}

// =============================================================================
// Conversions into Arg
// =============================================================================

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Text(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Text(v)
    }
}

impl From<&String> for Arg {
    fn from(v: &String) -> Self {
        Arg::Text(v.clone())
    }
}

impl From<&[u8]> for Arg {
    fn from(v: &[u8]) -> Self {
        Arg::Bytes(Bytes::copy_from_slice(v))
    }
}

impl<const N: usize> From<&[u8; N]> for Arg {
    fn from(v: &[u8; N]) -> Self {
        Arg::Bytes(Bytes::copy_from_slice(v))
    }
}

impl From<Vec<u8>> for Arg {
    fn from(v: Vec<u8>) -> Self {
        Arg::Bytes(Bytes::from(v))
    }
}

impl From<Bytes> for Arg {
    fn from(v: Bytes) -> Self {
        Arg::Bytes(v)
    }
}

macro_rules! int_arg {
    ($variant:ident, $wide:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::$variant(v as $wide)
                }
            }
        )*
    };
}

int_arg!(Int, i64, i8, i16, i32, i64, isize);
int_arg!(Uint, u64, u8, u16, u32, u64, usize);

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Arg::Float(f64::from(v))
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<()> for Arg {
    fn from(_: ()) -> Self {
        Arg::Null
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Null, Into::into)
    }
}

impl From<Vec<String>> for Arg {
    fn from(v: Vec<String>) -> Self {
        Arg::TextList(v)
    }
}

impl From<Vec<&str>> for Arg {
    fn from(v: Vec<&str>) -> Self {
        Arg::TextList(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[String]> for Arg {
    fn from(v: &[String]) -> Self {
        Arg::TextList(v.to_vec())
    }
}

impl From<&[&str]> for Arg {
    fn from(v: &[&str]) -> Self {
        Arg::TextList(v.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Arg {
    fn from(v: [&str; N]) -> Self {
        Arg::TextList(v.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<Vec<u8>>> for Arg {
    fn from(v: Vec<Vec<u8>>) -> Self {
        Arg::BytesList(v.into_iter().map(Bytes::from).collect())
    }
}

impl From<Vec<Bytes>> for Arg {
    fn from(v: Vec<Bytes>) -> Self {
        Arg::BytesList(v)
    }
}
