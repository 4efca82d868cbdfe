//! Value tree for the Candid text grammar.
//!
//! A [`Value`] renders itself through [`std::fmt::Display`]; text and
//! principal payloads are escaped on the way out, so a rendered value can
//! be passed verbatim as one argument to `dfx canister call`.
//!
//! Output of `dfx` is read back with `candid_parser`; this tree only renders.

use std::fmt::{self, Write};

use candid::Principal;

/// A Candid value as written in the textual grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Nat(u128),
    Int(i128),
    Text(String),
    Principal(Principal),
    Opt(Box<Value>),
    Vec(Vec<Value>),
    /// Fields keep insertion order; the canister matches them by name.
    Record(Vec<(String, Value)>),
    Variant(String, Box<Value>),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn principal(p: Principal) -> Self {
        Value::Principal(p)
    }

    pub fn opt(v: Value) -> Self {
        Value::Opt(Box::new(v))
    }

    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn variant(tag: impl Into<String>, v: Value) -> Self {
        Value::Variant(tag.into(), Box::new(v))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Nat(n) => write!(f, "{n} : nat"),
            Value::Int(i) => write!(f, "{i} : int"),
            Value::Text(s) => write_quoted(f, s),
            Value::Principal(p) => {
                f.write_str("principal ")?;
                write_quoted(f, &p.to_text())
            }
            Value::Opt(v) => write!(f, "opt {v}"),
            Value::Vec(items) => {
                if items.is_empty() {
                    return f.write_str("vec {}");
                }
                f.write_str("vec { ")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(" }")
            }
            Value::Record(fields) => {
                if fields.is_empty() {
                    return f.write_str("record {}");
                }
                f.write_str("record { ")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write_label(f, name)?;
                    write!(f, " = {value}")?;
                }
                f.write_str(" }")
            }
            Value::Variant(tag, v) => {
                f.write_str("variant { ")?;
                write_label(f, tag)?;
                if **v != Value::Null {
                    write!(f, " = {v}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// An argument tuple, rendered as `(a, b, ...)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(pub Vec<Value>);

impl Args {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Args(values.into_iter().collect())
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_char(')')
    }
}

/// Escape a string for use between double quotes in Candid text.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    f.write_str(&escape_text(s))?;
    f.write_char('"')
}

/// Field labels are bare identifiers or numeric ids; anything else is quoted.
fn write_label(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if is_identifier(name) || (!name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())) {
        f.write_str(name)
    } else {
        write_quoted(f, name)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
