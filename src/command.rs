use std::fmt;

use crate::document::TabId;

/// A self-describing text message: an action name followed by
/// space-separated `key:value` arguments.
///
/// ```text
/// open newtab:1 url:about:home
/// ```
///
/// Values are bare numbers, quoted strings, or tab handles encoded as
/// bare integers. Lookups scan the token text; when a key appears more
/// than once the last occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    text: String,
}

impl Command {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The full token text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The action name: everything before the first space.
    pub fn name(&self) -> &str {
        match self.text.find(' ') {
            Some(end) => &self.text[..end],
            None => &self.text,
        }
    }

    /// Exact match on the action name.
    pub fn is(&self, name: &str) -> bool {
        self.name() == name
    }

    /// Integer value of the conventional `arg:` key. Missing or
    /// malformed values read as 0, so boolean flags follow the
    /// non-zero convention.
    pub fn arg(&self) -> i32 {
        self.int_arg("arg")
    }

    /// Float value of the conventional `arg:` key (0.0 when absent).
    pub fn argf(&self) -> f32 {
        self.float_arg("arg")
    }

    /// Integer value of `key`; 0 when absent or malformed.
    pub fn int_arg(&self, key: &str) -> i32 {
        self.find_value(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Float value of `key`; 0.0 when absent or malformed.
    pub fn float_arg(&self, key: &str) -> f32 {
        self.find_value(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0)
    }

    /// String value of `key`. Quoted values lose their surrounding
    /// quotes; no escape processing is applied.
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.find_value(key)
    }

    /// Everything from `key:` to the end of the token, for values that
    /// may themselves contain spaces or colons (URLs). Such a key has
    /// to be the last argument of the token.
    pub fn suffix_arg(&self, key: &str) -> Option<&str> {
        Some(self.text[self.value_start(key)?..].trim_end())
    }

    /// Two-integer value of the `coord:` key (`coord:X Y`).
    pub fn coord(&self) -> Option<(i32, i32)> {
        let rest = &self.text[self.value_start("coord")?..];
        let mut parts = rest.split(' ');
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        Some((x, y))
    }

    /// Tab handle value of `key`. Only decodes the number; whether the
    /// handle is still live is the caller's problem.
    pub fn tab_arg(&self, key: &str) -> Option<TabId> {
        self.find_value(key).and_then(|v| v.parse().ok()).map(TabId)
    }

    /// The implicit-source convention: a key-less tab handle directly
    /// after the action name (`document.changed 5 ...`).
    pub fn source(&self) -> Option<TabId> {
        let rest = self.text[self.name().len()..].trim_start();
        let first = rest.split(' ').next()?;
        if first.contains(':') {
            return None;
        }
        first.parse().ok().map(TabId)
    }

    /// Byte offset of the value of the last `key:` occurrence.
    fn value_start(&self, key: &str) -> Option<usize> {
        let pattern = format!(" {key}:");
        Some(self.text.rfind(&pattern)? + pattern.len())
    }

    fn find_value(&self, key: &str) -> Option<&str> {
        let rest = &self.text[self.value_start(key)?..];
        if let Some(quoted) = rest.strip_prefix('"') {
            match quoted.find('"') {
                Some(end) => Some(&quoted[..end]),
                None => Some(quoted),
            }
        } else {
            match rest.find(' ') {
                Some(end) => Some(&rest[..end]),
                None => Some(rest),
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Command {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Command {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
