//! Placeholder-tag scanner.
//!
//! # Responsibilities
//! - Split a character stream into literal runs and tag events
//! - Turn doubled delimiters into one literal delimiter
//! - Recover from abandoned tags (whitespace inside a tag) by re-emitting them
//! - Rewrite rooted-path tags (`@~/forums/@`) into absolute application paths
//!
//! # Design Decisions
//! - Push-style state machine: one character in, zero or more events out
//! - Literal characters are batched into runs; ordering is never changed
//! - Only the current tag's characters are buffered
//! - An unterminated tag at end of input is dropped without an error

use std::io::BufRead;

use crate::config::ScannerConfig;
use crate::error::{Error, Result};
use crate::template::chars::CharReader;

/// Literal runs are flushed once they reach this many bytes.
const LITERAL_FLUSH_BYTES: usize = 8192;

/// A scanner output event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// Text to copy to the output unchanged.
    Literal(&'a str),
    /// A resolved placeholder tag name.
    Tag(&'a str),
}

/// Scanner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub delimiter: char,
    /// Tags starting with this prefix are rooted paths.
    pub rooted_prefix: String,
    /// Absolute application root, always ending in `/`.
    pub app_root: String,
    /// Drop `\r` and `\n` before any delimiter logic.
    pub strip_line_breaks: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            delimiter: '@',
            rooted_prefix: "~/".to_string(),
            app_root: "/".to_string(),
            strip_line_breaks: false,
        }
    }
}

impl ScanOptions {
    /// Options for one call shape, taken from configuration.
    pub fn from_config(config: &ScannerConfig, virtual_path: &str, strip_line_breaks: bool) -> Self {
        Self {
            delimiter: config.delimiter,
            rooted_prefix: config.rooted_prefix.clone(),
            app_root: normalize_app_root(virtual_path),
            strip_line_breaks,
        }
    }

    pub fn with_line_breaks_stripped(mut self, strip: bool) -> Self {
        self.strip_line_breaks = strip;
        self
    }

    /// Rewrite a rooted tag name to an absolute path, or `None` if it is not rooted.
    pub fn rewrite_rooted(&self, name: &str) -> Option<String> {
        let rest = name.strip_prefix(self.rooted_prefix.as_str())?;
        Some(format!("{}{}", self.app_root, rest))
    }
}

/// `"app"` → `"/app/"`, `"/"` → `"/"`.
pub fn normalize_app_root(virtual_path: &str) -> String {
    let mut root = String::with_capacity(virtual_path.len() + 2);
    if !virtual_path.starts_with('/') {
        root.push('/');
    }
    root.push_str(virtual_path);
    if !root.ends_with('/') {
        root.push('/');
    }
    root
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Literal,
    Tag,
}

/// Incremental scanner. Feed characters with [`Scanner::push`], then call [`Scanner::finish`].
pub struct Scanner<'o> {
    options: &'o ScanOptions,
    state: State,
    literal: String,
    tag: String,
}

impl<'o> Scanner<'o> {
    pub fn new(options: &'o ScanOptions) -> Self {
        Self {
            options,
            state: State::Literal,
            literal: String::new(),
            tag: String::new(),
        }
    }

    pub fn push<F>(&mut self, c: char, emit: &mut F) -> Result<()>
    where
        F: FnMut(Event<'_>) -> Result<()>,
    {
        if self.options.strip_line_breaks && is_line_break(c) {
            return Ok(());
        }

        match self.state {
            State::Literal => {
                if c == self.options.delimiter {
                    self.state = State::Tag;
                    self.tag.clear();
                } else {
                    self.literal.push(c);
                    if self.literal.len() >= LITERAL_FLUSH_BYTES {
                        self.flush(emit)?;
                    }
                }
                Ok(())
            }
            State::Tag => {
                if c == self.options.delimiter {
                    self.state = State::Literal;
                    if self.tag.is_empty() {
                        self.literal.push(c);
                        Ok(())
                    } else {
                        let name = std::mem::take(&mut self.tag);
                        self.close_tag(&name, emit)
                    }
                } else if c == ' ' || is_line_break(c) {
                    self.abandon_tag();
                    // Re-enter literal scanning with the same character.
                    self.push(c, emit)
                } else {
                    self.tag.push(c);
                    Ok(())
                }
            }
        }
    }

    /// Flush pending literal text; an unterminated tag is discarded.
    pub fn finish<F>(mut self, emit: &mut F) -> Result<()>
    where
        F: FnMut(Event<'_>) -> Result<()>,
    {
        self.tag.clear();
        self.flush(emit)
    }

    fn abandon_tag(&mut self) {
        if self.tag.chars().count() > 1 {
            self.literal.push(self.options.delimiter);
        }
        self.literal.push_str(&self.tag);
        self.tag.clear();
        self.state = State::Literal;
    }

    fn close_tag<F>(&mut self, raw: &str, emit: &mut F) -> Result<()>
    where
        F: FnMut(Event<'_>) -> Result<()>,
    {
        let name = raw.trim();
        if let Some(path) = self.options.rewrite_rooted(name) {
            self.literal.push_str(&path);
            return Ok(());
        }
        self.flush(emit)?;
        emit(Event::Tag(name))
    }

    fn flush<F>(&mut self, emit: &mut F) -> Result<()>
    where
        F: FnMut(Event<'_>) -> Result<()>,
    {
        if self.literal.is_empty() {
            return Ok(());
        }
        emit(Event::Literal(&self.literal))?;
        self.literal.clear();
        Ok(())
    }
}

fn is_line_break(c: char) -> bool {
    c == '\r' || c == '\n'
}

/// Scan a sequence of (possibly failing) characters.
pub fn scan_chars<I, F>(chars: I, options: &ScanOptions, mut emit: F) -> Result<()>
where
    I: IntoIterator<Item = Result<char>>,
    F: FnMut(Event<'_>) -> Result<()>,
{
    let mut scanner = Scanner::new(options);
    for c in chars {
        scanner.push(c?, &mut emit)?;
    }
    scanner.finish(&mut emit)
}

/// Scan in-memory text.
pub fn scan_text<F>(text: &str, options: &ScanOptions, emit: F) -> Result<()>
where
    F: FnMut(Event<'_>) -> Result<()>,
{
    scan_chars(text.chars().map(Ok), options, emit)
}

/// Scan a UTF-8 byte stream. `name` labels read errors.
pub fn scan_reader<R, F>(name: &str, reader: R, options: &ScanOptions, emit: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(Event<'_>) -> Result<()>,
{
    let chars = CharReader::new(reader).map(|c| {
        c.map_err(|source| Error::TemplateRead {
            name: name.to_string(),
            source,
        })
    });
    scan_chars(chars, options, emit)
}
