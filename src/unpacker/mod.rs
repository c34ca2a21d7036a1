//! Recovery of media URLs from "p,a,c,k,e,d" packed JavaScript.
//!
//! Packed scripts look like this:
//!
//! ```text
//! eval(function(p,a,c,k,e,d){ ...unpacking logic... }('payload', a, c, 'w0|w1|w2'.split('|'), 0, {}))
//! ```
//!
//! Every identifier in `payload` was replaced by its dictionary index written
//! in base `a`. Unpacking scans the payload once and swaps each whole-word
//! token for its dictionary entry, so restored words are never rescanned.
//!
//! # Usage
//!
//! ```rust,ignore
//! use eddy::unpacker;
//!
//! for url in unpacker::decode(&script_text) {
//!     println!("{url}");
//! }
//! ```

mod radix;

pub use radix::to_base;

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::debug;

/// Substring that must appear in a script before it is worth unpacking.
pub const MEDIA_MARKER: &str = "m3u8";

/// Extension of the media manifests we are after.
pub const MEDIA_EXTENSION: &str = ".m3u8";

static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"eval\s*\(\s*function\s*\(\s*p\s*,\s*a\s*,\s*c\s*,\s*k\s*,\s*e\s*,")
        .expect("signature pattern is valid")
});

static INVOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\}\((.+)\)\)").expect("invocation pattern is valid"));

static TRAILING_ARGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s),\s*(\d+)\s*,\s*(\d+)\s*,\s*'([^']*)'\s*\.split")
        .expect("trailing argument pattern is valid")
});

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("token pattern is valid"));

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^'"\s]+"#).expect("url pattern is valid"));

/// Why a script could not be unpacked.
#[derive(Debug, Error)]
pub enum UnpackError {
    #[error("script does not mention m3u8")]
    MissingMarker,

    #[error("no packer invocation found")]
    NoInvocation,

    #[error("packer arguments are missing the radix/count/dictionary triple")]
    NoArguments,

    #[error("invalid {field} value: {value}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("unsupported radix {0}, expected 2..=36")]
    UnsupportedRadix(u32),
}

/// The arguments of a packer invocation, borrowed from the script text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedScript<'a> {
    pub payload: &'a str,
    pub radix: u32,
    pub count: usize,
    pub symbols: Vec<&'a str>,
}

impl<'a> PackedScript<'a> {
    /// Parse the packer call out of `text`.
    ///
    /// The trailing `, a, c, 'dict'.split` triple is located first; whatever
    /// precedes it in the argument list is the quoted payload.
    pub fn parse(text: &'a str) -> Result<Self, UnpackError> {
        let args = INVOCATION
            .captures(text)
            .and_then(|caps| caps.get(1))
            .ok_or(UnpackError::NoInvocation)?
            .as_str();

        let trailing = TRAILING_ARGS
            .captures_iter(args)
            .last()
            .ok_or(UnpackError::NoArguments)?;

        let (Some(whole), Some(radix), Some(count), Some(dict)) = (
            trailing.get(0),
            trailing.get(1),
            trailing.get(2),
            trailing.get(3),
        ) else {
            return Err(UnpackError::NoArguments);
        };

        let radix = radix
            .as_str()
            .parse::<u32>()
            .map_err(|_| UnpackError::InvalidInteger {
                field: "radix",
                value: radix.as_str().to_string(),
            })?;
        let count = count
            .as_str()
            .parse::<usize>()
            .map_err(|_| UnpackError::InvalidInteger {
                field: "count",
                value: count.as_str().to_string(),
            })?;

        Ok(Self {
            payload: strip_quotes(&args[..whole.start()]),
            radix,
            count,
            symbols: dict.as_str().split('|').collect(),
        })
    }

    /// Build the substitution table for this invocation.
    pub fn symbol_table(&self) -> Result<SymbolTable, UnpackError> {
        SymbolTable::new(self.radix, self.count, &self.symbols)
    }
}

/// Token-to-word substitutions keyed by the base-`a` index token.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    words: HashMap<String, String>,
}

impl SymbolTable {
    /// Indices past the end of `symbols` are treated as empty, as are empty
    /// entries; neither produces a substitution.
    pub fn new(radix: u32, count: usize, symbols: &[&str]) -> Result<Self, UnpackError> {
        if !(2..=36).contains(&radix) {
            return Err(UnpackError::UnsupportedRadix(radix));
        }

        let mut words = HashMap::new();
        for index in (0..count.min(symbols.len())).rev() {
            let word = symbols[index];
            if word.is_empty() {
                continue;
            }
            words.insert(to_base(index, radix)?, word.to_string());
        }

        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Replace every whole-word token in one pass over `payload`.
    ///
    /// `1` never rewrites part of `10`, and a restored word is never matched
    /// again even when it looks like another token.
    pub fn apply(&self, payload: &str) -> String {
        TOKEN
            .replace_all(payload, |caps: &Captures| {
                let token = &caps[0];
                self.words
                    .get(token)
                    .cloned()
                    .unwrap_or_else(|| token.to_string())
            })
            .into_owned()
    }
}

/// Whether `text` carries the `eval(function(p,a,c,k,e,` packer signature.
pub fn detect(text: &str) -> bool {
    SIGNATURE.is_match(text)
}

/// Unpack a packed script, returning the restored payload.
pub fn unpack(text: &str) -> Result<String, UnpackError> {
    let script = PackedScript::parse(text)?;
    Ok(script.symbol_table()?.apply(script.payload))
}

/// Recover the `.m3u8` URLs hidden in a packed script.
///
/// Never fails: anything that does not look like a packed media script
/// yields an empty list.
pub fn decode(text: &str) -> Vec<String> {
    match try_decode(text) {
        Ok(urls) => urls,
        Err(e) => {
            debug!("Skipping script: {}", e);
            Vec::new()
        }
    }
}

fn try_decode(text: &str) -> Result<Vec<String>, UnpackError> {
    if !text.contains(MEDIA_MARKER) {
        return Err(UnpackError::MissingMarker);
    }

    let unpacked = unpack(text)?;

    Ok(URL
        .find_iter(&unpacked)
        .map(|m| m.as_str())
        .filter(|url| url.ends_with(MEDIA_EXTENSION))
        .map(String::from)
        .collect())
}

/// Trim whitespace, then drop one surrounding quote on each side.
fn strip_quotes(raw: &str) -> &str {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('\'')
        .or_else(|| raw.strip_prefix('"'))
        .unwrap_or(raw);
    raw.strip_suffix('\'')
        .or_else(|| raw.strip_suffix('"'))
        .unwrap_or(raw)
}
