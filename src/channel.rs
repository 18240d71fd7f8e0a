/// Channel identifier normalization
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Longest identifier kept after sanitizing
pub const MAX_CHANNEL_LEN: usize = 25;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]").expect("static pattern is valid"));

/// Normalize user-entered text into a channel identifier
///
/// Algorithm:
/// 1. Trim surrounding whitespace
/// 2. Lowercase
/// 3. Strip every character outside `[a-z0-9_]`
/// 4. Truncate to 25 characters
///
/// An empty result means "no identifier"; callers treat it as a no-op.
///
/// Examples:
/// - "  Foo_Bar! " → "foo_bar"
/// - "Ninja-Warrior" → "ninjawarrior"
/// - "???" → ""
pub fn sanitize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut cleaned = DISALLOWED.replace_all(&lowered, "").into_owned();
    // Only ASCII survives the filter, so byte truncation is char-safe
    cleaned.truncate(MAX_CHANNEL_LEN);
    cleaned
}

/// A sanitized, non-empty channel identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    /// Sanitize `raw`, returning `None` when nothing usable is left
    pub fn new(raw: &str) -> Option<ChannelName> {
        let name = sanitize(raw);
        if name.is_empty() {
            None
        } else {
            Some(ChannelName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the channel from a native tab link target such as `#chat-foo`
pub fn channel_from_link_target(href: &str, prefix: &str) -> Option<ChannelName> {
    let raw = href.strip_prefix(prefix).unwrap_or(href);
    ChannelName::new(raw)
}
