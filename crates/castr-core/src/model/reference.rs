// ── Compound platform references ──
//
// The host addresses a stream/platform pair with the two-part string
// `"{stream} :: {platform}"`. The platform part may be `*ALL*`, which
// selects every platform of the stream.

use std::fmt;

/// Separator between the stream part and the platform part.
pub const REFERENCE_SEPARATOR: &str = " :: ";

/// Platform part selecting every platform of a stream.
pub const WILDCARD_PLATFORM: &str = "*ALL*";

/// A parsed `"{stream} :: {platform}"` token.
///
/// Only the first separator splits; anything after it belongs to the
/// platform part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformReference {
    pub stream: String,
    pub platform: String,
}

impl PlatformReference {
    pub fn new(stream: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            platform: platform.into(),
        }
    }

    pub fn wildcard(stream: impl Into<String>) -> Self {
        Self::new(stream, WILDCARD_PLATFORM)
    }

    /// Split a token on the first `" :: "`. Returns `None` when the
    /// separator is absent.
    pub fn parse(token: &str) -> Option<Self> {
        let (stream, platform) = token.split_once(REFERENCE_SEPARATOR)?;
        Some(Self::new(stream, platform))
    }

    pub fn is_wildcard(&self) -> bool {
        self.platform == WILDCARD_PLATFORM
    }
}

impl fmt::Display for PlatformReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{REFERENCE_SEPARATOR}{}", self.stream, self.platform)
    }
}
