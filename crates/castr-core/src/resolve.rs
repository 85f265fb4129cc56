// ── Reference resolution ──
//
// Turns host-entered tokens into concrete ids against one directory
// snapshot. Tokens are template-expanded first; the expander may suspend,
// so the caller pins the snapshot it resolves against.

use std::sync::Arc;

use tracing::warn;

use crate::error::CoreError;
use crate::host::TemplateExpander;
use crate::model::{PlatformReference, Stream};
use crate::store::Directory;

/// Raw, unexpanded options of an action or feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceOptions {
    /// Stream id or stream name.
    pub stream: Option<String>,
    /// Compound `"{streamName} :: {platformName|*ALL*}"` token.
    pub platform: Option<String>,
}

impl ReferenceOptions {
    pub fn stream(token: impl Into<String>) -> Self {
        Self {
            stream: Some(token.into()),
            platform: None,
        }
    }

    pub fn platform(token: impl Into<String>) -> Self {
        Self {
            stream: None,
            platform: Some(token.into()),
        }
    }
}

/// A platform selected by a reference, with its state at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlatform {
    pub platform_id: String,
    pub enabled: bool,
}

/// Result of resolving a [`ReferenceOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// The matched stream id, or the expanded token verbatim when it
    /// matched nothing.
    pub stream_id: Option<String>,
    /// Platforms in stream order; duplicates by name are all kept.
    pub platforms: Vec<ResolvedPlatform>,
}

// ── Pure lookups ─────────────────────────────────────────────────────

/// Find a stream by id, then by name. An id match always wins.
pub fn match_stream<'d>(directory: &'d Directory, token: &str) -> Option<&'d Arc<Stream>> {
    directory
        .by_id(token)
        .or_else(|| directory.by_name(token))
}

/// Select the platforms named by `reference`. The stream part is looked
/// up by name only.
pub fn select_platforms(
    directory: &Directory,
    reference: &PlatformReference,
) -> Option<(String, Vec<ResolvedPlatform>)> {
    let stream = directory.by_name(&reference.stream)?;
    let to_resolved = |p: &crate::model::Platform| ResolvedPlatform {
        platform_id: p.id.clone(),
        enabled: p.enabled,
    };

    let platforms = if reference.is_wildcard() {
        stream.platforms.iter().map(to_resolved).collect()
    } else {
        stream.platforms_named(&reference.platform).map(to_resolved).collect()
    };
    Some((stream.id.clone(), platforms))
}

// ── Resolver ─────────────────────────────────────────────────────────

/// Resolves reference tokens against a directory snapshot.
pub struct Resolver<'a> {
    directory: &'a Directory,
    expander: &'a dyn TemplateExpander,
}

impl<'a> Resolver<'a> {
    pub fn new(directory: &'a Directory, expander: &'a dyn TemplateExpander) -> Self {
        Self {
            directory,
            expander,
        }
    }

    /// Resolve every present option.
    ///
    /// An unmatched stream token is passed through verbatim with a warning.
    /// An unmatched platform reference is an error.
    pub async fn resolve(&self, options: &ReferenceOptions) -> Result<ResolvedTarget, CoreError> {
        let mut target = ResolvedTarget::default();

        if let Some(raw) = &options.stream {
            target.stream_id = Some(self.resolve_stream(raw).await?);
        }
        if let Some(raw) = &options.platform {
            let (stream_id, platforms) = self.resolve_platform(raw).await?;
            target.stream_id = Some(stream_id);
            target.platforms = platforms;
        }
        Ok(target)
    }

    /// Expand and map a stream token to an id.
    pub async fn resolve_stream(&self, raw: &str) -> Result<String, CoreError> {
        let token = self.expander.expand(raw).await;
        if token.is_empty() {
            return Err(CoreError::MissingReference { field: "stream" });
        }

        if let Some(stream) = match_stream(self.directory, &token) {
            return Ok(stream.id.clone());
        }
        warn!(token = %token, "stream token matches no known id or name, using it verbatim");
        Ok(token)
    }

    /// Expand and split a compound platform token.
    pub async fn resolve_platform(
        &self,
        raw: &str,
    ) -> Result<(String, Vec<ResolvedPlatform>), CoreError> {
        let token = self.expander.expand(raw).await;
        if token.trim().is_empty() {
            return Err(CoreError::MissingReference { field: "platform" });
        }

        let Some(reference) = PlatformReference::parse(&token) else {
            warn!(token = %token, "platform reference lacks the ' :: ' separator");
            return Err(CoreError::PlatformNotFound { reference: token });
        };

        let Some((stream_id, platforms)) = select_platforms(self.directory, &reference) else {
            warn!(reference = %reference, "no stream named {:?}", reference.stream);
            return Err(CoreError::PlatformNotFound { reference: token });
        };

        if platforms.is_empty() {
            warn!(reference = %reference, "reference selects no platforms");
        }
        Ok((stream_id, platforms))
    }
}
