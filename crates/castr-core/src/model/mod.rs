// ── Domain model ──

mod reference;
mod stream;

pub use reference::{PlatformReference, REFERENCE_SEPARATOR, WILDCARD_PLATFORM};
pub use stream::{Platform, Stream};
