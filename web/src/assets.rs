//! Bundled static assets.
//!
//! Asset content is compiled into the binary and shared read-only for the
//! lifetime of the process.

/// A static asset with its declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAsset {
    /// Asset body.
    pub content: &'static str,
    /// MIME type served in `Content-Type`.
    pub mime_type: &'static str,
}

/// Dashboard stylesheet.
pub const BUNDLE_CSS: StaticAsset = StaticAsset {
    content: include_str!("../assets/bundle.css"),
    mime_type: "text/css",
};

/// Dashboard script.
pub const BUNDLE_JS: StaticAsset = StaticAsset {
    content: include_str!("../assets/bundle.js"),
    mime_type: "application/javascript",
};
