//! Resource resolution.
//!
//! Every request is dispatched on a single lowercase token taken from the end
//! of the request path. Hosts expose the "extra path" below the mount point
//! differently (a nested router strips it, a fallback does not), so the token
//! is always resolved from the full path string.

/// Extract the resource name from a request path.
///
/// The resource is the trailing run of word characters, hyphens and dots,
/// optionally followed by a single slash. It is lowercased. Paths with no
/// such trailing run resolve to the empty string, which selects the
/// dashboard.
///
/// ```ignore
/// assert_eq!(resolve("/admin/errors/info"), "info");
/// assert_eq!(resolve("/Admin/Errors/Delete-All/"), "delete-all");
/// assert_eq!(resolve("/"), "");
/// ```
#[must_use]
pub fn resolve(path: &str) -> String {
    let path = path.strip_suffix('/').unwrap_or(path);
    let start = path
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_resource_char(*c))
        .last()
        .map_or(path.len(), |(index, _)| index);

    path.get(start..).unwrap_or_default().to_lowercase()
}

fn is_resource_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Known dashboard resources.
///
/// Which resources are meaningful depends on the request method; the
/// dispatcher treats a resource that has no route for the method like
/// [`Resource::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Delete one record (`POST`).
    Delete,
    /// Delete every unprotected record (`POST`).
    DeleteAll,
    /// Delete a list of records (`POST`).
    DeleteList,
    /// Protect one record (`POST`).
    Protect,
    /// Protect a list of records (`POST`).
    ProtectList,
    /// Record detail page (`GET`).
    Info,
    /// JSON record listing (`GET`).
    Json,
    /// Bundled stylesheet (`GET`).
    Css,
    /// Bundled script (`GET`).
    Js,
    /// Deliberate fault for verifying the host's error pipeline (`GET`).
    Test,
    /// Anything else, including the empty resource.
    Other,
}

impl Resource {
    /// Resolve the resource for a request path.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        Self::parse(&resolve(path))
    }

    /// Map a resolved resource name to a route.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "delete" => Self::Delete,
            "delete-all" => Self::DeleteAll,
            "delete-list" => Self::DeleteList,
            "protect" => Self::Protect,
            "protect-list" => Self::ProtectList,
            "info" => Self::Info,
            "json" => Self::Json,
            "css" => Self::Css,
            "js" => Self::Js,
            "test" => Self::Test,
            _ => Self::Other,
        }
    }

    /// Canonical resource name (empty for [`Resource::Other`]).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::DeleteAll => "delete-all",
            Self::DeleteList => "delete-list",
            Self::Protect => "protect",
            Self::ProtectList => "protect-list",
            Self::Info => "info",
            Self::Json => "json",
            Self::Css => "css",
            Self::Js => "js",
            Self::Test => "test",
            Self::Other => "",
        }
    }
}
