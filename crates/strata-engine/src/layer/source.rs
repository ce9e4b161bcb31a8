use std::path::{Path, PathBuf};

use super::LayerError;

/// Where a layer's image comes from.
///
/// `Packed` sources use the `pack://` scheme and resolve against a
/// host-configured asset root; `Path` sources are used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSource {
    Path(PathBuf),
    Packed(String),
}

impl LayerSource {
    /// Parses a source URI.
    ///
    /// Recognized forms:
    /// - `pack://relative/path.png` — bundled asset, resolved later
    /// - `file:///abs/path.png` — local file
    /// - anything else — treated as a filesystem path
    pub fn from_uri(uri: &str) -> Self {
        if let Some(rest) = uri.strip_prefix("pack://") {
            LayerSource::Packed(rest.to_string())
        } else if let Some(rest) = uri.strip_prefix("file://") {
            LayerSource::Path(PathBuf::from(rest))
        } else {
            LayerSource::Path(PathBuf::from(uri))
        }
    }

    pub(crate) fn display_uri(&self) -> String {
        match self {
            LayerSource::Path(p) => p.display().to_string(),
            LayerSource::Packed(rel) => format!("pack://{rel}"),
        }
    }
}

impl From<&Path> for LayerSource {
    fn from(p: &Path) -> Self {
        LayerSource::Path(p.to_path_buf())
    }
}

impl From<PathBuf> for LayerSource {
    fn from(p: PathBuf) -> Self {
        LayerSource::Path(p)
    }
}

/// Maps layer sources to local filesystem paths.
///
/// The host owns the asset root; layers only carry the source reference.
#[derive(Debug, Clone, Default)]
pub struct SourceResolver {
    pack_root: Option<PathBuf>,
}

impl SourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory `pack://` sources resolve against.
    pub fn with_pack_root(root: impl Into<PathBuf>) -> Self {
        Self {
            pack_root: Some(root.into()),
        }
    }

    /// Resolves a source to a local path.
    ///
    /// `pack://` sources without a configured root fail with
    /// [`LayerError::UnresolvedSource`].
    pub fn resolve(&self, source: &LayerSource) -> Result<PathBuf, LayerError> {
        match source {
            LayerSource::Path(p) => Ok(p.clone()),
            LayerSource::Packed(rel) => match &self.pack_root {
                Some(root) => Ok(root.join(rel)),
                None => Err(LayerError::UnresolvedSource {
                    uri: source.display_uri(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── uri parsing ───────────────────────────────────────────────────────

    #[test]
    fn parses_pack_scheme() {
        let s = LayerSource::from_uri("pack://backgrounds/sky.png");
        assert_eq!(s, LayerSource::Packed("backgrounds/sky.png".to_string()));
    }

    #[test]
    fn parses_file_scheme() {
        let s = LayerSource::from_uri("file:///tmp/sky.png");
        assert_eq!(s, LayerSource::Path(PathBuf::from("/tmp/sky.png")));
    }

    #[test]
    fn bare_string_is_a_path() {
        let s = LayerSource::from_uri("assets/sky.png");
        assert_eq!(s, LayerSource::Path(PathBuf::from("assets/sky.png")));
    }

    // ── resolution ────────────────────────────────────────────────────────

    #[test]
    fn packed_resolves_against_root() {
        let resolver = SourceResolver::with_pack_root("/data/assets");
        let path = resolver
            .resolve(&LayerSource::Packed("sky.png".to_string()))
            .unwrap();
        assert_eq!(path, PathBuf::from("/data/assets/sky.png"));
    }

    #[test]
    fn packed_without_root_is_unresolved() {
        let resolver = SourceResolver::new();
        let err = resolver
            .resolve(&LayerSource::Packed("sky.png".to_string()))
            .unwrap_err();
        assert!(matches!(err, LayerError::UnresolvedSource { .. }));
    }

    #[test]
    fn plain_path_passes_through() {
        let resolver = SourceResolver::new();
        let path = resolver
            .resolve(&LayerSource::Path(PathBuf::from("/tmp/x.png")))
            .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/x.png"));
    }
}
