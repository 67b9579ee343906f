//! Source locations to URLs
//!
//! Command map values written by the rendering tool may be filesystem paths of the chunk's source
//! file. Links in the published document need URLs relative to where that document is written,
//! optionally prefixed with a base URL:
//!
//! ```text
//! out dir /site, base url none:         /site/utils.html    →  utils.html
//!                                       /site/lib/io.html   →  lib/io.html
//! base url example.org/docs:            /site/utils.html    →  http://example.org/docs/utils.html
//! any:                                  https://x.org/a.c   →  https://x.org/a.c
//! ```

use crate::error::PublishError;
use nanolp_refs::CommandMap;
use std::path::{Component, Path, PathBuf};
use url::Url;

#[derive(Debug, Clone)]
pub struct SourceUrls {
    out_dir: PathBuf,
    base_url: Option<String>,
    document: Option<PathBuf>,
}

impl SourceUrls {
    /// Locations are made relative to `out_dir`, the directory the document is published in.
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            base_url: None,
            document: None,
        }
    }

    /// Prefix relative results with `base_url`. `http://` is assumed when it has no scheme; an
    /// empty string leaves results relative.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim().trim_end_matches('/');
        self.base_url = if base.is_empty() {
            None
        } else if has_scheme_prefix(base) {
            Some(base.to_string())
        } else {
            Some(format!("http://{}", base))
        };
        self
    }

    /// Locations naming this file resolve to the current document.
    pub fn with_document(mut self, path: impl AsRef<Path>) -> Self {
        self.document = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn url_for(&self, location: &str) -> Result<String, PublishError> {
        if location.is_empty() || is_url(location) {
            return Ok(location.to_string());
        }

        let path = absolute(Path::new(location))?;
        if let Some(document) = &self.document {
            if absolute(document)? == path {
                return Ok(String::new());
            }
        }

        let out_dir = absolute(&self.out_dir)?;
        let relative = pathdiff::diff_paths(&path, &out_dir)
            .filter(|rel| {
                !rel.components()
                    .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
            })
            .ok_or_else(|| PublishError::UnreachableSource(path.clone()))?;

        let relative = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        Ok(match &self.base_url {
            Some(base) => format!("{}/{}", base, relative),
            None => relative,
        })
    }

    /// The command map with every location turned into a URL.
    pub fn rebase(&self, commands: &CommandMap) -> Result<CommandMap, PublishError> {
        commands.try_map_locations(|_, location| self.url_for(location))
    }
}

/// Single-letter schemes are Windows drive letters, not URLs.
fn is_url(location: &str) -> bool {
    Url::parse(location).is_ok_and(|url| url.scheme().len() > 1)
}

fn has_scheme_prefix(base: &str) -> bool {
    match base.find("://") {
        Some(end) => {
            end > 0
                && base[..end]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Absolute and lexically normalized; symlinks are not resolved.
fn absolute(path: &Path) -> Result<PathBuf, PublishError> {
    let absolute = std::path::absolute(path).map_err(|source| PublishError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}
