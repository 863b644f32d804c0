//! # Storage Roots
//!
//! Evidence lives under one *base root*. Which root is usable depends on the
//! platform (scoped storage or not) and on live conditions: a removable volume
//! may be gone, permissions may have been revoked, a directory may have been
//! replaced by a file. This module turns that into explicit values:
//!
//! - [`StorageEnvironment`]: the candidate roots for this session, described once
//!   and handed to everything that needs them.
//! - [`probe::StorageProbe`]: checks each candidate and ranks them by a real
//!   write/read round-trip.
//! - [`resolver::PathResolver`]: picks the session's base root (memoized) and
//!   builds the `<manufacturer>/<date>/<category>/<article>-<n>` hierarchy,
//!   retrying once under the application-private root when a level cannot be
//!   created.
//!
//! ## Candidate order
//!
//! ```text
//! 1. shared media    (e.g. ~/Pictures/DefectEvidence)
//! 2. legacy public   (e.g. ~/DefectEvidence)
//! 3. app private     (e.g. ~/.local/share/defectdesk/DefectEvidence)
//! ```
//!
//! With scoped storage the private root is the recommended one; without it the
//! legacy public root is.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod probe;
pub mod resolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageKind {
    SharedMedia,
    LegacyPublic,
    AppPrivate,
}

impl StorageKind {
    pub fn is_public(self) -> bool {
        !matches!(self, StorageKind::AppPrivate)
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageKind::SharedMedia => "shared-media",
            StorageKind::LegacyPublic => "legacy-public",
            StorageKind::AppPrivate => "app-private",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: StorageKind,
    pub path: PathBuf,
}

/// Candidate roots available to this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEnvironment {
    pub shared_media: Option<PathBuf>,
    pub legacy_public: Option<PathBuf>,
    pub app_private: PathBuf,
    pub scoped_storage: bool,
}

impl StorageEnvironment {
    /// An environment with only the application-private root.
    pub fn new(app_private: impl Into<PathBuf>) -> Self {
        Self {
            shared_media: None,
            legacy_public: None,
            app_private: app_private.into(),
            scoped_storage: true,
        }
    }

    pub fn with_shared_media(mut self, path: impl Into<PathBuf>) -> Self {
        self.shared_media = Some(path.into());
        self
    }

    pub fn with_legacy_public(mut self, path: impl Into<PathBuf>) -> Self {
        self.legacy_public = Some(path.into());
        self
    }

    pub fn with_scoped_storage(mut self, scoped: bool) -> Self {
        self.scoped_storage = scoped;
        self
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        let mut list = Vec::with_capacity(3);
        if let Some(path) = &self.shared_media {
            list.push(Candidate {
                kind: StorageKind::SharedMedia,
                path: path.clone(),
            });
        }
        if let Some(path) = &self.legacy_public {
            list.push(Candidate {
                kind: StorageKind::LegacyPublic,
                path: path.clone(),
            });
        }
        list.push(Candidate {
            kind: StorageKind::AppPrivate,
            path: self.app_private.clone(),
        });
        list
    }

    pub fn is_recommended(&self, kind: StorageKind) -> bool {
        if self.scoped_storage {
            kind == StorageKind::AppPrivate
        } else {
            kind == StorageKind::LegacyPublic
        }
    }

    /// The well-known root tried before any probing.
    pub fn primary(&self) -> Candidate {
        self.candidates()
            .into_iter()
            .find(|c| self.is_recommended(c.kind))
            .unwrap_or_else(|| self.fallback())
    }

    /// Root used when a hierarchy cannot be built under the session root.
    pub fn fallback(&self) -> Candidate {
        Candidate {
            kind: StorageKind::AppPrivate,
            path: self.app_private.clone(),
        }
    }
}

/// Diagnostic view of one candidate root. Produced fresh on every probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathInfo {
    pub path: PathBuf,
    pub kind: StorageKind,
    pub exists: bool,
    pub writable: bool,
    pub recommended: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteTestResult {
    pub path: PathBuf,
    pub kind: StorageKind,
    pub success: bool,
    pub error_detail: Option<String>,
}

/// A directory handed back by the resolver.
///
/// `used_fallback` is set when the hierarchy could not be built under the
/// session root and was built under the application-private root instead.
/// The evidence is then outside the normally browsable location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDirectory {
    pub path: PathBuf,
    pub root: PathBuf,
    pub used_fallback: bool,
}

impl ResolvedDirectory {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> StorageEnvironment {
        StorageEnvironment::new("/data/private")
            .with_shared_media("/media/pictures")
            .with_legacy_public("/public")
    }

    #[test]
    fn test_candidate_order() {
        let kinds: Vec<StorageKind> = env().candidates().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StorageKind::SharedMedia,
                StorageKind::LegacyPublic,
                StorageKind::AppPrivate
            ]
        );
    }

    #[test]
    fn test_missing_roots_are_omitted() {
        let candidates = StorageEnvironment::new("/data/private").candidates();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, StorageKind::AppPrivate);
    }

    #[test]
    fn test_primary_follows_scoped_storage() {
        assert_eq!(env().primary().kind, StorageKind::AppPrivate);
        let legacy = env().with_scoped_storage(false);
        assert_eq!(legacy.primary().kind, StorageKind::LegacyPublic);
        assert_eq!(legacy.primary().path, PathBuf::from("/public"));
    }

    #[test]
    fn test_primary_without_legacy_root_is_private() {
        let env = StorageEnvironment::new("/data/private")
            .with_shared_media("/media")
            .with_scoped_storage(false);
        assert_eq!(env.primary().kind, StorageKind::AppPrivate);
    }
}
