use crate::api::DefectApi;
use crate::config::DefectConfig;
use crate::error::{DefectError, Result};
use crate::roots::StorageEnvironment;
use crate::store::fs::FsKvStore;
use directories::{BaseDirs, ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};

/// Relocates every root (data, shared media, legacy public, private) under one directory.
pub const HOME_ENV: &str = "DEFECTDESK_HOME";

/// Where the application keeps its own data and which parents the candidate
/// storage roots hang from. The configured base directory name is appended to
/// each parent to form the candidate roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub shared_media_parent: Option<PathBuf>,
    pub legacy_public_parent: Option<PathBuf>,
    pub private_parent: PathBuf,
}

impl AppPaths {
    pub fn detect() -> Result<Self> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::sandboxed(Path::new(&home)));
        }

        let proj_dirs = ProjectDirs::from("com", "defectdesk", "defectdesk").ok_or_else(|| {
            DefectError::Store("Could not determine the application data directory".to_string())
        })?;
        let data_dir = proj_dirs.data_dir().to_path_buf();
        let shared_media_parent = UserDirs::new()
            .and_then(|dirs| dirs.picture_dir().map(Path::to_path_buf));
        let legacy_public_parent = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());

        Ok(Self {
            private_parent: data_dir.clone(),
            data_dir,
            shared_media_parent,
            legacy_public_parent,
        })
    }

    pub fn sandboxed(home: &Path) -> Self {
        Self {
            data_dir: home.to_path_buf(),
            shared_media_parent: Some(home.join("media")),
            legacy_public_parent: Some(home.join("public")),
            private_parent: home.join("private"),
        }
    }

    pub fn catalog_dir(&self) -> PathBuf {
        self.data_dir.join("catalog")
    }

    pub fn storage_environment(&self, config: &DefectConfig) -> StorageEnvironment {
        let name = &config.base_dir_name;
        let mut env = StorageEnvironment::new(self.private_parent.join(name))
            .with_scoped_storage(config.scoped_storage);
        if let Some(parent) = &self.shared_media_parent {
            env = env.with_shared_media(parent.join(name));
        }
        if let Some(parent) = &self.legacy_public_parent {
            env = env.with_legacy_public(parent.join(name));
        }
        env
    }
}

pub struct DefectContext {
    pub api: DefectApi<FsKvStore>,
}

pub fn initialize() -> Result<DefectContext> {
    let paths = AppPaths::detect()?;
    initialize_with(paths)
}

pub fn initialize_with(paths: AppPaths) -> Result<DefectContext> {
    let config = DefectConfig::load(&paths.data_dir)?;
    let env = paths.storage_environment(&config);
    let kv = FsKvStore::new(paths.catalog_dir());
    let api = DefectApi::new(kv, env, paths);
    Ok(DefectContext { api })
}
