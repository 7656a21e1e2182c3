//! CLI configuration: where the redb file lives, which project this
//! invocation operates on, and the [`memory_core::types::Config`] passed
//! to every [`memory_core::MemorySystem`] built from it.

use anyhow::Context;
use memory_core::embeddings::mock::MockEmbedder;
use memory_core::types::Config as MemoryConfig;
use memory_storage_redb::RedbStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Path to the redb file backing this invocation.
    pub db_path: PathBuf,
    /// Project id every command without an explicit `--project` falls
    /// back to.
    pub default_project: String,
    /// The memory substrate's own configuration (decay rates, saliency
    /// weights, retrieval blend, ...).
    pub memory: MemoryConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("memory.redb"),
            default_project: "default".to_string(),
            memory: MemoryConfig::default(),
        }
    }
}

/// Environment variable naming a config file path to fall back to when
/// no `--config` flag is given.
pub const CONFIG_PATH_ENV_VAR: &str = "MEMORY_CLI_CONFIG";

impl CliConfig {
    /// Load from `path` if given; otherwise from [`CONFIG_PATH_ENV_VAR`]
    /// if set; otherwise defaults. Anything the file omits falls back to
    /// [`CliConfig::default`].
    ///
    /// # Errors
    /// Returns an error if a resolved path can't be read or parsed.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let resolved = path.map(PathBuf::from).or_else(|| std::env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from));
        let Some(path) = resolved else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn explicit_path_wins_over_env_var() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join("env.toml");
        std::fs::write(&env_path, "default_project = \"from-env\"\n").unwrap();
        let explicit_path = dir.path().join("explicit.toml");
        std::fs::write(&explicit_path, "default_project = \"from-flag\"\n").unwrap();

        // SAFETY: test-only env var manipulation, serialized via #[serial].
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV_VAR, &env_path);
        }
        let config = CliConfig::load(Some(&explicit_path)).unwrap();
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV_VAR);
        }

        assert_eq!(config.default_project, "from-flag");
    }

    #[test]
    #[serial]
    fn env_var_used_when_no_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join("env.toml");
        std::fs::write(&env_path, "default_project = \"from-env\"\n").unwrap();

        // SAFETY: test-only env var manipulation, serialized via #[serial].
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV_VAR, &env_path);
        }
        let config = CliConfig::load(None).unwrap();
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV_VAR);
        }

        assert_eq!(config.default_project, "from-env");
    }

    #[test]
    #[serial]
    fn defaults_when_neither_path_nor_env_var_set() {
        // SAFETY: test-only env var manipulation, serialized via #[serial].
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV_VAR);
        }
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config.default_project, "default");
    }
}

/// Everything a command needs to build a [`memory_core::MemorySystem`]:
/// the opened store, a configured embedder, and the resolved config.
pub struct StorageHandle {
    pub store: RedbStore,
    pub embedder: MockEmbedder,
    pub config: CliConfig,
}

/// Open (or create) the redb store named by `config.db_path` and build
/// a matching mock embedder. A real deployment would inject an HTTP or
/// local embedding provider here instead; this crate's job is wiring,
/// not providing one (§1: embedding generation is an external
/// collaborator).
///
/// # Errors
/// Returns an error if the store can't be opened.
pub async fn initialize_storage(config: CliConfig) -> anyhow::Result<StorageHandle> {
    let store = RedbStore::open(
        &config.db_path,
        config.memory.embedding_dim,
        config.memory.inhibition_half_life_s,
    )
    .await
    .with_context(|| format!("failed to open store at {}", config.db_path.display()))?;
    let embedder = MockEmbedder::new(config.memory.embedding_dim);
    Ok(StorageHandle { store, embedder, config })
}
