use std::path::{Path, PathBuf};

use eyre::Context;

use crate::config::{ProjectStructure, CONFIG_FILE};
use crate::deployment::script::{RESULT_FILE, SCRIPT_FILE};

pub const CONTRACT_FILE: &str = "token.sol";

/// Paths inside a scratch project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub contracts_dir: PathBuf,
    pub scripts_dir: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl AsRef<Path>, structure: &ProjectStructure) -> Self {
        let root = root.as_ref().to_owned();

        Self {
            contracts_dir: root.join(&structure.contracts),
            scripts_dir: root.join(&structure.scripts),
            root,
        }
    }

    pub fn contract_path(&self) -> PathBuf {
        self.contracts_dir.join(CONTRACT_FILE)
    }

    pub fn script_path(&self) -> PathBuf {
        self.scripts_dir.join(SCRIPT_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn result_path(&self) -> PathBuf {
        self.root.join(RESULT_FILE)
    }

    /// Checks the scaffold `init` laid out and creates the folders a config
    /// renamed.
    pub async fn open(&self) -> eyre::Result<()> {
        if !tokio::fs::try_exists(&self.root).await? {
            eyre::bail!("Project root {} is missing", self.root.display());
        }

        let scaffold = ProjectStructure::default();
        for name in [&scaffold.contracts, &scaffold.scripts] {
            let dir = self.root.join(name);
            if !tokio::fs::try_exists(&dir).await? {
                eyre::bail!("Project scaffold is missing {}", dir.display());
            }
        }

        for dir in [&self.contracts_dir, &self.scripts_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Creating {}", dir.display()))?;
        }

        Ok(())
    }
}
