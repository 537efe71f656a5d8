use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use super::BROWNIE_BIN;

/// `brownie init`, creates the folder layout of a new project.
#[derive(Debug)]
pub struct BrownieInit {
    bin: PathBuf,
    project_dir: PathBuf,
    force: bool,
}

impl BrownieInit {
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            bin: PathBuf::from(BROWNIE_BIN),
            project_dir: project_dir.as_ref().to_owned(),
            force: false,
        }
    }

    pub fn with_bin(mut self, bin: impl AsRef<Path>) -> Self {
        self.bin = bin.as_ref().to_owned();
        self
    }

    /// Allow initializing inside a directory that is not empty.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[instrument(name = "brownie_init", skip_all)]
    pub async fn run(&self) -> eyre::Result<()> {
        let mut cmd = tokio::process::Command::new(&self.bin);
        cmd.arg("init");

        if self.force {
            cmd.arg("--force");
        }

        cmd.arg(&self.project_dir);

        info!("Initializing project in {}", self.project_dir.display());

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            eyre::bail!("brownie init failed: {}", stderr);
        }

        Ok(())
    }
}
