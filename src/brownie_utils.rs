use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod accounts;
pub mod common;
pub mod init;
pub mod run;

pub use self::accounts::{AccountAdd, AccountStatus};
pub use self::common::ConstructorArg;
pub use self::init::BrownieInit;
pub use self::run::{BrownieRun, ScriptEnv};

pub const BROWNIE_BIN: &str = "brownie";

/// The toolchain operations a deploy needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Toolchain: Send + Sync + 'static {
    /// Creates the project scaffold inside an existing, empty directory.
    async fn init_project(&self, project_dir: &Path) -> eyre::Result<()>;

    /// Runs `script` with `project_dir` as the active project, connected to
    /// `network`.
    async fn run_script(
        &self,
        project_dir: &Path,
        script: &Path,
        network: &str,
        env: &ScriptEnv,
    ) -> eyre::Result<()>;
}

/// Drives the `brownie` executable.
#[derive(Debug, Clone)]
pub struct Brownie {
    bin: PathBuf,
    timeout: Option<Duration>,
}

impl Default for Brownie {
    fn default() -> Self {
        Self {
            bin: PathBuf::from(BROWNIE_BIN),
            timeout: None,
        }
    }
}

impl Brownie {
    pub fn new(bin: impl AsRef<Path>) -> Self {
        Self {
            bin: bin.as_ref().to_owned(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl Toolchain for Brownie {
    async fn init_project(&self, project_dir: &Path) -> eyre::Result<()> {
        BrownieInit::new(project_dir)
            .with_bin(&self.bin)
            .with_force(true)
            .run()
            .await
    }

    async fn run_script(
        &self,
        project_dir: &Path,
        script: &Path,
        network: &str,
        env: &ScriptEnv,
    ) -> eyre::Result<()> {
        BrownieRun::new(script)
            .with_bin(&self.bin)
            .with_cwd(project_dir)
            .with_method("main")
            .with_network(network)
            .with_envs(env)
            .with_timeout(self.timeout)
            .run()
            .await
    }
}
