use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, instrument};

use super::BROWNIE_BIN;

/// Environment variables handed to a single toolchain invocation.
pub type ScriptEnv = BTreeMap<String, String>;

/// `brownie run`, executes a project script.
#[derive(Debug)]
pub struct BrownieRun {
    bin: PathBuf,
    cwd: Option<PathBuf>,
    script: PathBuf,
    method: Option<String>,
    network: Option<String>,
    env: ScriptEnv,
    timeout: Option<Duration>,
}

impl BrownieRun {
    pub fn new(script: impl AsRef<Path>) -> Self {
        Self {
            bin: PathBuf::from(BROWNIE_BIN),
            cwd: None,
            script: script.as_ref().to_owned(),
            method: None,
            network: None,
            env: ScriptEnv::new(),
            timeout: None,
        }
    }

    pub fn with_bin(mut self, bin: impl AsRef<Path>) -> Self {
        self.bin = bin.as_ref().to_owned();
        self
    }

    /// The project root, the toolchain loads the project found there.
    pub fn with_cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_owned());
        self
    }

    pub fn with_method(mut self, method: impl ToString) -> Self {
        self.method = Some(method.to_string());
        self
    }

    pub fn with_network(mut self, network: impl ToString) -> Self {
        self.network = Some(network.to_string());
        self
    }

    pub fn with_envs(mut self, env: &ScriptEnv) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[instrument(name = "brownie_run", skip_all)]
    pub async fn run(&self) -> eyre::Result<()> {
        let mut cmd = tokio::process::Command::new(&self.bin);
        cmd.arg("run");
        cmd.arg(&self.script);

        if let Some(method) = &self.method {
            cmd.arg(method);
        }

        if let Some(network) = &self.network {
            cmd.arg("--network");
            cmd.arg(network);
        }

        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        // Values are credentials, only the names are logged
        debug!("env = {:?}", self.env.keys().collect::<Vec<_>>());
        cmd.envs(&self.env);

        cmd.kill_on_drop(true);

        info!("Running {}", self.script.display());

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, cmd.output())
                .await
                .map_err(|_| {
                    eyre::eyre!("brownie run timed out after {timeout:?}")
                })??,
            None => cmd.output().await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            eyre::bail!(
                "brownie run failed ({}): {}{}",
                output.status,
                stdout,
                stderr
            );
        }

        Ok(())
    }
}
