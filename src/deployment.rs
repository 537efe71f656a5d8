use std::path::{Path, PathBuf};

use eyre::Context;
use tracing::{info, instrument, warn};

use self::outcome::{read_outcome, resolve_outcome};
use self::project::ProjectLayout;
use crate::brownie_utils::{AccountAdd, AccountStatus, ScriptEnv, Toolchain};
use crate::config::ProjectStructure;
use crate::error::DeployError;
use crate::report::contract_deployment::ContractDeployment;

pub mod cmd;
pub mod outcome;
pub mod project;
pub mod request;
pub mod script;

pub use self::request::{Account, DeployRequest};

pub const PROJECT_DIR_PREFIX: &str = "brownie-deploy-";

/// Compiles and deploys contracts through a [`Toolchain`], one scratch
/// project per call.
#[derive(Debug)]
pub struct BrownieDeployer<T> {
    toolchain: T,
    keystore_dir: PathBuf,
}

impl<T: Toolchain> BrownieDeployer<T> {
    pub fn new(toolchain: T, keystore_dir: impl AsRef<Path>) -> Self {
        Self {
            toolchain,
            keystore_dir: keystore_dir.as_ref().to_owned(),
        }
    }

    /// Registers the account under its name. Existing accounts are left as
    /// they are.
    pub async fn add_account(
        &self,
        account: &Account,
    ) -> Result<AccountStatus, DeployError> {
        AccountAdd::new(
            &self.keystore_dir,
            &account.name,
            &account.password,
            account.private_key.clone(),
        )
        .run()
        .await
        .map_err(DeployError::cannot_create_account)
    }

    /// Deploys the contract and returns where it lives.
    ///
    /// The scratch project is removed before this returns, whatever the
    /// outcome.
    #[instrument(skip_all, fields(contract = %request.contract_name, network = %request.network))]
    pub async fn deploy(
        &self,
        request: &DeployRequest,
    ) -> Result<ContractDeployment, DeployError> {
        request.validate()?;
        let env = request.script_env()?;

        self.add_account(&request.account).await?;

        let project_dir = tempfile::Builder::new()
            .prefix(PROJECT_DIR_PREFIX)
            .tempdir()
            .map_err(DeployError::cannot_create_project)?;

        let result = self.deploy_in(project_dir.path(), request, &env).await;

        let path = project_dir.path().to_owned();
        if let Err(err) = project_dir.close() {
            warn!("Failed to remove {}: {err}", path.display());
        }

        result
    }

    async fn deploy_in(
        &self,
        project_dir: &Path,
        request: &DeployRequest,
        env: &ScriptEnv,
    ) -> Result<ContractDeployment, DeployError> {
        self.toolchain
            .init_project(project_dir)
            .await
            .map_err(DeployError::cannot_create_project)?;

        let default_structure = ProjectStructure::default();
        let structure = request
            .config
            .as_ref()
            .map_or(&default_structure, |config| &config.project_structure);

        let layout = ProjectLayout::new(project_dir, structure);
        layout
            .open()
            .await
            .map_err(DeployError::cannot_create_project)?;

        write_file(&layout.contract_path(), &request.contract_code)
            .await
            .map_err(DeployError::cannot_create_project)?;

        if let Some(config) = request.config.as_ref() {
            config
                .write(layout.config_path())
                .await
                .map_err(DeployError::cannot_create_project)?;
        }

        let script = request.script(layout.result_path()).render();
        let script_path = layout.script_path();
        write_file(&script_path, &script)
            .await
            .map_err(DeployError::cannot_create_project)?;

        info!("Deploying {}", request.contract_name);

        self.toolchain
            .run_script(&layout.root, &script_path, &request.network, env)
            .await
            .map_err(DeployError::cannot_deploy)?;

        let outcome = read_outcome(layout.result_path())
            .await
            .map_err(DeployError::cannot_deploy)?;

        let deployment = resolve_outcome(outcome)?;

        info!("Deployed {} at {deployment}", request.contract_name);

        Ok(deployment)
    }
}

async fn write_file(path: &Path, content: &str) -> eyre::Result<()> {
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Writing to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use ethers::types::{Address, H256};
    use hex_literal::hex;

    use super::*;
    use crate::brownie_utils::{ConstructorArg, MockToolchain};
    use crate::brownie_utils::accounts::keystore_file;
    use crate::config::{ProjectConfig, CONFIG_FILE};
    use crate::deployment::script::RESULT_FILE;
    use crate::error::ErrorCode;

    const DEV_KEY: &str =
        "0x7c852118294e51e653712a81e05800f419141751be58f605c371e15141b007a6";

    const CONTRACT: &str = "pragma solidity ^0.8.0;\ncontract MainToken {}\n";

    const DEPLOYED: &str = r#"{"kind": "contract", "address": "0x5FbDB2315678afecb367f032d93F642f64180aa3"}"#;

    struct Fixture {
        keystore_dir: tempfile::TempDir,
        project_dir: Arc<Mutex<Option<PathBuf>>>,
    }

    impl Fixture {
        /// The account file already exists so deploys skip keystore
        /// encryption.
        fn new() -> Self {
            let keystore_dir = tempfile::tempdir().unwrap();
            std::fs::write(keystore_file(keystore_dir.path(), "test_key"), "{}")
                .unwrap();

            Self {
                keystore_dir,
                project_dir: Arc::new(Mutex::new(None)),
            }
        }

        /// A toolchain whose init lays out the default scaffold and records
        /// the project directory.
        fn toolchain(&self) -> MockToolchain {
            let mut toolchain = MockToolchain::new();
            let seen = self.project_dir.clone();

            toolchain.expect_init_project().times(1).returning(move |dir| {
                *seen.lock().unwrap() = Some(dir.to_owned());
                std::fs::create_dir_all(dir.join("contracts"))?;
                std::fs::create_dir_all(dir.join("scripts"))?;
                Ok(())
            });

            toolchain
        }

        fn deployer(
            &self,
            toolchain: MockToolchain,
        ) -> BrownieDeployer<MockToolchain> {
            BrownieDeployer::new(toolchain, self.keystore_dir.path())
        }

        fn assert_project_removed(&self) {
            let project_dir = self
                .project_dir
                .lock()
                .unwrap()
                .clone()
                .expect("init_project was not called");

            assert!(!project_dir.exists(), "{} still exists", project_dir.display());
        }
    }

    fn request() -> DeployRequest {
        DeployRequest::new(
            CONTRACT,
            "ropsten",
            Account::new("test_key", "pw", DEV_KEY.parse().unwrap()),
            "MainToken",
            "tok",
        )
    }

    #[tokio::test]
    async fn deploys_and_returns_address() {
        let fixture = Fixture::new();
        let mut toolchain = fixture.toolchain();

        toolchain.expect_run_script().times(1).returning(
            |project_dir, script, network, env| {
                let contract = std::fs::read_to_string(
                    project_dir.join("contracts/token.sol"),
                )?;
                assert_eq!(contract, CONTRACT);

                assert_eq!(script, project_dir.join("scripts/main.py"));
                let script = std::fs::read_to_string(script)?;
                assert!(script.contains(
                    "token = MainToken.deploy({'from': accounts[0]}, publish_source=True)"
                ));

                assert!(!project_dir.join(CONFIG_FILE).exists());
                assert_eq!(network, "ropsten");
                assert_eq!(env["ETHERSCAN_TOKEN"], "tok");

                std::fs::write(project_dir.join(RESULT_FILE), DEPLOYED)?;
                Ok(())
            },
        );

        let deployment =
            fixture.deployer(toolchain).deploy(&request()).await.unwrap();

        assert_eq!(
            deployment.address,
            Address::from(hex!("5FbDB2315678afecb367f032d93F642f64180aa3"))
        );
        assert_eq!(
            deployment.to_string(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
        fixture.assert_project_removed();
    }

    #[tokio::test]
    async fn config_and_constructor_args_reach_the_project() {
        let fixture = Fixture::new();
        let mut toolchain = fixture.toolchain();

        toolchain.expect_run_script().times(1).returning(
            |project_dir, script, _network, _env| {
                let config: ProjectConfig = serde_yaml::from_str(
                    &std::fs::read_to_string(project_dir.join(CONFIG_FILE))?,
                )?;
                assert_eq!(config.compiler.solc.version.as_deref(), Some("0.8.17"));

                let script = std::fs::read_to_string(script)?;
                assert!(script.contains(
                    "MainToken.deploy('Main',18, {'from': accounts[0]}, publish_source=True)"
                ));

                std::fs::write(project_dir.join(RESULT_FILE), DEPLOYED)?;
                Ok(())
            },
        );

        let mut config = ProjectConfig::default();
        config.compiler.solc.version = Some("0.8.17".to_string());

        let request = request()
            .with_config(config)
            .with_constructor_arg(ConstructorArg::raw("'Main'"))
            .with_constructor_arg(ConstructorArg::int(18).unwrap());

        fixture.deployer(toolchain).deploy(&request).await.unwrap();
        fixture.assert_project_removed();
    }

    #[tokio::test]
    async fn provider_credentials_stay_out_of_our_environment() {
        const PROVIDER: &str = "BROWNIE_DEPLOYER_TEST_PROVIDER_ID";

        let fixture = Fixture::new();
        let mut toolchain = fixture.toolchain();

        toolchain.expect_run_script().times(1).returning(
            |project_dir, _script, _network, env| {
                assert_eq!(env[PROVIDER], "abc123");
                std::fs::write(project_dir.join(RESULT_FILE), DEPLOYED)?;
                Ok(())
            },
        );

        let request = request().with_provider(PROVIDER).with_provider_id("abc123");

        fixture.deployer(toolchain).deploy(&request).await.unwrap();

        assert!(std::env::var(PROVIDER).is_err());
        assert!(std::env::var_os("ETHERSCAN_TOKEN").map_or(true, |v| v != "tok"));
    }

    #[tokio::test]
    async fn provider_without_id_fails_before_any_work() {
        let keystore_dir = tempfile::tempdir().unwrap();

        // No expectations, any toolchain call panics
        let deployer =
            BrownieDeployer::new(MockToolchain::new(), keystore_dir.path());

        let request = request().with_provider("WEB3_INFURA_PROJECT_ID");

        let err = deployer.deploy(&request).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::HaveProviderButNotProviderId);
        assert!(std::env::var("WEB3_INFURA_PROJECT_ID").is_err());
        assert_eq!(std::fs::read_dir(keystore_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn failed_init_cannot_create_project() {
        let fixture = Fixture::new();
        let seen = fixture.project_dir.clone();

        let mut toolchain = MockToolchain::new();
        toolchain.expect_init_project().times(1).returning(move |dir| {
            *seen.lock().unwrap() = Some(dir.to_owned());
            Err(eyre::eyre!("brownie: command not found"))
        });

        let err = fixture.deployer(toolchain).deploy(&request()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::CannotCreateNewProject);
        assert!(err.to_string().contains("brownie: command not found"));
        fixture.assert_project_removed();
    }

    #[tokio::test]
    async fn failed_run_cannot_deploy() {
        let fixture = Fixture::new();
        let mut toolchain = fixture.toolchain();

        toolchain
            .expect_run_script()
            .times(1)
            .returning(|_, _, _, _| Err(eyre::eyre!("CompilerError")));

        let err = fixture.deployer(toolchain).deploy(&request()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::CannotDeployContract);
        fixture.assert_project_removed();
    }

    #[tokio::test]
    async fn receipt_is_attached_to_the_error() {
        let fixture = Fixture::new();
        let mut toolchain = fixture.toolchain();

        toolchain.expect_run_script().times(1).returning(
            |project_dir, _script, _network, _env| {
                std::fs::write(
                    project_dir.join(RESULT_FILE),
                    r#"{
                        "kind": "receipt",
                        "txid": "0x00000000000000000000000000000000000000000000000000000000000000ff",
                        "status": 1,
                        "contract_address": null,
                        "block_number": 9,
                        "gas_used": 53000
                    }"#,
                )?;
                Ok(())
            },
        );

        let err = fixture.deployer(toolchain).deploy(&request()).await.unwrap_err();

        assert_eq!(
            err.code(),
            ErrorCode::ContractSelfDestructedGotTransactionReceipt
        );
        let transaction = err.transaction().unwrap();
        assert_eq!(transaction.txid, H256::from_low_u64_be(0xff));
        assert_eq!(transaction.block_number, Some(9));
        fixture.assert_project_removed();
    }

    #[tokio::test]
    async fn no_result_means_not_deployed() {
        let fixture = Fixture::new();
        let mut toolchain = fixture.toolchain();

        toolchain
            .expect_run_script()
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let err = fixture.deployer(toolchain).deploy(&request()).await.unwrap_err();

        assert_eq!(
            err.code(),
            ErrorCode::ContractNotDeployedTransactionNotReceived
        );
        fixture.assert_project_removed();
    }

    #[tokio::test]
    async fn garbled_result_cannot_deploy() {
        let fixture = Fixture::new();
        let mut toolchain = fixture.toolchain();

        toolchain.expect_run_script().times(1).returning(
            |project_dir, _script, _network, _env| {
                std::fs::write(project_dir.join(RESULT_FILE), "not json")?;
                Ok(())
            },
        );

        let err = fixture.deployer(toolchain).deploy(&request()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::CannotDeployContract);
        fixture.assert_project_removed();
    }

    #[tokio::test]
    async fn deploy_registers_missing_account() {
        let keystore_dir = tempfile::tempdir().unwrap();

        let mut toolchain = MockToolchain::new();
        toolchain.expect_init_project().returning(|dir| {
            std::fs::create_dir_all(dir.join("contracts"))?;
            std::fs::create_dir_all(dir.join("scripts"))?;
            Ok(())
        });
        toolchain.expect_run_script().returning(|project_dir, _, _, _| {
            std::fs::write(project_dir.join(RESULT_FILE), DEPLOYED)?;
            Ok(())
        });

        BrownieDeployer::new(toolchain, keystore_dir.path())
            .deploy(&request())
            .await
            .unwrap();

        assert!(keystore_file(keystore_dir.path(), "test_key").exists());
    }

    #[tokio::test]
    async fn add_account_is_idempotent() {
        let fixture = Fixture::new();
        let deployer = fixture.deployer(MockToolchain::new());

        let account = Account::new("test_key", "pw", DEV_KEY.parse().unwrap());

        let status = deployer.add_account(&account).await.unwrap();
        assert_eq!(status, AccountStatus::AlreadyExists);

        let content = std::fs::read_to_string(keystore_file(
            fixture.keystore_dir.path(),
            "test_key",
        ))
        .unwrap();
        assert_eq!(content, "{}");
    }

    #[tokio::test]
    async fn unwritable_keystore_cannot_create_account() {
        let root = tempfile::tempdir().unwrap();
        let keystore_dir = root.path().join("accounts");
        std::fs::write(&keystore_dir, "not a directory").unwrap();

        // No expectations, any toolchain call panics
        let deployer = BrownieDeployer::new(MockToolchain::new(), &keystore_dir);

        let account = Account::new("test_key", "pw", DEV_KEY.parse().unwrap());
        let err = deployer.add_account(&account).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CannotCreateAccount);

        let err = deployer.deploy(&request()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CannotCreateAccount);
        assert!(keystore_dir.is_file());
    }

    #[tokio::test]
    async fn empty_scaffold_cannot_create_project() {
        let fixture = Fixture::new();
        let seen = fixture.project_dir.clone();

        let mut toolchain = MockToolchain::new();
        toolchain.expect_init_project().times(1).returning(move |dir| {
            *seen.lock().unwrap() = Some(dir.to_owned());
            Ok(())
        });

        let err = fixture.deployer(toolchain).deploy(&request()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::CannotCreateNewProject);
        assert!(err.to_string().contains("scaffold"));
        fixture.assert_project_removed();
    }

    #[tokio::test]
    async fn invalid_contract_name_fails_before_any_work() {
        let keystore_dir = tempfile::tempdir().unwrap();

        // No expectations, any toolchain call panics
        let deployer =
            BrownieDeployer::new(MockToolchain::new(), keystore_dir.path());

        let mut request = request();
        request.contract_name = "MainToken; import os".to_string();

        let err = deployer.deploy(&request).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::CannotDeployContract);
        assert_eq!(std::fs::read_dir(keystore_dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn brownie_runs_against_the_requested_network() {
        use std::os::unix::fs::PermissionsExt;

        use crate::brownie_utils::Brownie;

        let fixture = Fixture::new();
        let bin_dir = tempfile::tempdir().unwrap();
        let argv_log = bin_dir.path().join("argv");

        let bin = bin_dir.path().join("brownie");
        std::fs::write(
            &bin,
            format!(
                "#!/bin/sh\n\
                 case \"$1\" in\n\
                 init) mkdir -p \"$3/contracts\" \"$3/scripts\" ;;\n\
                 run) echo \"$*\" > '{}'; echo '{DEPLOYED}' > {RESULT_FILE} ;;\n\
                 esac\n",
                argv_log.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755))
            .unwrap();

        let deployer = BrownieDeployer::new(
            Brownie::new(&bin),
            fixture.keystore_dir.path(),
        );

        let deployment = deployer.deploy(&request()).await.unwrap();

        assert_eq!(
            deployment.address,
            Address::from(hex!("5FbDB2315678afecb367f032d93F642f64180aa3"))
        );

        let argv = std::fs::read_to_string(&argv_log).unwrap();
        assert!(argv.starts_with("run "), "{argv}");
        assert!(
            argv.trim_end().ends_with("scripts/main.py main --network ropsten"),
            "{argv}"
        );
    }
}
