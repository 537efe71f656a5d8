use std::path::Path;

use crate::brownie_utils::{ConstructorArg, ScriptEnv};
use crate::cli::PrivateKey;
use crate::config::ProjectConfig;
use crate::deployment::script::DeployScript;
use crate::error::DeployError;

/// Variable the toolchain reads the verification API token from.
pub const ETHERSCAN_TOKEN_VAR: &str = "ETHERSCAN_TOKEN";

#[derive(Debug, Clone)]
pub struct Account {
    pub name: String,
    pub password: String,
    pub private_key: PrivateKey,
}

impl Account {
    pub fn new(
        name: impl ToString,
        password: impl ToString,
        private_key: PrivateKey,
    ) -> Self {
        Self {
            name: name.to_string(),
            password: password.to_string(),
            private_key,
        }
    }
}

/// Everything a single deploy needs.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub contract_code: String,
    pub network: String,
    pub account: Account,
    pub contract_name: String,
    pub etherscan_api_token: String,
    pub provider: Option<String>,
    pub provider_id: Option<String>,
    pub constructor_args: Vec<ConstructorArg>,
    pub config: Option<ProjectConfig>,
    pub publish_source: bool,
}

impl DeployRequest {
    pub fn new(
        contract_code: impl ToString,
        network: impl ToString,
        account: Account,
        contract_name: impl ToString,
        etherscan_api_token: impl ToString,
    ) -> Self {
        Self {
            contract_code: contract_code.to_string(),
            network: network.to_string(),
            account,
            contract_name: contract_name.to_string(),
            etherscan_api_token: etherscan_api_token.to_string(),
            provider: None,
            provider_id: None,
            constructor_args: vec![],
            config: None,
            publish_source: true,
        }
    }

    pub fn with_provider(mut self, provider: impl ToString) -> Self {
        self.provider = Some(provider.to_string());
        self
    }

    pub fn with_provider_id(mut self, provider_id: impl ToString) -> Self {
        self.provider_id = Some(provider_id.to_string());
        self
    }

    pub fn with_constructor_arg(mut self, arg: ConstructorArg) -> Self {
        self.constructor_args.push(arg);
        self
    }

    pub fn with_constructor_args(
        mut self,
        args: impl IntoIterator<Item = ConstructorArg>,
    ) -> Self {
        self.constructor_args.extend(args);
        self
    }

    pub fn with_config(mut self, config: ProjectConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_publish_source(mut self, publish_source: bool) -> Self {
        self.publish_source = publish_source;
        self
    }

    /// The contract name is spliced into the script as a Python name, so it
    /// must be a plain identifier.
    pub fn validate(&self) -> Result<(), DeployError> {
        if !is_identifier(&self.contract_name) {
            return Err(DeployError::cannot_deploy(eyre::eyre!(
                "Contract name {:?} is not a valid identifier",
                self.contract_name
            )));
        }

        Ok(())
    }

    /// Environment for the toolchain run: the provider credential, when a
    /// provider is named, and the verification token.
    ///
    /// An empty provider counts as no provider, an empty id as a missing one.
    pub fn script_env(&self) -> Result<ScriptEnv, DeployError> {
        let mut env = ScriptEnv::new();

        let provider = self.provider.as_deref().filter(|p| !p.is_empty());
        let provider_id = self.provider_id.as_deref().filter(|p| !p.is_empty());

        match (provider, provider_id) {
            (Some(provider), Some(provider_id)) => {
                env.insert(provider.to_string(), provider_id.to_string());
            }
            (Some(provider), None) => {
                return Err(DeployError::HaveProviderButNotProviderId {
                    provider: provider.to_string(),
                });
            }
            (None, _) => {}
        }

        env.insert(
            ETHERSCAN_TOKEN_VAR.to_string(),
            self.etherscan_api_token.clone(),
        );

        Ok(env)
    }

    pub fn script(&self, result_path: impl AsRef<Path>) -> DeployScript {
        DeployScript::new(&self.contract_name, &self.network, result_path)
            .with_account(&self.account.name, &self.account.password)
            .with_constructor_args(self.constructor_args.iter().cloned())
            .with_publish_source(self.publish_source)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
