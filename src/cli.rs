use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod private_key;

pub use private_key::PrivateKey;

#[derive(Debug, Clone, Parser)]
#[clap(name = "brownie-deployer", version, about)]
pub struct Args {
    #[clap(subcommand)]
    pub cmd: Cmd,
}

#[derive(Debug, Clone, Subcommand)]
#[clap(rename_all = "kebab-case")]
pub enum Cmd {
    /// Compile and deploy a contract
    Deploy(DeployArgs),

    /// Store a private key under an account name
    AddAccount(AccountArgs),
}

#[derive(Debug, Clone, clap::Args)]
#[clap(rename_all = "kebab-case")]
pub struct AccountArgs {
    /// Name the account is stored and loaded under
    #[clap(short, long, env)]
    pub account_name: String,

    /// Keystore password, prompted for when missing
    #[clap(long, env)]
    pub account_pass: Option<String>,

    /// Private key of the account, prompted for when missing
    #[clap(short, long, env)]
    pub private_key: Option<PrivateKey>,

    /// Where account keystores live, defaults to ~/.brownie/accounts
    #[clap(long, env)]
    pub keystore_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
#[clap(rename_all = "kebab-case")]
pub struct DeployArgs {
    #[clap(flatten)]
    pub account: AccountArgs,

    /// Path to the contract source
    #[clap(short, long, env)]
    pub contract: PathBuf,

    /// Name of the contract to deploy from the source
    #[clap(long, env)]
    pub contract_name: String,

    /// Network to deploy to, e.g. 'mainnet' or 'ropsten'
    #[clap(short, long, env)]
    pub network: String,

    /// The etherscan API token used to publish the source
    #[clap(short, long, env)]
    pub etherscan_api_token: String,

    /// Name of the variable the provider credential is passed in,
    /// e.g. 'WEB3_INFURA_PROJECT_ID'
    #[clap(long, env)]
    pub provider: Option<String>,

    /// The provider credential
    #[clap(long, env)]
    pub provider_id: Option<String>,

    /// Constructor argument as a Python literal, repeat in order
    #[clap(
        long = "constructor-arg",
        allow_hyphen_values = true,
        conflicts_with = "constructor_args_json"
    )]
    pub constructor_args: Vec<String>,

    /// Constructor arguments as a JSON array
    #[clap(long, env)]
    pub constructor_args_json: Option<String>,

    /// Path to a project configuration file (YAML)
    #[clap(long, env)]
    pub config: Option<PathBuf>,

    /// Skip publishing the source for verification
    #[clap(long)]
    pub no_publish_source: bool,

    /// The brownie executable
    #[clap(long, env, default_value = "brownie")]
    pub brownie_bin: PathBuf,

    /// Give up on the deploy script after this many seconds
    #[clap(long, env)]
    pub timeout_secs: Option<u64>,

    /// Write a deployment report (YAML) to this path
    #[clap(long, env)]
    pub report: Option<PathBuf>,
}
