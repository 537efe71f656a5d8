use std::path::PathBuf;
use std::time::Duration;

use eyre::Context;
use tracing::info;

use super::{BrownieDeployer, DeployRequest};
use crate::brownie_utils::accounts::default_keystore_dir;
use crate::brownie_utils::{AccountStatus, Brownie, ConstructorArg};
use crate::cli::{AccountArgs, DeployArgs};
use crate::config::ProjectConfig;
use crate::interactive::resolve_account;
use crate::report::Report;

fn keystore_dir(args: &AccountArgs) -> eyre::Result<PathBuf> {
    match args.keystore_dir.as_ref() {
        Some(dir) => Ok(dir.clone()),
        None => default_keystore_dir(),
    }
}

fn constructor_args(args: &DeployArgs) -> eyre::Result<Vec<ConstructorArg>> {
    if let Some(json) = args.constructor_args_json.as_deref() {
        return ConstructorArg::parse_json_list(json)
            .context("Parsing --constructor-args-json");
    }

    Ok(args
        .constructor_args
        .iter()
        .map(ConstructorArg::raw)
        .collect())
}

pub async fn build_request(args: &DeployArgs) -> eyre::Result<DeployRequest> {
    let contract_code = tokio::fs::read_to_string(&args.contract)
        .await
        .with_context(|| format!("Reading {}", args.contract.display()))?;

    let account = resolve_account(&args.account)?;

    let mut request = DeployRequest::new(
        contract_code,
        &args.network,
        account,
        &args.contract_name,
        &args.etherscan_api_token,
    )
    .with_constructor_args(constructor_args(args)?)
    .with_publish_source(!args.no_publish_source);

    if let Some(provider) = args.provider.as_ref() {
        request = request.with_provider(provider);
    }

    if let Some(provider_id) = args.provider_id.as_ref() {
        request = request.with_provider_id(provider_id);
    }

    if let Some(config) = args.config.as_ref() {
        request = request.with_config(ProjectConfig::load(config).await?);
    }

    Ok(request)
}

pub async fn run_deploy(args: DeployArgs) -> eyre::Result<()> {
    let request = build_request(&args).await?;

    let toolchain = Brownie::new(&args.brownie_bin)
        .with_timeout(args.timeout_secs.map(Duration::from_secs));

    let deployer = BrownieDeployer::new(toolchain, keystore_dir(&args.account)?);

    let deployment = deployer.deploy(&request).await?;

    if let Some(report_path) = args.report.as_ref() {
        Report::new(&request.network, &request.contract_name, deployment)
            .write(report_path)
            .await?;

        info!("Report written to {}", report_path.display());
    }

    println!("{deployment}");

    Ok(())
}

pub async fn run_add_account(args: AccountArgs) -> eyre::Result<()> {
    let account = resolve_account(&args)?;

    let deployer = BrownieDeployer::new(Brownie::default(), keystore_dir(&args)?);

    match deployer.add_account(&account).await? {
        AccountStatus::Created(address) => {
            println!("Added {address:?} as '{}'", account.name);
        }
        AccountStatus::AlreadyExists => {
            println!("Account '{}' already exists", account.name);
        }
    }

    Ok(())
}
