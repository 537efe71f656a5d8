use std::path::{Path, PathBuf};

use crate::brownie_utils::common::python_str;
use crate::brownie_utils::ConstructorArg;

pub const SCRIPT_FILE: &str = "main.py";
pub const RESULT_FILE: &str = "deploy_result.json";

/// Name of the script variable holding what the deploy call returned.
pub const TOKEN_VARIABLE: &str = "token";

/// Builds the Python script that connects, unlocks the account and deploys.
///
/// The script records its `token` variable in [`RESULT_FILE`], which is how
/// the result gets back to us once the toolchain exits.
#[derive(Debug, Clone)]
pub struct DeployScript {
    contract_name: String,
    network: String,
    account_name: String,
    account_pass: String,
    constructor_args: Vec<ConstructorArg>,
    publish_source: bool,
    result_path: PathBuf,
}

impl DeployScript {
    pub fn new(
        contract_name: impl ToString,
        network: impl ToString,
        result_path: impl AsRef<Path>,
    ) -> Self {
        Self {
            contract_name: contract_name.to_string(),
            network: network.to_string(),
            account_name: String::new(),
            account_pass: String::new(),
            constructor_args: vec![],
            publish_source: true,
            result_path: result_path.as_ref().to_owned(),
        }
    }

    pub fn with_account(
        mut self,
        name: impl ToString,
        password: impl ToString,
    ) -> Self {
        self.account_name = name.to_string();
        self.account_pass = password.to_string();
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

    pub fn with_publish_source(mut self, publish_source: bool) -> Self {
        self.publish_source = publish_source;
        self
    }

    /// Arguments of the `<Contract>.deploy(...)` call.
    pub fn deploy_call_args(&self) -> String {
        let publish_source = if self.publish_source { "True" } else { "False" };
        let tx = format!("{{'from': accounts[0]}}, publish_source={publish_source}");

        if self.constructor_args.is_empty() {
            return tx;
        }

        let args: Vec<_> = self
            .constructor_args
            .iter()
            .map(ConstructorArg::to_python)
            .collect();

        format!("{}, {tx}", args.join(","))
    }

    pub fn render(&self) -> String {
        let contract = &self.contract_name;
        let network = python_str(&self.network);
        let account_name = python_str(&self.account_name);
        let account_pass = python_str(&self.account_pass);
        let result_path = python_str(&self.result_path.to_string_lossy());
        let deploy_args = self.deploy_call_args();

        format!(
            r#"import json

from brownie import {contract}, accounts, network
from brownie.network.contract import ProjectContract
from brownie.network.transaction import TransactionReceipt

RESULT_PATH = {result_path}


def store_result({TOKEN_VARIABLE}):
    if isinstance({TOKEN_VARIABLE}, ProjectContract):
        result = {{"kind": "contract", "address": str({TOKEN_VARIABLE}.address)}}
    elif isinstance({TOKEN_VARIABLE}, TransactionReceipt):
        result = {{
            "kind": "receipt",
            "txid": {TOKEN_VARIABLE}.txid,
            "status": int({TOKEN_VARIABLE}.status),
            "contract_address": {TOKEN_VARIABLE}.contract_address,
            "block_number": {TOKEN_VARIABLE}.block_number,
            "gas_used": {TOKEN_VARIABLE}.gas_used,
        }}
    else:
        return
    with open(RESULT_PATH, "w") as result_file:
        json.dump(result, result_file)


def main():
    if network.is_connected():
        if not network.show_active() == {network}:
            network.disconnect()
            network.connect({network})
    else:
        network.connect({network})
    accounts.load({account_name}, password={account_pass})
    {TOKEN_VARIABLE} = {contract}.deploy({deploy_args})
    store_result({TOKEN_VARIABLE})
"#
        )
    }
}
