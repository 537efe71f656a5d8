use std::path::Path;

use serde::{Deserialize, Serialize};

use self::contract_deployment::ContractDeployment;
use crate::serde_utils;

pub mod contract_deployment;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub network: String,
    pub contract_name: String,
    pub deployment: ContractDeployment,
}

impl Report {
    pub fn new(
        network: impl ToString,
        contract_name: impl ToString,
        deployment: ContractDeployment,
    ) -> Self {
        Self {
            network: network.to_string(),
            contract_name: contract_name.to_string(),
            deployment,
        }
    }

    pub async fn write(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        serde_utils::write_yaml(path, self).await
    }
}
