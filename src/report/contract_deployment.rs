use std::fmt;

use ethers::types::Address;
use ethers::utils::to_checksum;
use serde::{Deserialize, Serialize};

/// A live contract produced by a deploy.
#[derive(
    Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, derive_more::From,
)]
pub struct ContractDeployment {
    pub address: Address,
}

/// The checksummed address, the same text the toolchain prints.
impl fmt::Display for ContractDeployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_checksum(&self.address, None))
    }
}
