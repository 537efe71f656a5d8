pub mod brownie_utils;
pub mod cli;
pub mod config;
pub mod deployment;
pub mod error;
pub mod interactive;
pub mod report;
pub mod serde_utils;

pub use self::brownie_utils::{Brownie, ConstructorArg, Toolchain};
pub use self::config::ProjectConfig;
pub use self::deployment::{Account, BrownieDeployer, DeployRequest};
pub use self::error::{DeployError, ErrorCode};
pub use self::report::contract_deployment::ContractDeployment;
