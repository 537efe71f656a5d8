use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::deployment::outcome::TransactionReceipt;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    HaveProviderButNotProviderId,
    CannotCreateNewProject,
    CannotDeployContract,
    ContractSelfDestructedGotTransactionReceipt,
    ContractNotDeployedTransactionNotReceived,
    CannotCreateAccount,
}

/// Failure of a deploy or account registration.
///
/// Every variant maps to exactly one [`ErrorCode`] and carries whatever
/// auxiliary data explains it: the wrapped toolchain fault, the provider
/// name or the receipt the deploy call produced instead of a contract.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("DeployError(HAVE_PROVIDER_BUT_NOT_PROVIDER_ID)[provider={provider}]")]
    HaveProviderButNotProviderId { provider: String },

    #[error("DeployError(CANNOT_CREATE_NEW_PROJECT)[exception={source}]")]
    CannotCreateNewProject { source: BoxError },

    #[error("DeployError(CANNOT_DEPLOY_CONTRACT)[exception={source}]")]
    CannotDeployContract { source: BoxError },

    #[error(
        "DeployError(CONTRACT_SELF_DESTRUCTED_GOT_TRANSACTION_RECEIPT)[transaction={transaction}]"
    )]
    ContractSelfDestructedGotTransactionReceipt {
        transaction: TransactionReceipt,
    },

    #[error("DeployError(CONTRACT_NOT_DEPLOYED_TRANSACTION_NOT_RECEIVED)[]")]
    ContractNotDeployedTransactionNotReceived,

    #[error("DeployError(CANNOT_CREATE_ACCOUNT)[exception={source}]")]
    CannotCreateAccount { source: BoxError },
}

impl DeployError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::HaveProviderButNotProviderId { .. } => {
                ErrorCode::HaveProviderButNotProviderId
            }
            Self::CannotCreateNewProject { .. } => {
                ErrorCode::CannotCreateNewProject
            }
            Self::CannotDeployContract { .. } => ErrorCode::CannotDeployContract,
            Self::ContractSelfDestructedGotTransactionReceipt { .. } => {
                ErrorCode::ContractSelfDestructedGotTransactionReceipt
            }
            Self::ContractNotDeployedTransactionNotReceived => {
                ErrorCode::ContractNotDeployedTransactionNotReceived
            }
            Self::CannotCreateAccount { .. } => ErrorCode::CannotCreateAccount,
        }
    }

    pub fn cannot_create_project(source: impl Into<BoxError>) -> Self {
        Self::CannotCreateNewProject {
            source: source.into(),
        }
    }

    pub fn cannot_deploy(source: impl Into<BoxError>) -> Self {
        Self::CannotDeployContract {
            source: source.into(),
        }
    }

    pub fn cannot_create_account(source: impl Into<BoxError>) -> Self {
        Self::CannotCreateAccount {
            source: source.into(),
        }
    }

    /// The receipt attached to a self-destructed deploy, if any.
    pub fn transaction(&self) -> Option<&TransactionReceipt> {
        match self {
            Self::ContractSelfDestructedGotTransactionReceipt { transaction } => {
                Some(transaction)
            }
            _ => None,
        }
    }
}
