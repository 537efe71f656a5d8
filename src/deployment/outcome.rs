use std::fmt;
use std::path::Path;

use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

use crate::error::DeployError;
use crate::report::contract_deployment::ContractDeployment;
use crate::serde_utils;

/// What the deploy script found in its `token` variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeployOutcome {
    Contract { address: Address },
    Receipt(TransactionReceipt),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub txid: H256,
    pub status: i64,
    #[serde(default)]
    pub contract_address: Option<Address>,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub gas_used: Option<u64>,
}

impl fmt::Display for TransactionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (status {})", self.txid, self.status)?;

        if let Some(block_number) = self.block_number {
            write!(f, " in block {block_number}")?;
        }

        Ok(())
    }
}

/// Reads the result file. A script that produced nothing leaves no file.
pub async fn read_outcome(
    path: impl AsRef<Path>,
) -> eyre::Result<Option<DeployOutcome>> {
    serde_utils::read_json_if_exists(path).await
}

pub fn resolve_outcome(
    outcome: Option<DeployOutcome>,
) -> Result<ContractDeployment, DeployError> {
    match outcome {
        Some(DeployOutcome::Contract { address }) => {
            Ok(ContractDeployment { address })
        }
        Some(DeployOutcome::Receipt(transaction)) => {
            Err(DeployError::ContractSelfDestructedGotTransactionReceipt {
                transaction,
            })
        }
        None => Err(DeployError::ContractNotDeployedTransactionNotReceived),
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn parses_contract() {
        let outcome: DeployOutcome = serde_json::from_str(
            r#"{"kind": "contract", "address": "0x5FbDB2315678afecb367f032d93F642f64180aa3"}"#,
        )
        .unwrap();

        assert_eq!(
            outcome,
            DeployOutcome::Contract {
                address: Address::from(hex!(
                    "5FbDB2315678afecb367f032d93F642f64180aa3"
                )),
            }
        );
    }

    #[test]
    fn parses_receipt_with_missing_fields() {
        let outcome: DeployOutcome = serde_json::from_str(
            r#"{
                "kind": "receipt",
                "txid": "0x0000000000000000000000000000000000000000000000000000000000000001",
                "status": 1,
                "contract_address": null
            }"#,
        )
        .unwrap();

        let DeployOutcome::Receipt(receipt) = outcome else {
            panic!("Expected a receipt, got {outcome:?}");
        };

        assert_eq!(receipt.txid, H256::from_low_u64_be(1));
        assert_eq!(receipt.status, 1);
        assert_eq!(receipt.contract_address, None);
        assert_eq!(receipt.gas_used, None);
    }

    #[test]
    fn receipt_becomes_self_destructed_error() {
        let transaction = TransactionReceipt {
            txid: H256::from_low_u64_be(7),
            status: 1,
            contract_address: None,
            block_number: Some(12),
            gas_used: Some(21000),
        };

        let err = resolve_outcome(Some(DeployOutcome::Receipt(
            transaction.clone(),
        )))
        .unwrap_err();

        assert_eq!(
            err.code(),
            ErrorCode::ContractSelfDestructedGotTransactionReceipt
        );
        assert_eq!(err.transaction(), Some(&transaction));
    }

    #[test]
    fn nothing_means_not_deployed() {
        let err = resolve_outcome(None).unwrap_err();

        assert_eq!(
            err.code(),
            ErrorCode::ContractNotDeployedTransactionNotReceived
        );
    }

    #[tokio::test]
    async fn missing_result_file_is_no_outcome() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;

        let outcome = read_outcome(dir.path().join("deploy_result.json")).await?;

        assert_eq!(outcome, None);

        Ok(())
    }

    #[tokio::test]
    async fn malformed_result_file_is_an_error() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("deploy_result.json");
        tokio::fs::write(&path, "{\"kind\": \"banana\"}").await?;

        assert!(read_outcome(&path).await.is_err());

        Ok(())
    }
}
