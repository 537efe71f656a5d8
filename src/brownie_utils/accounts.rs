use std::path::{Path, PathBuf};

use ethers::core::rand::thread_rng;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use eyre::{Context, ContextCompat};
use tracing::{info, instrument};

use crate::cli::PrivateKey;

pub const BROWNIE_DATA_DIR: &str = ".brownie";
pub const ACCOUNTS_DIR: &str = "accounts";

/// `~/.brownie/accounts`, where the toolchain looks up named accounts.
pub fn default_keystore_dir() -> eyre::Result<PathBuf> {
    let home = dirs::home_dir().context("Missing home directory")?;

    Ok(home.join(BROWNIE_DATA_DIR).join(ACCOUNTS_DIR))
}

pub fn keystore_file(keystore_dir: impl AsRef<Path>, name: &str) -> PathBuf {
    keystore_dir.as_ref().join(format!("{name}.json"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Created(Address),
    AlreadyExists,
}

/// Stores a private key as an encrypted keystore under a name the deploy
/// script can `accounts.load`.
#[derive(Debug)]
pub struct AccountAdd {
    keystore_dir: PathBuf,
    name: String,
    password: String,
    private_key: PrivateKey,
}

impl AccountAdd {
    pub fn new(
        keystore_dir: impl AsRef<Path>,
        name: impl ToString,
        password: impl ToString,
        private_key: PrivateKey,
    ) -> Self {
        Self {
            keystore_dir: keystore_dir.as_ref().to_owned(),
            name: name.to_string(),
            password: password.to_string(),
            private_key,
        }
    }

    #[instrument(name = "account_add", skip_all, fields(name = %self.name))]
    pub async fn run(&self) -> eyre::Result<AccountStatus> {
        let file = keystore_file(&self.keystore_dir, &self.name);

        if tokio::fs::try_exists(&file).await? {
            info!("Account already exists at {}", file.display());
            return Ok(AccountStatus::AlreadyExists);
        }

        tokio::fs::create_dir_all(&self.keystore_dir)
            .await
            .with_context(|| {
                format!("Creating {}", self.keystore_dir.display())
            })?;

        let keystore_dir = self.keystore_dir.clone();
        let file_name = format!("{}.json", self.name);
        let password = self.password.clone();
        let key = self.private_key.to_bytes();

        // scrypt key derivation blocks
        let wallet = tokio::task::spawn_blocking(move || {
            LocalWallet::encrypt_keystore(
                &keystore_dir,
                &mut thread_rng(),
                key,
                password,
                Some(file_name.as_str()),
            )
        })
        .await?
        .context("Encrypting keystore")?
        .0;

        let address = wallet.address();

        info!("Stored account {address:?} at {}", file.display());

        Ok(AccountStatus::Created(address))
    }
}
