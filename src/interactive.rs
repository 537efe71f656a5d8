use self::utils::prompt_secret_handle_errors;
use crate::cli::{AccountArgs, PrivateKey};
use crate::deployment::Account;

mod utils;

/// Builds the account from the arguments, prompting for whatever secret was
/// not passed on the command line or through the environment.
pub fn resolve_account(args: &AccountArgs) -> eyre::Result<Account> {
    let password = if let Some(password) = args.account_pass.as_ref() {
        password.clone()
    } else {
        inquire::Password::new(&format!(
            "Password for account '{}':",
            args.account_name
        ))
        .without_confirmation()
        .prompt()?
    };

    let private_key = if let Some(private_key) = args.private_key.as_ref() {
        println!(
            "Using account {:?} as '{}'",
            private_key.address(),
            args.account_name
        );
        private_key.clone()
    } else {
        prompt_secret_handle_errors::<PrivateKey>("Private key:")?
    };

    Ok(Account::new(&args.account_name, password, private_key))
}
