//! Admin credential helpers.
//!
//! The API reads its admin credentials from the environment:
//!
//! - `API_ADMIN_PASSWORD_HASH` - Argon2id PHC string for password login
//! - `API_ADMIN_TOKEN` - optional shared bearer token for scripts
//!
//! These commands generate values for both.

use std::io::BufRead;

use secrecy::ExposeSecret;

use granite_world_api::services::auth::{generate_token, hash_password};

use super::CliError;

/// Shortest password accepted for hashing.
const MIN_PASSWORD_LEN: usize = 12;

/// Hash `password` (or one line read from stdin) for `API_ADMIN_PASSWORD_HASH`.
///
/// # Errors
///
/// Returns `CliError::Input` for a short password or unreadable stdin.
pub fn hash(password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None => read_password_line()?,
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CliError::Input(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let hash = hash_password(&password).map_err(|e| CliError::Input(e.to_string()))?;

    #[allow(clippy::print_stdout)]
    {
        println!("API_ADMIN_PASSWORD_HASH='{}'", hash.expose_secret());
    }
    Ok(())
}

/// Print a fresh random value for `API_ADMIN_TOKEN`.
pub fn token() {
    #[allow(clippy::print_stdout)]
    {
        println!("API_ADMIN_TOKEN={}", generate_token());
    }
}

fn read_password_line() -> Result<String, CliError> {
    tracing::info!("Reading password from stdin");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CliError::Input(format!("Failed to read password: {e}")))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
