//! Credential loading at the shell boundary.

use anyhow::{Context, Result};

/// Environment variable holding the wywrota.pl username.
const USERNAME_VAR: &str = "WYWROTA_USERNAME";

/// Environment variable holding the wywrota.pl password.
const PASSWORD_VAR: &str = "WYWROTA_PASSWORD";

/// Account credentials, read once and handed to the login request.
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Read credentials from the environment. A `.env` file loaded at
    /// startup counts; a missing variable is an error naming it.
    pub fn from_env() -> Result<Self> {
        let username = std::env::var(USERNAME_VAR)
            .with_context(|| format!("{USERNAME_VAR} is not set"))?;
        let password = std::env::var(PASSWORD_VAR)
            .with_context(|| format!("{PASSWORD_VAR} is not set"))?;
        Ok(Self { username, password })
    }
}
