use super::models::{AuthConfig, Config};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.port must be non-zero")]
    InvalidPort,

    #[error("auth.realm must not be empty")]
    EmptyRealm,

    #[error("auth.users contains an entry with an empty name")]
    EmptyUserName,

    #[error("User '{name}' is configured more than once")]
    DuplicateUser { name: String },

    #[error("User '{name}' needs password_digest or password unless external")]
    MissingSecret { name: String },

    #[error("User '{name}' has a password_digest that is not 32 hex characters")]
    InvalidDigest { name: String },

    #[error("logging.ram_log_lines must be positive")]
    InvalidRamLogLines,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    if config.server.port == 0 {
        return Err(ValidationError::InvalidPort);
    }
    validate_auth(&config.auth)?;
    if config.logging.ram_log_lines == 0 {
        return Err(ValidationError::InvalidRamLogLines);
    }
    Ok(())
}

fn validate_auth(auth: &AuthConfig) -> Result<(), ValidationError> {
    if auth.realm.trim().is_empty() {
        return Err(ValidationError::EmptyRealm);
    }

    let mut seen = HashSet::new();
    for user in &auth.users {
        if user.name.is_empty() {
            return Err(ValidationError::EmptyUserName);
        }

        if !seen.insert(user.name.as_str()) {
            return Err(ValidationError::DuplicateUser {
                name: user.name.clone(),
            });
        }

        if user.external {
            continue;
        }

        match (&user.password_digest, &user.password) {
            (Some(digest), _) => {
                if digest.len() != 32 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(ValidationError::InvalidDigest {
                        name: user.name.clone(),
                    });
                }
            }
            (None, Some(_)) => {}
            (None, None) => {
                return Err(ValidationError::MissingSecret {
                    name: user.name.clone(),
                });
            }
        }
    }

    Ok(())
}
