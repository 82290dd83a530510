//! Admin credentials and password hashing

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use redact_config::ServerConfig;

#[derive(Debug, Clone)]
enum Secret {
    /// Argon2 PHC string
    Hash(String),
    Plain(String),
}

/// The single admin account the service accepts
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    secret: Secret,
}

impl Credentials {
    /// A configured hash takes precedence over the plaintext password
    pub fn from_config(config: &ServerConfig) -> Self {
        let secret = if config.admin_password_hash.trim().is_empty() {
            Secret::Plain(config.admin_password.clone())
        } else {
            Secret::Hash(config.admin_password_hash.trim().to_string())
        };
        Self {
            username: config.admin_username.clone(),
            secret,
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }
        match &self.secret {
            Secret::Plain(expected) => !expected.is_empty() && password == expected,
            Secret::Hash(hash) => match PasswordHash::new(hash) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(e) => {
                    tracing::error!("Invalid admin_password_hash: {}", e);
                    false
                }
            },
        }
    }
}

/// Hash a password for `server.admin_password_hash`
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_password() {
        let creds = Credentials::from_config(&ServerConfig::default());
        assert!(creds.verify("admin", "change-me"));
        assert!(!creds.verify("admin", "wrong"));
        assert!(!creds.verify("root", "change-me"));
    }

    #[test]
    fn test_hash_takes_precedence() {
        let config = ServerConfig {
            admin_password_hash: hash_password("s3cret").unwrap(),
            ..ServerConfig::default()
        };
        let creds = Credentials::from_config(&config);
        assert!(creds.verify("admin", "s3cret"));
        assert!(!creds.verify("admin", "change-me"));
    }

    #[test]
    fn test_empty_plain_password_never_matches() {
        let config = ServerConfig {
            admin_password: String::new(),
            ..ServerConfig::default()
        };
        assert!(!Credentials::from_config(&config).verify("admin", ""));
    }
}
