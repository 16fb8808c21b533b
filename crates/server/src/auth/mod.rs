//! HTTP Basic authentication against argon2 password hashes.

pub mod middleware;
pub mod password;

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use tracing::info;

use fragments_core::OwnerId;

use crate::config::AuthConfig;

use self::password::verify_password;

/// Owner id used for every request when authentication is disabled.
pub const ANONYMOUS_OWNER: &str = "anonymous";

/// The authenticated caller, inserted into request extensions by
/// [`middleware::AuthLayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub owner_id: OwnerId,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self {
            owner_id: OwnerId::new(ANONYMOUS_OWNER),
        }
    }
}

/// Derive the owner id for a login: lowercase hex SHA-256 of the email.
pub fn owner_id_for(email: &str) -> OwnerId {
    OwnerId::new(hex::encode(Sha256::digest(email.as_bytes())))
}

/// Verifies `Authorization: Basic` credentials against the configured users.
#[derive(Debug)]
pub struct BasicAuthProvider {
    /// Email to argon2 PHC hash.
    users: HashMap<String, String>,
}

impl BasicAuthProvider {
    /// Build a provider, or `None` when no users are configured.
    pub fn from_config(config: &AuthConfig) -> Option<Self> {
        if config.users.is_empty() {
            return None;
        }
        let users: HashMap<_, _> = config
            .users
            .iter()
            .map(|u| (u.email.clone(), u.password_hash.clone()))
            .collect();
        info!(users = users.len(), "basic auth enabled");
        Some(Self { users })
    }

    /// Check an `Authorization` header value.
    ///
    /// Argon2 verification is CPU heavy; call from a blocking task.
    pub fn authenticate(&self, header: &str) -> Result<Caller, String> {
        let (scheme, encoded) = header
            .split_once(' ')
            .ok_or_else(|| "malformed authorization header".to_owned())?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(format!("unsupported authorization scheme '{scheme}'"));
        }

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| "invalid basic credentials encoding".to_owned())?;
        let decoded =
            String::from_utf8(decoded).map_err(|_| "credentials are not UTF-8".to_owned())?;
        let (email, password) = decoded
            .split_once(':')
            .ok_or_else(|| "malformed basic credentials".to_owned())?;

        match self.users.get(email) {
            Some(hash) if verify_password(hash, password) => Ok(Caller {
                owner_id: owner_id_for(email),
            }),
            _ => Err("invalid email or password".to_owned()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use argon2::password_hash::{PasswordHasher, SaltString};
    use argon2::{Algorithm, Argon2, Params, Version};

    use super::*;
    use crate::config::UserConfig;

    /// Cheap parameters; verification reads them back from the PHC string.
    pub(crate) fn hash(password: &str) -> String {
        let salt = SaltString::from_b64("YWJjZGVmZ2hpamtsbW5vcA").unwrap();
        let params = Params::new(1024, 1, 1, None).unwrap();
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    pub(crate) fn basic(email: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
    }

    fn provider() -> BasicAuthProvider {
        BasicAuthProvider::from_config(&AuthConfig {
            users: vec![UserConfig {
                email: "user1@email.com".into(),
                password_hash: hash("password1"),
            }],
        })
        .unwrap()
    }

    #[test]
    fn owner_id_is_sha256_hex() {
        assert_eq!(
            owner_id_for("user1@email.com").as_str(),
            "11d4c22e42c8f61feaba154683dea407b101cfd90987dda9e342843263ca420a"
        );
    }

    #[test]
    fn no_users_disables_auth() {
        assert!(BasicAuthProvider::from_config(&AuthConfig::default()).is_none());
    }

    #[test]
    fn valid_credentials() {
        let caller = provider()
            .authenticate(&basic("user1@email.com", "password1"))
            .unwrap();
        assert_eq!(caller.owner_id, owner_id_for("user1@email.com"));
    }

    #[test]
    fn invalid_credentials() {
        let provider = provider();
        for header in [
            basic("user1@email.com", "wrong"),
            basic("someone@else.com", "password1"),
            "Bearer abc".to_owned(),
            "Basic !!!".to_owned(),
            "Basic".to_owned(),
            format!("Basic {}", STANDARD.encode("no-colon")),
        ] {
            assert!(provider.authenticate(&header).is_err(), "{header}");
        }
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let header = basic("user1@email.com", "password1").replacen("Basic", "basic", 1);
        assert!(provider().authenticate(&header).is_ok());
    }
}
