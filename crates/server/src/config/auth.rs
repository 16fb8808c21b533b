use serde::Deserialize;

/// HTTP Basic authentication users.
///
/// With no users configured, authentication is disabled and every request
/// runs as the anonymous owner.
#[derive(Debug, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

/// A single user allowed to authenticate.
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    /// Login name; the owner id is derived from it.
    pub email: String,
    /// Argon2 PHC hash string (`$argon2id$...`).
    pub password_hash: String,
}
