use serde::Deserialize;

/// HTTP server bind configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// External base URL used for `Location` headers
    /// (e.g. `https://fragments.example.com`).
    ///
    /// If not set, defaults to `http://{host}:{port}`.
    pub api_url: Option<String>,
    /// Largest accepted request body.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_url: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// The configured `api_url`, or one derived from the bind address.
    pub fn resolved_api_url(&self) -> String {
        self.api_url
            .as_deref()
            .map_or_else(
                || format!("http://{}:{}", self.host, self.port),
                |url| url.trim_end_matches('/').to_owned(),
            )
    }
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    5 * 1024 * 1024
}
