use super::*;

#[test]
fn empty_document_uses_defaults() {
    let config = FragmentsConfig::from_toml("").unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.max_body_bytes, 5_242_880);
    assert_eq!(config.server.resolved_api_url(), "http://127.0.0.1:8080");
    assert_eq!(config.store.backend, "memory");
    assert!(config.auth.users.is_empty());
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn full_document() {
    let toml = r#"
        [server]
        host = "0.0.0.0"
        port = 9000
        api_url = "https://fragments.example.com/"
        max_body_bytes = 1024

        [store]
        backend = "fs"
        path = "/var/lib/fragments"

        [[auth.users]]
        email = "user1@email.com"
        password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"

        [logging]
        format = "json"
    "#;

    let config = FragmentsConfig::from_toml(toml).unwrap();
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.max_body_bytes, 1024);
    assert_eq!(
        config.server.resolved_api_url(),
        "https://fragments.example.com"
    );
    assert_eq!(config.store.backend, "fs");
    assert_eq!(
        config.store.path.as_deref(),
        Some(std::path::Path::new("/var/lib/fragments"))
    );
    assert_eq!(config.auth.users.len(), 1);
    assert_eq!(config.auth.users[0].email, "user1@email.com");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn aws_store_section() {
    let toml = r#"
        backend = "aws"
        region = "ca-central-1"
        endpoint_url = "http://localhost:4566"
        table_name = "fragments"
        bucket = "fragments-data"
        prefix = "prod/"
    "#;
    let config: StoreConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.backend, "aws");
    assert_eq!(config.region.as_deref(), Some("ca-central-1"));
    assert_eq!(config.bucket.as_deref(), Some("fragments-data"));
    assert_eq!(config.prefix.as_deref(), Some("prod/"));
}

#[test]
fn unknown_log_format_is_rejected() {
    let err = FragmentsConfig::from_toml("[logging]\nformat = \"xml\"").unwrap_err();
    assert!(matches!(err, ServerError::Config(_)));
}

#[test]
fn missing_file_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = FragmentsConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.server.port, 8080);
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fragments.toml");
    std::fs::write(&path, "[server]\nport = 1234\n").unwrap();
    let config = FragmentsConfig::load(&path).unwrap();
    assert_eq!(config.server.port, 1234);
}
