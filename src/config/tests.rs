use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_quizdoc_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("QUIZDOC_PORT");
        env::remove_var("QUIZDOC_BIND_ADDR");
        env::remove_var("QUIZDOC_CORPUS_URL");
        env::remove_var("QUIZDOC_SHARD_GAP_LIMIT");
        env::remove_var("QUIZDOC_SHARD_CAP");
        env::remove_var("QUIZDOC_CONTEXT_CHUNKS");
        env::remove_var("QUIZDOC_MODEL");
        env::remove_var("QUIZDOC_API_URL");
        env::remove_var("QUIZDOC_REQUEST_TIMEOUT_SECS");
        env::remove_var("QUIZDOC_HTTP_TIMEOUT_SECS");
        env::remove_var("ANTHROPIC_API_KEY");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert!(config.corpus_url.ends_with("processed-v3/"));
    assert_eq!(config.shard_gap_limit, 2);
    assert_eq!(config.shard_cap, 50);
    assert_eq!(config.context_chunks, 30);
    assert_eq!(config.model, "claude-3-haiku-20240307");
    assert!(config.api_key.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V6(std::net::Ipv6Addr::LOCALHOST),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "[::1]:3000");
}

#[test]
fn test_debug_redacts_api_key() {
    let config = Config {
        api_key: Some("sk-secret-value".to_string()),
        ..Default::default()
    };

    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("sk-secret-value"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn test_normalize_base_url() {
    assert_eq!(normalize_base_url("http://host/data"), "http://host/data/");
    assert_eq!(normalize_base_url("http://host/data///"), "http://host/data/");
    assert_eq!(normalize_base_url(" http://host/ "), "http://host/");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_quizdoc_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(config.shard_gap_limit, 2);
    assert!(!config.has_api_key());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_quizdoc_env();

    with_env_vars(
        &[
            ("QUIZDOC_PORT", "3000"),
            ("QUIZDOC_CORPUS_URL", "http://127.0.0.1:9000/corpus"),
            ("QUIZDOC_SHARD_GAP_LIMIT", "3"),
            ("QUIZDOC_SHARD_CAP", "10"),
            ("QUIZDOC_CONTEXT_CHUNKS", "5"),
            ("QUIZDOC_API_URL", "http://127.0.0.1:9001/"),
            ("QUIZDOC_REQUEST_TIMEOUT_SECS", "7"),
            ("ANTHROPIC_API_KEY", "  key-123  "),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.port, 3000);
            assert_eq!(config.corpus_url, "http://127.0.0.1:9000/corpus/");
            assert_eq!(config.shard_gap_limit, 3);
            assert_eq!(config.shard_cap, 10);
            assert_eq!(config.context_chunks, 5);
            assert_eq!(config.api_url, "http://127.0.0.1:9001");
            assert_eq!(config.request_timeout, Duration::from_secs(7));
            assert_eq!(config.api_key.as_deref(), Some("key-123"));
        },
    );
}

#[test]
#[serial]
fn test_from_env_blank_api_key_is_absent() {
    clear_quizdoc_env();

    with_env_vars(&[("ANTHROPIC_API_KEY", "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(!config.has_api_key());
    });
}

#[test]
#[serial]
fn test_from_env_port_zero_rejected() {
    clear_quizdoc_env();

    with_env_vars(&[("QUIZDOC_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_invalid_port() {
    clear_quizdoc_env();

    with_env_vars(&[("QUIZDOC_PORT", "not-a-port")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_invalid_number() {
    clear_quizdoc_env();

    with_env_vars(&[("QUIZDOC_SHARD_CAP", "many")], || {
        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidNumber { name, value, .. } => {
                assert_eq!(name, "QUIZDOC_SHARD_CAP");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other}"),
        }
    });
}

#[test]
fn test_validate_rejects_zero_limits() {
    let config = Config {
        shard_gap_limit: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroLimit {
            name: "QUIZDOC_SHARD_GAP_LIMIT"
        })
    ));

    let config = Config {
        context_chunks: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroLimit { .. })
    ));
}

#[test]
fn test_validate_rejects_bad_url() {
    let config = Config {
        corpus_url: "not a url/".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidUrl { .. })
    ));
}
