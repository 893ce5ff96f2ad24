use std::env;
use std::sync::{Mutex, OnceLock};

use caja_cli::commands::{config, doctor};
use serde_json::Value;

#[test]
fn config_reports_defaults_with_sources() {
    with_env(&[], || {
        let output = config::run();
        assert!(output.contains("- backend.base_url = http://localhost:8000 (source: default)"));
        assert!(output.contains("- search.page_size = 100 (source: default)"));
        assert!(output.contains("- search.debounce_ms = 500 (source: default)"));
        assert!(output.contains("- backend.token = <empty> (source: default)"));
    });
}

#[test]
fn config_attributes_env_overrides_and_redacts_the_token() {
    with_env(
        &[
            ("CAJA_BACKEND_TOKEN", "supersecretvalue"),
            ("CAJA_SEARCH_DEBOUNCE_MS", "250"),
        ],
        || {
            let output = config::run();
            assert!(output.contains("- backend.token = supe*** (source: env (CAJA_BACKEND_TOKEN))"));
            assert!(!output.contains("supersecretvalue"));
            assert!(output
                .contains("- search.debounce_ms = 250 (source: env (CAJA_SEARCH_DEBOUNCE_MS))"));
        },
    );
}

#[test]
fn config_surfaces_validation_failures() {
    with_env(&[("CAJA_BACKEND_BASE_URL", "ftp://backend")], || {
        let output = config::run();
        assert!(output.starts_with("config validation failed"));
        assert!(output.contains("backend.base_url"));
    });
}

#[test]
fn doctor_without_a_token_fails_readiness_and_skips_the_probe() {
    with_env(&[], || {
        let payload = parse_payload(&doctor::run(true, None));
        assert_eq!(payload["overall_status"], "fail");

        let checks = payload["checks"].as_array().expect("checks array");
        assert_eq!(checks[0]["name"], "config_validation");
        assert_eq!(checks[0]["status"], "pass");
        assert_eq!(checks[1]["name"], "token_readiness");
        assert_eq!(checks[1]["status"], "fail");
        assert_eq!(checks[2]["name"], "backend_reachability");
        assert_eq!(checks[2]["status"], "skipped");
    });
}

#[test]
fn doctor_with_invalid_config_skips_everything_else() {
    with_env(&[("CAJA_BACKEND_TIMEOUT_SECS", "0")], || {
        let payload = parse_payload(&doctor::run(true, None));
        assert_eq!(payload["overall_status"], "fail");

        let checks = payload["checks"].as_array().expect("checks array");
        assert_eq!(checks[0]["status"], "fail");
        assert_eq!(checks[1]["status"], "skipped");
        assert_eq!(checks[2]["status"], "skipped");
    });
}

#[test]
fn doctor_human_output_lists_every_check() {
    with_env(&[], || {
        let output = doctor::run(false, None);
        assert!(output.starts_with("doctor:"));
        assert!(output.contains("config_validation"));
        assert!(output.contains("token_readiness"));
        assert!(output.contains("backend_reachability"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("doctor output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CAJA_BACKEND_BASE_URL",
        "CAJA_BACKEND_TOKEN",
        "CAJA_BACKEND_TIMEOUT_SECS",
        "CAJA_SEARCH_PAGE_SIZE",
        "CAJA_SEARCH_DEBOUNCE_MS",
        "CAJA_LOGGING_LEVEL",
        "CAJA_LOGGING_FORMAT",
        "CAJA_LOG_LEVEL",
        "CAJA_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
