use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use rust_decimal::Decimal;
use serde_json::Value;
use shutterquote_cli::commands::{config, migrate, price, report};
use shutterquote_core::domain::customer::CustomerInfo;
use shutterquote_core::domain::opening::Opening;
use shutterquote_core::domain::quotation::SubmitRequest;
use shutterquote_core::domain::surcharge::SurchargeSelections;
use shutterquote_core::quotation_service::{QuotationService, QuotationServiceSettings};
use shutterquote_db::{connect, SqlQuotationStore};
use tempfile::TempDir;

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("SHUTTERQUOTE_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_for_non_sqlite_url() {
    with_env(&[("SHUTTERQUOTE_DATABASE_URL", "postgres://localhost/quotes")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn config_attributes_each_value_to_its_source() {
    with_env(
        &[("SHUTTERQUOTE_DATABASE_URL", "sqlite::memory:"), ("SHUTTERQUOTE_LOG_LEVEL", "debug")],
        || {
            let result = config::run();
            assert_eq!(result.exit_code, 0);

            let output = result.output;
            assert!(output.contains(
                "- database.url = sqlite::memory: (source: env (SHUTTERQUOTE_DATABASE_URL))"
            ));
            assert!(
                output.contains("- logging.level = debug (source: env (SHUTTERQUOTE_LOG_LEVEL))")
            );
            assert!(output.contains("- server.port = 8080 (source: default)"));
            assert!(output.contains("- pricing.total_tolerance = 0.01 (source: default)"));
        },
    );
}

#[test]
fn config_reports_invalid_env_override() {
    with_env(&[("SHUTTERQUOTE_SERVER_PORT", "not-a-port")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn price_prints_breakdown_for_valid_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("openings.json");
    fs::write(
        &path,
        r#"{
            "openings": [
                { "type": "window", "width": "20", "height": "30", "quantity": 1,
                  "mount_type": "inside_mount", "frame_style": "trim_frame", "base_cost": "22" }
            ],
            "surcharges": { "casing_frame": true }
        }"#,
    )
    .expect("write input");

    let result = price::run(&path);
    assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "price");
    assert_eq!(decimal(&payload["data"]["total"]), Decimal::new(26_860, 2));
    assert_eq!(payload["data"]["opening_lines"].as_array().map(Vec::len), Some(1));
}

#[test]
fn price_rejects_invalid_openings_with_field_paths() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("bad.json");
    let input = r#"{"openings":[{"width":"0","height":"30","quantity":1,"base_cost":"22"}]}"#;
    fs::write(&path, input).expect("write input");

    let result = price::run(&path);
    assert_eq!(result.exit_code, 3);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["error_class"], "validation");
    assert!(payload["message"].as_str().unwrap_or_default().contains("openings[0].width"));
}

#[test]
fn price_reports_unparseable_input() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write input");

    let result = price::run(&path);
    assert_eq!(result.exit_code, 2);
    assert_eq!(parse_payload(&result.output)["error_class"], "input_parse");
}

#[test]
fn report_lists_saved_quotations_and_revenue() {
    let dir = TempDir::new().expect("temp dir");
    let url = format!("sqlite://{}", dir.path().join("report.db").display());

    with_env(&[("SHUTTERQUOTE_DATABASE_URL", url.as_str())], || {
        assert_eq!(migrate::run().exit_code, 0);
        seed_quotation(&url);

        let result = report::run();
        assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);

        let payload = parse_payload(&result.output);
        let quotations = payload["data"]["quotations"].as_array().expect("quotations");
        assert_eq!(quotations.len(), 1);
        assert_eq!(quotations[0]["customer_name"], "Avery Quinn");

        let revenue = payload["data"]["revenue"].as_array().expect("revenue");
        assert_eq!(revenue.len(), 1);
        assert_eq!(decimal(&revenue[0]["revenue"]), Decimal::new(26_860, 2));
    });
}

fn seed_quotation(url: &str) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    runtime.block_on(async {
        let pool = connect(url).await.expect("connect");
        let store = SqlQuotationStore::new(pool.clone());
        let service = QuotationService::new(store, QuotationServiceSettings::default());
        service
            .submit(SubmitRequest {
                customer: CustomerInfo {
                    first_name: "Avery".to_string(),
                    last_name: "Quinn".to_string(),
                    email: "avery@example.com".to_string(),
                    ..CustomerInfo::default()
                },
                openings: vec![Opening {
                    width: Decimal::from(20),
                    height: Decimal::from(30),
                    mount_type: shutterquote_core::MountType::InsideMount,
                    frame_style: shutterquote_core::FrameStyle::TrimFrame,
                    ..Opening::default()
                }],
                surcharges: SurchargeSelections { casing_frame: true, ..Default::default() },
                total_cost: Decimal::new(26_860, 2),
            })
            .await
            .expect("submit");
        pool.close().await;
    });
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(text) => text.parse().expect("decimal string"),
        other => other.to_string().parse().expect("decimal number"),
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "SHUTTERQUOTE_DATABASE_URL",
        "SHUTTERQUOTE_DATABASE_MAX_CONNECTIONS",
        "SHUTTERQUOTE_DATABASE_TIMEOUT_SECS",
        "SHUTTERQUOTE_SERVER_BIND_ADDRESS",
        "SHUTTERQUOTE_SERVER_PORT",
        "SHUTTERQUOTE_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "SHUTTERQUOTE_PRICING_TOTAL_TOLERANCE",
        "SHUTTERQUOTE_LOGGING_LEVEL",
        "SHUTTERQUOTE_LOGGING_FORMAT",
        "SHUTTERQUOTE_LOG_LEVEL",
        "SHUTTERQUOTE_LOG_FORMAT",
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
