use serde::Serialize;

use caja_api::{BackendClient, CatalogLookup, ClientDirectory, HttpCatalog, HttpClientDirectory};
use caja_core::config::{AppConfig, LoadOptions};
use caja_core::WarehouseId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool, warehouse: Option<i64>) -> String {
    let report = build_report(warehouse);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(warehouse: Option<i64>) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_token(&config));
            checks.push(check_backend_reachability(&config, warehouse));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "token_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "backend_reachability",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_token(config: &AppConfig) -> DoctorCheck {
    if config.has_token() {
        DoctorCheck {
            name: "token_readiness",
            status: CheckStatus::Pass,
            details: "backend token is present".to_string(),
        }
    } else {
        DoctorCheck {
            name: "token_readiness",
            status: CheckStatus::Fail,
            details: "backend.token is empty; set CAJA_BACKEND_TOKEN or backend.token".to_string(),
        }
    }
}

fn check_backend_reachability(config: &AppConfig, warehouse: Option<i64>) -> DoctorCheck {
    if !config.has_token() {
        return DoctorCheck {
            name: "backend_reachability",
            status: CheckStatus::Skipped,
            details: "skipped because no backend token is configured".to_string(),
        };
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "backend_reachability",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let result = runtime.block_on(async {
        let client = BackendClient::new(&config.backend)
            .map_err(|error| format!("failed to build backend client: {error}"))?;

        // An empty search is the cheapest authenticated round trip.
        let probed = match warehouse {
            Some(id) => {
                let catalog = HttpCatalog::new(client, 1);
                catalog
                    .search_products(WarehouseId(id), "")
                    .await
                    .map_err(|error| format!("catalog probe failed: {error}"))?
                    .len()
            }
            None => {
                let directory = HttpClientDirectory::new(client, 1);
                directory
                    .search_clients("")
                    .await
                    .map_err(|error| format!("client directory probe failed: {error}"))?
                    .len()
            }
        };
        Ok::<usize, String>(probed)
    });

    match result {
        Ok(_) => DoctorCheck {
            name: "backend_reachability",
            status: CheckStatus::Pass,
            details: format!("reached `{}`", config.backend.base_url),
        },
        Err(error) => {
            DoctorCheck { name: "backend_reachability", status: CheckStatus::Fail, details: error }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
