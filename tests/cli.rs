use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn whispernet() -> Command {
    let mut cmd = Command::cargo_bin("whispernet").unwrap();
    for var in [
        "WORKER_URLS",
        "WHISPERNET_CONFIG",
        "WORKER_TIMEOUT_SEC",
        "MAX_IN_FLIGHT",
        "RUST_LOG",
        "HTTP_PROXY",
        "http_proxy",
        "ALL_PROXY",
        "all_proxy",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn schema_describes_config() {
    whispernet()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"workers\""))
        .stdout(predicate::str::contains("\"worker_timeout_sec\""))
        .stdout(predicate::str::contains("\"gitlab\""));
}

#[test]
fn dispatch_without_workers_prints_empty_results() {
    whispernet()
        .arg("dispatch")
        .write_stdin("print('hello')\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"results\": []"));
}

#[test]
fn dispatch_skips_blank_worker_entries() {
    whispernet()
        .args(["dispatch", "--workers", " , ,"])
        .write_stdin("x = 1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"results\": []"));
}

#[test]
fn dispatch_reports_unreachable_worker_as_data() {
    let mut code = tempfile::NamedTempFile::new().unwrap();
    writeln!(code, "# TODO").unwrap();

    // Port 9 (discard) on localhost is not expected to accept HTTP
    whispernet()
        .args(["dispatch", "--workers", "http://127.0.0.1:9/analyse", "--worker-timeout-sec", "5"])
        .arg("--file")
        .arg(code.path())
        .env("NO_PROXY", "*")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"worker_url\": \"http://127.0.0.1:9/analyse\""))
        .stdout(predicate::str::contains("\"error\""));
}

#[test]
fn invalid_config_value_fails() {
    whispernet()
        .args(["dispatch", "--max-in-flight", "0"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_in_flight"));
}

#[test]
fn missing_config_file_fails() {
    whispernet()
        .args(["dispatch", "--config", "/nonexistent/whispernet.yaml"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}
