use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const BIN: &str = "kpt-kcl";

const CONFIG_MAP_LIST: &str = r#"apiVersion: config.kubernetes.io/v1
kind: ResourceList
items:
- apiVersion: v1
  kind: Service
  metadata:
    name: web
functionConfig:
  apiVersion: v1
  kind: ConfigMap
  metadata:
    name: cm1
    namespace: ns1
  data:
    source: "print(1)"
"#;

fn kpt_kcl() -> Command {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    for var in [
        "KPT_KCL_CONFIG",
        "KPT_KCL_ENGINE",
        "KPT_KCL_ENGINE_COMMAND",
        "KPT_KCL_LOG_LEVEL",
        "KPT_KCL_LOG_FORMAT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_default_command_reads_stdin() {
    kpt_kcl()
        .write_stdin(CONFIG_MAP_LIST)
        .assert()
        .success()
        .stdout(predicate::str::contains("kind: ResourceList"))
        .stdout(predicate::str::contains("name: web"))
        .stdout(predicate::str::contains("severity: warning"))
        .stdout(predicate::str::contains("severity: error").not());
}

#[test]
fn test_passthrough_keeps_string_data_quoted() {
    let input = CONFIG_MAP_LIST.replace(
        "  kind: Service\n  metadata:\n    name: web\n",
        "  kind: ConfigMap\n  metadata:\n    name: web\n  data:\n    enabled: \"on\"\n    since: \"2001-12-14\"\n",
    );

    kpt_kcl()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled: 'on'"))
        .stdout(predicate::str::contains("since: '2001-12-14'"));
}

#[test]
fn test_run_subcommand_with_files() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in.yaml");
    let output = temp_dir.path().join("out.yaml");
    fs::write(&input, CONFIG_MAP_LIST).unwrap();

    kpt_kcl()
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("name: web"));
    assert!(written.contains("functionConfig:"));
}

#[test]
fn test_missing_source_is_reported_in_results() {
    let input = CONFIG_MAP_LIST.replace("source: \"print(1)\"", "replicas: \"3\"");

    kpt_kcl()
        .write_stdin(input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("results:"))
        .stdout(predicate::str::contains("`source` must not be empty"))
        .stdout(predicate::str::contains("KCL-CFG-004"))
        .stdout(predicate::str::contains("name: web"));
}

#[test]
fn test_unsupported_function_config_kind() {
    let input = CONFIG_MAP_LIST
        .replace("apiVersion: v1\n  kind: ConfigMap", "apiVersion: apps/v1\n  kind: Deployment");

    kpt_kcl()
        .write_stdin(input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Kind=Deployment"))
        .stdout(predicate::str::contains("KCL-CFG-002"));
}

#[test]
fn test_input_that_is_not_a_resource_list_fails() {
    kpt_kcl()
        .write_stdin("apiVersion: v1\nkind: Service\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("KCL-DOC-001"));
}

#[test]
fn test_resolve_prints_descriptor() {
    kpt_kcl()
        .arg("resolve")
        .write_stdin(CONFIG_MAP_LIST)
        .assert()
        .success()
        .stdout(predicate::str::contains("name: cm1"))
        .stdout(predicate::str::contains("namespace: ns1"))
        .stdout(predicate::str::contains("source: print(1)"));
}

#[test]
fn test_command_engine_replaces_items() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("kpt-kcl.toml");
    fs::write(
        &config,
        r#"
[engine]
kind = "command"
command = ["sh", "-c", "cat > /dev/null; printf 'apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: generated\n'"]

[logging]
console_output = "none"
"#,
    )
    .unwrap();

    kpt_kcl()
        .arg("--config")
        .arg(&config)
        .write_stdin(CONFIG_MAP_LIST)
        .assert()
        .success()
        .stdout(predicate::str::contains("name: generated"))
        .stdout(predicate::str::contains("name: web").not());
}

#[test]
fn test_engine_failure_message_is_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("kpt-kcl.toml");
    fs::write(
        &config,
        r#"
[engine]
kind = "command"
command = ["sh", "-c", "cat > /dev/null; echo 'EvaluationError: undefined name' >&2; exit 2"]
"#,
    )
    .unwrap();

    kpt_kcl()
        .arg("--config")
        .arg(&config)
        .write_stdin(CONFIG_MAP_LIST)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("EvaluationError: undefined name"))
        .stdout(predicate::str::contains("KCL-ENG-001"));
}

#[test]
fn test_missing_config_file_fails() {
    kpt_kcl()
        .arg("--config")
        .arg("/nonexistent/kpt-kcl.toml")
        .write_stdin(CONFIG_MAP_LIST)
        .assert()
        .failure()
        .stderr(predicate::str::contains("KCL-IO-001"));
}

#[test]
fn test_help_lists_commands() {
    kpt_kcl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("--config"));
}
