use assert_cmd::cargo::{self};
use predicates::str::contains;

const DOC: &str = r#"{
  "parameters": [
    {"name": "region", "title": "Region", "type": "text", "value": "eu"},
    {"name": "limit", "title": "Limit", "type": "number", "value": 10}
  ],
  "existingNames": ["region_all"],
  "mappings": {
    "region": {"name": "region", "type": "dashboard-level", "mapTo": "region_all"},
    "limit": {"name": "limit", "type": "widget-level"}
  }
}"#;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("parammap");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("parammap"));
}

#[test]
fn inspect_lists_keywords_and_sources() {
    let mut cmd = cargo::cargo_bin_cmd!("parammap");
    cmd.args(["inspect", DOC])
        .assert()
        .success()
        .stdout(contains("{{ region }}"))
        .stdout(contains("Existing dashboard parameter"))
        .stdout(contains("Widget parameter"));
}

#[test]
fn source_switches_row_to_static_value() {
    let mut cmd = cargo::cargo_bin_cmd!("parammap");
    cmd.args([
        "source", DOC, "--name", "limit", "--kind", "static", "--value", "\"25\"",
    ])
    .assert()
    .success()
    .stdout(contains("\"static-value\""))
    .stdout(contains("\"value\": 25"));
}

#[test]
fn source_rejects_duplicate_new_name() {
    let mut cmd = cargo::cargo_bin_cmd!("parammap");
    cmd.args([
        "source",
        DOC,
        "--name",
        "limit",
        "--kind",
        "add-new",
        "--map-to",
        "region_all",
    ])
    .assert()
    .failure()
    .stderr(contains("This parameter name already exists"));
}

#[test]
fn title_override_is_written_back() {
    let mut cmd = cargo::cargo_bin_cmd!("parammap");
    cmd.args(["title", DOC, "--name", "region", "--title", "Sales region"])
        .assert()
        .success()
        .stdout(contains("\"title\": \"Sales region\""));
}

#[test]
fn schema_command_prints_document_schema() {
    let mut cmd = cargo::cargo_bin_cmd!("parammap");
    cmd.arg("schema")
        .assert()
        .success()
        .stdout(contains("MappingDocument"));
}

#[test]
fn source_rejects_unknown_existing_parameter() {
    let mut cmd = cargo::cargo_bin_cmd!("parammap");
    cmd.args([
        "source", DOC, "--name", "limit", "--kind", "existing", "--map-to", "typo",
    ])
    .assert()
    .failure()
    .stderr(contains("Please select an existing dashboard parameter"));
}

#[test]
fn source_maps_to_known_existing_parameter() {
    let mut cmd = cargo::cargo_bin_cmd!("parammap");
    cmd.args([
        "source", DOC, "--name", "limit", "--kind", "existing", "--map-to", "region_all",
    ])
    .assert()
    .success()
    .stdout(contains("\"mapTo\": \"region_all\""));
}

#[test]
fn skip_missing_keeps_unopened_mappings() {
    let doc = DOC.replace(
        r#""limit": {"name": "limit", "type": "widget-level"}"#,
        r#""limit": {"name": "limit", "type": "widget-level"},
    "ghost": {"name": "ghost", "type": "static-value", "value": "boo"}"#,
    );
    let mut cmd = cargo::cargo_bin_cmd!("parammap");
    cmd.args(["--skip-missing", "title", &doc, "--name", "region", "--title", "Area"])
        .assert()
        .success()
        .stdout(contains("\"ghost\""))
        .stdout(contains("\"value\": \"boo\""));
}
