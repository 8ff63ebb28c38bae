mod support;

use std::fs;

use serde_json::{Value, json};
use support::{
    FixtureWorkspace, run_plugin, toml_path, unique_test_dir, write_config, write_zed_database,
};
use zed_workspaces::plugin::RpcResponse;

fn decode(stdout: &str) -> RpcResponse {
    serde_json::from_str(stdout.trim()).expect("stdout should be a result payload")
}

#[test]
fn query_lists_deduplicated_workspaces_from_database() {
    let root = unique_test_dir("zed-workspaces-cli-query");
    let database_path = root.join("db.sqlite");
    write_zed_database(
        &database_path,
        &[
            FixtureWorkspace {
                id: 1,
                path: "C:\\Users\\x\\App",
                ssh: None,
            },
            FixtureWorkspace {
                id: 2,
                path: "c:/users/x/app/",
                ssh: None,
            },
            FixtureWorkspace {
                id: 3,
                path: "/home/x/beta",
                ssh: None,
            },
            FixtureWorkspace {
                id: 4,
                path: "/srv/gamma",
                ssh: Some(("box1", Some("dev"), Some(2222))),
            },
        ],
    );
    let config_path = write_config(
        &root,
        &format!("database_path = \"{}\"\n", toml_path(&database_path)),
    );

    let response = decode(&run_plugin(
        &config_path,
        r#"{"method":"query","parameters":[""]}"#,
    ));

    let titles: Vec<&str> = response
        .result
        .iter()
        .map(|item| item.title.as_str())
        .collect();
    assert_eq!(titles, vec!["App", "Beta (WSL)", "Gamma (SSH: box1)"]);
    assert_eq!(response.result[0].subtitle, "C:\\Users\\x\\App");

    let action = response.result[2]
        .action
        .as_ref()
        .expect("workspace should have action");
    assert_eq!(
        Value::from(action.parameters.clone()),
        json!(["/srv/gamma", true, "box1", "dev", 2222])
    );

    let _ = fs::remove_dir_all(root);
}

#[test]
fn query_filters_case_insensitively() {
    let root = unique_test_dir("zed-workspaces-cli-filter");
    let database_path = root.join("db.sqlite");
    write_zed_database(
        &database_path,
        &[
            FixtureWorkspace {
                id: 1,
                path: "/A/B/Project",
                ssh: None,
            },
            FixtureWorkspace {
                id: 2,
                path: "/A/B/other",
                ssh: None,
            },
        ],
    );
    let config_path = write_config(
        &root,
        &format!("database_path = \"{}\"\n", toml_path(&database_path)),
    );

    let response = decode(&run_plugin(
        &config_path,
        r#"{"method":"query","parameters":["PROJ"]}"#,
    ));

    assert_eq!(response.result.len(), 1);
    assert_eq!(response.result[0].subtitle, "/A/B/Project");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_database_reports_not_found() {
    let root = unique_test_dir("zed-workspaces-cli-missing");
    let database_path = root.join("absent.sqlite");
    let config_path = write_config(
        &root,
        &format!("database_path = \"{}\"\n", toml_path(&database_path)),
    );

    let response = decode(&run_plugin(
        &config_path,
        r#"{"method":"query","parameters":["app"]}"#,
    ));

    assert_eq!(response.result.len(), 1);
    assert_eq!(response.result[0].title, "No Zed workspaces found");
    assert_eq!(
        response.result[0].subtitle,
        database_path.display().to_string()
    );
    assert_eq!(response.result[0].action, None);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn invalid_request_answers_with_empty_result() {
    let root = unique_test_dir("zed-workspaces-cli-invalid");
    let config_path = write_config(&root, "");

    let response = decode(&run_plugin(&config_path, "not json"));

    assert!(response.result.is_empty());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn launch_failure_is_logged_and_silent() {
    let root = unique_test_dir("zed-workspaces-cli-launch");
    let event_log = root.join("events.jsonl");
    let config_path = write_config(
        &root,
        &format!(
            "editor_command = \"zed-workspaces-missing-editor\"\nevent_log = \"{}\"\n",
            toml_path(&event_log)
        ),
    );

    let stdout = run_plugin(
        &config_path,
        r#"{"method":"open_in_zed","parameters":["C:\\work\\app",false,null,null,null]}"#,
    );

    assert!(stdout.trim().is_empty());
    let log = fs::read_to_string(&event_log).expect("event log should be written");
    let events: Vec<Value> = log
        .lines()
        .map(|line| serde_json::from_str(line).expect("event line should be json"))
        .collect();
    assert!(events.iter().any(|event| event["kind"] == "spawn_failed"
        && event["data"]["program"] == "zed-workspaces-missing-editor"));

    let _ = fs::remove_dir_all(root);
}
