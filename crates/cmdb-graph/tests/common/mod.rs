//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path of the compiled cmdb-graph binary
pub fn cmdb_graph_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cmdb-graph"))
}

/// Run the cmdb-graph binary in the specified directory, colours disabled
pub fn run_cmdb_graph_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(cmdb_graph_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute cmdb-graph binary")
}

/// Write a snapshot document into `dir` and return its path
pub fn write_snapshot(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, json).expect("Failed to write snapshot");
    path
}

/// Three items in a chain `1 -> 2 -> 3`, item 1 with the given status
pub fn chain_snapshot(first_status: &str) -> String {
    format!(
        r#"{{
            "items": [
                {{"id": 1, "status": "{first_status}", "name": "core-switch"}},
                {{"id": 2, "status": "active", "name": "app-server"}},
                {{"id": 3, "status": "active", "name": "web-frontend"}}
            ],
            "groups": [],
            "connections": [
                {{"source_id": 1, "target_id": 2}},
                {{"source_id": 2, "target_id": 3}}
            ],
            "groupConnections": []
        }}"#
    )
}
