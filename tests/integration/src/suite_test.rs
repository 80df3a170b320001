//! End-to-end compilation of a realistic install root
//!
//! Exercises the whole flow: overlay file -> version chain (including a real
//! git revision when `git` is available) -> descriptors -> rendered document.

use pretty_assertions::assert_eq;
use std::time::Duration;
use suite_core::{CompileOptions, EcosystemFile, OutputFormat, compile};
use suite_test_utils::git::{git_available, git_repo_with_commit};
use suite_test_utils::install::TestInstall;
use suite_version::UNKNOWN_VERSION;

/// An install root with one project per version source.
fn populated_install() -> TestInstall {
    let install = TestInstall::new();

    // Static manifest version.
    install.pyproject("automagik-spark", "0.3.7");

    // Dynamic manifest, version lives in the source marker.
    install.write(
        "am-agents-labs/pyproject.toml",
        "[project]\nname = \"am-agents-labs\"\ndynamic = [\"version\"]\n",
    );
    install.src_marker("am-agents-labs", "0.2.0");

    // Package marker under the normalized project name.
    install.package_marker("automagik-tools", "automagik_tools", "0.8.1");

    install.package_json("automagik-ui", "1.4.0");

    install.overlay(
        "# operator settings\n\
         AUTOMAGIK_SPARK_API_PORT=9000\n\
         AUTOMAGIK_OMNI_API_KEY='s3cret'\n\
         AUTOMAGIK_UI_PORT=3100\n\
         NODE_ENV=development\n\
         not a valid line\n",
    );

    install
}

fn options(install: &TestInstall) -> CompileOptions {
    CompileOptions::new(install.root()).with_vcs_timeout(Duration::from_secs(5))
}

#[test]
fn test_full_suite_compilation() {
    let install = populated_install();

    let manifest = compile(&options(&install)).unwrap();
    assert_eq!(manifest.apps.len(), 7);

    let version_of = |name: &str| manifest.get(name).unwrap().version.clone();
    assert_eq!(version_of("automagik-spark-api"), "0.3.7");
    assert_eq!(version_of("automagik-spark-worker"), "0.3.7");
    assert_eq!(version_of("am-agents-labs"), "0.2.0");
    assert_eq!(version_of("automagik-tools-sse"), "0.8.1");
    assert_eq!(version_of("automagik-tools-http"), "0.8.1");
    assert_eq!(version_of("automagik-ui"), "1.4.0");
    // No project directory at all.
    assert_eq!(version_of("automagik-omni"), UNKNOWN_VERSION);

    let api = manifest.get("automagik-spark-api").unwrap();
    assert!(api.command_line().ends_with("--port 9000"));

    let omni = manifest.get("automagik-omni").unwrap();
    assert_eq!(
        omni.env.get("AUTOMAGIK_OMNI_API_KEY").map(String::as_str),
        Some("s3cret")
    );

    let ui = manifest.get("automagik-ui").unwrap();
    assert_eq!(ui.env.get("PORT").map(String::as_str), Some("3100"));

    for app in &manifest.apps {
        assert_eq!(
            app.env.get("NODE_ENV").map(String::as_str),
            Some("production"),
            "{} must run in production mode",
            app.name
        );
    }
}

#[test]
fn test_revision_used_when_no_file_declares_a_version() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let install = populated_install();
    let short = git_repo_with_commit(&install.project("automagik-omni"));

    let manifest = compile(&options(&install)).unwrap();

    let omni = manifest.get("automagik-omni").unwrap();
    let reported = omni.version.strip_prefix("git-").unwrap();
    assert!(reported.starts_with(&short) || short.starts_with(reported));
}

#[test]
fn test_rendered_yaml_round_trips_through_a_generic_parser() {
    let install = populated_install();
    let manifest = compile(&options(&install)).unwrap();

    let yaml = EcosystemFile::from(&manifest)
        .render(OutputFormat::Yaml)
        .unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

    let apps = value["apps"].as_sequence().unwrap();
    let names: Vec<&str> = apps
        .iter()
        .map(|app| app["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "am-agents-labs",
            "automagik-spark-api",
            "automagik-spark-worker",
            "automagik-omni",
            "automagik-tools-sse",
            "automagik-tools-http",
            "automagik-ui",
        ]
    );
    assert_eq!(apps[0]["exec_mode"].as_str(), Some("fork"));
    assert_eq!(apps[0]["max_memory_restart"].as_str(), Some("1G"));
    assert!(value["deploy"]["production"]["pre-setup"].is_string());
}

#[test]
fn test_compilation_is_deterministic() {
    let install = populated_install();

    let first = EcosystemFile::from(&compile(&options(&install)).unwrap())
        .to_json()
        .unwrap();
    let second = EcosystemFile::from(&compile(&options(&install)).unwrap())
        .to_json()
        .unwrap();

    assert_eq!(first, second);
}
