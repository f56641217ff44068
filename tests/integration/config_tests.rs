use clap::Parser;
use dupescan::cli::Cli;
use dupescan::config::Config;
use dupescan::duplicates::ScanMode;
use dupescan::error::ExitCode;
use dupescan::scanner::HashAlgorithm;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn run(args: &[&str]) -> (ExitCode, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let code = dupescan::run_with_output(cli, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

fn scan_fixture(root: &Path) {
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), "one").unwrap();
    fs::write(root.join("sub").join("a.txt"), "two").unwrap();
    fs::write(root.join("b.txt"), "two").unwrap();
}

#[test]
fn test_config_file_selects_method() {
    let data = tempdir().unwrap();
    scan_fixture(data.path());
    let cfg_dir = tempdir().unwrap();
    let cfg = cfg_dir.path().join("config.json");
    fs::write(&cfg, r#"{ "method": "name" }"#).unwrap();

    let (code, out) = run(&[
        "dupescan",
        data.path().to_str().unwrap(),
        "--config",
        cfg.to_str().unwrap(),
        "--output",
        "json",
    ]);

    assert_eq!(code, ExitCode::Success);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["method"], "name");
    assert_eq!(value["duplicates"][0]["key"], "a.txt");
}

#[test]
fn test_cli_flag_overrides_config_file() {
    let data = tempdir().unwrap();
    scan_fixture(data.path());
    let cfg_dir = tempdir().unwrap();
    let cfg = cfg_dir.path().join("config.json");
    fs::write(&cfg, r#"{ "method": "name", "algorithm": "blake3" }"#).unwrap();

    let (_, out) = run(&[
        "dupescan",
        data.path().to_str().unwrap(),
        "--config",
        cfg.to_str().unwrap(),
        "--method",
        "hash",
        "--algorithm",
        "md5",
        "--output",
        "json",
    ]);

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["method"], "hash");
    let key = value["duplicates"][0]["key"].as_str().unwrap();
    assert_eq!(key.len(), HashAlgorithm::Md5.hex_len());
}

#[test]
fn test_config_ignore_patterns_apply() {
    let data = tempdir().unwrap();
    scan_fixture(data.path());
    let cfg_dir = tempdir().unwrap();
    let cfg = cfg_dir.path().join("config.json");
    fs::write(&cfg, r#"{ "ignore_patterns": ["sub/"] }"#).unwrap();

    let (_, out) = run(&[
        "dupescan",
        data.path().to_str().unwrap(),
        "--config",
        cfg.to_str().unwrap(),
        "--output",
        "json",
    ]);

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["summary"]["total_files"], 2);
    assert_eq!(value["duplicates"].as_array().unwrap().len(), 0);
}

#[test]
fn test_no_config_scans_with_defaults() {
    let data = tempdir().unwrap();
    scan_fixture(data.path());

    let (code, out) = run(&[
        "dupescan",
        data.path().to_str().unwrap(),
        "--no-config",
        "--output",
        "json",
    ]);

    assert_eq!(code, ExitCode::Success);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["method"], "hash");
    assert_eq!(value["summary"]["total_files"], 3);
    let key = value["duplicates"][0]["key"].as_str().unwrap();
    assert_eq!(key.len(), HashAlgorithm::Md5.hex_len());
}

#[test]
fn test_invalid_config_file_is_an_error() {
    let data = tempdir().unwrap();
    let cfg_dir = tempdir().unwrap();
    let cfg = cfg_dir.path().join("config.json");
    fs::write(&cfg, "io_threads = 4").unwrap();

    let cli = Cli::try_parse_from([
        "dupescan",
        data.path().to_str().unwrap(),
        "--config",
        cfg.to_str().unwrap(),
    ])
    .unwrap();
    let mut out = Vec::new();
    let err = dupescan::run_with_output(cli, &mut out).unwrap_err();

    assert!(format!("{:#}", err).contains("Invalid config file"));
    assert!(out.is_empty());
}

#[test]
fn test_config_round_trips_through_json() {
    let config = Config {
        method: ScanMode::Name,
        algorithm: HashAlgorithm::Sha256,
        io_threads: 6,
        skip_hidden: true,
        follow_symlinks: true,
        ignore_patterns: vec!["target/".to_string()],
    };
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), config);
}
