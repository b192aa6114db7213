use clap::Parser;
use dupefind::cli::Cli;
use dupefind::duplicates::FinderError;
use dupefind::error::ExitCode;
use dupefind::signal::CancelToken;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn run_cli(args: &[&str]) -> (anyhow::Result<ExitCode>, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let result = dupefind::run(&cli, CancelToken::new(), &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn dir_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_report_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "hello").unwrap();
    fs::write(dir.path().join("b"), "hello").unwrap();
    fs::write(dir.path().join("c"), "world").unwrap();

    let (result, output) = run_cli(&["dupefind", "-q", "-d", dir_arg(dir.path())]);
    assert_eq!(result.unwrap(), ExitCode::Success);

    let canonical = fs::canonicalize(dir.path()).unwrap();
    let expected = format!(
        "{}\nPotential savings of 5 bytes in duplicated files:\n\t{}\n\t{}\n",
        dir.path().display(),
        canonical.join("a").display(),
        canonical.join("b").display(),
    );
    assert_eq!(output, expected);
}

#[test]
fn test_no_duplicates_prints_root_only() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only"), "alone").unwrap();

    let (result, output) = run_cli(&["dupefind", "-q", "-d", dir_arg(dir.path())]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(output, format!("{}\n", dir.path().display()));
}

#[test]
fn test_missing_root_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let (result, output) = run_cli(&["dupefind", "-q", "-d", dir_arg(&missing)]);
    let err = result.unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(matches!(
        err.downcast_ref::<FinderError>(),
        Some(FinderError::PathNotFound(_))
    ));
    assert!(output.is_empty());
}

#[test]
fn test_interrupted_maps_to_130() {
    let dir = tempdir().unwrap();
    let cli = Cli::try_parse_from(["dupefind", "-q", "-d", dir_arg(dir.path())]).unwrap();
    let token = CancelToken::new();
    token.cancel();

    let mut out = Vec::new();
    let err = dupefind::run(&cli, token, &mut out).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::Interrupted);
    assert_eq!(ExitCode::for_error(&err).as_i32(), 130);
}

#[test]
fn test_zero_prefix_len_rejected() {
    let dir = tempdir().unwrap();
    let (result, _) = run_cli(&[
        "dupefind",
        "-q",
        "-d",
        dir_arg(dir.path()),
        "--prefix-len",
        "0",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_missing_config_file_rejected() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nope.toml");
    let (result, _) = run_cli(&[
        "dupefind",
        "-q",
        "-d",
        dir_arg(dir.path()),
        "-c",
        dir_arg(&config),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_config_file_applies() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a"), "dup").unwrap();
    fs::write(data.join(".b"), "dup").unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "skip_hidden = true\n").unwrap();

    let (result, output) = run_cli(&[
        "dupefind",
        "-q",
        "-d",
        dir_arg(&data),
        "-c",
        dir_arg(&config),
    ]);
    assert_eq!(result.unwrap(), ExitCode::Success);
    assert_eq!(output.lines().count(), 1);
}

#[test]
fn test_cpuprofile_written() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a"), "profiled").unwrap();
    fs::write(data.join("b"), "profiled").unwrap();
    let profile = dir.path().join("profile.json");

    let (result, _) = run_cli(&[
        "dupefind",
        "-q",
        "-d",
        dir_arg(&data),
        "--cpuprofile",
        dir_arg(&profile),
        "--paranoid",
    ]);
    assert_eq!(result.unwrap(), ExitCode::Success);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&profile).unwrap()).unwrap();
    assert_eq!(value["duplicate_groups"], 1);
    assert_eq!(value["reclaimable_space"], 8);
    let stages: Vec<&str> = value["stages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["stage"].as_str().unwrap())
        .collect();
    assert_eq!(stages, vec!["walk", "prefix", "digest", "verify"]);
}
