// tests/cli_dispatch_test.rs

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

// 辅助函数，避免重复
fn main_command() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

// --- 测试基本 CLI 行为 ---

#[test]
fn test_help_flag() {
    let mut cmd = main_command();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("显示此帮助信息并退出"));
}

#[test]
fn test_version_flag() {
    let mut cmd = main_command();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_url_is_usage_error() {
    let mut cmd = main_command();
    cmd.arg("--output").arg("out.txt");
    cmd.assert().failure().code(64);
}

#[test]
fn test_missing_output_is_usage_error() {
    let mut cmd = main_command();
    cmd.arg("http://127.0.0.1:9/resource");
    cmd.assert().failure().code(64);
}

// --- 测试解析阶段的拒绝逻辑 ---

#[test]
fn test_denylisted_curl_option_is_rejected() {
    let dir = tempdir().unwrap();
    let mut cmd = main_command();
    cmd.arg("-o")
        .arg(dir.path().join("out.txt"))
        .arg("--curl-options")
        .arg("-O")
        .arg("http://127.0.0.1:9/resource");
    cmd.assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("已拒绝"));
}

#[test]
fn test_unknown_curl_option_is_rejected() {
    let dir = tempdir().unwrap();
    let mut cmd = main_command();
    cmd.arg("-o")
        .arg(dir.path().join("out.txt"))
        .arg("--curl-options")
        .arg("--frobnicate")
        .arg("http://127.0.0.1:9/resource");
    cmd.assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("无法识别的传输选项"));
}

// --- 测试配置校验 ---

#[test]
fn test_quiet_conflicts_with_verbose() {
    let dir = tempdir().unwrap();
    let mut cmd = main_command();
    cmd.arg("-o")
        .arg(dir.path().join("out.txt"))
        .arg("-q")
        .arg("-v")
        .arg("http://127.0.0.1:9/resource");
    cmd.assert()
        .failure()
        .code(78)
        .stderr(predicate::str::contains("配置错误"));
}

#[test]
fn test_unsupported_scheme_is_config_error() {
    let dir = tempdir().unwrap();
    let mut cmd = main_command();
    cmd.arg("-o")
        .arg(dir.path().join("out.txt"))
        .arg("ftp://example.com/resource");
    cmd.assert()
        .failure()
        .code(78)
        .stderr(predicate::str::contains("不支持的 URL 协议"));
}

#[test]
fn test_missing_output_directory_is_config_error() {
    let dir = tempdir().unwrap();
    let mut cmd = main_command();
    cmd.arg("-o")
        .arg(dir.path().join("no-such-dir").join("out.txt"))
        .arg("http://127.0.0.1:9/resource");
    cmd.assert()
        .failure()
        .code(78)
        .stderr(predicate::str::contains("目标目录"));
}
