// tests/rotation_test.rs
//
// 针对版本轮换的文件系统级场景：链式上移、保留上限、
// 以及目的地冲突时的整体中止。

use cron_dl::updater::rotate::rotate;
use std::{fs, path::Path};
use tempfile::tempdir;

fn touch(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

#[test]
fn test_full_chain_shift_marks_eviction() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("data.txt");
    touch(&target, "v3");
    touch(&dir.path().join("data.txt.1"), "v2");
    touch(&dir.path().join("data.txt.2"), "v1");

    let evicted = rotate(&target, 2).unwrap();

    // 整条链上移一位，当前目标让位
    assert!(!target.exists());
    assert_eq!(fs::read_to_string(dir.path().join("data.txt.1")).unwrap(), "v3");
    assert_eq!(fs::read_to_string(dir.path().join("data.txt.2")).unwrap(), "v2");
    // 超出保留上限的版本被标记而不是立即删除
    assert_eq!(evicted, vec![dir.path().join("data.txt.3")]);
    assert_eq!(fs::read_to_string(dir.path().join("data.txt.3")).unwrap(), "v1");
}

#[test]
fn test_keep_zero_is_noop() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("data.txt");
    touch(&target, "v1");

    let evicted = rotate(&target, 0).unwrap();

    assert!(evicted.is_empty());
    assert_eq!(fs::read_to_string(&target).unwrap(), "v1");
    assert!(!dir.path().join("data.txt.1").exists());
}

#[test]
fn test_missing_target_leaves_backups_in_place() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("data.txt");
    touch(&dir.path().join("data.txt.1"), "old");

    let evicted = rotate(&target, 3).unwrap();

    assert!(evicted.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("data.txt.1")).unwrap(), "old");
}

#[test]
fn test_chain_gaps_are_tolerated() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("data.txt");
    touch(&target, "current");
    touch(&dir.path().join("data.txt.3"), "ancient");

    let evicted = rotate(&target, 5).unwrap();

    assert!(evicted.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("data.txt.1")).unwrap(), "current");
    assert_eq!(fs::read_to_string(dir.path().join("data.txt.4")).unwrap(), "ancient");
    assert!(!dir.path().join("data.txt.3").exists());
}

#[test]
fn test_unexpected_destination_aborts_without_partial_shift() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("data.txt");
    touch(&target, "v2");
    touch(&dir.path().join("data.txt.1"), "v1");
    // 一个不属于版本链的同名目录占住了 data.txt.2
    fs::create_dir(dir.path().join("data.txt.2")).unwrap();

    let err = rotate(&target, 3).unwrap_err();
    assert_eq!(err.exit_code(), 74);

    // 整体中止：一个文件都没有移动
    assert_eq!(fs::read_to_string(&target).unwrap(), "v2");
    assert_eq!(fs::read_to_string(dir.path().join("data.txt.1")).unwrap(), "v1");
    assert!(dir.path().join("data.txt.2").is_dir());
}

#[test]
fn test_nonconforming_names_are_ignored() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("data.txt");
    touch(&target, "current");
    touch(&dir.path().join("data.txt.01"), "padded");
    touch(&dir.path().join("data.txt.abc"), "junk");
    touch(&dir.path().join("other.txt"), "unrelated");

    let evicted = rotate(&target, 1).unwrap();

    assert!(evicted.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("data.txt.1")).unwrap(), "current");
    assert_eq!(fs::read_to_string(dir.path().join("data.txt.01")).unwrap(), "padded");
    assert_eq!(fs::read_to_string(dir.path().join("data.txt.abc")).unwrap(), "junk");
}

#[test]
fn test_existing_backup_beyond_keep_is_evicted() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("data.txt");
    touch(&target, "v2");
    touch(&dir.path().join("data.txt.1"), "v1");

    let evicted = rotate(&target, 1).unwrap();

    assert_eq!(fs::read_to_string(dir.path().join("data.txt.1")).unwrap(), "v2");
    assert_eq!(evicted, vec![dir.path().join("data.txt.2")]);
    assert_eq!(fs::read_to_string(dir.path().join("data.txt.2")).unwrap(), "v1");
}
