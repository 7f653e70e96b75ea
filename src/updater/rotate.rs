// src/updater/rotate.rs

use crate::error::*;
use itertools::Itertools;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

/// 目录扫描得到的既有版本。后缀 0 代表当前目标文件，N 代表 `target.N`。
#[derive(Debug, Clone, PartialEq, Eq)]
struct Version {
    suffix: u32,
    path: PathBuf,
}

/// 为新版本腾出位置：`target` → `target.1`，`target.1` → `target.2`，依此类推。
/// 返回轮换后超出保留上限、应在安装完成之后再删除的文件。
///
/// `keep == 0` 与目标文件不存在时都是空操作：前者不保留历史，
/// 后者没有当前版本可备份，既有备份保持原位。
pub fn rotate(target: &Path, keep: u32) -> AppResult<Vec<PathBuf>> {
    if keep == 0 {
        return Ok(Vec::new());
    }
    let chain = scan_chain(target)?;
    if !chain.iter().any(|v| v.suffix == 0) {
        return Ok(Vec::new());
    }

    // 先整体检查每个重命名目的地。出现不属于版本链的同名条目时直接中止，
    // 一个文件都不移动：它可能是用户自己的文件、链接或 keep 调小后的残留，
    // 猜错就会丢数据。
    let sources: HashSet<u32> = chain.iter().map(|v| v.suffix).collect();
    for version in &chain {
        let dest = numbered_path(target, version.suffix + 1);
        if dest.symlink_metadata().is_ok() && !sources.contains(&(version.suffix + 1)) {
            return Err(AppError::Rotation(format!(
                "目的地 {:?} 已存在且不属于版本链，拒绝覆盖",
                dest
            )));
        }
    }

    // 从最高后缀向下依次移动，避免覆盖尚未移动的文件
    let mut evicted = Vec::new();
    for version in chain.iter().rev() {
        let dest = numbered_path(target, version.suffix + 1);
        fs::rename(&version.path, &dest)?;
        if version.suffix + 1 > keep {
            evicted.push(dest);
        }
    }
    Ok(evicted)
}

/// 扫描目标所在目录，收集按后缀升序排列的版本链。
/// 只接受常规文件；容忍链上的空洞，忽略一切不合规范的名字。
fn scan_chain(target: &Path) -> AppResult<Vec<Version>> {
    let Some(file_name) = target.file_name().and_then(|n| n.to_str()) else {
        return Err(AppError::Rotation(format!(
            "无法从 {:?} 提取文件名",
            target
        )));
    };
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut chain = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(suffix) = parse_suffix(file_name, name) else {
            continue;
        };
        chain.push(Version {
            suffix,
            path: entry.path(),
        });
    }
    Ok(chain
        .into_iter()
        .sorted_by_key(|v| v.suffix)
        .collect())
}

/// 解析版本后缀：`name` 本身是 0，`name.N` 是 N。
/// 只接受规范十进制——`.0`、前导零、非数字都视为无关文件。
fn parse_suffix(base: &str, candidate: &str) -> Option<u32> {
    if candidate == base {
        return Some(0);
    }
    let rest = candidate.strip_prefix(base)?.strip_prefix('.')?;
    let n: u32 = rest.parse().ok()?;
    if n == 0 || n.to_string() != rest {
        return None;
    }
    Some(n)
}

fn numbered_path(target: &Path, suffix: u32) -> PathBuf {
    let mut os = target.as_os_str().to_os_string();
    os.push(format!(".{}", suffix));
    PathBuf::from(os)
}
