use crate::clock::parse_date_stamp;
use crate::error::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 备份根目录下的一个日期目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedBackup {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// 列出备份根目录下所有日期目录，按日期升序
///
/// 名字不是 YYYY-MM-DD 的条目一律跳过，保留策略绝不触碰它们。
pub async fn list_dated_dirs(root: &Path) -> Result<Vec<DatedBackup>> {
    let mut backups = Vec::new();

    if !root.exists() {
        return Ok(backups);
    }

    let mut entries = tokio::fs::read_dir(root).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }

        let name = entry.file_name();
        if let Some(date) = parse_date_stamp(&name.to_string_lossy()) {
            backups.push(DatedBackup {
                date,
                path: entry.path(),
            });
        }
    }

    backups.sort_by_key(|b| b.date);
    Ok(backups)
}

/// 按保留数量清理历史备份目录，返回被删除的路径
///
/// 保留最新的 keep 个日期目录，其余删除。keep 为 0 时视为 1，
/// 避免把刚写完的备份也清掉。
pub async fn prune_dated_dirs(root: &Path, keep: u32) -> Result<Vec<PathBuf>> {
    let keep = keep.max(1) as usize;
    let backups = list_dated_dirs(root).await?;

    if backups.len() <= keep {
        return Ok(Vec::new());
    }

    let mut removed = Vec::new();
    let cutoff = backups.len() - keep;
    for backup in &backups[..cutoff] {
        tokio::fs::remove_dir_all(&backup.path).await?;
        tracing::info!("清理历史备份: {}", backup.path.display());
        removed.push(backup.path.clone());
    }

    Ok(removed)
}

/// 统计目录下所有文件的总大小
pub fn dir_size(path: &Path) -> u64 {
    let mut total = 0u64;

    for entry in WalkDir::new(path).into_iter().flatten() {
        if entry.path().is_file() {
            if let Ok(metadata) = entry.metadata() {
                total += metadata.len();
            }
        }
    }

    total
}
