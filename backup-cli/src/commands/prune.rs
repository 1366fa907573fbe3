use crate::app::CliApp;
use backup_core::{error::Result, retention};
use tracing::{info, warn};

/// 按保留策略清理历史备份
pub async fn run_prune(app: &CliApp, keep: Option<u32>) -> Result<()> {
    let Some(keep) = keep.or(app.config.backup.keep) else {
        warn!("⚠️  未配置保留数量，跳过清理");
        info!("💡 使用 --keep N 参数，或在配置文件 [backup] 段设置 keep");
        return Ok(());
    };

    let root = app.config.get_output_root();
    info!("🧹 清理历史备份: 保留最近 {} 天", keep);

    let removed = retention::prune_dated_dirs(&root, keep).await?;

    if removed.is_empty() {
        info!("✅ 无需清理");
    } else {
        info!("✅ 已清理 {} 个历史备份目录", removed.len());
    }

    Ok(())
}
