use crate::app::CliApp;
use crate::commands::format_size;
use backup_core::{error::Result, retention};
use tracing::info;

/// 列出备份根目录下的所有日期备份
pub async fn run_list_backups(app: &CliApp) -> Result<()> {
    let root = app.config.get_output_root();
    let backups = retention::list_dated_dirs(&root).await?;

    if backups.is_empty() {
        info!("📦 暂无备份");
        info!("💡 使用以下命令创建备份:");
        info!("   backup-cli run");
        return Ok(());
    }

    info!("📦 备份列表");
    info!("============");

    info!("{:<12} {:<10} {}", "日期", "大小", "路径");
    info!("{}", "-".repeat(60));

    let mut total_size = 0u64;
    for backup in &backups {
        let size = retention::dir_size(&backup.path);
        total_size += size;

        info!(
            "{:<12} {:<10} {}",
            backup.date.format("%Y-%m-%d"),
            format_size(size),
            backup.path.display()
        );
    }

    info!("{}", "-".repeat(60));
    info!("📊 备份统计:");
    info!("   总备份数: {}", backups.len());
    info!("   总大小: {}", format_size(total_size));

    Ok(())
}
