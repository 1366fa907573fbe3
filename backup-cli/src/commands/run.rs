use crate::app::CliApp;
use crate::commands::format_size;
use backup_core::{
    clock::SystemClock,
    error::Result,
    launcher::MongodumpLauncher,
    orchestrator::BackupOrchestrator,
    retention,
};
use std::path::PathBuf;
use tracing::{error, info};

/// 执行一次备份，返回进程退出码
pub async fn run_backup(
    app: &CliApp,
    source_uri: Option<String>,
    output_root: Option<PathBuf>,
    timeout: Option<u64>,
) -> Result<i32> {
    info!("💾 执行数据备份");
    info!("===============");

    // 命令行参数优先于环境变量和配置文件
    let mut config = app.config.clone();
    if let Some(uri) = source_uri {
        config.source.uri = uri;
    }
    if let Some(root) = output_root {
        config.backup.output_root = root.to_string_lossy().to_string();
    }
    if let Some(secs) = timeout {
        config.backup.timeout_secs = secs;
    }

    let launcher = MongodumpLauncher::new(config.backup.dump_command.clone());
    let orchestrator = BackupOrchestrator::new(launcher, SystemClock);

    let result = orchestrator.run(&config).await?;

    if result.is_success() {
        info!("🎉 备份完成");
        info!("   备份目录: {}", result.output_path.display());

        let size = retention::dir_size(&result.output_path);
        info!("   备份大小: {}", format_size(size));
    } else {
        error!("💡 请检查:");
        error!("   - 数据源是否可达、凭据是否正确");
        error!("   - 备份目录是否有写入权限");
        error!("   - 磁盘空间是否充足");
    }

    Ok(result.exit_code())
}
