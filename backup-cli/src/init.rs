use backup_core::{config::AppConfig, constants::config, error::Result};
use std::path::Path;
use tracing::{info, warn};

/// 运行独立的初始化流程
pub async fn run_init(force: bool) -> Result<()> {
    info!("🗄️  Backup CLI 初始化");
    info!("======================");

    // 检查是否已经初始化过
    if !force && Path::new(config::DEFAULT_CONFIG_FILE).exists() {
        warn!("⚠️  检测到已存在的配置文件");
        info!("如果您要重新初始化，请使用 --force 参数");
        info!("示例: backup-cli init --force");
        return Ok(());
    }

    info!("📋 步骤 1: 创建配置文件");

    let app_config = AppConfig::default();
    app_config.save_to_file(config::DEFAULT_CONFIG_FILE)?;
    info!("   ✅ 创建配置文件: {}", config::DEFAULT_CONFIG_FILE);

    info!("📋 步骤 2: 创建备份根目录");

    std::fs::create_dir_all(&app_config.backup.output_root)?;
    info!("   ✅ 创建备份根目录: {}", app_config.backup.output_root);

    info!("🎉 初始化完成！");
    info!("💡 下一步:");
    info!(
        "   1. 设置 {} 环境变量，或编辑 {} 填写数据源连接串",
        config::SOURCE_URI_ENV,
        config::DEFAULT_CONFIG_FILE
    );
    info!("   2. 执行首次备份: backup-cli run");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_config_and_output_root() {
        let tmp = tempfile::tempdir().unwrap();
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(tmp.path()).unwrap();

        let result = run_init(false).await;

        // 先恢复工作目录再断言，避免影响其他测试
        std::env::set_current_dir(original).unwrap();
        result.unwrap();

        assert!(tmp.path().join("config.toml").exists());
        assert!(tmp.path().join("backups").exists());

        let loaded = AppConfig::load_from_file(tmp.path().join("config.toml")).unwrap();
        assert_eq!(loaded.backup.dump_command, "mongodump");
        assert!(loaded.source.uri.is_empty());
    }
}
