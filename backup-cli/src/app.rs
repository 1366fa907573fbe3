use backup_core::{config::AppConfig, error::Result};
use std::path::Path;

use crate::cli::Commands;
use crate::commands;

pub struct CliApp {
    pub config: AppConfig,
}

impl CliApp {
    /// 使用智能配置查找初始化CLI应用
    pub async fn new_with_auto_config(config_path: &Path) -> Result<Self> {
        let config = if config_path.exists() {
            tracing::info!("找到配置文件: {}", config_path.display());
            AppConfig::load_from_file(config_path)?
        } else {
            AppConfig::find_and_load_config()?
        };

        Ok(Self { config })
    }

    /// 运行应用命令，返回进程退出码（0 成功，1 备份失败，2 配置错误）
    pub async fn run_command(&mut self, command: Commands) -> Result<i32> {
        match command {
            Commands::Run {
                source_uri,
                output_root,
                timeout,
            } => commands::run_backup(self, source_uri, output_root, timeout).await,
            Commands::Init { .. } => unreachable!(), // 已经在 main.rs 中处理
            Commands::ListBackups => commands::run_list_backups(self).await.map(|_| 0),
            Commands::Prune { keep } => commands::run_prune(self, keep).await.map(|_| 0),
        }
    }
}
