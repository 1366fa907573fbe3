use crate::constants::{backup, config};
use crate::error::{BackupError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use toml;

/// 应用配置结构
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub backup: BackupConfig,
}

/// 数据源配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceConfig {
    /// 数据源连接串（含凭据，禁止原样写入日志）
    pub uri: String,
}

/// 备份行为配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackupConfig {
    /// 备份根目录，实际输出为 {output_root}/{YYYY-MM-DD}
    pub output_root: String,
    /// 单次备份超时（秒）
    pub timeout_secs: u64,
    /// dump 工具命令名或路径
    pub dump_command: String,
    /// 备份成功后校验输出目录非空
    pub verify: bool,
    /// 保留最近 N 天的备份目录，不设置则不清理
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                uri: String::new(),
            },
            backup: BackupConfig {
                output_root: backup::get_default_output_root()
                    .to_string_lossy()
                    .to_string(),
                timeout_secs: backup::DEFAULT_TIMEOUT_SECS,
                dump_command: backup::DEFAULT_DUMP_COMMAND.to_string(),
                verify: true,
                keep: None,
            },
        }
    }
}

impl AppConfig {
    /// 智能查找并加载配置文件
    /// 按优先级查找：config.toml -> backup-cli.toml -> .backup-cli.toml
    pub fn find_and_load_config() -> Result<Self> {
        for config_file in &config::CONFIG_FILE_CANDIDATES {
            if Path::new(config_file).exists() {
                tracing::info!("找到配置文件: {}", config_file);
                return Self::load_from_file(config_file);
            }
        }

        // 没找到配置文件时使用默认配置，连接串依赖环境变量或命令行参数补齐
        tracing::debug!("未找到配置文件，使用默认配置");
        Ok(Self::default())
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_with_comments();
        fs::write(&path, content)?;
        Ok(())
    }

    /// 生成带注释的TOML配置
    fn to_toml_with_comments(&self) -> String {
        const TEMPLATE: &str = include_str!("../templates/config.toml.template");

        TEMPLATE
            .replace("{source_uri}", &self.source.uri)
            .replace("{output_root}", &self.backup.output_root)
            .replace("{timeout_secs}", &self.backup.timeout_secs.to_string())
            .replace("{dump_command}", &self.backup.dump_command)
            .replace("{verify}", &self.backup.verify.to_string())
    }

    /// 启动前校验配置，任何失败都发生在进程启动之前
    pub fn validate(&self) -> Result<()> {
        if self.source.uri.trim().is_empty() {
            return Err(BackupError::config(format!(
                "数据源连接串为空，请通过 --source-uri、{} 环境变量或配置文件设置",
                config::SOURCE_URI_ENV
            )));
        }

        if self.backup.output_root.trim().is_empty() {
            return Err(BackupError::config("备份根目录为空"));
        }

        if self.backup.dump_command.trim().is_empty() {
            return Err(BackupError::config("dump 工具命令为空"));
        }

        Ok(())
    }

    /// 获取备份根目录路径
    pub fn get_output_root(&self) -> PathBuf {
        PathBuf::from(&self.backup.output_root)
    }

    /// 获取超时时长
    pub fn get_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.backup.timeout_secs)
    }
}
