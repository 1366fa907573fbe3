use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Backup CLI - MongoDB 定期备份编排工具
#[derive(Parser)]
#[command(name = "backup-cli")]
#[command(about = "MongoDB 定期备份编排工具", version)]
pub struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// 详细输出
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 执行一次备份
    Run {
        /// 数据源连接串（优先级高于配置文件）
        #[arg(long, env = "MONGODB_URI", hide_env_values = true)]
        source_uri: Option<String>,

        /// 备份根目录，实际输出为 {output_root}/<YYYY-MM-DD>
        #[arg(long)]
        output_root: Option<PathBuf>,

        /// 单次备份超时（秒）
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// 首次使用时初始化，创建配置文件和备份目录
    Init {
        /// 如果配置文件已存在，强制覆盖
        #[arg(long)]
        force: bool,
    },
    /// 列出所有备份目录
    ListBackups,
    /// 按保留策略清理历史备份
    Prune {
        /// 保留最近 N 天的备份（不指定则读配置文件）
        #[arg(long)]
        keep: Option<u32>,
    },
}
