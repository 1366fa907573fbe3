/// 备份相关常量
pub mod backup {
    use std::path::{Path, PathBuf};

    /// 默认备份根目录名
    pub const OUTPUT_ROOT_DIR_NAME: &str = "backups";

    /// 备份目录日期格式（每天一个目录）
    pub const DATE_STAMP_FORMAT: &str = "%Y-%m-%d";

    /// 默认的 dump 工具命令名
    pub const DEFAULT_DUMP_COMMAND: &str = "mongodump";

    /// 默认单次备份超时（秒）
    pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

    /// 获取默认备份根目录路径（跨平台）
    pub fn get_default_output_root() -> PathBuf {
        Path::new(".").join(OUTPUT_ROOT_DIR_NAME)
    }
}

/// 配置文件相关常量
pub mod config {
    /// 数据源连接串的环境变量名
    pub const SOURCE_URI_ENV: &str = "MONGODB_URI";

    /// 按优先级查找的配置文件名
    pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
        ["config.toml", "backup-cli.toml", ".backup-cli.toml"];

    /// 默认配置文件名
    pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
}
