use thiserror::Error;

pub type Result<T> = std::result::Result<T, BackupError>;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("配置文件解析错误: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("文件系统错误: {0}")]
    Filesystem(String),

    #[error("无法启动备份进程: {0}")]
    Spawn(String),

    #[error("备份进程异常退出: {0}")]
    Process(String),

    #[error("备份进程超时")]
    Timeout,

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("任务执行错误: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("自定义错误: {0}")]
    Custom(String),
}

impl BackupError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn filesystem(msg: impl Into<String>) -> Self {
        Self::Filesystem(msg.into())
    }

    pub fn spawn(msg: impl Into<String>) -> Self {
        Self::Spawn(msg.into())
    }

    pub fn process(msg: impl Into<String>) -> Self {
        Self::Process(msg.into())
    }

    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// 进程退出码约定：0 成功，1 备份失败，2 配置错误
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Toml(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(BackupError::config("uri 为空").exit_code(), 2);
        assert_eq!(BackupError::Timeout.exit_code(), 1);
        assert_eq!(BackupError::spawn("not found").exit_code(), 1);
        assert_eq!(BackupError::filesystem("只读目录").exit_code(), 1);
    }
}
