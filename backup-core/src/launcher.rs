use crate::error::{BackupError, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// dump 进程的终态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpOutput {
    /// 进程自行退出，code 为 None 表示被信号终止
    Exited { code: Option<i32>, stderr: String },
    /// 超过配置的超时，进程已被终止并回收
    TimedOut,
}

/// dump 进程启动器抽象，测试时可替换为记录调用的假实现
#[allow(async_fn_in_trait)]
pub trait DumpLauncher: Send + Sync {
    async fn launch(
        &self,
        source_uri: &str,
        output_path: &Path,
        timeout: Duration,
    ) -> Result<DumpOutput>;
}

/// 调用 mongodump（或兼容工具）的真实启动器
#[derive(Debug, Clone)]
pub struct MongodumpLauncher {
    command: String,
}

impl MongodumpLauncher {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl DumpLauncher for MongodumpLauncher {
    async fn launch(
        &self,
        source_uri: &str,
        output_path: &Path,
        timeout: Duration,
    ) -> Result<DumpOutput> {
        // 预检命令是否存在，给出比裸 NotFound 更直白的提示
        if which::which(&self.command).is_err() {
            return Err(BackupError::spawn(format!(
                "{} 未安装或不在 PATH 中",
                self.command
            )));
        }

        // 连接串作为独立参数传递，不经过 shell，避免注入
        let mut child = Command::new(&self.command)
            .arg(format!("--uri={source_uri}"))
            .arg(format!("--out={}", output_path.display()))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BackupError::spawn(e.to_string()))?;

        // 并发读取 stderr，防止管道写满阻塞子进程
        let stderr_pipe = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(mut pipe) = stderr_pipe {
                let _ = pipe.read_to_string(&mut buf).await;
            }
            buf
        });

        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(status) => {
                let status = status?;
                let stderr = stderr_task.await?;
                Ok(DumpOutput::Exited {
                    code: status.code(),
                    stderr,
                })
            }
            Err(_) => {
                // 超时：终止并回收子进程，kill_on_drop 兜底崩溃路径
                let _ = child.start_kill();
                let _ = child.wait().await;
                stderr_task.abort();
                Ok(DumpOutput::TimedOut)
            }
        }
    }
}
