use crate::clock::{Clock, date_stamp};
use crate::config::AppConfig;
use crate::error::{BackupError, Result};
use crate::launcher::{DumpLauncher, DumpOutput};
use crate::redact::redact_uri;
use crate::retention;
use std::path::PathBuf;

/// 单次备份请求，构建后不可变
#[derive(Debug, Clone)]
pub struct BackupRequest {
    /// 数据源连接串（含凭据，禁止原样写入日志）
    pub source_uri: String,
    pub output_root: PathBuf,
    /// 本次运行的日期戳，只在构建时取一次
    pub date_stamp: String,
}

impl BackupRequest {
    /// 输出目录恒为 {output_root}/{date_stamp}，同日重复执行覆盖写
    pub fn output_path(&self) -> PathBuf {
        self.output_root.join(&self.date_stamp)
    }
}

/// 单次备份的终态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOutcome {
    Success,
    Failure,
}

/// 单次备份结果，每次运行恰好产生一个
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupResult {
    pub outcome: BackupOutcome,
    pub output_path: PathBuf,
    pub error_detail: Option<String>,
}

impl BackupResult {
    fn success(output_path: PathBuf) -> Self {
        Self {
            outcome: BackupOutcome::Success,
            output_path,
            error_detail: None,
        }
    }

    fn failure(output_path: PathBuf, detail: impl Into<String>) -> Self {
        Self {
            outcome: BackupOutcome::Failure,
            output_path,
            error_detail: Some(detail.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == BackupOutcome::Success
    }

    /// 进程退出码约定：0 成功，1 备份失败
    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            BackupOutcome::Success => 0,
            BackupOutcome::Failure => 1,
        }
    }
}

/// 备份编排器
///
/// 线性流程：校验配置 -> 构建请求 -> 启动 dump 进程 -> 等待 -> 归类
/// -> 校验产物 -> 清理历史 -> 上报。没有重试，没有并发。
#[derive(Debug, Clone)]
pub struct BackupOrchestrator<L, C> {
    launcher: L,
    clock: C,
}

impl<L: DumpLauncher, C: Clock> BackupOrchestrator<L, C> {
    pub fn new(launcher: L, clock: C) -> Self {
        Self { launcher, clock }
    }

    /// 执行一次备份
    ///
    /// 配置错误和输出目录不可写在进程启动之前就返回 Err；
    /// dump 进程的启动失败、非零退出和超时都归类为 Failure 结果。
    pub async fn run(&self, config: &AppConfig) -> Result<BackupResult> {
        config.validate()?;

        let request = BackupRequest {
            source_uri: config.source.uri.clone(),
            output_root: config.get_output_root(),
            date_stamp: date_stamp(self.clock.today()),
        };
        let output_path = request.output_path();

        tracing::info!(
            "开始备份: {} -> {}",
            redact_uri(&request.source_uri),
            output_path.display()
        );

        tokio::fs::create_dir_all(&output_path).await.map_err(|e| {
            BackupError::filesystem(format!(
                "无法创建备份目录 {}: {e}",
                output_path.display()
            ))
        })?;

        let result = match self
            .launcher
            .launch(&request.source_uri, &output_path, config.get_timeout())
            .await
        {
            Ok(DumpOutput::Exited {
                code: Some(0),
                stderr: _,
            }) => {
                if config.backup.verify {
                    self.verify_output(output_path.clone()).await?
                } else {
                    BackupResult::success(output_path.clone())
                }
            }
            Ok(DumpOutput::Exited { code, stderr }) => {
                let stderr = stderr.trim();
                let detail = if stderr.is_empty() {
                    match code {
                        Some(code) => format!("dump 进程退出码 {code}"),
                        None => "dump 进程被信号终止".to_string(),
                    }
                } else {
                    stderr.to_string()
                };
                BackupResult::failure(output_path.clone(), detail)
            }
            Ok(DumpOutput::TimedOut) => BackupResult::failure(output_path.clone(), "timeout"),
            Err(BackupError::Spawn(msg)) => BackupResult::failure(output_path.clone(), msg),
            Err(e) => return Err(e),
        };

        match result.outcome {
            BackupOutcome::Success => {
                tracing::info!("✅ 备份成功: {}", request.date_stamp);

                if let Some(keep) = config.backup.keep {
                    // 清理失败只告警，不改变本次备份的结果
                    if let Err(e) = retention::prune_dated_dirs(&request.output_root, keep).await {
                        tracing::warn!("⚠️  清理历史备份失败: {}", e);
                    }
                }
            }
            BackupOutcome::Failure => {
                tracing::error!(
                    "❌ 备份失败: {}",
                    result.error_detail.as_deref().unwrap_or("未知原因")
                );
            }
        }

        Ok(result)
    }

    /// 校验 dump 产物：退出码为 0 但输出目录为空视为失败
    async fn verify_output(&self, output_path: PathBuf) -> Result<BackupResult> {
        let mut entries = tokio::fs::read_dir(&output_path).await?;

        if entries.next_entry().await?.is_none() {
            return Ok(BackupResult::failure(
                output_path,
                "备份校验失败: 输出目录为空",
            ));
        }

        Ok(BackupResult::success(output_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;

    /// 记录每次调用的假启动器
    struct FakeLauncher {
        calls: Mutex<Vec<(String, PathBuf, Duration)>>,
        output: DumpOutput,
        /// 模拟启动失败
        spawn_error: Option<String>,
        /// 模拟 dump 产物
        write_marker: bool,
    }

    impl FakeLauncher {
        fn exiting(code: i32, stderr: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                output: DumpOutput::Exited {
                    code: Some(code),
                    stderr: stderr.to_string(),
                },
                spawn_error: None,
                write_marker: code == 0,
            }
        }

        fn timing_out() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                output: DumpOutput::TimedOut,
                spawn_error: None,
                write_marker: false,
            }
        }

        fn failing_to_spawn(msg: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                output: DumpOutput::TimedOut,
                spawn_error: Some(msg.to_string()),
                write_marker: false,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl DumpLauncher for FakeLauncher {
        async fn launch(
            &self,
            source_uri: &str,
            output_path: &Path,
            timeout: Duration,
        ) -> Result<DumpOutput> {
            self.calls.lock().unwrap().push((
                source_uri.to_string(),
                output_path.to_path_buf(),
                timeout,
            ));

            if let Some(msg) = &self.spawn_error {
                return Err(BackupError::spawn(msg.clone()));
            }

            if self.write_marker {
                std::fs::write(output_path.join("dump.bson"), b"data")?;
            }

            Ok(self.output.clone())
        }
    }

    fn fixed_clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn test_config(root: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.source.uri = "mongodb://localhost:27017/test".to_string();
        config.backup.output_root = root.to_string_lossy().to_string();
        config
    }

    #[tokio::test]
    async fn test_successful_backup() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let orchestrator = BackupOrchestrator::new(FakeLauncher::exiting(0, ""), fixed_clock());

        let result = orchestrator.run(&config).await.unwrap();

        assert_eq!(result.outcome, BackupOutcome::Success);
        assert_eq!(result.output_path, tmp.path().join("2024-05-01"));
        assert_eq!(result.error_detail, None);
        assert_eq!(result.exit_code(), 0);

        let calls = orchestrator.launcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "mongodb://localhost:27017/test");
        assert_eq!(calls[0].1, tmp.path().join("2024-05-01"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure_with_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let orchestrator = BackupOrchestrator::new(
            FakeLauncher::exiting(1, "connection refused\n"),
            fixed_clock(),
        );

        let result = orchestrator.run(&config).await.unwrap();

        assert_eq!(result.outcome, BackupOutcome::Failure);
        assert_eq!(result.output_path, tmp.path().join("2024-05-01"));
        assert_eq!(result.error_detail.as_deref(), Some("connection refused"));
        assert_eq!(result.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_nonzero_exit_without_stderr_has_detail() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let orchestrator = BackupOrchestrator::new(FakeLauncher::exiting(3, ""), fixed_clock());

        let result = orchestrator.run(&config).await.unwrap();

        assert_eq!(result.outcome, BackupOutcome::Failure);
        // 失败结果的 error_detail 永远非空
        assert!(!result.error_detail.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_uri_fails_before_spawn() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = test_config(tmp.path());
        config.source.uri = String::new();

        let launcher = FakeLauncher::exiting(0, "");
        let orchestrator = BackupOrchestrator::new(launcher, fixed_clock());

        let err = orchestrator.run(&config).await.unwrap_err();
        assert!(matches!(err, BackupError::Config(_)));
        assert_eq!(err.exit_code(), 2);
        // 配置校验失败时不允许触碰启动器
        assert_eq!(orchestrator.launcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_is_failure_with_timeout_detail() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let orchestrator = BackupOrchestrator::new(FakeLauncher::timing_out(), fixed_clock());

        let result = orchestrator.run(&config).await.unwrap();

        assert_eq!(result.outcome, BackupOutcome::Failure);
        assert_eq!(result.error_detail.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn test_spawn_error_is_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let orchestrator = BackupOrchestrator::new(
            FakeLauncher::failing_to_spawn("mongodump 未安装或不在 PATH 中"),
            fixed_clock(),
        );

        let result = orchestrator.run(&config).await.unwrap();

        assert_eq!(result.outcome, BackupOutcome::Failure);
        assert!(result.error_detail.unwrap().contains("mongodump"));
    }

    #[tokio::test]
    async fn test_verify_rejects_empty_output() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());

        // 退出码为 0 但不写任何产物
        let mut launcher = FakeLauncher::exiting(0, "");
        launcher.write_marker = false;
        let orchestrator = BackupOrchestrator::new(launcher, fixed_clock());

        let result = orchestrator.run(&config).await.unwrap();

        assert_eq!(result.outcome, BackupOutcome::Failure);
        assert!(!result.error_detail.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verify_disabled_trusts_exit_code() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = test_config(tmp.path());
        config.backup.verify = false;

        let mut launcher = FakeLauncher::exiting(0, "");
        launcher.write_marker = false;
        let orchestrator = BackupOrchestrator::new(launcher, fixed_clock());

        let result = orchestrator.run(&config).await.unwrap();
        assert_eq!(result.outcome, BackupOutcome::Success);
    }

    #[tokio::test]
    async fn test_success_prunes_old_backups() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["2024-04-28", "2024-04-29", "2024-04-30"] {
            std::fs::create_dir_all(tmp.path().join(name)).unwrap();
        }

        let mut config = test_config(tmp.path());
        config.backup.keep = Some(2);

        let orchestrator = BackupOrchestrator::new(FakeLauncher::exiting(0, ""), fixed_clock());
        let result = orchestrator.run(&config).await.unwrap();

        assert_eq!(result.outcome, BackupOutcome::Success);
        // 保留最新 2 个：2024-04-30 和刚写入的 2024-05-01
        assert!(!tmp.path().join("2024-04-28").exists());
        assert!(!tmp.path().join("2024-04-29").exists());
        assert!(tmp.path().join("2024-04-30").exists());
        assert!(tmp.path().join("2024-05-01").exists());
    }

    #[tokio::test]
    async fn test_failure_does_not_prune() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["2024-04-28", "2024-04-29", "2024-04-30"] {
            std::fs::create_dir_all(tmp.path().join(name)).unwrap();
        }

        let mut config = test_config(tmp.path());
        config.backup.keep = Some(1);

        let orchestrator =
            BackupOrchestrator::new(FakeLauncher::exiting(1, "disk full"), fixed_clock());
        let result = orchestrator.run(&config).await.unwrap();

        assert_eq!(result.outcome, BackupOutcome::Failure);
        assert!(tmp.path().join("2024-04-28").exists());
        assert!(tmp.path().join("2024-04-29").exists());
        assert!(tmp.path().join("2024-04-30").exists());
    }

    #[tokio::test]
    async fn test_same_day_runs_share_output_path() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        let orchestrator = BackupOrchestrator::new(FakeLauncher::exiting(0, ""), fixed_clock());

        let first = orchestrator.run(&config).await.unwrap();
        let second = orchestrator.run(&config).await.unwrap();

        // 同一天的两次执行写同一个目录，后写覆盖
        assert_eq!(first.output_path, second.output_path);
    }
}
