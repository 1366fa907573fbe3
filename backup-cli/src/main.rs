use backup_cli::{Cli, CliApp, Commands, run_init, setup_logging};
use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 设置日志记录
    setup_logging(cli.verbose);

    // `init` 命令是特例，它不需要预先加载配置
    if let Commands::Init { force } = cli.command {
        if let Err(e) = run_init(force).await {
            error!("❌ 初始化失败: {}", e);
            std::process::exit(e.exit_code());
        }
        return;
    }

    // 对于其他所有命令，先加载配置并初始化App
    let mut app = match CliApp::new_with_auto_config(&cli.config).await {
        Ok(app) => app,
        Err(e) => {
            error!("❌ 应用初始化失败: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    // 运行命令，按约定映射退出码：0 成功，1 备份失败，2 配置错误
    match app.run_command(cli.command).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("❌ 操作失败: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
