use lighthouse_batch_check::{logger, ActiveConfig, App};
use std::env;
use std::path::Path;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // 初始化日志
    logger::init();

    // 命令行：<配置文件> [分组名]
    let args: Vec<String> = env::args().collect();
    let Some(config_path) = args.get(1) else {
        eprintln!("用法: lighthouse_batch_check <配置文件> [分组名]");
        return ExitCode::from(1);
    };
    let group = args.get(2).map(String::as_str);

    // 配置错误是致命的：不执行任何审计，直接以退出码 1 结束
    let config = match ActiveConfig::load(Path::new(config_path), group) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {}", e);
            return ExitCode::from(1);
        }
    };

    // 初始化并运行应用
    match App::new(config).run().await {
        Ok(outcome) => ExitCode::from(outcome.exit_code() as u8),
        Err(e) => {
            error!("❌ 运行失败: {}", e);
            ExitCode::from(1)
        }
    }
}
