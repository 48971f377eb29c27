/// 日志工具模块
///
/// 提供日志初始化以及启动/结束信息的输出
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::{RunOutcome, RunReport};

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则 verbose 时为 debug，默认 info。重复初始化会被忽略
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始抓取 NABP 认证药品分销商列表");
    info!("🌐 接口: {}", config.base_url);
    info!(
        "📊 预取窗口: {} | 请求间隔: {}ms | 超时: {}s | 重试: {} 次",
        config.window, config.request_delay_ms, config.request_timeout_secs, config.max_retries
    );
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(report: &RunReport, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 抓取统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    match &report.outcome {
        RunOutcome::Done(_) => {
            info!("✅ 抓取完成，数据已保存");
            info!(
                "NABP 认证药品分销商 (ADD) 数量: {}",
                report.records.len()
            );
            info!("输出文件: {} / {}", config.json_output, config.csv_output);
        }
        RunOutcome::Failed { index, error } => {
            info!("❌ 第 {} 页失败: {}", index + 1, error);
            info!("已获取记录: {} (来自 {} 页)", report.records.len(), report.pages_committed);
        }
    }
    info!(
        "发起请求: {} | 有效页: {}",
        report.probes_issued, report.pages_committed
    );
    info!("{}", "=".repeat(60));
}
