use std::path::PathBuf;
use std::process::ExitCode;

use add_distributor_scrape::utils::logging;
use add_distributor_scrape::{App, Config};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

#[derive(Parser)]
#[command(
    name = "add_distributor_scrape",
    about = "抓取 NABP 认证药品分销商列表并保存为 JSON / CSV"
)]
struct Cli {
    /// TOML 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// 列表接口地址（不含查询参数）
    #[arg(long)]
    base_url: Option<String>,
    /// JSON 输出路径
    #[arg(long)]
    json_out: Option<String>,
    /// CSV 输出路径
    #[arg(long)]
    csv_out: Option<String>,
    /// 预取窗口大小（1 为顺序抓取）
    #[arg(short, long)]
    window: Option<usize>,
    /// 单次请求超时（秒）
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// 两次请求之间的最小间隔（毫秒）
    #[arg(long)]
    delay_ms: Option<u64>,
    /// 单页最大重试次数
    #[arg(long)]
    max_retries: Option<u32>,
    /// 失败时仍写出已获取的部分结果
    #[arg(long)]
    write_partial: bool,
    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// 命令行参数覆盖配置
    fn apply(self, mut config: Config) -> Config {
        if let Some(v) = self.base_url {
            config.base_url = v;
        }
        if let Some(v) = self.json_out {
            config.json_output = v;
        }
        if let Some(v) = self.csv_out {
            config.csv_output = v;
        }
        if let Some(v) = self.window {
            config.window = v;
        }
        if let Some(v) = self.timeout_secs {
            config.request_timeout_secs = v;
        }
        if let Some(v) = self.delay_ms {
            config.request_delay_ms = v;
        }
        if let Some(v) = self.max_retries {
            config.max_retries = v;
        }
        config.write_partial |= self.write_partial;
        config.verbose_logging |= self.verbose;
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    // 加载配置
    let loaded = Config::load(cli.config.as_deref());
    let config = match loaded {
        Ok(config) => cli.apply(config),
        Err(e) => {
            logging::init(verbose);
            error!("❌ 加载配置失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    match run(config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<bool> {
    let app = App::initialize(config).context("初始化失败")?;
    let report = app.run().await?;
    Ok(report.is_done())
}
