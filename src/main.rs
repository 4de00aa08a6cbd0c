// ==========================================
// GSTR-1 汇总工具 - 命令行入口
// ==========================================
// 职责: 参数解析 → 加载配置 → 生成报表 → 写出文件
// 红线: 任一错误以单条可读消息退出（退出码 1），不写出任何文件
// ==========================================

use anyhow::{Context, Result};
use clap::Parser;
use gstr1_consolidator::engine::SourceUpload;
use gstr1_consolidator::{logging, Platform, ReportApi};
use std::path::PathBuf;

/// Consolidate marketplace sales reports into a GSTR-1 B2CS / TCS workbook
#[derive(Parser, Debug)]
#[command(name = "gstr1-consolidator", version)]
struct Args {
    /// Amazon sales report (.csv / .xlsx / .xls)
    #[arg(long)]
    amazon: Option<PathBuf>,

    /// Shopify orders export (.csv / .xlsx / .xls)
    #[arg(long)]
    shopify: Option<PathBuf>,

    /// Flipkart sales report (.csv / .xlsx / .xls)
    #[arg(long)]
    flipkart: Option<PathBuf>,

    /// Output directory or .xlsx file path
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// JSON config file (defaults: $GSTR1_CONFIG, then the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the computed summaries as JSON on stdout
    #[arg(long)]
    summary_json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn uploads(&self) -> Vec<SourceUpload> {
        [
            (Platform::Amazon, &self.amazon),
            (Platform::Shopify, &self.shopify),
            (Platform::Flipkart, &self.flipkart),
        ]
        .into_iter()
        .filter_map(|(platform, path)| {
            path.as_ref()
                .map(|path| SourceUpload::new(platform, path.clone()))
        })
        .collect()
    }
}

fn run(args: &Args) -> Result<()> {
    let api = ReportApi::from_config_path(args.config.as_deref())
        .context("failed to load configuration")?;

    let artifact = api.generate(&args.uploads())?;
    let written = artifact.write_to(&args.output)?;

    if args.summary_json {
        let json = serde_json::to_string_pretty(&artifact.bundle)
            .context("failed to serialize summary")?;
        println!("{}", json);
    }

    tracing::info!(
        path = %written.display(),
        sheets = ?artifact.sheet_names(),
        "GSTR-1 报表生成成功"
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_json);

    tracing::info!(
        version = gstr1_consolidator::VERSION,
        "{}",
        gstr1_consolidator::APP_NAME
    );

    run(&args).map_err(|err| {
        tracing::error!(error = %format!("{:#}", err), "报表生成失败");
        err
    })
}
