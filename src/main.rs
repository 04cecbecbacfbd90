// ==========================================
// EMAGE 关联加载器 - 命令行入口
// ==========================================
// 用法:
//   emage-load [config.json]
// 配置: JSON 文件 + 环境变量（见 config::config_keys）
// 退出码: 0 = 成功; 1 = 任一致命错误
// ==========================================

use anyhow::{bail, Context};
use emage_load::db::{missing_tables, open_shared_connection};
use emage_load::{logging, ConfigError, LoadConfig, LoadError, LoadSummary, SqliteLoadPipeline};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", emage_load::APP_NAME, emage_load::VERSION);
    tracing::info!("==================================================");

    match run() {
        Ok(summary) => {
            println!("Number of discrepancies: {}", summary.discrepancies);
            println!("Number of EMAGE associations: {}", summary.associations);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let configuration = err.downcast_ref::<ConfigError>().is_some()
                || err
                    .downcast_ref::<LoadError>()
                    .map(LoadError::is_configuration)
                    .unwrap_or(false);
            tracing::error!(configuration, error = %format!("{:#}", err), "加载中止");

            // 致命诊断写到 stdout
            println!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<LoadSummary> {
    let config_file = std::env::args().nth(1).map(PathBuf::from);
    let config = LoadConfig::from_env(config_file.as_deref()).context("配置装配失败")?;

    let conn = open_shared_connection(&config.db_path)
        .with_context(|| format!("无法打开数据库: {}", config.db_path))?;

    {
        let guard = conn
            .lock()
            .map_err(|e| anyhow::anyhow!("数据库锁获取失败: {}", e))?;
        let missing = missing_tables(&guard)?;
        if !missing.is_empty() {
            bail!("数据库缺少必需表: {}", missing.join(", "));
        }
    }

    let pipeline = SqliteLoadPipeline::from_connection(conn, &config.temp_table)?;
    let summary = pipeline.run(&config)?;
    Ok(summary)
}
