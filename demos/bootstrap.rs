//! 数据源引导示例
//!
//! 根据 APP_ENV 构建数据源配置，打开数据库并执行迁移
//!
//! ```sh
//! APP_ENV=development cargo run --example bootstrap
//! ```

use rat_logger::{LevelFilter, LoggerBuilder, handler::term};
use social_datasource::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let environment = Environment::from_env();
    let options = app_data_source(environment);

    // 初始化日志系统
    let level = if options.logging() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    LoggerBuilder::new()
        .with_level(level)
        .add_terminal_with_config(term::TermConfig::default())
        .init()?;

    println!("=== {} ===", social_datasource::get_info());
    println!("运行环境: {}", environment.as_str());
    println!("数据库文件: {}", options.database());
    println!("迁移脚本: {}", options.migrations());

    let mut data_source = DataSource::new(options);
    data_source.initialize().await?;
    println!("已注册实体: {:?}", data_source.registry().names());

    let applied = data_source.run_migrations().await?;
    for script in &applied {
        println!("✅ 已执行迁移: {}", script.full_name());
    }
    if applied.is_empty() {
        println!("没有待执行的迁移");
    }

    data_source.destroy().await?;
    Ok(())
}
