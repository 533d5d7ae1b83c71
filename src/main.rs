use anyhow::Result;
use ljk_batch_submit::utils::logging;
use ljk_batch_submit::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（第一个参数可指定配置文件）
    let config_path = std::env::args().nth(1);
    let config = Config::load(config_path.as_deref().map(std::path::Path::new))?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let _summary = App::initialize(config)?.run().await?;

    Ok(())
}
