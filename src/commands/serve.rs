//! 数据接口服务
//!
//! 启动时一次性加载 CSV 数据集，之后只读

use actix_web::{middleware::Logger, web, App, HttpServer};

use crate::cli::ServeArgs;
use crate::config::AppConfig;
use crate::handlers;
use crate::services::dataset::Dataset;

pub async fn run(mut config: AppConfig, args: &ServeArgs) -> anyhow::Result<()> {
    if let Some(data) = &args.data {
        config.server.data_file = data.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let dataset = web::Data::new(Dataset::load_or_empty(&config.server.data_file));
    let bind_addr = config.bind_addr();
    log::info!("启动数据接口服务: {}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default()) // 请求日志
            .app_data(dataset.clone())
            .configure(handlers::config)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_addr)?.run().await?;
    Ok(())
}
