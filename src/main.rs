use trackpixel::{config, runtime, system};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 配置先于日志系统初始化，日志级别取自配置
    config::init_config();
    let config = config::get_config();

    // guard 存活期间非阻塞日志才能落盘
    let _guard = system::logging::init_logging(&config.logging);

    runtime::run_server().await
}
