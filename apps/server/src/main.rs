use anyhow::Context;
use lms::domain::config::ApiConfig;
use lms::kernel::config::load_config;
use lms_server::{Server, init_logging};

#[lms_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "server".to_owned());
    let cfg: ApiConfig = load_config(Some(&path)).context("Critical: Configuration is malformed")?;

    let _log = init_logging(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    Server::builder().config(cfg).build()?.run().await
}
