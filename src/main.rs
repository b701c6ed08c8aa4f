use clap::Parser;

use murmur::{config::Config, server};

#[tokio::main]
async fn main() {
    env_logger::init();
    let config = Config::parse();
    if let Err(err) = server::run(config).await {
        eprintln!("fatal: {err:#}");
        std::process::exit(1);
    }
}
