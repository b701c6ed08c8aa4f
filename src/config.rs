use clap::Parser;

/// Runtime configuration, read from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "murmur")]
#[command(about = "GraphQL social backend over Redis")]
pub struct Config {
    /// Redis connection URL.
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1/")]
    pub redis_url: String,

    /// Secret used to sign and verify session tokens.
    #[arg(long, env = "JWT_SECRET_KEY")]
    pub jwt_secret: String,

    /// TCP port the HTTP server listens on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Key prefix isolating this deployment's data.
    #[arg(long, env = "MURMUR_PREFIX", default_value = "murmur")]
    pub prefix: String,
}
