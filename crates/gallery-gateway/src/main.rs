use anyhow::Context;
use clap::Parser;
use gallery_gateway::{server, Gateway, GatewayConfig};
use std::path::PathBuf;
use std::sync::Arc;

/// Serve gallery images and report image access events
#[derive(Debug, Parser)]
#[command(name = "gallery-gateway", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Image directory (overrides IMAGE_DIR)
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Access-event webhook (overrides WEBHOOK_URL)
    #[arg(long)]
    webhook_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => GatewayConfig::default(),
        }
        .apply_env()
        .context("reading environment")?;

        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(dir) = self.image_dir {
            config = config.with_image_dir(dir);
        }
        if let Some(url) = self.webhook_url {
            config = config.with_webhook_url(url);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    server::init_tracing(cli.log_json);

    let config = cli.into_config()?;
    let gateway = Gateway::new(config).context("building gateway")?;

    server::serve(Arc::new(gateway)).await?;
    Ok(())
}
