use anyhow::Result;
use redact_config::Config;

pub async fn handle(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut server = config.server.clone();
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }

    println!("Starting redaction service on {}", server.bind_addr());
    redact_server::serve(&server).await
}
