use anyhow::Result;
use redact_config::Config;

pub fn handle(config: &Config, path_only: bool) -> Result<()> {
    let path = Config::config_path();
    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    let mut shown = config.clone();
    if !shown.server.admin_password.is_empty() {
        shown.server.admin_password = "********".to_string();
    }

    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&shown)?);
    println!();
    println!("# Database: {}", Config::data_path().display());
    Ok(())
}
