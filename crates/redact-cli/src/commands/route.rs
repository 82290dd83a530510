use anyhow::Result;
use redact_admin::navigate;
use redact_core::Navigation;
use redact_storage::Storage;
use time::OffsetDateTime;

pub async fn handle(storage: &Storage, path: &str) -> Result<()> {
    let session = storage.current_session().await?;
    match navigate(path, session.as_ref(), OffsetDateTime::now_utc()) {
        Navigation::Render(route) => println!("✓ {} renders {}", path, route),
        Navigation::Redirect(route) => println!("→ {} redirects to {}", path, route),
    }
    Ok(())
}
