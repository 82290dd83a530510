use anyhow::Result;
use redact_client::{HttpAdminClient, HttpRedactionClient};
use redact_config::Config;
use redact_engine::{DirectorySink, UploadForm};
use redact_storage::Storage;
use redact_tui::{App, Services};
use std::path::PathBuf;
use std::sync::Arc;

pub async fn handle(config: &Config, storage: &Storage, path: Option<PathBuf>) -> Result<()> {
    let mut form = UploadForm::new(config.accept.accept_list(), config.client.filename_policy);
    if let Some(path) = path {
        form.select(&path).await?;
    }

    let session = storage
        .current_session()
        .await?
        .filter(|session| session.is_valid());
    let mut admin = HttpAdminClient::new(&config.client.admin_url, config.client.timeout())?;
    if let Some(session) = session.clone() {
        admin = admin.with_session(session);
    }

    let services = Services {
        redaction: Arc::new(HttpRedactionClient::new(
            config.client.redact_url.clone(),
            config.client.timeout(),
        )?),
        sink: Arc::new(DirectorySink::new(config.client.download_dir.clone())),
        admin: Arc::new(admin),
        storage: Some(storage.clone()),
    };

    redact_tui::run(App::new(form, services, session)).await
}
