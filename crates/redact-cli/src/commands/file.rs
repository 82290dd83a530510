use anyhow::Result;
use redact_client::HttpRedactionClient;
use redact_config::Config;
use redact_core::{CategorySelection, FilenamePolicy, RedactionCategory};
use redact_engine::{DirectorySink, UploadForm};
use redact_storage::Storage;
use std::path::PathBuf;

pub struct FileOptions {
    pub categories: Vec<String>,
    pub exclude: Vec<String>,
    pub output: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub preserve_filename: bool,
}

pub async fn handle(
    config: &Config,
    storage: &Storage,
    path: PathBuf,
    options: FileOptions,
) -> Result<()> {
    let policy = if options.preserve_filename {
        FilenamePolicy::Preserve
    } else {
        config.client.filename_policy
    };

    let mut form = UploadForm::new(config.accept.accept_list(), policy);
    form.set_selection(selection_from(&options.categories, &options.exclude)?);
    form.select(&path).await?;

    let endpoint = options
        .endpoint
        .unwrap_or_else(|| config.client.redact_url.clone());
    let service = HttpRedactionClient::new(endpoint, config.client.timeout())?;
    let sink = DirectorySink::new(
        options
            .output
            .unwrap_or_else(|| config.client.download_dir.clone()),
    );

    println!(
        "Redacting {} ({} of {} categories)...",
        path.display(),
        form.selection().len(),
        RedactionCategory::ALL.len()
    );
    let submission = form.submit(&service, &sink, Some(storage)).await?;

    println!("✓ Redacted {}", submission.job.original_name);
    println!("  Saved to: {}", submission.path.display());
    println!("  Job: {}", submission.job.id);

    Ok(())
}

/// `--category` narrows the set (default: all); `--exclude` removes from it
pub fn selection_from(categories: &[String], exclude: &[String]) -> Result<CategorySelection> {
    let mut selection = if categories.is_empty() {
        CategorySelection::all()
    } else {
        CategorySelection::from_ids(categories)?
    };

    for id in exclude {
        let category: RedactionCategory = id.parse()?;
        selection.set(category, false);
    }
    Ok(selection)
}

pub fn categories(json: bool) -> Result<()> {
    if json {
        let ids: Vec<&str> = RedactionCategory::ALL.iter().map(|c| c.id()).collect();
        println!("{}", serde_json::to_string(&ids)?);
        return Ok(());
    }

    println!("Categories:");
    for category in RedactionCategory::ALL {
        println!("  {:<10} {}", category.id(), category.label());
    }
    Ok(())
}
