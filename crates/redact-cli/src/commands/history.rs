use anyhow::Result;
use redact_core::JobStatus;
use redact_storage::Storage;

use super::format_time;

pub async fn handle(storage: &Storage, limit: usize) -> Result<()> {
    let jobs = storage.list_jobs(limit).await?;

    if jobs.is_empty() {
        println!("No redactions recorded yet.");
        return Ok(());
    }

    println!("Recent redactions:");
    for job in jobs {
        let mark = match job.status {
            JobStatus::Succeeded => "✓",
            JobStatus::Failed => "✗",
        };
        println!(
            "  {} {}  {} (sent as {})",
            mark,
            format_time(job.created_at),
            job.original_name,
            job.transmitted_name
        );
        let ids: Vec<&str> = job.categories.iter().map(|c| c.id()).collect();
        println!("    Categories: {}", ids.join(", "));
        if let Some(output) = &job.output_path {
            println!("    Output: {}", output);
        }
        if let Some(error) = &job.error {
            println!("    Error: {}", error);
        }
    }

    Ok(())
}
