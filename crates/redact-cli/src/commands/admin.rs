use anyhow::{Result, anyhow, bail};
use redact_admin::{DataSource, LogsView, UsersView};
use redact_client::{AdminApi, ClientError, HttpAdminClient};
use redact_config::Config;
use redact_core::LogLevel;
use redact_storage::Storage;
use time::OffsetDateTime;

use super::{confirm, format_time};
use crate::cli::{AdminCommands, UserCommands};

const SESSION_REJECTED: &str =
    "Session rejected by the server; signed out. Run `redact admin login` again.";

pub async fn handle(cmd: AdminCommands, config: &Config, storage: &Storage) -> Result<()> {
    match cmd {
        AdminCommands::Login { username, password } => {
            login(config, storage, &username, password).await
        }
        AdminCommands::Logout => logout(storage).await,
        AdminCommands::Status => status(storage).await,
        AdminCommands::Users(cmd) => {
            let client = signed_in_client(config, storage).await?;
            match cmd {
                UserCommands::List => list_users(storage, &client).await,
                UserCommands::Block { id } => set_blocked(storage, &client, id, true).await,
                UserCommands::Unblock { id } => set_blocked(storage, &client, id, false).await,
                UserCommands::Delete { id, force } => delete_user(storage, &client, id, force).await,
            }
        }
        AdminCommands::Logs { level } => {
            let level = level.map(|l| l.parse::<LogLevel>()).transpose()?;
            let client = signed_in_client(config, storage).await?;
            logs(storage, &client, level).await
        }
        AdminCommands::HashPassword { password } => hash_password(password),
    }
}

async fn login(
    config: &Config,
    storage: &Storage,
    username: &str,
    password: Option<String>,
) -> Result<()> {
    let Some(password) = password else {
        bail!("Password required: pass --password or set REDACT_ADMIN_PASSWORD");
    };

    let client = HttpAdminClient::new(&config.client.admin_url, config.client.timeout())?;
    let session = client.login(username, &password).await.map_err(|e| {
        if e.is_unauthorized() {
            anyhow!("Invalid username or password")
        } else {
            e.into()
        }
    })?;
    storage.save_session(&session).await?;

    println!("✓ Signed in as {}", session.username);
    println!("  Expires: {}", format_time(session.expires_at));
    Ok(())
}

async fn logout(storage: &Storage) -> Result<()> {
    if storage.clear_session().await? {
        println!("✓ Signed out");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

async fn status(storage: &Storage) -> Result<()> {
    let now = OffsetDateTime::now_utc();
    match storage.current_session().await? {
        Some(session) if session.is_valid_at(now) => {
            println!("Signed in as {}", session.username);
            println!("  Since: {}", format_time(session.issued_at));
            println!(
                "  Expires: {} ({} min left)",
                format_time(session.expires_at),
                session.remaining(now).whole_minutes()
            );
        }
        Some(session) => {
            println!(
                "Session for {} expired at {}.",
                session.username,
                format_time(session.expires_at)
            );
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

/// Client carrying the stored session; an expired one is cleared
async fn signed_in_client(config: &Config, storage: &Storage) -> Result<HttpAdminClient> {
    let client = HttpAdminClient::new(&config.client.admin_url, config.client.timeout())?;
    match storage.current_session().await? {
        Some(session) if session.is_valid() => Ok(client.with_session(session)),
        Some(_) => {
            storage.clear_session().await?;
            bail!("Session expired. Run `redact admin login` to sign in again.")
        }
        None => bail!("Not signed in. Run `redact admin login` first."),
    }
}

/// A 401 from the server ends the stored session
async fn signed_out_on_401<T>(storage: &Storage, result: redact_client::Result<T>) -> Result<T> {
    match result {
        Err(e) if e.is_unauthorized() => {
            storage.clear_session().await?;
            bail!(SESSION_REJECTED)
        }
        other => Ok(other?),
    }
}

fn fallback_notice(failure: Option<ClientError>) -> Option<String> {
    failure.map(|e| format!("⚠ Could not reach the admin API ({}); showing sample data.", e))
}

async fn list_users(storage: &Storage, client: &HttpAdminClient) -> Result<()> {
    let mut view = UsersView::new();
    let failure = view.load(client).await;
    if failure.as_ref().is_some_and(ClientError::is_unauthorized) {
        storage.clear_session().await?;
        bail!(SESSION_REJECTED);
    }
    if let Some(notice) = fallback_notice(failure) {
        println!("{}", notice);
    }

    if view.users().is_empty() {
        println!("No users.");
        return Ok(());
    }

    println!("Users:");
    for user in view.users() {
        let state = if user.blocked { "blocked" } else { "active" };
        println!("  {:>3}  {:<16} {:<28} {}", user.id, user.name, user.email, state);
    }
    if view.source() == DataSource::Fallback {
        println!("  (sample data)");
    }
    Ok(())
}

async fn set_blocked(storage: &Storage, client: &HttpAdminClient, id: u64, block: bool) -> Result<()> {
    let user = signed_out_on_401(storage, client.set_blocked(id, block).await).await?;
    let verb = if user.blocked { "Blocked" } else { "Unblocked" };
    println!("✓ {} {} ({})", verb, user.name, user.email);
    Ok(())
}

async fn delete_user(storage: &Storage, client: &HttpAdminClient, id: u64, force: bool) -> Result<()> {
    let users = signed_out_on_401(storage, client.list_users().await).await?;
    let Some(user) = users.into_iter().find(|u| u.id == id) else {
        bail!("No user with id {}", id);
    };

    if !force && !confirm(&format!("Delete user '{}' ({})?", user.name, user.email))? {
        println!("Cancelled.");
        return Ok(());
    }

    signed_out_on_401(storage, client.delete_user(id).await).await?;
    println!("✓ Deleted user: {}", user.name);
    Ok(())
}

async fn logs(storage: &Storage, client: &HttpAdminClient, level: Option<LogLevel>) -> Result<()> {
    let mut view = LogsView::new().with_level(level);
    let failure = view.load(client).await;
    if failure.as_ref().is_some_and(ClientError::is_unauthorized) {
        storage.clear_session().await?;
        bail!(SESSION_REJECTED);
    }
    if let Some(notice) = fallback_notice(failure) {
        println!("{}", notice);
    }

    let entries = view.entries();
    if entries.is_empty() {
        println!("No log entries.");
        return Ok(());
    }

    for entry in entries {
        let at = OffsetDateTime::from_unix_timestamp(entry.timestamp)
            .map(format_time)
            .unwrap_or_else(|_| entry.timestamp.to_string());
        let actor = entry.actor.as_deref().unwrap_or("-");
        println!(
            "  {}  {:<5}  {:<10} {}",
            at,
            entry.level.to_string(),
            actor,
            entry.message
        );
    }
    Ok(())
}

fn hash_password(password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        bail!("Password cannot be empty");
    }

    println!("{}", redact_server::hash_password(&password)?);
    Ok(())
}
