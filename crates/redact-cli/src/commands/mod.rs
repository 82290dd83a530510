pub mod admin;
pub mod config;
pub mod file;
pub mod history;
pub mod regions;
pub mod route;
pub mod serve;
pub mod ui;

use anyhow::Result;
use std::io::Write;

/// Ask a yes/no question on stdin; anything but "y" is a no
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// `YYYY-MM-DD HH:MM UTC`
pub fn format_time(at: time::OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02} UTC",
        at.year(),
        at.month() as u8,
        at.day(),
        at.hour(),
        at.minute()
    )
}
