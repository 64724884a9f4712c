mod auth;
mod book;
mod config_cmd;
mod profile;
mod user;

pub use auth::AuthCommand;
pub use book::BookCommand;
pub use config_cmd::ConfigCommand;
pub use profile::ProfileCommand;
pub use user::UserCommand;

use booknook_core::{
    ApiClient, Client, Credentials, Notice, NoticeLevel, Notifier, TracingNotifier,
};
use clap::ValueEnum;
use std::io::{self, Write};
use std::sync::Arc;

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prints success notices. In JSON mode they go to the log so stdout stays
/// machine-readable. Failures reach the user through the returned error, so
/// they are only logged at debug here.
pub struct TerminalNotifier {
    quiet: bool,
    log: TracingNotifier,
}

impl TerminalNotifier {
    pub fn new(format: &OutputFormat) -> Self {
        Self {
            quiet: matches!(format, OutputFormat::Json),
            log: TracingNotifier,
        }
    }

    /// Whether a notice is written to stdout.
    fn prints(&self, notice: &Notice) -> bool {
        !self.quiet && !notice.is_error()
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        if self.prints(&notice) {
            println!("{}", notice);
            return;
        }
        match notice.level {
            NoticeLevel::Success => self.log.notify(notice),
            NoticeLevel::Error => tracing::debug!("{}", notice),
        }
    }
}

/// Stores wired to the configured API, carrying the saved token if any.
pub fn connect(config: &Config, format: &OutputFormat) -> Client {
    let credentials = match &config.auth.token {
        Some(token) => Credentials::with_token(token.clone()),
        None => Credentials::new(),
    };
    let api = ApiClient::new(&config.api_url.value, credentials);
    Client::new(api, Arc::new(TerminalNotifier::new(format)))
}

/// Like [`connect`], but refuses to continue without a saved token.
pub fn connect_authenticated(
    config: &Config,
    format: &OutputFormat,
) -> Result<Client, Box<dyn std::error::Error>> {
    if config.auth.token.is_none() {
        return Err("Not logged in. Run 'nook auth login <email>' first.".into());
    }
    Ok(connect(config, format))
}

/// Asks a yes/no question; anything but `y` means no.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Reads a line from stdin after printing `prompt`.
pub fn prompt(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Truncates `value` to `width` characters for table columns.
pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let kept: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        value.to_string()
    }
}
