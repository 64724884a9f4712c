//! Account commands: register, login, logout, status and the current user.

use booknook_core::models::{LoginPayload, RegisterPayload};
use booknook_core::validation::{validate_login, validate_registration};
use clap::{Args, Subcommand};

use super::{connect, connect_authenticated, prompt, OutputFormat};
use crate::config::{clear_token, save_token, Config};

#[derive(Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand)]
enum AuthSubcommand {
    /// Create an account and log in
    Register {
        username: String,
        email: String,

        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in with email and password
    Login {
        email: String,

        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the saved token
    Logout,

    /// Show whether a token is saved
    Status,

    /// Show the logged-in user
    Me {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl AuthCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            AuthSubcommand::Register {
                username,
                email,
                password,
            } => {
                let password = password_or_prompt(password.as_deref())?;
                validate_registration(username, email, &password)?;

                let client = connect(config, &OutputFormat::Text);
                client
                    .auth
                    .register(&RegisterPayload::new(username, email, &password))
                    .await?;
                persist_session(config, client.auth.token())?;

                if let Some(user) = client.auth.user() {
                    println!("Signed in as {}", user.username);
                }
                Ok(())
            }

            AuthSubcommand::Login { email, password } => {
                let password = password_or_prompt(password.as_deref())?;
                validate_login(email, &password)?;

                let client = connect(config, &OutputFormat::Text);
                client
                    .auth
                    .login(&LoginPayload::new(email, &password))
                    .await?;
                persist_session(config, client.auth.token())?;

                if let Some(user) = client.auth.user() {
                    println!("Signed in as {}", user.username);
                }
                Ok(())
            }

            AuthSubcommand::Logout => {
                if clear_token(config.path())? {
                    println!("Logged out.");
                } else {
                    println!("Already logged out.");
                }
                Ok(())
            }

            AuthSubcommand::Status => {
                match &config.auth.token {
                    Some(token) => println!("Logged in (token: {})", mask(token)),
                    None => println!("Not logged in. Run 'nook auth login <email>' to sign in."),
                }
                println!("API: {}", config.api_url.value);
                Ok(())
            }

            AuthSubcommand::Me { format } => {
                let client = connect_authenticated(config, format)?;
                client.auth.fetch_me().await?;

                let Some(user) = client.auth.user() else {
                    return Err("Server returned no user".into());
                };
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
                    OutputFormat::Text => print!("{}", user),
                }
                Ok(())
            }
        }
    }
}

fn password_or_prompt(password: Option<&str>) -> std::io::Result<String> {
    match password {
        Some(password) => Ok(password.to_string()),
        None => prompt("Password: "),
    }
}

fn persist_session(
    config: &Config,
    token: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = token.ok_or("Server returned no token")?;
    save_token(config.path(), &token)?;
    tracing::debug!("saved token to {}", config.path().display());
    Ok(())
}

/// Shows only the ends of a token.
fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdefghijkl"), "abcd...ijkl");
        assert_eq!(mask("short"), "****");
    }
}
