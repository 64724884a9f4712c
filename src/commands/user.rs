use booknook_core::models::{Avatar, UserUpdate};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use super::{confirm, connect_authenticated, truncate, OutputFormat};
use crate::config::Config;
use crate::profile::image_mime_type;

#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// List registered users
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update a user's profile on the server
    Update {
        /// User ID
        id: String,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        /// Image file to upload as the avatar
        #[arg(long, value_name = "PATH")]
        avatar: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a user
    Delete {
        /// User ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl UserCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            UserSubcommand::List { format } => {
                let client = connect_authenticated(config, format)?;
                client.users.fetch_all().await?;
                let users = client.users.snapshot().items;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&users)?);
                    }
                    OutputFormat::Text => {
                        if users.is_empty() {
                            println!("No users found");
                            return Ok(());
                        }
                        println!("{:<26}  {:<20}  EMAIL", "ID", "USERNAME");
                        println!("{}", "-".repeat(80));
                        for user in &users {
                            println!(
                                "{:<26}  {:<20}  {}",
                                user.id,
                                truncate(&user.username, 20),
                                user.email
                            );
                        }
                        println!("\nTotal: {} user(s)", users.len());
                    }
                }
                Ok(())
            }

            UserSubcommand::Update {
                id,
                username,
                email,
                bio,
                avatar,
                format,
            } => {
                let update = UserUpdate {
                    username: username.clone(),
                    email: email.clone(),
                    bio: bio.clone(),
                    avatar: avatar.as_deref().map(read_avatar).transpose()?,
                };
                if update.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let client = connect_authenticated(config, format)?;
                client.users.fetch_all().await?;
                client.users.update(id, &update).await?;

                if let Some(user) = client.users.snapshot().get(id) {
                    match format {
                        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(user)?),
                        OutputFormat::Text => print!("{}", user),
                    }
                }
                Ok(())
            }

            UserSubcommand::Delete { id, force } => {
                if !force && !confirm(&format!("Delete user '{}'?", id))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                let client = connect_authenticated(config, &OutputFormat::Text)?;
                client.users.remove(id).await?;
                Ok(())
            }
        }
    }
}

fn read_avatar(path: &Path) -> Result<Avatar, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read avatar '{}': {}", path.display(), e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_string());
    Ok(Avatar {
        file_name,
        mime_type: image_mime_type(path).to_string(),
        bytes,
    })
}
