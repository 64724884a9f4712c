//! The local profile: kept on this machine only.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::{confirm, OutputFormat};
use crate::config::Config;
use crate::profile::{data_url, image_mime_type, placeholder_avatar_url, ProfileStore};

#[derive(Args)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Show the saved profile
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change profile fields
    Update {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        bio: Option<String>,
    },

    /// Store an image file as the avatar
    Avatar {
        /// Image file
        path: PathBuf,
    },

    /// Delete the saved profile and avatar
    Delete {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl ProfileCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let store = ProfileStore::open(&config.data_dir.value);

        match &self.command {
            ProfileSubcommand::Show { format } => {
                let profile = store.load()?.unwrap_or_default();
                let avatar = store.avatar()?;

                match format {
                    OutputFormat::Json => {
                        let value = serde_json::json!({
                            "profile": profile,
                            "avatar": avatar,
                        });
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", profile);
                        match avatar {
                            Some(url) => println!("Avatar: stored ({} bytes)", url.len()),
                            None => println!("Avatar: {}", placeholder_avatar_url(&profile.username)),
                        }
                        println!("\nStored in {}", store.location().display());
                    }
                }
                Ok(())
            }

            ProfileSubcommand::Update {
                username,
                email,
                bio,
            } => {
                if username.is_none() && email.is_none() && bio.is_none() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let mut profile = store.load()?.unwrap_or_default();
                if let Some(username) = username {
                    profile.username = username.clone();
                }
                if let Some(email) = email {
                    profile.email = email.clone();
                }
                if let Some(bio) = bio {
                    profile.bio = bio.clone();
                }
                store.save(&profile)?;
                println!("Profile updated successfully!");
                Ok(())
            }

            ProfileSubcommand::Avatar { path } => {
                let bytes = std::fs::read(path)
                    .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
                store.set_avatar(&data_url(image_mime_type(path), &bytes))?;
                println!("Avatar saved.");
                Ok(())
            }

            ProfileSubcommand::Delete { force } => {
                if !force && !confirm("Delete the local profile?")? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                if store.clear()? {
                    println!("User profile deleted.");
                } else {
                    println!("No profile saved.");
                }
                Ok(())
            }
        }
    }
}
