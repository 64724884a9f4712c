use booknook_core::models::{parse_genres, year_start, BookPayload, BookUpdate, GENRES};
use booknook_core::GenreFilter;
use chrono::Datelike;
use clap::{Args, Subcommand};

use super::{confirm, connect_authenticated, truncate, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct BookCommand {
    #[command(subcommand)]
    pub command: BookSubcommand,
}

#[derive(Subcommand)]
pub enum BookSubcommand {
    /// List books in the catalog
    List {
        /// Only show books in this genre ("all" for every book)
        #[arg(long, default_value = "all")]
        genre: GenreFilter,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a book
    Add {
        /// Title of the book
        title: String,

        #[arg(long, default_value = "")]
        author: String,

        #[arg(long)]
        description: Option<String>,

        /// Genre (can be repeated or comma separated)
        #[arg(long = "genre", value_name = "GENRE")]
        genres: Vec<String>,

        /// Publication year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update fields of a book
    Update {
        /// Book ID
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Replace the genres (can be repeated or comma separated)
        #[arg(long = "genre", value_name = "GENRE")]
        genres: Vec<String>,

        #[arg(long)]
        year: Option<i32>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a book
    Delete {
        /// Book ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// List the catalog genres
    Genres,
}

impl BookCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            BookSubcommand::List { genre, format } => {
                let client = connect_authenticated(config, format)?;
                client.books.fetch_all().await?;
                let books = client.books.filtered(genre);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&books)?);
                    }
                    OutputFormat::Text => {
                        if books.is_empty() {
                            println!("No books found");
                            return Ok(());
                        }
                        println!("{:<26}  {:<30}  {:<20}  GENRE", "ID", "TITLE", "AUTHOR");
                        println!("{}", "-".repeat(90));
                        for book in &books {
                            println!(
                                "{:<26}  {:<30}  {:<20}  {}",
                                book.id,
                                truncate(&book.title, 30),
                                truncate(&book.author, 20),
                                book.genre.join(", ")
                            );
                        }
                        println!("\nTotal: {} book(s)", books.len());
                    }
                }
                Ok(())
            }

            BookSubcommand::Add {
                title,
                author,
                description,
                genres,
                year,
                format,
            } => {
                if title.trim().is_empty() {
                    return Err("Title cannot be empty".into());
                }
                let year = year.unwrap_or_else(|| chrono::Utc::now().year());
                let mut payload =
                    BookPayload::new(title.trim(), author.trim(), year).with_genre(parse_genres(genres));
                if let Some(description) = description {
                    payload = payload.with_description(description.clone());
                }

                let client = connect_authenticated(config, format)?;
                client.books.add(&payload).await?;

                // A successful add puts the new book first
                if let Some(book) = client.books.snapshot().items.first() {
                    print_book(book, format)?;
                }
                Ok(())
            }

            BookSubcommand::Update {
                id,
                title,
                author,
                description,
                genres,
                year,
                format,
            } => {
                let update = BookUpdate {
                    title: title.clone(),
                    author: author.clone(),
                    description: description.clone(),
                    genre: (!genres.is_empty()).then(|| parse_genres(genres)),
                    published_year: year.map(year_start),
                };
                if update.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let client = connect_authenticated(config, format)?;
                client.books.fetch_all().await?;
                client.books.update(id, &update).await?;

                match client.books.snapshot().get(id) {
                    Some(book) => print_book(book, format)?,
                    None => tracing::debug!("updated book {} is not in the listing", id),
                }
                Ok(())
            }

            BookSubcommand::Delete { id, force } => {
                if !force && !confirm(&format!("Delete book '{}'?", id))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                let client = connect_authenticated(config, &OutputFormat::Text)?;
                client.books.remove(id).await?;
                Ok(())
            }

            BookSubcommand::Genres => {
                for genre in GENRES {
                    println!("{}", genre);
                }
                Ok(())
            }
        }
    }
}

fn print_book(
    book: &booknook_core::Book,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(book)?),
        OutputFormat::Text => print!("{}", book),
    }
    Ok(())
}
