use clap::{Args as ClapArgs, Parser, Subcommand};
use libris_core::{AuthorId, Book, BookId, Catalog, NewBook};
use libris_recommend::RecommenderConfig;
use libris_storage::transfer::{self, AuthorRecord, BookRecord};
use libris_storage::{StorageConfig, StorageManager};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// A small library catalog with book recommendations
#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(about = "Manage a book catalog, favorites and recommendations", long_about = None)]
struct Args {
    /// Path to the data directory
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Number of books to recommend
    #[arg(long, default_value_t = libris_recommend::DEFAULT_LIMIT)]
    limit: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage authors
    #[command(subcommand)]
    Author(AuthorCommand),
    /// Inspect and delete books
    #[command(subcommand)]
    Book(BookCommand),
    /// Import authors or books from a JSON array
    #[command(subcommand)]
    Import(ImportCommand),
    /// Export authors or books as a JSON array
    #[command(subcommand)]
    Export(ExportCommand),
    /// Manage a user's favorite books
    #[command(subcommand)]
    Favorite(FavoriteCommand),
    /// Recommend books for a user's favorites
    Recommend(RecommendArgs),
}

#[derive(Subcommand, Debug)]
enum AuthorCommand {
    Add { name: String },
    List,
    Rename { id: u64, name: String },
    /// Delete an author together with their books
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
enum BookCommand {
    Add(BookFields),
    /// Replace every field of a book
    Update {
        id: u64,
        #[command(flatten)]
        fields: BookFields,
    },
    List,
    Show { id: u64 },
    Delete { id: u64 },
}

#[derive(ClapArgs, Debug)]
struct BookFields {
    title: String,
    /// Author id
    #[arg(short, long)]
    author: u64,
    #[arg(short, long)]
    isbn: u64,
    #[arg(short, long)]
    category: Option<String>,
    /// Price in whole currency units
    #[arg(short, long)]
    price: Option<u32>,
    #[arg(short, long)]
    rating: Option<f32>,
    #[arg(short, long)]
    description: Option<String>,
}

impl From<BookFields> for NewBook {
    fn from(fields: BookFields) -> Self {
        NewBook {
            title: fields.title,
            author: AuthorId(fields.author),
            category: fields.category,
            isbn: fields.isbn,
            price: fields.price,
            rating: fields.rating,
            description: fields.description,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ImportCommand {
    Authors { file: PathBuf },
    Books { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum ExportCommand {
    Authors {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    Books {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug)]
struct FavoriteArgs {
    #[arg(short, long)]
    user: String,
    #[arg(short, long)]
    book: u64,
}

#[derive(Subcommand, Debug)]
enum FavoriteCommand {
    /// Add a favorite and print books similar to it
    Add(FavoriteArgs),
    Remove(FavoriteArgs),
    List {
        #[arg(short, long)]
        user: String,
    },
}

#[derive(ClapArgs, Debug)]
struct RecommendArgs {
    #[arg(short, long)]
    user: Option<String>,
    /// Seed with these books instead of the user's favorites
    #[arg(short, long = "book")]
    books: Vec<u64>,
}

/// Book as printed to the user
#[derive(Serialize)]
struct BookSummary {
    id: BookId,
    title: String,
    author: Option<String>,
    category: Option<String>,
    isbn: u64,
    price: Option<u32>,
    rating: Option<f32>,
}

impl BookSummary {
    fn new(book: Book, catalog: &Catalog) -> Self {
        Self {
            id: book.id,
            author: catalog.get_author(book.author).map(|a| a.name),
            title: book.title,
            category: book.category,
            isbn: book.isbn,
            price: book.price,
            rating: book.rating,
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_books(books: Vec<Book>, catalog: &Catalog) -> anyhow::Result<()> {
    let summaries: Vec<BookSummary> = books
        .into_iter()
        .map(|b| BookSummary::new(b, catalog))
        .collect();
    print_json(&summaries)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let storage = StorageManager::with_config(StorageConfig {
        data_dir: args.data_dir,
        save_interval: None,
        recommender: RecommenderConfig { limit: args.limit },
    })?;
    info!("Data directory: {:?}", storage.data_dir());
    let catalog = storage.catalog().clone();

    let modified = match args.command {
        Command::Author(cmd) => match cmd {
            AuthorCommand::Add { name } => {
                print_json(&catalog.create_author(name))?;
                true
            }
            AuthorCommand::List => {
                print_json(&catalog.authors())?;
                false
            }
            AuthorCommand::Rename { id, name } => {
                print_json(&catalog.rename_author(AuthorId(id), name)?)?;
                true
            }
            AuthorCommand::Delete { id } => {
                let removed = storage.delete_author(AuthorId(id))?;
                print_json(&removed)?;
                true
            }
        },
        Command::Book(cmd) => match cmd {
            BookCommand::Add(fields) => {
                print_json(&catalog.create_book(fields.into())?)?;
                true
            }
            BookCommand::Update { id, fields } => {
                print_json(&catalog.update_book(BookId(id), fields.into())?)?;
                true
            }
            BookCommand::List => {
                print_books(catalog.books(), &catalog)?;
                false
            }
            BookCommand::Show { id } => {
                let book = catalog
                    .get_book(BookId(id))
                    .ok_or(libris_core::Error::BookNotFound(BookId(id)))?;
                print_json(&book)?;
                false
            }
            BookCommand::Delete { id } => {
                storage.delete_book(BookId(id))?;
                true
            }
        },
        Command::Import(cmd) => {
            let report = match cmd {
                ImportCommand::Authors { file } => {
                    let records: Vec<AuthorRecord> = transfer::read_records(&file)?;
                    transfer::import_authors(&catalog, records)
                }
                ImportCommand::Books { file } => {
                    let records: Vec<BookRecord> = transfer::read_records(&file)?;
                    transfer::import_books(&catalog, records)
                }
            };
            info!(
                created = report.created,
                updated = report.updated,
                skipped = report.skipped,
                errors = report.errors.len(),
                "Import finished"
            );
            print_json(&report)?;
            report.created + report.updated > 0
        }
        Command::Export(cmd) => {
            match cmd {
                ExportCommand::Authors { output: Some(path) } => {
                    transfer::write_records(path, &transfer::export_authors(&catalog))?
                }
                ExportCommand::Authors { output: None } => print_json(&transfer::export_authors(&catalog))?,
                ExportCommand::Books { output: Some(path) } => {
                    transfer::write_records(path, &transfer::export_books(&catalog))?
                }
                ExportCommand::Books { output: None } => print_json(&transfer::export_books(&catalog))?,
            }
            false
        }
        Command::Favorite(cmd) => match cmd {
            FavoriteCommand::Add(fav) => {
                let recommendations = storage.add_favorite(&fav.user, BookId(fav.book))?;
                print_books(recommendations, &catalog)?;
                true
            }
            FavoriteCommand::Remove(fav) => {
                storage.remove_favorite(&fav.user, BookId(fav.book))?;
                true
            }
            FavoriteCommand::List { user } => {
                print_books(storage.favorite_books(&user), &catalog)?;
                false
            }
        },
        Command::Recommend(rec) => {
            let books = if !rec.books.is_empty() {
                let seeds: Vec<BookId> = rec.books.into_iter().map(BookId).collect();
                storage.recommend_for(&seeds)
            } else if let Some(user) = rec.user {
                storage.recommendations(&user)
            } else {
                anyhow::bail!("either --user or --book must be given");
            };
            print_books(books, &catalog)?;
            false
        }
    };

    if modified {
        storage.save()?;
        info!("Snapshot saved");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_add_arguments() {
        let args = Args::try_parse_from([
            "libris", "book", "add", "Dune", "--author", "3", "--isbn", "9780441013593",
            "--category", "science fiction", "--price", "12",
        ])
        .unwrap();
        let Command::Book(BookCommand::Add(fields)) = args.command else {
            panic!("expected book add");
        };

        let book = NewBook::from(fields);
        assert_eq!(
            book,
            NewBook::new("Dune", AuthorId(3), 9780441013593)
                .with_category("science fiction")
                .with_price(12)
        );
    }

    #[test]
    fn test_book_update_and_author_rename_arguments() {
        let args = Args::try_parse_from([
            "libris", "book", "update", "7", "Emma", "--author", "1", "--isbn", "42", "--rating", "4.5",
        ])
        .unwrap();
        let Command::Book(BookCommand::Update { id, fields }) = args.command else {
            panic!("expected book update");
        };
        assert_eq!(id, 7);
        assert_eq!(NewBook::from(fields), NewBook::new("Emma", AuthorId(1), 42).with_rating(4.5));

        let args = Args::try_parse_from(["libris", "author", "rename", "1", "Jane Austen"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Author(AuthorCommand::Rename { id: 1, ref name }) if name == "Jane Austen"
        ));
    }

    #[test]
    fn test_book_update_replaces_fields_in_catalog() {
        let catalog = Catalog::new();
        let author = catalog.create_author("Jane Austen");
        let book = catalog
            .create_book(NewBook::new("Emma", author.id, 42).with_category("romance"))
            .unwrap();

        let book_id = book.id.to_string();
        let author_id = author.id.to_string();
        let args = Args::try_parse_from([
            "libris", "book", "update", book_id.as_str(), "Persuasion", "--author",
            author_id.as_str(), "--isbn", "43",
        ])
        .unwrap();
        let Command::Book(BookCommand::Update { id, fields }) = args.command else {
            panic!("expected book update");
        };
        let updated = catalog.update_book(BookId(id), fields.into()).unwrap();
        assert_eq!(updated.title, "Persuasion");
        assert_eq!(updated.category, None);
        assert!(catalog.find_book_by_isbn(42).is_none());
    }
}
