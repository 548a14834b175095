use anyhow::{Result, anyhow};
use vocab_quiz_bot::config::Config;
use vocab_quiz_bot::database::connection::{sqlite_file_path, DatabaseManager};
use vocab_quiz_bot::database::error::StoreError;
use vocab_quiz_bot::database::models::Word;
use vocab_quiz_bot::quiz::word_list::WordList;
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize basic logging for the migration
    env_logger::init();
    dotenvy::dotenv().ok();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "import" => {
            let path = args.get(2).cloned().unwrap_or_else(Config::word_list_path_from_env);
            import_words(&path).await
        }
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

async fn connect() -> Result<DatabaseManager> {
    let database_url = Config::database_url_from_env();
    println!("📊 Database URL: {}", mask_url(&database_url));

    DatabaseManager::new(&database_url).await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Vocabulary Quiz Bot - Database Migration Tool");
    println!("================================================");

    let db_manager = connect().await?;

    println!("🚀 Running database migrations...");

    match db_manager.run_migrations().await {
        Ok(_) => {
            println!("✅ Migrations completed successfully!");
            println!("\n🎯 Your quiz database is ready!");
        }
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let db_manager = connect().await?;

    // Try to query the database to check if tables exist
    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in tables {
                println!("  • {table}");
            }
            if let Ok(words) = Word::count(&db_manager.pool).await {
                println!("📚 Stored words: {words}");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL players, scores and words!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let database_url = Config::database_url_from_env();

    // For SQLite, we can just delete the file
    match sqlite_file_path(&database_url) {
        Some(db_path) => {
            if db_path.exists() {
                std::fs::remove_file(&db_path)?;
                println!("🗑️  Deleted database file: {}", db_path.display());
            }
        }
        None => return Err(anyhow!("Reset is only supported for SQLite database files")),
    }

    // Run migrations to recreate the schema
    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");

    Ok(())
}

/// Copies every pair of the bulk list into the word store, skipping words
/// that are already there. The list file itself is left as is.
async fn import_words(path: &str) -> Result<()> {
    println!("📥 Importing words from {path}");

    let words = WordList::load(path).map_err(|e| anyhow!("{e}"))?;
    let db_manager = connect().await?;
    db_manager.run_migrations().await?;

    let mut added = 0usize;
    let mut skipped = 0usize;
    for pair in words.pairs() {
        if Word::find_id_by_text(&db_manager.pool, &pair.source_text).await?.is_some() {
            skipped += 1;
            continue;
        }
        match Word::create(&db_manager.pool, &pair.source_text, &pair.translation).await {
            Ok(_) => added += 1,
            Err(StoreError::Duplicate(_)) => skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }

    println!("✅ Imported {added} new words, {skipped} already present");
    println!("📚 Stored words: {}", Word::count(&db_manager.pool).await?);

    Ok(())
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name"
    )
    .fetch_all(&db_manager.pool)
    .await?;

    Ok(tables)
}

fn mask_url(url: &str) -> String {
    // Only show the file name, not the full path
    match sqlite_file_path(url) {
        Some(path) => match Path::new(&path).file_name() {
            Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
            None => url.to_string(),
        },
        None => url.to_string(),
    }
}

fn print_help() {
    println!("📚 Vocabulary Quiz Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up    Run database migrations (default)");
    println!("    check          Check database connection and schema");
    println!("    reset          Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    import [PATH]  Load a source,translation word list into the word store");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: sqlite:./data/quiz.db)");
    println!("    WORD_LIST_PATH Word list used by import (default: ./russian_english_words.csv)");
    println!();
    println!("EXAMPLES:");
    println!("    migrate                    # Run migrations");
    println!("    migrate check              # Check database status");
    println!("    migrate import words.csv   # Seed the word store");
    println!();
}
