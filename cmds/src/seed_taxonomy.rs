use anyhow::{bail, Context};
use clap::Parser;
use mathhint_backend::{
    connect_database,
    seed::{self, Fixture},
    Config,
};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};
use tracing::level_filters::LevelFilter;

/// Loads grades, subjects and tags from a fixture without touching rows
/// that already exist.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Fixture file, relative to BASE_DIR unless absolute.
    #[arg(long, default_value = "fixtures/math_seed.json")]
    path: PathBuf,

    /// Allow running outside development. Asks for confirmation.
    #[arg(long)]
    force: bool,
}

fn confirmed() -> anyhow::Result<bool> {
    print!(
        "WARNING: you are about to seed a production database.\n\
         Existing rows are kept, but new ones will be created.\n\n\
         Continue? (yes/no): "
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    if !config.environment.is_development() {
        if !args.force {
            bail!(
                "seed_taxonomy refuses to run outside development. \
                 Pass --force if you really need to seed this database."
            );
        }

        if !confirmed()? {
            println!("Cancelled.");
            return Ok(());
        }

        println!("Seeding a production database.");
    }

    let path = config.resolve_path(&args.path);
    let fixture = Fixture::load(&path).with_context(|| format!("cannot load {}", path.display()))?;

    let db = connect_database(&config.database_url).await?;
    let counts = seed::seed_taxonomy(&db, &fixture).await?;

    println!("Seed complete: {counts}");

    Ok(())
}
