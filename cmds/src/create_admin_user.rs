use chrono::Utc;
use clap::Parser;
use entity::users;
use mathhint_backend::{connect_database, security::password::hash_password, Config};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use tracing::level_filters::LevelFilter;

/// Creates a staff account, or promotes and re-keys an existing one.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    username: String,
    email: String,
    password: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let db = connect_database(&config.database_url).await?;

    let password_hash = hash_password(&args.password, &mut rand::thread_rng())
        .map_err(|err| anyhow::anyhow!("failed to hash password: {err}"))?;

    let existing = users::Entity::find_by_username(&args.username)
        .one(&db)
        .await?;

    let user = match existing {
        Some(user) => {
            let mut user = user.into_active_model();
            user.email = Set(args.email);
            user.password_hash = Set(password_hash);
            user.is_staff = Set(true);
            user.is_active = Set(true);
            user.update(&db).await?
        }
        None => {
            users::ActiveModel {
                username: Set(args.username),
                email: Set(args.email),
                password_hash: Set(password_hash),
                is_staff: Set(true),
                is_active: Set(true),
                date_joined: Set(Utc::now()),
                last_login: Set(None),
                ..Default::default()
            }
            .insert(&db)
            .await?
        }
    };

    println!("{} (id {}) is now staff", user.username, user.id);

    Ok(())
}
