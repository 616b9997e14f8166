use crate::{
    config::Config,
    mail::{self, Mailer},
    media::MediaStore,
    security::TokenKeys,
};
use rand::{
    rngs::{adapter::ReseedingRng, OsRng},
    CryptoRng, Rng, SeedableRng,
};
use rand_chacha::ChaCha20Core;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, TransactionTrait};
use std::sync::Arc;
use tracing::log::LevelFilter;

pub trait StateTrait: Send + Sync + Clone + 'static {
    type Db: ConnectionTrait + TransactionTrait + Clone;
    type Rand: Rng + CryptoRng;

    fn db(&self) -> &Self::Db;
    fn config(&self) -> &Config;
    fn tokens(&self) -> &TokenKeys;
    fn mailer(&self) -> &dyn Mailer;
    fn media(&self) -> &MediaStore;
    fn rng(&self) -> Self::Rand;
}

pub struct State {
    database: DbConn,
    config: Config,
    tokens: TokenKeys,
    mailer: Arc<dyn Mailer>,
    media: MediaStore,
}

impl State {
    pub async fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let database = connect_database(&config.database_url).await?;
        let mailer = mail::from_config(&config);

        Ok(Self::with_parts(config, database, mailer))
    }

    /// Assembles the state from an already connected database and a mail
    /// transport. Tests use this to inject sqlite and a recording mailer.
    pub fn with_parts(config: Config, database: DbConn, mailer: Arc<dyn Mailer>) -> Arc<Self> {
        Arc::new(Self {
            tokens: TokenKeys::new(config.secret_key.as_bytes()),
            media: MediaStore::new(config.media_root.clone()),
            database,
            config,
            mailer,
        })
    }
}

pub async fn connect_database(url: &str) -> anyhow::Result<DbConn> {
    info!("Trying to connect to database");

    let mut opts = ConnectOptions::new(url.to_owned());
    opts.sqlx_logging_level(LevelFilter::Debug);

    let db = Database::connect(opts)
        .await
        .inspect_err(|error| error!("failed to connect to database: {error}"))?;

    info!("Connected to database");

    Ok(db)
}

thread_local! {
    static CHACHA_THREAD_RNG: ReseedingRng<ChaCha20Core, OsRng> = {
        let rng = ChaCha20Core::from_entropy();
        ReseedingRng::new(rng, 1024*64, OsRng)
    }
}

impl StateTrait for Arc<State> {
    type Db = DbConn;
    type Rand = ReseedingRng<ChaCha20Core, OsRng>;

    fn db(&self) -> &Self::Db {
        &self.database
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn tokens(&self) -> &TokenKeys {
        &self.tokens
    }

    fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }

    fn media(&self) -> &MediaStore {
        &self.media
    }

    fn rng(&self) -> Self::Rand {
        CHACHA_THREAD_RNG.with(|x| x.clone())
    }
}
