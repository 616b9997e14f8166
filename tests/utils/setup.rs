use super::{
    mail::{FailingMailer, RecordingMailer},
    request::RequestBuilder,
    user::User,
    uuid,
};
use entity::{
    grades::{self, GradeCode},
    tags,
};
use mathhint_backend::{
    mail::{Mailer, Message},
    seed::{self, Fixture},
    Config, State,
};
use migration::MigratorTrait;
use reqwest::{redirect, Client};
use sea_orm::{ColumnTrait, ConnectOptions, Database, DbConn, EntityTrait, QueryFilter};
use serde_json::json;
use std::{
    net::SocketAddr,
    path::PathBuf,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tokio::net::TcpListener;

/// Two grades with one subject each and a handful of tags.
const TAXONOMY: &str = r#"[
    {"model": "math_app.grade", "pk": 1, "fields": {"code": "junior1", "name": "Junior 1", "order": 1}},
    {"model": "math_app.grade", "pk": 2, "fields": {"code": "high1", "name": "High 1", "order": 4}},
    {"model": "math_app.subject", "pk": 1, "fields": {"name": "Algebra", "grade": 1, "order": 1}},
    {"model": "math_app.subject", "pk": 2, "fields": {"name": "Math I", "grade": 2, "order": 1}},
    {"model": "math_app.tag", "pk": 1, "fields": {"name": "Linear equations", "grade": 1, "subject": 1, "order": 1}},
    {"model": "math_app.tag", "pk": 2, "fields": {"name": "Factoring", "grade": 1, "subject": 1, "order": 2}},
    {"model": "math_app.tag", "pk": 3, "fields": {"name": "Quadratic functions", "grade": 2, "subject": 2, "order": 1}}
]"#;

async fn setup_database() -> DbConn {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    // every connection would get its own in-memory database
    opts.max_connections(1).min_connections(1);

    let db = Database::connect(opts)
        .await
        .expect("failed to connect to database");

    migration::Migrator::up(&db, None)
        .await
        .expect("failed to apply migrations");

    let fixture = Fixture::parse(TAXONOMY).expect("invalid test taxonomy");
    seed::seed_taxonomy(&db, &fixture)
        .await
        .expect("failed to seed taxonomy");

    db
}

async fn setup_backend(db: DbConn, media_root: PathBuf, mailer: Arc<dyn Mailer>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let config = Config {
        media_root,
        ..Default::default()
    };
    let state = State::with_parts(config, db, mailer);

    tokio::spawn(async move {
        mathhint_backend::run(listener, state).await.unwrap();
    });

    addr
}

async fn setup_with(mailer: Arc<dyn Mailer>, recorder: Option<RecordingMailer>) -> Env {
    let db = setup_database().await;
    let media = Arc::new(MediaDir(
        std::env::temp_dir().join(format!("mathhint-test-{}", uuid())),
    ));

    let addr = setup_backend(db.clone(), media.0.clone(), mailer).await;

    Env {
        addr,
        // 303 responses carry the body the tests look at
        client: Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .unwrap(),
        db,
        recorder,
        media,
        user_num: Arc::new(AtomicU64::new(0)),
    }
}

#[allow(unused)]
pub async fn setup() -> Env {
    let recorder = RecordingMailer::default();
    setup_with(Arc::new(recorder.clone()), Some(recorder)).await
}

#[allow(unused)]
pub async fn setup_with_failing_mail() -> Env {
    setup_with(Arc::new(FailingMailer), None).await
}

/// Removes the media root once the last `Env` clone is gone.
pub struct MediaDir(PathBuf);

impl Drop for MediaDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[derive(Clone)]
pub struct Env {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DbConn,
    recorder: Option<RecordingMailer>,
    media: Arc<MediaDir>,
    user_num: Arc<AtomicU64>,
}

impl Env {
    fn get_url(&self, url: &str) -> String {
        format!("http://{}{}", self.addr, url)
    }

    #[allow(unused)]
    pub fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.client.get(self.get_url(url)))
    }

    #[allow(unused)]
    pub fn post(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.client.post(self.get_url(url)))
    }

    #[allow(unused)]
    pub fn patch(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.client.patch(self.get_url(url)))
    }

    #[allow(unused)]
    pub fn put(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.client.put(self.get_url(url)))
    }

    #[allow(unused)]
    pub fn media_root(&self) -> &std::path::Path {
        &self.media.0
    }

    #[allow(unused)]
    pub fn sent_mail(&self) -> Vec<Message> {
        self.recorder
            .as_ref()
            .map(RecordingMailer::sent)
            .unwrap_or_default()
    }

    #[allow(unused)]
    pub async fn grade_id(&self, code: GradeCode) -> i32 {
        grades::Entity::find()
            .filter(grades::Column::Code.eq(code))
            .one(&self.db)
            .await
            .unwrap()
            .expect("grade not seeded")
            .id
    }

    #[allow(unused)]
    pub async fn tag_id(&self, name: &str) -> i32 {
        tags::Entity::find()
            .filter(tags::Column::Name.eq(name))
            .one(&self.db)
            .await
            .unwrap()
            .expect("tag not seeded")
            .id
    }

    /// Signs a fresh user up through the API.
    #[allow(unused)]
    pub async fn register_user(&self) -> User {
        let number = self.user_num.fetch_add(1, Ordering::Relaxed);
        let username = format!("student{number}");
        let email = format!("student{number}@example.com");
        let password = "Ax7#pLm2qZ".to_owned();

        let res = self
            .post("/signup/")
            .json(&json!({
                "username": username,
                "email": email,
                "password1": password,
                "password2": password,
                "grade": self.grade_id(GradeCode::Junior1).await,
            }))
            .send()
            .await;

        assert_eq!(res.status(), http::StatusCode::CREATED);

        let body: serde_json::Value = res.json().await;
        let token = body["token"].as_str().expect("no token").to_owned();

        User::new(username, email, password, token, self.clone()).await
    }

    /// A user with `is_staff` set directly in the database.
    #[allow(unused)]
    pub async fn register_staff(&self) -> User {
        let user = self.register_user().await;
        user.make_staff().await;
        user
    }
}
