use super::{setup::Env, PNG};
use entity::users;
use http::StatusCode;
use reqwest::multipart::{Form, Part};
use sea_orm::{sea_query::Expr, ColumnTrait, EntityTrait, QueryFilter};
use serde_json::Value;

pub trait UserLike {
    fn access_token(&self) -> &str;
}

#[allow(unused)]
#[derive(Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub access_token: String,
    env: Env,
}

#[allow(unused)]
impl User {
    pub(super) async fn new(
        username: String,
        email: String,
        password: String,
        access_token: String,
        env: Env,
    ) -> Self {
        let id = users::Entity::find_by_username(&username)
            .one(&env.db)
            .await
            .unwrap()
            .expect("user not created")
            .id;

        User {
            id,
            username,
            email,
            password,
            access_token,
            env,
        }
    }

    pub async fn make_staff(&self) {
        users::Entity::update_many()
            .col_expr(users::Column::IsStaff, Expr::value(true))
            .filter(users::Column::Id.eq(self.id))
            .exec(&self.env.db)
            .await
            .unwrap();
    }

    /// Creates a problem tagged with `tags` and returns its id.
    pub async fn create_problem(&self, title: &str, tags: &[i32]) -> i32 {
        let form = tags
            .iter()
            .fold(Form::new().text("title", title.to_owned()), |form, tag| {
                form.text("tags", tag.to_string())
            })
            .text("hint_approach", format!("approach for {title}"))
            .text("hint_formula", "")
            .text("hint_technique", "");

        self.submit_problem(form).await
    }

    pub async fn submit_problem(&self, form: Form) -> i32 {
        let res = self
            .env
            .post("/problem/new/")
            .user(self)
            .multipart(form)
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = res.json().await;
        body["id"].as_i64().expect("no id") as i32
    }
}

#[allow(unused)]
pub fn png_part(file_name: &str) -> Part {
    Part::bytes(PNG.to_vec())
        .file_name(file_name.to_owned())
        .mime_str("image/png")
        .unwrap()
}

impl UserLike for User {
    fn access_token(&self) -> &str {
        &self.access_token
    }
}
