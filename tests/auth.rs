mod utils;

use chrono::{Duration, Utc};
use entity::{grades::GradeCode, login_attempts, user_profiles, users};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use utils::prelude::*;

mod signup {
    use super::*;

    #[tokio::test]
    async fn success() {
        let env = setup().await;
        let grade = env.grade_id(GradeCode::High1).await;

        let res = env
            .post("/signup/")
            .json(&json!({
                "username": "hanako",
                "email": "hanako@example.com",
                "password1": "Ax7#pLm2qZ",
                "password2": "Ax7#pLm2qZ",
                "grade": grade,
            }))
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = res.json().await;
        assert_eq!(body["username"], "hanako");
        assert_eq!(body["redirect"], "/problems/");
        assert!(body["token"].is_string());

        let user = users::Entity::find_by_username("hanako")
            .one(&env.db)
            .await
            .unwrap()
            .unwrap();
        assert!(!user.is_staff);
        assert!(user.is_active);

        let profile = user_profiles::Entity::find_by_user(user.id)
            .one(&env.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.grade_id, Some(grade));
    }

    #[tokio::test]
    async fn token_authenticates() {
        let env = setup().await;
        let user = env.register_user().await;

        let res = env.get("/").user(&user).send().await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = res.json().await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["username"], user.username.as_str());
    }

    #[tokio::test]
    async fn duplicate_email() {
        let env = setup().await;
        let user = env.register_user().await;
        let before = users::Entity::find().count(&env.db).await.unwrap();

        let res = env
            .post("/signup/")
            .json(&json!({
                "username": "somebody_else",
                "email": user.email,
                "password1": "Ax7#pLm2qZ",
                "password2": "Ax7#pLm2qZ",
                "grade": env.grade_id(GradeCode::Junior1).await,
            }))
            .send()
            .await;

        assert_field_error!(res, "email");

        let after = users::Entity::find().count(&env.db).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn duplicate_username() {
        let env = setup().await;
        let user = env.register_user().await;

        let res = env
            .post("/signup/")
            .json(&json!({
                "username": user.username,
                "email": "new@example.com",
                "password1": "Ax7#pLm2qZ",
                "password2": "Ax7#pLm2qZ",
                "grade": env.grade_id(GradeCode::Junior1).await,
            }))
            .send()
            .await;

        assert_field_error!(res, "username");
    }

    #[tokio::test]
    async fn blank_username() {
        let env = setup().await;

        let res = env
            .post("/signup/")
            .json(&json!({
                "username": "   ",
                "email": "blank@example.com",
                "password1": "Ax7#pLm2qZ",
                "password2": "Ax7#pLm2qZ",
                "grade": env.grade_id(GradeCode::Junior1).await,
            }))
            .send()
            .await;

        assert_field_error!(res, "username");

        let count = users::Entity::find().count(&env.db).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn password_mismatch() {
        let env = setup().await;

        let res = env
            .post("/signup/")
            .json(&json!({
                "username": "taro",
                "email": "taro@example.com",
                "password1": "Ax7#pLm2qZ",
                "password2": "Ax7#pLm2qY",
                "grade": env.grade_id(GradeCode::Junior1).await,
            }))
            .send()
            .await;

        assert_field_error!(res, "password2");
    }

    #[tokio::test]
    async fn weak_password() {
        let env = setup().await;

        let res = env
            .post("/signup/")
            .json(&json!({
                "username": "taro",
                "email": "taro@example.com",
                "password1": "12345678",
                "password2": "12345678",
                "grade": env.grade_id(GradeCode::Junior1).await,
            }))
            .send()
            .await;

        assert_field_error!(res, "password2");
    }

    #[tokio::test]
    async fn grade_required() {
        let env = setup().await;

        let res = env
            .post("/signup/")
            .json(&json!({
                "username": "taro",
                "email": "taro@example.com",
                "password1": "Ax7#pLm2qZ",
                "password2": "Ax7#pLm2qZ",
            }))
            .send()
            .await;

        assert_field_error!(res, "grade");
    }

    #[tokio::test]
    async fn form_lists_grades() {
        let env = setup().await;

        let res = env.get("/signup/").send().await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = res.json().await;
        assert_eq!(body["authenticated"], false);
        assert_eq!(body["grades"].as_array().unwrap().len(), 2);
        assert_eq!(body["grades"][0]["code"], "junior1");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn success() {
        let env = setup().await;
        let user = env.register_user().await;

        let res = env
            .post("/login/")
            .json(&json!({
                "username": user.username,
                "password": user.password,
            }))
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = res.json().await;
        assert_eq!(body["redirect"], "/problems/");

        let token = body["token"].as_str().unwrap();
        let res = env.get("/problems/").token(token).send().await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_password() {
        let env = setup().await;
        let user = env.register_user().await;

        let res = env
            .post("/login/")
            .json(&json!({
                "username": user.username,
                "password": "not the password",
            }))
            .send()
            .await;

        assert_error!(res, error::INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn unknown_user() {
        let env = setup().await;

        let res = env
            .post("/login/")
            .json(&json!({
                "username": "nobody",
                "password": "Ax7#pLm2qZ",
            }))
            .send()
            .await;

        assert_error!(res, error::INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn lockout_after_five_failures() {
        let env = setup().await;
        let user = env.register_user().await;

        for _ in 0..4 {
            let res = env
                .post("/login/")
                .json(&json!({
                    "username": user.username,
                    "password": "wrong",
                }))
                .send()
                .await;

            assert_error!(res, error::INVALID_CREDENTIALS);
        }

        let res = env
            .post("/login/")
            .json(&json!({
                "username": user.username,
                "password": "wrong",
            }))
            .send()
            .await;

        assert_error!(res, error::ACCOUNT_LOCKED);

        // the right password does not help during the cooldown
        let res = env
            .post("/login/")
            .json(&json!({
                "username": user.username,
                "password": user.password,
            }))
            .send()
            .await;

        assert_error!(res, error::ACCOUNT_LOCKED);
    }

    #[tokio::test]
    async fn stale_attempts_are_pruned() {
        let env = setup().await;
        let now = Utc::now();

        let rows = [
            ("expired_lock", 5, now - Duration::hours(1), Some(now - Duration::minutes(1))),
            ("old_failures", 3, now - Duration::hours(2), None),
            ("recent", 2, now - Duration::minutes(5), None),
        ];

        for (username, failures, last_failure, locked_until) in rows {
            login_attempts::ActiveModel {
                username: Set(username.to_owned()),
                failures: Set(failures),
                last_failure: Set(last_failure),
                locked_until: Set(locked_until),
            }
            .insert(&env.db)
            .await
            .unwrap();
        }

        let res = env
            .post("/login/")
            .json(&json!({
                "username": "nobody",
                "password": "wrong",
            }))
            .send()
            .await;
        assert_error!(res, error::INVALID_CREDENTIALS);

        let mut left: Vec<String> = login_attempts::Entity::find()
            .all(&env.db)
            .await
            .unwrap()
            .into_iter()
            .map(|attempt| attempt.username)
            .collect();
        left.sort();

        assert_eq!(left, ["nobody", "recent"]);
    }

    #[tokio::test]
    async fn success_resets_failures() {
        let env = setup().await;
        let user = env.register_user().await;

        for _ in 0..4 {
            env.post("/login/")
                .json(&json!({
                    "username": user.username,
                    "password": "wrong",
                }))
                .send()
                .await;
        }

        let res = env
            .post("/login/")
            .json(&json!({
                "username": user.username,
                "password": user.password,
            }))
            .send()
            .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = env
            .post("/login/")
            .json(&json!({
                "username": user.username,
                "password": "wrong",
            }))
            .send()
            .await;

        assert_error!(res, error::INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn missing_fields() {
        let env = setup().await;

        let res = env
            .post("/login/")
            .json(&json!({
                "username": "taro",
            }))
            .send()
            .await;

        assert_error!(res, error::JSON_MISSING_FIELDS);
    }
}

mod logout {
    use super::*;

    #[tokio::test]
    async fn token_is_revoked() {
        let env = setup().await;
        let user = env.register_user().await;

        let res = env.post("/logout/").user(&user).send().await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = res.json().await;
        assert_eq!(body["redirect"], "/login/");

        let res = env.get("/problems/").user(&user).send().await;
        assert_error!(res, error::NOT_AUTHENTICATED);
    }

    #[tokio::test]
    async fn anonymous_logout_is_fine() {
        let env = setup().await;

        let res = env.get("/logout/").send().await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn missing_token() {
        let env = setup().await;

        let res = env.get("/problems/").send().await;
        assert_error!(res, error::NOT_AUTHENTICATED);
    }

    #[tokio::test]
    async fn garbage_token() {
        let env = setup().await;

        let res = env.get("/problems/").token("not-a-jwt").send().await;
        assert_error!(res, error::NOT_AUTHENTICATED);
    }

    #[tokio::test]
    async fn inactive_user() {
        let env = setup().await;
        let user = env.register_user().await;

        users::Entity::update_many()
            .col_expr(users::Column::IsActive, Expr::value(false))
            .filter(users::Column::Id.eq(user.id))
            .exec(&env.db)
            .await
            .unwrap();

        let res = env.get("/problems/").user(&user).send().await;
        assert_error!(res, error::NOT_AUTHENTICATED);
    }

    #[tokio::test]
    async fn security_headers() {
        let env = setup().await;

        let res = env.get("/livez").send().await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.header(http::header::X_CONTENT_TYPE_OPTIONS),
            Some("nosniff")
        );
        assert_eq!(res.header(http::header::X_FRAME_OPTIONS), Some("DENY"));
        assert!(res.header(http::header::HeaderName::from_static("x-request-id")).is_some());
    }
}
