mod utils;

use entity::{grades::GradeCode, problem_tags, problems};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use utils::prelude::*;

mod create {
    use super::*;

    #[tokio::test]
    async fn success() {
        let env = setup().await;
        let user = env.register_user().await;
        let grade = env.grade_id(GradeCode::Junior1).await;
        let linear = env.tag_id("Linear equations").await;
        let factoring = env.tag_id("Factoring").await;

        let res = env
            .post("/problem/new/")
            .user(&user)
            .multipart(
                Form::new()
                    .text("title", "Solve 2x + 3 = 7")
                    .text("grade", grade.to_string())
                    .text("tags", linear.to_string())
                    .text("tags", factoring.to_string())
                    .text("hint_approach", "Isolate x")
                    .text("hint_formula", "ax + b = c")
                    .text("hint_technique", ""),
            )
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = res.json().await;
        let id = body["id"].as_i64().unwrap() as i32;

        assert_json_include!(
            actual: body,
            expected: json!({
                "title": "Solve 2x + 3 = 7",
                "grade_id": grade,
                "image": null,
                "hints": {
                    "approach": {"text": "Isolate x", "image": null},
                    "formula": {"text": "ax + b = c", "image": null},
                    "technique": {"text": "", "image": null},
                },
                // sorted by name
                "tags": [
                    {"id": factoring, "name": "Factoring"},
                    {"id": linear, "name": "Linear equations"},
                ],
            })
        );

        let problem = problems::Entity::find_by_id(id)
            .one(&env.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(problem.user_id, user.id);
    }

    #[tokio::test]
    async fn stores_images() {
        let env = setup().await;
        let user = env.register_user().await;
        let tag = env.tag_id("Linear equations").await;

        let res = env
            .post("/problem/new/")
            .user(&user)
            .multipart(
                Form::new()
                    .text("title", "Picture problem")
                    .text("tags", tag.to_string())
                    .part("image", png_part("page.png"))
                    .part("hint_formula_image", png_part("formula.PNG")),
            )
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = res.json().await;
        let image = body["image"].as_str().unwrap();
        let hint_image = body["hints"]["formula"]["image"].as_str().unwrap();

        assert!(image.starts_with("problems/") && image.ends_with(".png"));
        assert!(hint_image.starts_with("hints/formula/"));
        assert!(env.media_root().join(image).is_file());
        assert!(env.media_root().join(hint_image).is_file());
    }

    #[tokio::test]
    async fn rejects_fake_image() {
        let env = setup().await;
        let user = env.register_user().await;
        let tag = env.tag_id("Linear equations").await;

        let res = env
            .post("/problem/new/")
            .user(&user)
            .multipart(
                Form::new()
                    .text("title", "Not a picture")
                    .text("tags", tag.to_string())
                    .part(
                        "image",
                        Part::bytes(b"%PDF-1.7 not really".to_vec()).file_name("page.png"),
                    ),
            )
            .send()
            .await;

        assert_field_error!(res, "image");

        let count = problems::Entity::find().count(&env.db).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn missing_title_and_tags() {
        let env = setup().await;
        let user = env.register_user().await;

        let res = env
            .post("/problem/new/")
            .user(&user)
            .multipart(Form::new().text("title", "   "))
            .send()
            .await;

        let body = assert_field_error!(res, "title");
        assert!(body["fields"]["tags"].is_array());
    }

    #[tokio::test]
    async fn unknown_tag() {
        let env = setup().await;
        let user = env.register_user().await;

        let res = env
            .post("/problem/new/")
            .user(&user)
            .multipart(
                Form::new()
                    .text("title", "Ghost tag")
                    .text("tags", "9999"),
            )
            .send()
            .await;

        assert_field_error!(res, "tags");
    }

    #[tokio::test]
    async fn title_too_long() {
        let env = setup().await;
        let user = env.register_user().await;
        let tag = env.tag_id("Linear equations").await;

        let res = env
            .post("/problem/new/")
            .user(&user)
            .multipart(
                Form::new()
                    .text("title", "x".repeat(201))
                    .text("tags", tag.to_string()),
            )
            .send()
            .await;

        assert_field_error!(res, "title");
    }

    #[tokio::test]
    async fn form_context() {
        let env = setup().await;
        let user = env.register_user().await;
        let grade = env.grade_id(GradeCode::Junior1).await;

        let res = env.get("/problem/new/").user(&user).send().await;
        let body: Value = res.json().await;
        assert_eq!(body["grades"].as_array().unwrap().len(), 2);
        assert_eq!(body["selected_grade"], Value::Null);
        assert_eq!(body["tags"], json!([]));

        let res = env
            .get(&format!("/problem/new/?grade={grade}"))
            .user(&user)
            .send()
            .await;
        let body: Value = res.json().await;
        assert_eq!(body["selected_grade"]["code"], "junior1");
        assert_eq!(body["tags"].as_array().unwrap().len(), 2);

        // nonsense is ignored rather than rejected
        let res = env
            .get("/problem/new/?grade=abc")
            .user(&user)
            .send()
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}

mod ownership {
    use super::*;

    #[tokio::test]
    async fn list_only_shows_own_problems() {
        let env = setup().await;
        let alice = env.register_user().await;
        let bob = env.register_user().await;
        let tag = env.tag_id("Linear equations").await;

        alice.create_problem("alice's problem", &[tag]).await;
        bob.create_problem("bob's problem", &[tag]).await;

        let res = env.get("/problems/").user(&alice).send().await;
        let body: Value = res.json().await;

        let problems = body["problems"].as_array().unwrap();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0]["title"], "alice's problem");
    }

    #[tokio::test]
    async fn foreign_problem_is_not_found() {
        let env = setup().await;
        let alice = env.register_user().await;
        let bob = env.register_user().await;
        let tag = env.tag_id("Linear equations").await;

        let id = bob.create_problem("bob's problem", &[tag]).await;

        for url in [
            format!("/problem/{id}/"),
            format!("/problem/{id}/edit/"),
            format!("/problem/{id}/delete/"),
        ] {
            let res = env.get(&url).user(&alice).send().await;
            assert_error!(res, error::PROBLEM_NOT_FOUND);
        }

        let res = env
            .post(&format!("/problem/{id}/delete/"))
            .user(&alice)
            .send()
            .await;
        assert_error!(res, error::PROBLEM_NOT_FOUND);

        let res = env
            .post(&format!("/problem/{id}/edit/"))
            .user(&alice)
            .multipart(
                Form::new()
                    .text("title", "hijacked")
                    .text("tags", tag.to_string()),
            )
            .send()
            .await;
        assert_error!(res, error::PROBLEM_NOT_FOUND);

        let problem = problems::Entity::find_by_id(id)
            .one(&env.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(problem.title, "bob's problem");
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let env = setup().await;
        let user = env.register_user().await;
        let other = env.register_user().await;
        let tag = env.tag_id("Quadratic functions").await;

        user.create_problem("Vertex of a QUADRATIC", &[tag]).await;
        user.create_problem("Slope of a line", &[tag]).await;
        other.create_problem("quadratic too", &[tag]).await;

        let form = Form::new()
            .text("title", "Completing squares")
            .text("tags", tag.to_string())
            .text("hint_technique", "Use the Quadratic formula");
        user.submit_problem(form).await;

        let res = env
            .get("/problems/?q=quadratic")
            .user(&user)
            .send()
            .await;
        let body: Value = res.json().await;

        let mut titles: Vec<&str> = body["problems"]
            .as_array()
            .unwrap()
            .iter()
            .map(|problem| problem["title"].as_str().unwrap())
            .collect();
        titles.sort_unstable();

        assert_eq!(titles, ["Completing squares", "Vertex of a QUADRATIC"]);
        assert_eq!(body["search_query"], "quadratic");
    }

    #[tokio::test]
    async fn filter_by_tag() {
        let env = setup().await;
        let user = env.register_user().await;
        let linear = env.tag_id("Linear equations").await;
        let factoring = env.tag_id("Factoring").await;

        user.create_problem("linear", &[linear]).await;
        user.create_problem("both", &[linear, factoring]).await;
        user.create_problem("factoring", &[factoring]).await;

        let res = env
            .get(&format!("/problems/?tag={factoring}"))
            .user(&user)
            .send()
            .await;
        let body: Value = res.json().await;

        let titles: Vec<&str> = body["problems"]
            .as_array()
            .unwrap()
            .iter()
            .map(|problem| problem["title"].as_str().unwrap())
            .collect();

        // newest first
        assert_eq!(titles, ["factoring", "both"]);
        assert_eq!(body["selected_tag"], factoring);
        assert_eq!(body["used_tags"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn pagination() {
        let env = setup().await;
        let user = env.register_user().await;
        let tag = env.tag_id("Linear equations").await;

        for n in 0..13 {
            user.create_problem(&format!("problem {n}"), &[tag]).await;
        }

        let res = env.get("/problems/").user(&user).send().await;
        let body: Value = res.json().await;
        assert_eq!(body["problems"].as_array().unwrap().len(), 12);
        assert_json_eq!(
            body["page"],
            json!({
                "number": 1,
                "num_pages": 2,
                "count": 13,
                "has_next": true,
                "has_previous": false,
            })
        );

        let res = env.get("/problems/?page=last").user(&user).send().await;
        let body: Value = res.json().await;
        assert_eq!(body["problems"].as_array().unwrap().len(), 1);
        assert_eq!(body["problems"][0]["title"], "problem 0");

        let res = env.get("/problems/?page=3").user(&user).send().await;
        assert_error!(res, error::PAGE_NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_list() {
        let env = setup().await;
        let user = env.register_user().await;

        let res = env.get("/problems/").user(&user).send().await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = res.json().await;
        assert_eq!(body["problems"], json!([]));
        assert_eq!(body["page"]["num_pages"], 1);
    }

    #[tokio::test]
    async fn tag_archive() {
        let env = setup().await;
        let user = env.register_user().await;
        let linear = env.tag_id("Linear equations").await;
        let factoring = env.tag_id("Factoring").await;

        user.create_problem("linear", &[linear]).await;
        user.create_problem("factoring", &[factoring]).await;

        let res = env
            .get(&format!("/tag/{linear}/"))
            .user(&user)
            .send()
            .await;
        let body: Value = res.json().await;

        assert_eq!(body["tag"]["name"], "Linear equations");
        assert_eq!(body["problems"].as_array().unwrap().len(), 1);

        let res = env.get("/tag/9999/").user(&user).send().await;
        assert_error!(res, error::TAG_NOT_FOUND);
    }
}

mod detail {
    use super::*;

    #[tokio::test]
    async fn includes_grade() {
        let env = setup().await;
        let user = env.register_user().await;
        let grade = env.grade_id(GradeCode::High1).await;
        let tag = env.tag_id("Quadratic functions").await;

        let id = user
            .submit_problem(
                Form::new()
                    .text("title", "Axis of symmetry")
                    .text("grade", grade.to_string())
                    .text("tags", tag.to_string()),
            )
            .await;

        let res = env.get(&format!("/problem/{id}/")).user(&user).send().await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = res.json().await;
        assert_eq!(body["problem"]["title"], "Axis of symmetry");
        assert_eq!(body["grade"]["code"], "high1");
        assert_eq!(body["grade"]["name"], "High 1");
    }

    #[tokio::test]
    async fn missing_problem() {
        let env = setup().await;
        let user = env.register_user().await;

        let res = env.get("/problem/4242/").user(&user).send().await;
        assert_error!(res, error::PROBLEM_NOT_FOUND);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn replaces_fields_and_tags() {
        let env = setup().await;
        let user = env.register_user().await;
        let linear = env.tag_id("Linear equations").await;
        let factoring = env.tag_id("Factoring").await;

        let id = user.create_problem("before", &[linear]).await;

        let res = env
            .post(&format!("/problem/{id}/edit/"))
            .user(&user)
            .multipart(
                Form::new()
                    .text("title", "after")
                    .text("tags", factoring.to_string())
                    .text("hint_approach", "new approach"),
            )
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = res.json().await;
        assert_eq!(body["title"], "after");
        assert_eq!(body["hints"]["approach"]["text"], "new approach");
        assert_eq!(body["tags"], json!([{"id": factoring, "name": "Factoring"}]));

        let links = problem_tags::Entity::find()
            .filter(problem_tags::Column::ProblemId.eq(id))
            .count(&env.db)
            .await
            .unwrap();
        assert_eq!(links, 1);
    }

    #[tokio::test]
    async fn hint_image_replace_and_clear() {
        let env = setup().await;
        let user = env.register_user().await;
        let tag = env.tag_id("Linear equations").await;

        let id = user
            .submit_problem(
                Form::new()
                    .text("title", "with images")
                    .text("tags", tag.to_string())
                    .part("hint_approach_image", png_part("a.png"))
                    .part("hint_formula_image", png_part("f.png")),
            )
            .await;

        let problem = problems::Entity::find_by_id(id)
            .one(&env.db)
            .await
            .unwrap()
            .unwrap();
        let old_approach = problem.hint_approach_image.unwrap();
        let old_formula = problem.hint_formula_image.unwrap();

        let res = env
            .post(&format!("/problem/{id}/edit/"))
            .user(&user)
            .multipart(
                Form::new()
                    .text("title", "with images")
                    .text("tags", tag.to_string())
                    .part("hint_approach_image", png_part("a2.png"))
                    .text("hint_formula_image_clear", "on"),
            )
            .send()
            .await;

        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = res.json().await;
        let new_approach = body["hints"]["approach"]["image"].as_str().unwrap();
        assert_ne!(new_approach, old_approach);
        assert_eq!(body["hints"]["formula"]["image"], Value::Null);

        assert!(env.media_root().join(new_approach).is_file());
        assert!(!env.media_root().join(&old_approach).exists());
        assert!(!env.media_root().join(&old_formula).exists());
    }

    #[tokio::test]
    async fn edit_form() {
        let env = setup().await;
        let user = env.register_user().await;
        let grade = env.grade_id(GradeCode::Junior1).await;
        let tag = env.tag_id("Linear equations").await;

        let id = user
            .submit_problem(
                Form::new()
                    .text("title", "edit me")
                    .text("grade", grade.to_string())
                    .text("tags", tag.to_string()),
            )
            .await;

        let res = env
            .get(&format!("/problem/{id}/edit/"))
            .user(&user)
            .send()
            .await;
        let body: Value = res.json().await;

        assert_eq!(body["problem"]["title"], "edit me");
        assert_eq!(body["selected_grade"]["id"], grade);
        assert_eq!(body["tags"].as_array().unwrap().len(), 2);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn removes_problem_and_images() {
        let env = setup().await;
        let user = env.register_user().await;
        let tag = env.tag_id("Linear equations").await;

        let id = user
            .submit_problem(
                Form::new()
                    .text("title", "doomed")
                    .text("tags", tag.to_string())
                    .part("image", png_part("p.png")),
            )
            .await;

        let image = problems::Entity::find_by_id(id)
            .one(&env.db)
            .await
            .unwrap()
            .unwrap()
            .image
            .unwrap();

        let res = env
            .get(&format!("/problem/{id}/delete/"))
            .user(&user)
            .send()
            .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = env
            .post(&format!("/problem/{id}/delete/"))
            .user(&user)
            .send()
            .await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = res.json().await;
        assert_eq!(body["redirect"], "/problems/");

        assert!(problems::Entity::find_by_id(id)
            .one(&env.db)
            .await
            .unwrap()
            .is_none());

        let links = problem_tags::Entity::find()
            .filter(problem_tags::Column::ProblemId.eq(id))
            .count(&env.db)
            .await
            .unwrap();
        assert_eq!(links, 0);

        assert!(!env.media_root().join(image).exists());
    }
}
