use crate::{
    error::{self, FieldErrors},
    mail::Message,
    media::{self, MediaCategory},
    security::session::CurrentUser,
    Json, MultipartForm, Query, Result, StateTrait,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use entity::questions;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

const SUCCESS_MESSAGE: &str =
    "Your question has been sent. We will reply to the email address you entered.";
const MAIL_FAILED_MESSAGE: &str =
    "Your question was saved, but the notification email could not be sent. We will still review it.";

/// Routes for the contact form
///
/// GET  /question/
/// POST /question/
/// GET  /question/success/
pub fn routes<S: StateTrait>() -> Router<S> {
    Router::new()
        .route("/question/", get(question_form).post(submit_question::<S>))
        .route("/question/success/", get(question_success))
}

#[derive(Validate)]
struct QuestionFields {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 1, max = 200))]
    subject: String,
    #[validate(length(min = 1))]
    message: String,
}

impl QuestionFields {
    fn read(form: &MultipartForm) -> Self {
        let text = |name: &str| form.text(name).unwrap_or_default().trim().to_owned();

        Self {
            name: text("name"),
            email: text("email"),
            subject: text("subject"),
            message: text("message"),
        }
    }

    fn check(&self) -> FieldErrors {
        let mut fields = FieldErrors::new();

        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ];

        for (field, value) in required {
            if value.is_empty() {
                fields.add(field, "This field is required.");
            }
        }

        if let Err(errors) = self.validate() {
            for (field, messages) in errors.field_errors() {
                let field = field.to_string();

                if fields.contains(&field) {
                    continue;
                }

                for error in messages {
                    let message = match error.code.as_ref() {
                        "email" => "Enter a valid email address.".to_owned(),
                        "length" => match error.params.get("max") {
                            Some(max) => format!("Ensure this value has at most {max} characters."),
                            None => "This field is required.".to_owned(),
                        },
                        code => format!("Invalid value ({code})."),
                    };
                    fields.add(&field, message);
                }
            }
        }

        fields
    }
}

async fn question_form(user: Option<CurrentUser>) -> Json<Value> {
    Json(json!({
        "initial": {
            "name": user.as_ref().map(|user| user.username.as_str()).unwrap_or_default(),
            "email": user.as_ref().map(|user| user.email.as_str()).unwrap_or_default(),
        },
    }))
}

#[derive(Serialize)]
pub struct SubmitResponse {
    id: i32,
    level: &'static str,
    message: &'static str,
}

async fn submit_question<S: StateTrait>(
    State(state): State<S>,
    user: Option<CurrentUser>,
    mut form: MultipartForm,
) -> Result<Response> {
    let fields = QuestionFields::read(&form);
    let mut errors = fields.check();

    let upload = form.take_file("problem_image");
    if let Some(upload) = &upload {
        if let Err(err) = media::check_image(&upload.file_name, &upload.bytes) {
            errors.add("problem_image", format!("Upload a valid image: {err}."));
        }
    }

    errors.into_result()?;

    let problem_image = match &upload {
        Some(upload) => Some(
            state
                .media()
                .store(MediaCategory::Questions, &upload.file_name, &upload.bytes)
                .await
                .map_err(|err| {
                    error!("failed to store question image: {err}");
                    error::INTERNAL
                })?,
        ),
        None => None,
    };

    let question = questions::ActiveModel {
        user_id: Set(user.as_ref().map(|user| user.id)),
        name: Set(fields.name),
        email: Set(fields.email),
        subject: Set(fields.subject),
        message: Set(fields.message),
        problem_image: Set(problem_image),
        created_at: Set(Utc::now()),
        is_replied: Set(false),
        ..Default::default()
    }
    .insert(state.db())
    .await?;

    info!(question_id = question.id, "question received");

    let config = state.config();
    let mail = Message {
        from: config.mail_from.clone(),
        to: vec![config.maintainer_email.clone()],
        subject: format!("[MathHint] New question: {}", question.subject),
        text: notification_body(&question, user.as_ref().map(|user| user.username.as_str())),
    };

    let (location, level, message) = match state.mailer().send(&mail).await {
        Ok(()) => ("/question/success/", "success", SUCCESS_MESSAGE),
        Err(err) => {
            warn!(question_id = question.id, "failed to send question notification: {err}");
            (
                "/question/success/?mail=failed",
                "warning",
                MAIL_FAILED_MESSAGE,
            )
        }
    };

    Ok((
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location)],
        Json(SubmitResponse {
            id: question.id,
            level,
            message,
        }),
    )
        .into_response())
}

fn notification_body(question: &questions::Model, username: Option<&str>) -> String {
    format!(
        "A new question was submitted.\n\n\
         Name: {}\n\
         Email: {}\n\
         User: {}\n\
         Subject: {}\n\n\
         Message:\n{}\n\n\
         Submitted at: {}\n",
        question.name,
        question.email,
        username.unwrap_or("unregistered"),
        question.subject,
        question.message,
        question.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

#[derive(Deserialize)]
pub struct SuccessQuery {
    mail: Option<String>,
}

async fn question_success(Query(query): Query<SuccessQuery>) -> Json<Value> {
    let (level, message) = match query.mail.as_deref() {
        Some("failed") => ("warning", MAIL_FAILED_MESSAGE),
        _ => ("success", SUCCESS_MESSAGE),
    };

    Json(json!({
        "level": level,
        "message": message,
    }))
}
