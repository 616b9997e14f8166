use crate::{error, extractors::Staff, Json, Result, StateTrait};
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use entity::questions;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, Set};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct QuestionRow {
    id: i32,
    user_id: Option<i32>,
    name: String,
    email: String,
    subject: String,
    message: String,
    problem_image: Option<String>,
    created_at: DateTime<Utc>,
    is_replied: bool,
}

impl From<questions::Model> for QuestionRow {
    fn from(question: questions::Model) -> Self {
        Self {
            id: question.id,
            user_id: question.user_id,
            name: question.name,
            email: question.email,
            subject: question.subject,
            message: question.message,
            problem_image: question.problem_image,
            created_at: question.created_at,
            is_replied: question.is_replied,
        }
    }
}

pub async fn list_questions<S: StateTrait>(
    State(state): State<S>,
    _staff: Staff,
) -> Result<Json<Vec<QuestionRow>>> {
    let questions = questions::Entity::find()
        .order_by_desc(questions::Column::CreatedAt)
        .order_by_desc(questions::Column::Id)
        .all(state.db())
        .await?;

    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

#[derive(Deserialize)]
pub struct UpdateRequest {
    is_replied: bool,
}

pub async fn update_question<S: StateTrait>(
    State(state): State<S>,
    staff: Staff,
    Path(id): Path<i32>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<QuestionRow>> {
    let question = questions::Entity::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(error::QUESTION_NOT_FOUND)?;

    let mut question = question.into_active_model();
    question.is_replied = Set(request.is_replied);
    let question = question.update(state.db()).await?;

    info!(
        staff_id = staff.id,
        question_id = question.id,
        is_replied = question.is_replied,
        "question updated"
    );

    Ok(Json(question.into()))
}
