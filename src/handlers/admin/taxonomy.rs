use super::{grade_names, name_or_dash};
use crate::{
    error::{self, DatabaseError, FieldErrors},
    extractors::Staff,
    Json, Result, StateTrait, ValidatedJson,
};
use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use entity::{
    grades, problem_tags, subjects,
    tags::{self, constraints::*},
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

#[derive(Serialize)]
pub struct SubjectRow {
    id: i32,
    name: String,
    grade_id: i32,
    grade: String,
    order: i32,
    tag_count: i64,
}

pub async fn list_subjects<S: StateTrait>(
    State(state): State<S>,
    _staff: Staff,
) -> Result<Json<Vec<SubjectRow>>> {
    let subjects = subjects::Entity::find()
        .order_by_asc(subjects::Column::GradeId)
        .order_by_asc(subjects::Column::Order)
        .order_by_asc(subjects::Column::Name)
        .all(state.db())
        .await?;

    let tag_counts: HashMap<i32, i64> = tags::Entity::find()
        .select_only()
        .column(tags::Column::SubjectId)
        .column_as(Expr::col(tags::Column::Id).count(), "count")
        .filter(tags::Column::SubjectId.is_not_null())
        .group_by(tags::Column::SubjectId)
        .into_tuple::<(i32, i64)>()
        .all(state.db())
        .await?
        .into_iter()
        .collect();

    let grades = grade_names(state.db()).await?;

    Ok(Json(
        subjects
            .into_iter()
            .map(|subject| SubjectRow {
                grade: name_or_dash(&grades, Some(subject.grade_id)),
                tag_count: tag_counts.get(&subject.id).copied().unwrap_or_default(),
                id: subject.id,
                name: subject.name,
                grade_id: subject.grade_id,
                order: subject.order,
            })
            .collect(),
    ))
}

#[derive(Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 50))]
    name: String,
    grade: i32,
    #[serde(default)]
    order: i32,
}

pub async fn create_subject<S: StateTrait>(
    State(state): State<S>,
    staff: Staff,
    ValidatedJson(request): ValidatedJson<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<SubjectRow>)> {
    let name = request.name.trim();

    let mut fields = FieldErrors::new();
    check_name(name, &mut fields);
    check_grade(state.db(), Some(request.grade), &mut fields).await?;
    fields.into_result()?;

    let subject = subjects::ActiveModel {
        name: Set(name.to_owned()),
        grade_id: Set(request.grade),
        order: Set(request.order),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(state.db())
    .await?;

    info!(staff_id = staff.id, subject_id = subject.id, "subject created");

    let grades = grade_names(state.db()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubjectRow {
            grade: name_or_dash(&grades, Some(subject.grade_id)),
            tag_count: 0,
            id: subject.id,
            name: subject.name,
            grade_id: subject.grade_id,
            order: subject.order,
        }),
    ))
}

#[derive(Serialize)]
pub struct TagRow {
    id: i32,
    name: String,
    grade_id: Option<i32>,
    grade: String,
    subject_id: Option<i32>,
    subject: String,
    order: i32,
    problem_count: i64,
    created_at: DateTime<Utc>,
}

pub async fn list_tags<S: StateTrait>(
    State(state): State<S>,
    _staff: Staff,
) -> Result<Json<Vec<TagRow>>> {
    let tags = tags::Entity::find()
        .order_by_asc(tags::Column::GradeId)
        .order_by_asc(tags::Column::SubjectId)
        .order_by_asc(tags::Column::Order)
        .order_by_asc(tags::Column::Name)
        .all(state.db())
        .await?;

    let problem_counts: HashMap<i32, i64> = problem_tags::Entity::find()
        .select_only()
        .column(problem_tags::Column::TagId)
        .column_as(Expr::col(problem_tags::Column::ProblemId).count(), "count")
        .group_by(problem_tags::Column::TagId)
        .into_tuple::<(i32, i64)>()
        .all(state.db())
        .await?
        .into_iter()
        .collect();

    let grades = grade_names(state.db()).await?;
    let subjects = subject_names(state.db()).await?;

    Ok(Json(
        tags.into_iter()
            .map(|tag| TagRow {
                grade: name_or_dash(&grades, tag.grade_id),
                subject: name_or_dash(&subjects, tag.subject_id),
                problem_count: problem_counts.get(&tag.id).copied().unwrap_or_default(),
                id: tag.id,
                name: tag.name,
                grade_id: tag.grade_id,
                subject_id: tag.subject_id,
                order: tag.order,
                created_at: tag.created_at,
            })
            .collect(),
    ))
}

#[derive(Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50))]
    name: String,
    grade: Option<i32>,
    subject: Option<i32>,
    #[serde(default)]
    order: i32,
}

pub async fn create_tag<S: StateTrait>(
    State(state): State<S>,
    staff: Staff,
    ValidatedJson(request): ValidatedJson<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagRow>)> {
    let name = request.name.trim().to_owned();

    let mut fields = FieldErrors::new();
    check_name(&name, &mut fields);
    check_grade(state.db(), request.grade, &mut fields).await?;
    if let Some(subject) = request.subject {
        if subjects::Entity::find_by_id(subject)
            .one(state.db())
            .await?
            .is_none()
        {
            fields.add("subject", "Select a valid choice. That choice is not one of the available choices.");
        }
    }
    fields.into_result()?;

    // a NULL grade never trips the unique constraint, so look first
    let duplicate = tags::Entity::find()
        .filter(tags::Column::Name.eq(name.as_str()))
        .filter(match request.grade {
            Some(grade) => tags::Column::GradeId.eq(grade),
            None => tags::Column::GradeId.is_null(),
        })
        .one(state.db())
        .await?;

    if duplicate.is_some() {
        return Err(error::TAG_ALREADY_EXISTS);
    }

    let tag = tags::ActiveModel {
        name: Set(name),
        grade_id: Set(request.grade),
        subject_id: Set(request.subject),
        order: Set(request.order),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(state.db())
    .await
    .map_err(|err| {
        if err.unique_violation(UC_TAGS_NAME_GRADE) {
            error::TAG_ALREADY_EXISTS
        } else {
            err.into()
        }
    })?;

    info!(staff_id = staff.id, tag_id = tag.id, "tag created");

    let grades = grade_names(state.db()).await?;
    let subjects = subject_names(state.db()).await?;

    Ok((
        StatusCode::CREATED,
        Json(TagRow {
            grade: name_or_dash(&grades, tag.grade_id),
            subject: name_or_dash(&subjects, tag.subject_id),
            problem_count: 0,
            id: tag.id,
            name: tag.name,
            grade_id: tag.grade_id,
            subject_id: tag.subject_id,
            order: tag.order,
            created_at: tag.created_at,
        }),
    ))
}

fn check_name(name: &str, fields: &mut FieldErrors) {
    if name.is_empty() {
        fields.add("name", "This field is required.");
    }
}

async fn check_grade<C: ConnectionTrait>(
    db: &C,
    grade: Option<i32>,
    fields: &mut FieldErrors,
) -> Result {
    if let Some(grade) = grade {
        if grades::Entity::find_by_id(grade).one(db).await?.is_none() {
            fields.add(
                "grade",
                "Select a valid choice. That choice is not one of the available choices.",
            );
        }
    }

    Ok(())
}

async fn subject_names<C: ConnectionTrait>(db: &C) -> Result<HashMap<i32, String>> {
    Ok(subjects::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|subject| (subject.id, subject.name))
        .collect())
}
