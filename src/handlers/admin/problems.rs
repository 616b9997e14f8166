use super::{grade_names, name_or_dash};
use crate::{
    extractors::Staff,
    utils::{self, contains_ci, paginate, PageInfo},
    Json, Query, Result, StateTrait,
};
use axum::extract::State;
use chrono::{DateTime, Utc};
use entity::{problems, users};
use sea_orm::{
    sea_query::Query as SeaQuery, ColumnTrait, Condition, EntityTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const PER_PAGE: u64 = 25;

#[derive(Deserialize)]
pub struct ListQuery {
    q: Option<String>,
    page: Option<String>,
}

#[derive(Serialize)]
pub struct ProblemRow {
    id: i32,
    title: String,
    owner: String,
    grade: String,
    tags: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ListResponse {
    problems: Vec<ProblemRow>,
    page: PageInfo,
}

/// Problem text or the owner's username containing `query`.
fn search_condition(query: &str) -> Condition {
    let by_owner = problems::Column::UserId.in_subquery(
        SeaQuery::select()
            .column(users::Column::Id)
            .from(users::Entity)
            .and_where(contains_ci((users::Entity, users::Column::Username), query))
            .to_owned(),
    );

    [
        problems::Column::Title,
        problems::Column::HintApproach,
        problems::Column::HintFormula,
        problems::Column::HintTechnique,
    ]
    .into_iter()
    .fold(Condition::any(), |condition, column| {
        condition.add(contains_ci((problems::Entity, column), query))
    })
    .add(by_owner)
}

pub async fn list_problems<S: StateTrait>(
    State(state): State<S>,
    _staff: Staff,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let mut select = problems::Entity::find();

    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        select = select.filter(search_condition(q));
    }

    let (problems, page) = paginate(
        state.db(),
        utils::newest_first(select),
        query.page.as_deref(),
        PER_PAGE,
    )
    .await?;

    let ids: Vec<i32> = problems.iter().map(|problem| problem.id).collect();
    let mut tags = utils::load_tags(state.db(), &ids).await?;

    let owners: HashMap<i32, String> = users::Entity::find()
        .filter(users::Column::Id.is_in(problems.iter().map(|problem| problem.user_id)))
        .all(state.db())
        .await?
        .into_iter()
        .map(|user| (user.id, user.username))
        .collect();

    let grades = grade_names(state.db()).await?;

    let problems = problems
        .into_iter()
        .map(|problem| {
            let tags = tags
                .remove(&problem.id)
                .filter(|tags| !tags.is_empty())
                .map(|tags| {
                    tags.into_iter()
                        .map(|tag| tag.name)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_else(|| "-".to_owned());

            ProblemRow {
                owner: name_or_dash(&owners, Some(problem.user_id)),
                grade: name_or_dash(&grades, problem.grade_id),
                tags,
                id: problem.id,
                title: problem.title,
                created_at: problem.created_at,
                updated_at: problem.updated_at,
            }
        })
        .collect();

    Ok(Json(ListResponse { problems, page }))
}
