use super::{with_tags, ProblemResponse, PER_PAGE};
use crate::{
    error,
    handlers::NamedResponse,
    security::session::CurrentUser,
    utils::{self, contains_ci, deserialize_lenient_id, paginate, PageInfo, PageQuery},
    Json, Query, Result, StateTrait,
};
use axum::extract::{Path, State};
use entity::{problems, tags};
use sea_orm::{Condition, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    tag: Option<i32>,
    q: Option<String>,
    page: Option<String>,
}

#[derive(Serialize)]
pub struct ListResponse {
    problems: Vec<ProblemResponse>,
    page: PageInfo,
    used_tags: Vec<NamedResponse>,
    selected_tag: Option<i32>,
    search_query: String,
}

/// Title or any hint text containing `query`, ignoring case.
fn search_condition(query: &str) -> Condition {
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
}

pub async fn list_problems<S: StateTrait>(
    State(state): State<S>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let search_query = query.q.as_deref().map(str::trim).unwrap_or_default().to_owned();

    let mut select = problems::Entity::find_owned(user.id);

    if let Some(tag_id) = query.tag {
        select = utils::with_tag(select, tag_id);
    }

    if !search_query.is_empty() {
        select = select.filter(search_condition(&search_query));
    }

    let (problems, page) = paginate(
        state.db(),
        utils::newest_first(select),
        query.page.as_deref(),
        PER_PAGE,
    )
    .await?;

    let used_tags = utils::used_tags(user.id)
        .all(state.db())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ListResponse {
        problems: with_tags(state.db(), problems).await?,
        page,
        used_tags,
        selected_tag: query.tag,
        search_query,
    }))
}

#[derive(Serialize)]
pub struct TagArchiveResponse {
    tag: NamedResponse,
    problems: Vec<ProblemResponse>,
    page: PageInfo,
}

pub async fn tag_archive<S: StateTrait>(
    State(state): State<S>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TagArchiveResponse>> {
    let tag = tags::Entity::find_by_id(id)
        .one(state.db())
        .await?
        .ok_or(error::TAG_NOT_FOUND)?;

    let select = utils::with_tag(problems::Entity::find_owned(user.id), tag.id);

    let (problems, page) = paginate(
        state.db(),
        utils::newest_first(select),
        query.page.as_deref(),
        PER_PAGE,
    )
    .await?;

    Ok(Json(TagArchiveResponse {
        tag: tag.into(),
        problems: with_tags(state.db(), problems).await?,
        page,
    }))
}
