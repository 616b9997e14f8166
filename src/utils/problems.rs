use entity::{problem_tags, problems, tags};
use sea_orm::{
    sea_query::{Expr, Query},
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Select,
};
use std::collections::HashMap;

/// Tags of each of the given problems, keyed by problem id and sorted by name.
pub async fn load_tags<C: ConnectionTrait>(
    db: &C,
    problem_ids: &[i32],
) -> Result<HashMap<i32, Vec<tags::Model>>, DbErr> {
    if problem_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = problem_tags::Entity::find()
        .filter(problem_tags::Column::ProblemId.is_in(problem_ids.iter().copied()))
        .all(db)
        .await?;

    let tags: HashMap<i32, tags::Model> = tags::Entity::find()
        .filter(tags::Column::Id.is_in(links.iter().map(|link| link.tag_id)))
        .order_by_asc(tags::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(|tag| (tag.id, tag))
        .collect();

    let mut grouped: HashMap<i32, Vec<tags::Model>> = HashMap::new();

    for link in links {
        if let Some(tag) = tags.get(&link.tag_id) {
            grouped.entry(link.problem_id).or_default().push(tag.clone());
        }
    }

    for tags in grouped.values_mut() {
        tags.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(grouped)
}

/// Replaces the tag links of a problem.
pub async fn replace_tags<C: ConnectionTrait>(
    db: &C,
    problem_id: i32,
    tag_ids: &[i32],
) -> Result<(), DbErr> {
    problem_tags::Entity::delete_many()
        .filter(problem_tags::Column::ProblemId.eq(problem_id))
        .exec(db)
        .await?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    let links = tag_ids.iter().map(|&tag_id| problem_tags::ActiveModel {
        problem_id: sea_orm::Set(problem_id),
        tag_id: sea_orm::Set(tag_id),
    });

    problem_tags::Entity::insert_many(links).exec(db).await?;

    Ok(())
}

/// Restricts a problem query to problems linked to `tag_id`.
pub fn with_tag(select: Select<problems::Entity>, tag_id: i32) -> Select<problems::Entity> {
    select.filter(
        problems::Column::Id.in_subquery(
            Query::select()
                .column(problem_tags::Column::ProblemId)
                .from(problem_tags::Entity)
                .and_where(Expr::col(problem_tags::Column::TagId).eq(tag_id))
                .to_owned(),
        ),
    )
}

/// Distinct tags used by the problems of one user.
pub fn used_tags(user_id: i32) -> Select<tags::Entity> {
    tags::Entity::find_ordered().filter(
        tags::Column::Id.in_subquery(
            Query::select()
                .column((problem_tags::Entity, problem_tags::Column::TagId))
                .from(problem_tags::Entity)
                .inner_join(
                    problems::Entity,
                    Expr::col((problems::Entity, problems::Column::Id))
                        .equals((problem_tags::Entity, problem_tags::Column::ProblemId)),
                )
                .and_where(Expr::col((problems::Entity, problems::Column::UserId)).eq(user_id))
                .to_owned(),
        ),
    )
}

/// Newest problems first.
pub fn newest_first(select: Select<problems::Entity>) -> Select<problems::Entity> {
    select
        .order_by_desc(problems::Column::CreatedAt)
        .order_by_desc(problems::Column::Id)
}
