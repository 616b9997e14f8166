use crate::{extractors::Staff, Json, Result, StateTrait};
use axum::extract::State;
use chrono::{DateTime, Utc};
use entity::{hints, problems};
use sea_orm::{EntityTrait, QueryOrder};
use serde::Serialize;

const PREVIEW_CHARS: usize = 50;

#[derive(Serialize)]
pub struct HintRow {
    id: i32,
    problem_id: i32,
    problem: String,
    stage: hints::Stage,
    stage_label: &'static str,
    preview: String,
    created_at: DateTime<Utc>,
}

fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_CHARS {
        return content.to_owned();
    }

    let mut preview: String = content.chars().take(PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}

/// Legacy hint rows, newest first.
pub async fn list_hints<S: StateTrait>(
    State(state): State<S>,
    _staff: Staff,
) -> Result<Json<Vec<HintRow>>> {
    let rows = hints::Entity::find()
        .find_also_related(problems::Entity)
        .order_by_desc(hints::Column::CreatedAt)
        .order_by_desc(hints::Column::Id)
        .all(state.db())
        .await?;

    Ok(Json(
        rows.into_iter()
            .map(|(hint, problem)| HintRow {
                id: hint.id,
                problem_id: hint.problem_id,
                problem: problem.map_or_else(|| "-".to_owned(), |problem| problem.title),
                stage: hint.stage_type,
                stage_label: hint.stage_type.label(),
                preview: preview(&hint.content),
                created_at: hint.created_at,
            })
            .collect(),
    ))
}
