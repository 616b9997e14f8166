use super::{
    find_owned,
    input::{remove_all, store_upload, ProblemInput},
    with_tags_one, ProblemResponse,
};
use crate::{
    media::MediaCategory,
    security::session::CurrentUser,
    utils::{self, set_option},
    Error, Json, MultipartForm, Result, StateTrait,
};
use axum::extract::{Path, State};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, IntoActiveModel, Set, TransactionTrait, Value};

pub async fn update_problem<S: StateTrait>(
    State(state): State<S>,
    user: CurrentUser,
    Path(id): Path<i32>,
    form: MultipartForm,
) -> Result<Json<ProblemResponse>> {
    let problem = find_owned(state.db(), user.id, id).await?;
    let input = ProblemInput::parse(state.db(), form, false).await?;

    let media = state.media();
    let mut stored = Vec::new();
    let mut replaced = Vec::new();

    let result = async {
        let mut active = problem.clone().into_active_model();
        active.title = Set(input.title.clone());
        active.grade_id = Set(input.grade_id);
        active.updated_at = Set(Utc::now());

        for hint in &input.hints {
            active.set(hint.kind.text_column(), hint.text.clone().into());

            let previous = hint.kind.image(&problem).map(ToOwned::to_owned);

            let image: ActiveValue<Option<String>> = match &hint.image {
                Some(upload) => set_option(Some(Some(
                    store_upload(media, MediaCategory::Hint(hint.kind), upload, &mut stored)
                        .await?,
                ))),
                None if hint.clear => Set(None),
                None => set_option(None),
            };

            if let ActiveValue::Set(image) = image {
                replaced.extend(previous);
                active.set(hint.kind.image_column(), Value::from(image));
            }
        }

        let txn = state.db().begin().await?;

        let problem = active.update(&txn).await?;
        utils::replace_tags(&txn, problem.id, &input.tag_ids).await?;

        txn.commit().await?;

        Ok::<_, Error<'static>>(problem)
    }
    .await;

    let problem = match result {
        Ok(problem) => problem,
        Err(err) => {
            remove_all(media, &stored).await;
            return Err(err);
        }
    };

    remove_all(media, &replaced).await;

    info!(problem_id = problem.id, "problem updated");

    Ok(Json(with_tags_one(state.db(), problem).await?))
}
