use super::{
    input::{remove_all, store_upload, ProblemInput},
    with_tags_one, ProblemResponse,
};
use crate::{
    media::MediaCategory, security::session::CurrentUser, utils, Error, Json, MultipartForm, Result,
    StateTrait,
};
use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use entity::problems;
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};

pub async fn create_problem<S: StateTrait>(
    State(state): State<S>,
    user: CurrentUser,
    form: MultipartForm,
) -> Result<(StatusCode, Json<ProblemResponse>)> {
    let input = ProblemInput::parse(state.db(), form, true).await?;
    let media = state.media();
    let mut stored = Vec::new();

    let result = async {
        let image = match &input.image {
            Some(upload) => {
                Some(store_upload(media, MediaCategory::Problems, upload, &mut stored).await?)
            }
            None => None,
        };

        let now = Utc::now();
        let mut problem = problems::ActiveModel {
            // always the caller, never taken from the form
            user_id: Set(user.id),
            grade_id: Set(input.grade_id),
            title: Set(input.title.clone()),
            image: Set(image),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        for hint in &input.hints {
            problem.set(hint.kind.text_column(), hint.text.clone().into());

            let image = match &hint.image {
                Some(upload) => Some(
                    store_upload(media, MediaCategory::Hint(hint.kind), upload, &mut stored)
                        .await?,
                ),
                None => None,
            };
            problem.set(hint.kind.image_column(), image.into());
        }

        let txn = state.db().begin().await?;

        let problem = problem.insert(&txn).await?;
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

    info!(problem_id = problem.id, "problem created");

    let response = with_tags_one(state.db(), problem).await?;

    Ok((StatusCode::CREATED, Json(response)))
}
