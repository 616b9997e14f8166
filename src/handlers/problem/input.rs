//! Reading and validating the multipart problem form.

use crate::{
    error::{self, FieldErrors},
    media::{self, MediaCategory, MediaError, MediaStore},
    MultipartForm, Result, Upload,
};
use entity::{grades, problems::HintKind, tags};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};

const TITLE_MAX_CHARS: usize = 200;

pub struct HintInput {
    pub kind: HintKind,
    pub text: String,
    pub image: Option<Upload>,
    pub clear: bool,
}

pub struct ProblemInput {
    pub title: String,
    pub grade_id: Option<i32>,
    pub tag_ids: Vec<i32>,
    pub image: Option<Upload>,
    pub hints: Vec<HintInput>,
}

fn text_field(kind: HintKind) -> String {
    format!("hint_{}", kind.as_str())
}

fn image_field(kind: HintKind) -> String {
    format!("hint_{}_image", kind.as_str())
}

impl ProblemInput {
    /// Validates the form. `with_image` is false for edits, where the
    /// problem image cannot be replaced.
    pub async fn parse<C: ConnectionTrait>(
        db: &C,
        mut form: MultipartForm,
        with_image: bool,
    ) -> Result<Self> {
        let mut fields = FieldErrors::new();

        let title = form.text("title").unwrap_or_default().trim().to_owned();
        let title_chars = title.chars().count();
        if title.is_empty() {
            fields.add("title", "This field is required.");
        } else if title_chars > TITLE_MAX_CHARS {
            fields.add(
                "title",
                format!(
                    "Ensure this value has at most {TITLE_MAX_CHARS} characters (it has {title_chars})."
                ),
            );
        }

        let grade_id = parse_grade(db, form.text("grade"), &mut fields).await?;
        let tag_ids = parse_tags(db, form.values("tags"), &mut fields).await?;

        let image = if with_image {
            checked_upload(form.take_file("image"), "image", &mut fields)
        } else {
            None
        };

        let hints = HintKind::ALL
            .into_iter()
            .map(|kind| {
                let text = form
                    .text(&text_field(kind))
                    .unwrap_or_default()
                    .trim()
                    .to_owned();
                let clear = form.flag(&format!("{}_clear", image_field(kind)));
                let image = checked_upload(form.take_file(&image_field(kind)), &image_field(kind), &mut fields);

                HintInput {
                    kind,
                    text,
                    image,
                    clear,
                }
            })
            .collect();

        fields.into_result()?;

        Ok(Self {
            title,
            grade_id,
            tag_ids,
            image,
            hints,
        })
    }
}

async fn parse_grade<C: ConnectionTrait>(
    db: &C,
    value: Option<&str>,
    fields: &mut FieldErrors,
) -> Result<Option<i32>> {
    let value = value.map(str::trim).unwrap_or_default();

    if value.is_empty() {
        return Ok(None);
    }

    let grade = match value.parse::<i32>() {
        Ok(id) => grades::Entity::find_by_id(id).one(db).await?,
        Err(_) => None,
    };

    match grade {
        Some(grade) => Ok(Some(grade.id)),
        None => {
            fields.add(
                "grade",
                "Select a valid choice. That choice is not one of the available choices.",
            );
            Ok(None)
        }
    }
}

async fn parse_tags<C: ConnectionTrait>(
    db: &C,
    values: &[String],
    fields: &mut FieldErrors,
) -> Result<Vec<i32>> {
    let mut ids = Vec::new();

    for value in values.iter().map(|value| value.trim()).filter(|value| !value.is_empty()) {
        match value.parse::<i32>() {
            Ok(id) if !ids.contains(&id) => ids.push(id),
            Ok(_) => {}
            Err(_) => fields.add("tags", format!("“{value}” is not a valid value.")),
        }
    }

    if ids.is_empty() {
        if !fields.contains("tags") {
            fields.add("tags", "This field is required.");
        }
        return Ok(ids);
    }

    let existing: Vec<i32> = tags::Entity::find()
        .select_only()
        .column(tags::Column::Id)
        .filter(tags::Column::Id.is_in(ids.iter().copied()))
        .into_tuple()
        .all(db)
        .await?;

    for id in ids.iter().filter(|id| !existing.contains(id)) {
        fields.add(
            "tags",
            format!("Select a valid choice. {id} is not one of the available choices."),
        );
    }

    Ok(ids)
}

fn checked_upload(upload: Option<Upload>, field: &str, fields: &mut FieldErrors) -> Option<Upload> {
    let upload = upload?;

    match media::check_image(&upload.file_name, &upload.bytes) {
        Ok(_) => Some(upload),
        Err(err) => {
            fields.add(
                field,
                format!(
                    "Upload a valid image ({}): {err}.",
                    media::ACCEPTED_EXTENSIONS.join(", ")
                ),
            );
            None
        }
    }
}

/// Stores a validated upload, remembering the path in `stored` so it can be
/// removed again if the surrounding write fails.
pub async fn store_upload(
    media: &MediaStore,
    category: MediaCategory,
    upload: &Upload,
    stored: &mut Vec<String>,
) -> Result<String> {
    let path = media
        .store(category, &upload.file_name, &upload.bytes)
        .await
        .map_err(|err| match err {
            MediaError::Io(err) => error::Error::from(err),
            err => {
                error!("validated upload was rejected by the media store: {err}");
                error::INTERNAL
            }
        })?;

    stored.push(path.clone());

    Ok(path)
}

pub async fn remove_all(media: &MediaStore, paths: &[String]) {
    for path in paths {
        media.remove(path).await;
    }
}
