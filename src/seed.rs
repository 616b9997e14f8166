//! Bulk loader for the grade/subject/tag taxonomy.
//!
//! Fixtures use the `[{"model": ..., "pk": ..., "fields": {...}}]` dump
//! format. Rows are matched on their natural keys and only ever created,
//! so loading the same fixture twice is a no-op.

use chrono::Utc;
use entity::{
    grades::{self, GradeCode},
    subjects, tags,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{collections::HashMap, fmt, io, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("fixture not found: {0}")]
    NotFound(String),
    #[error("failed to read fixture: {0}")]
    Io(#[from] io::Error),
    #[error("invalid fixture: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureEntry {
    pub model: String,
    #[serde(default)]
    pub pk: Value,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl FixtureEntry {
    /// `math_app.Grade`, `grade` and `GRADE` all name the same model.
    fn is_model(&self, name: &str) -> bool {
        let label = self
            .model
            .rsplit_once('.')
            .map_or(self.model.as_str(), |(_, model)| model);

        label.eq_ignore_ascii_case(name)
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn order(&self) -> i32 {
        self.fields
            .get("order")
            .and_then(Value::as_i64)
            .and_then(|order| i32::try_from(order).ok())
            .unwrap_or_default()
    }

    fn reference(&self, field: &str) -> Option<String> {
        self.fields.get(field).and_then(key)
    }
}

/// Fixture primary keys are compared by their JSON text, so `1` and `"1"`
/// are different keys.
fn key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(value) => Some(value.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Fixture {
    entries: Vec<FixtureEntry>,
}

impl Fixture {
    pub fn parse(input: &str) -> Result<Self, SeedError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let entries = serde_json::from_str(input)?;

        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, SeedError> {
        if !path.is_file() {
            return Err(SeedError::NotFound(path.display().to_string()));
        }

        Self::parse(&std::fs::read_to_string(path)?)
    }

    fn entries<'a>(&'a self, model: &'a str) -> impl Iterator<Item = &'a FixtureEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.is_model(model))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rows created by one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedCounts {
    pub grades: u64,
    pub subjects: u64,
    pub tags: u64,
}

impl fmt::Display for SeedCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Grade +{}, Subject +{}, Tag +{}",
            self.grades, self.subjects, self.tags
        )
    }
}

fn grade_code(value: &str) -> Option<GradeCode> {
    serde_json::from_value(Value::String(value.to_lowercase())).ok()
}

/// Gets or creates every grade, subject and tag of `fixture` in one
/// transaction. Entries missing a key field, or pointing at a parent the
/// fixture does not define, are skipped.
pub async fn seed_taxonomy<C>(db: &C, fixture: &Fixture) -> Result<SeedCounts, SeedError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let mut counts = SeedCounts::default();
    let now = Utc::now();

    let mut grade_ids: HashMap<String, i32> = HashMap::new();

    for entry in fixture.entries("grade") {
        let Some(code) = entry.text("code").and_then(grade_code) else {
            debug!(pk = %entry.pk, "skipping grade without a valid code");
            continue;
        };

        let existing = grades::Entity::find()
            .filter(grades::Column::Code.eq(code))
            .one(&txn)
            .await?;

        let grade = match existing {
            Some(grade) => grade,
            None => {
                counts.grades += 1;
                grades::ActiveModel {
                    code: Set(code),
                    name: Set(entry.text("name").unwrap_or(code.label()).to_owned()),
                    order: Set(entry.order()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        if let Some(pk) = key(&entry.pk) {
            grade_ids.insert(pk, grade.id);
        }
    }

    let mut subject_ids: HashMap<String, i32> = HashMap::new();

    for entry in fixture.entries("subject") {
        let Some(grade_id) = entry
            .reference("grade")
            .and_then(|pk| grade_ids.get(&pk).copied())
        else {
            debug!(pk = %entry.pk, "skipping subject with unknown grade");
            continue;
        };

        let Some(name) = entry.text("name") else {
            continue;
        };

        let existing = subjects::Entity::find()
            .filter(subjects::Column::Name.eq(name))
            .filter(subjects::Column::GradeId.eq(grade_id))
            .one(&txn)
            .await?;

        let subject = match existing {
            Some(subject) => subject,
            None => {
                counts.subjects += 1;
                subjects::ActiveModel {
                    name: Set(name.to_owned()),
                    grade_id: Set(grade_id),
                    order: Set(entry.order()),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        if let Some(pk) = key(&entry.pk) {
            subject_ids.insert(pk, subject.id);
        }
    }

    for entry in fixture.entries("tag") {
        let Some(name) = entry.text("name") else {
            continue;
        };

        // a parent may be absent, but a named one has to resolve
        let Ok(grade_id) = resolve(entry.reference("grade"), &grade_ids) else {
            debug!(pk = %entry.pk, "skipping tag with unknown grade");
            continue;
        };
        let Ok(subject_id) = resolve(entry.reference("subject"), &subject_ids) else {
            debug!(pk = %entry.pk, "skipping tag with unknown subject");
            continue;
        };

        let existing = tags::Entity::find()
            .filter(tags::Column::Name.eq(name))
            .filter(match grade_id {
                Some(id) => tags::Column::GradeId.eq(id),
                None => tags::Column::GradeId.is_null(),
            })
            .filter(match subject_id {
                Some(id) => tags::Column::SubjectId.eq(id),
                None => tags::Column::SubjectId.is_null(),
            })
            .one(&txn)
            .await?;

        if existing.is_none() {
            counts.tags += 1;
            tags::ActiveModel {
                name: Set(name.to_owned()),
                grade_id: Set(grade_id),
                subject_id: Set(subject_id),
                order: Set(entry.order()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    info!(
        grades = counts.grades,
        subjects = counts.subjects,
        tags = counts.tags,
        "taxonomy seeded"
    );

    Ok(counts)
}

fn resolve(reference: Option<String>, ids: &HashMap<String, i32>) -> Result<Option<i32>, ()> {
    match reference {
        None => Ok(None),
        Some(pk) => ids.get(&pk).copied().map(Some).ok_or(()),
    }
}
