use sea_orm::{DbErr, RuntimeErr};
use sqlx::{error::ErrorKind, Error as SqlxError};

pub trait DatabaseError {
    fn unique_violation(&self, constraint: &str) -> bool;
}

impl DatabaseError for DbErr {
    fn unique_violation(&self, constraint: &str) -> bool {
        is_kind_and_constraint(self, constraint, |kind| {
            matches!(kind, ErrorKind::UniqueViolation)
        })
    }
}

#[allow(clippy::borrowed_box)]
fn get_database_error(err: &DbErr) -> Option<&Box<dyn sqlx::error::DatabaseError + 'static>> {
    match err {
        DbErr::Query(RuntimeErr::SqlxError(SqlxError::Database(db_err))) => Some(db_err),
        DbErr::Exec(RuntimeErr::SqlxError(SqlxError::Database(db_err))) => Some(db_err),
        _ => None,
    }
}

fn is_kind_and_constraint(err: &DbErr, constraint: &str, kind: fn(ErrorKind) -> bool) -> bool {
    let Some(db_err) = get_database_error(err) else {
        return false;
    };

    if !kind(db_err.kind()) {
        return false;
    }

    // sqlite does not report constraint names
    db_err.constraint().map_or(true, |name| name == constraint)
}
