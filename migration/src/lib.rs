pub use sea_orm_migration::prelude::*;

mod m20251004_101500_create_grades_table;
mod m20251004_101512_create_subjects_table;
mod m20251004_101530_create_tags_table;
mod m20251004_102045_create_users_table;
mod m20251004_102101_create_user_profiles_table;
mod m20251004_103320_create_problems_table;
mod m20251004_103342_create_problem_tags_table;
mod m20251004_103410_create_hints_table;
mod m20251004_104005_create_questions_table;
mod m20251011_191233_create_sessions_table;
mod m20251011_191250_create_login_attempts_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251004_101500_create_grades_table::Migration),
            Box::new(m20251004_101512_create_subjects_table::Migration),
            Box::new(m20251004_101530_create_tags_table::Migration),
            Box::new(m20251004_102045_create_users_table::Migration),
            Box::new(m20251004_102101_create_user_profiles_table::Migration),
            Box::new(m20251004_103320_create_problems_table::Migration),
            Box::new(m20251004_103342_create_problem_tags_table::Migration),
            Box::new(m20251004_103410_create_hints_table::Migration),
            Box::new(m20251004_104005_create_questions_table::Migration),
            Box::new(m20251011_191233_create_sessions_table::Migration),
            Box::new(m20251011_191250_create_login_attempts_table::Migration),
        ]
    }
}
