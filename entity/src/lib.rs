pub mod grades;
pub mod hints;
pub mod login_attempts;
pub mod problem_tags;
pub mod problems;
pub mod questions;
pub mod sessions;
pub mod subjects;
pub mod tags;
pub mod user_profiles;
pub mod users;
