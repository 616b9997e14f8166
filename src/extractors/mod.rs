mod json;
mod multipart;
mod query;
mod session;

pub use json::*;
pub use multipart::*;
pub use query::*;
pub use session::*;
