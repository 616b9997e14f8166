mod de;
mod orm;
mod pagination;
mod problems;
mod search;
mod signal;

pub use de::*;
pub use orm::*;
pub use pagination::*;
pub use problems::*;
pub use search::*;
pub use signal::*;
