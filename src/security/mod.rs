pub mod password;
pub mod session;
mod token;

pub use token::*;
