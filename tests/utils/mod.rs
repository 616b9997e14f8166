pub mod macros;
pub mod mail;
pub mod prelude;
mod request;
mod response;
pub mod setup;
pub mod user;

use uuid::Uuid;

#[allow(unused)]
pub fn uuid() -> String {
    Uuid::new_v4()
        .as_simple()
        .encode_lower(&mut Uuid::encode_buffer())
        .to_owned()
}

/// Smallest byte string the media store recognizes as a PNG.
#[allow(unused)]
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
