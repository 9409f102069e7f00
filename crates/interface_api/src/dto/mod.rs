//! Request and response data transfer objects

pub mod forms;
pub mod multipart;
pub mod views;

pub use forms::*;
pub use multipart::{MultipartForm, UploadedFile};
pub use views::*;
