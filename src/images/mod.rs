pub mod form;
pub mod services;

pub use form::{MultipartForm, UploadItem};
