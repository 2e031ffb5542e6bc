pub mod options;
pub mod request;
pub mod uri;
pub mod value;
