pub mod assertion;
pub mod handler;
pub mod response;
