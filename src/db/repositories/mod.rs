pub mod course;
pub mod profile;
pub mod subject;
pub mod user;
