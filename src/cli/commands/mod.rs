mod account;
mod catalog;

pub use account::{cmd_deactivate, cmd_register};
pub use catalog::{cmd_list_courses, cmd_list_subjects};
