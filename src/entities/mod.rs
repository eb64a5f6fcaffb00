pub mod prelude;

pub mod course_subjects;
pub mod courses;
pub mod profile_courses;
pub mod profile_interests;
pub mod providers;
pub mod subjects;
pub mod user_profiles;
pub mod users;
