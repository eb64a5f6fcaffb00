pub use super::course_subjects::Entity as CourseSubjects;
pub use super::courses::Entity as Courses;
pub use super::profile_courses::Entity as ProfileCourses;
pub use super::profile_interests::Entity as ProfileInterests;
pub use super::providers::Entity as Providers;
pub use super::subjects::Entity as Subjects;
pub use super::user_profiles::Entity as UserProfiles;
pub use super::users::Entity as Users;
