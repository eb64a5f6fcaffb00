//! `SeaORM` implementation of the `CatalogService` trait.

use async_trait::async_trait;
use rand::seq::IndexedRandom;

use crate::db::Store;
use crate::services::catalog_service::{CatalogError, CatalogService, CourseInfo, SampleCourses};

pub struct SeaOrmCatalogService {
    store: Store,
    random_course_count: usize,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store, random_course_count: usize) -> Self {
        Self {
            store,
            random_course_count,
        }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_subjects(&self) -> Result<Vec<String>, CatalogError> {
        let subjects = self.store.list_subjects().await?;
        Ok(subjects.into_iter().map(|s| s.name).collect())
    }

    async fn list_courses(&self) -> Result<Vec<String>, CatalogError> {
        let courses = self.store.list_courses().await?;
        Ok(courses.into_iter().map(|c| c.name).collect())
    }

    async fn sample_courses(&self, subject: &str) -> Result<SampleCourses, CatalogError> {
        let Some(subject) = self.store.get_subject_by_name(subject).await? else {
            return Ok(SampleCourses::new());
        };

        let courses = self.store.list_courses_for_subject(subject.id).await?;

        Ok(courses
            .into_iter()
            .map(|(course, provider)| {
                (course.name, (course.description, provider.map(|p| p.name)))
            })
            .collect())
    }

    async fn course_info(&self, course: &str) -> Result<CourseInfo, CatalogError> {
        let not_found = || CatalogError::CourseNotFound(course.to_string());

        if course.trim().is_empty() {
            return Err(not_found());
        }

        let id = self.store.find_course(course).await?.ok_or_else(not_found)?.id;
        let (course, provider) = self
            .store
            .get_course_with_provider(id)
            .await?
            .ok_or_else(not_found)?;

        Ok(CourseInfo {
            description: course.description,
            provider: provider.map(|p| p.name),
            instructor: course.instructor,
            name: course.name,
            url: course.url,
        })
    }

    async fn random_courses(&self) -> Result<Vec<String>, CatalogError> {
        let courses = self.store.list_courses().await?;

        let picked = {
            let mut rng = rand::rng();
            courses
                .choose_multiple(&mut rng, self.random_course_count)
                .map(|c| c.name.clone())
                .collect()
        };

        Ok(picked)
    }
}
