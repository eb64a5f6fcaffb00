use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // Backs `ON CONFLICT DO NOTHING` when adding a course to a list.
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_profile_courses_unique ON profile_courses(profile_id, course_id, list)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_course_subjects_subject ON course_subjects(subject_id)",
        )
        .await?;

        conn.execute_unprepared("CREATE INDEX IF NOT EXISTS idx_courses_name ON courses(name)")
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_courses_name")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_course_subjects_subject")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_profile_courses_unique")
            .await?;

        Ok(())
    }
}
