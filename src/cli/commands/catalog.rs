//! Catalog listing command handlers

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_subjects(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let subjects = store.list_subjects().await?;

    if subjects.is_empty() {
        println!("No subjects in the catalog.");
        return Ok(());
    }

    println!("Subjects ({} total)", subjects.len());
    println!("{:-<70}", "");

    for subject in subjects {
        println!("{:>5}  {}", subject.id, subject.name);
    }

    Ok(())
}

pub async fn cmd_list_courses(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let courses = store.list_courses().await?;

    if courses.is_empty() {
        println!("No courses in the catalog.");
        return Ok(());
    }

    println!("Courses ({} total)", courses.len());
    println!("{:-<70}", "");

    for course in courses {
        println!("{:>5}  {}", course.id, course.name);
        if !course.instructor.is_empty() {
            println!("       Instructor: {}", course.instructor);
        }
    }

    Ok(())
}
