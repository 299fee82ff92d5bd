//! Lecture completion tracking.

use sea_orm::{DbConn, DbErr, SqlErr};

use crate::models::completed_video::Model as CompletedVideo;
use crate::models::course_progress::Model as Progress;
use crate::models::sub_section::Model as SubSection;

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Student is not enrolled in this course")]
    NotEnrolled,

    #[error("Subsection not found in this course")]
    SubSectionNotFound,

    #[error("Subsection already completed")]
    AlreadyCompleted,
}

/// Records that `user_id` finished `sub_section_id` of `course_id`.
pub async fn mark_complete(
    db: &DbConn,
    user_id: i64,
    course_id: i64,
    sub_section_id: i64,
) -> Result<CompletedVideo, ProgressError> {
    if SubSection::find_in_course(db, course_id, sub_section_id)
        .await?
        .is_none()
    {
        return Err(ProgressError::SubSectionNotFound);
    }

    let progress = Progress::find_for(db, user_id, course_id)
        .await?
        .ok_or(ProgressError::NotEnrolled)?;

    if CompletedVideo::exists(db, progress.id, sub_section_id).await? {
        return Err(ProgressError::AlreadyCompleted);
    }

    CompletedVideo::create(db, progress.id, sub_section_id)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ProgressError::AlreadyCompleted,
            _ => ProgressError::Database(e),
        })
}

/// Completed subsection ids; empty when the user has no progress record.
pub async fn completed_sub_sections(
    db: &DbConn,
    user_id: i64,
    course_id: i64,
) -> Result<Vec<i64>, DbErr> {
    match Progress::find_for(db, user_id, course_id).await? {
        Some(progress) => CompletedVideo::sub_section_ids(db, progress.id).await,
        None => Ok(Vec::new()),
    }
}

/// `completed / total * 100`, rounded to two decimals. A course with no
/// lectures counts as finished.
pub fn percentage(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let raw = completed as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
