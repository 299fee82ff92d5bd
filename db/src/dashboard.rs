//! Student and instructor dashboards.

use chrono::{DateTime, Utc};
use sea_orm::{DbConn, DbErr};
use serde::Serialize;
use util::duration::format_duration;

use crate::models::course::{CourseStatus, Model as Course};
use crate::models::course_enrollment::Model as Enrollment;
use crate::models::sub_section::{self, Model as SubSection};
use crate::progress::{completed_sub_sections, percentage};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrolledCourse {
    pub id: i64,
    pub course_name: String,
    pub course_description: String,
    pub thumbnail: String,
    pub instructor_id: i64,
    pub total_duration: String,
    pub total_sub_sections: u64,
    pub completed_sub_sections: u64,
    pub progress_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstructorCourseStats {
    pub id: i64,
    pub course_name: String,
    pub course_description: String,
    pub thumbnail: String,
    pub price: i64,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
    pub total_students_enrolled: u64,
    pub total_amount_generated: i64,
}

/// Courses the student is enrolled in with their progress through each.
pub async fn enrolled_courses(db: &DbConn, user_id: i64) -> Result<Vec<EnrolledCourse>, DbErr> {
    let ids = Enrollment::course_ids_for_user(db, user_id).await?;
    let courses = Course::find_many_by_ids(db, &ids).await?;

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(course) = courses.iter().find(|c| c.id == id) else {
            continue;
        };
        let lectures = SubSection::list_for_course(db, course.id).await?;
        let lecture_ids: Vec<i64> = lectures.iter().map(|l| l.id).collect();
        let completed = completed_sub_sections(db, user_id, course.id)
            .await?
            .into_iter()
            .filter(|id| lecture_ids.contains(id))
            .count() as u64;
        let total = lectures.len() as u64;

        out.push(EnrolledCourse {
            id: course.id,
            course_name: course.course_name.clone(),
            course_description: course.course_description.clone(),
            thumbnail: course.thumbnail.clone(),
            instructor_id: course.instructor_id,
            total_duration: format_duration(sub_section::total_seconds(&lectures)),
            total_sub_sections: total,
            completed_sub_sections: completed,
            progress_percentage: percentage(completed, total),
        });
    }
    Ok(out)
}

/// Enrolment and revenue figures for each of the instructor's courses.
pub async fn instructor_dashboard(
    db: &DbConn,
    instructor_id: i64,
) -> Result<Vec<InstructorCourseStats>, DbErr> {
    let mut out = Vec::new();
    for course in Course::list_by_instructor(db, instructor_id).await? {
        let students = Enrollment::count_for_course(db, course.id).await?;
        out.push(InstructorCourseStats {
            id: course.id,
            total_amount_generated: course.price.saturating_mul(students as i64),
            course_name: course.course_name,
            course_description: course.course_description,
            thumbnail: course.thumbnail,
            price: course.price,
            status: course.status,
            created_at: course.created_at,
            total_students_enrolled: students,
        });
    }
    Ok(out)
}
