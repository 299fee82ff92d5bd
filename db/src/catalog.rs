//! Read models for the public catalogue: course cards, course detail pages
//! and the category landing page.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use sea_orm::{ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::HashMap;
use util::duration::format_duration;

use crate::models::category::Model as Category;
use crate::models::course::{CourseStatus, Model as Course};
use crate::models::course_enrollment::Model as Enrollment;
use crate::models::rating_review::{AverageRating, Model as Rating};
use crate::models::section::Model as Section;
use crate::models::sub_section::{self, Model as SubSection};
use crate::models::user;

/// How many courses the "most selling" strip shows.
pub const MOST_SELLING_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Category not found")]
    CategoryNotFound,

    #[error("No published courses found for this category")]
    NoPublishedCourses,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstructorSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub image: String,
}

impl From<&user::Model> for InstructorSummary {
    fn from(u: &user::Model) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            image: u.image.clone(),
        }
    }
}

/// A course card.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseSummary {
    pub id: i64,
    pub course_name: String,
    pub course_description: String,
    pub price: i64,
    pub thumbnail: String,
    pub category_id: i64,
    pub status: CourseStatus,
    pub tags: Vec<String>,
    pub instructor: InstructorSummary,
    pub students_enrolled: u64,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubSectionView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub duration_seconds: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionView {
    pub id: i64,
    pub section_name: String,
    pub position: i32,
    pub sub_sections: Vec<SubSectionView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseDetails {
    pub id: i64,
    pub course_name: String,
    pub course_description: String,
    pub what_you_will_learn: String,
    pub price: i64,
    pub thumbnail: String,
    pub status: CourseStatus,
    pub tags: Vec<String>,
    pub instructions: Vec<String>,
    pub category: Option<Category>,
    pub instructor: InstructorSummary,
    pub sections: Vec<SectionView>,
    pub total_lectures: usize,
    pub total_duration_seconds: i64,
    pub total_duration: String,
    pub average_rating: f64,
    pub rating_count: u64,
    pub students_enrolled: u64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_videos: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryCourses {
    pub category: Category,
    pub courses: Vec<CourseSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryPage {
    pub selected_category: CategoryCourses,
    pub different_category: Option<CategoryCourses>,
    pub most_selling_courses: Vec<CourseSummary>,
}

async fn instructors_by_id(
    db: &DbConn,
    ids: Vec<i64>,
) -> Result<HashMap<i64, InstructorSummary>, DbErr> {
    Ok(user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?
        .iter()
        .map(|u| (u.id, InstructorSummary::from(u)))
        .collect())
}

/// Builds course cards, keeping the input order.
pub async fn summarize(db: &DbConn, courses: Vec<Course>) -> Result<Vec<CourseSummary>, DbErr> {
    let instructors = instructors_by_id(db, courses.iter().map(|c| c.instructor_id).collect()).await?;

    let mut out = Vec::with_capacity(courses.len());
    for course in courses {
        let students_enrolled = Enrollment::count_for_course(db, course.id).await?;
        let AverageRating { average_rating, .. } = Rating::average_for_course(db, course.id).await?;
        out.push(CourseSummary {
            id: course.id,
            tags: course.tag_list(),
            instructor: instructors.get(&course.instructor_id).cloned().unwrap_or_default(),
            course_name: course.course_name,
            course_description: course.course_description,
            price: course.price,
            thumbnail: course.thumbnail,
            category_id: course.category_id,
            status: course.status,
            students_enrolled,
            average_rating,
            created_at: course.created_at,
        });
    }
    Ok(out)
}

/// Full course page. Video URLs are only included when `include_videos` is set.
pub async fn course_details(
    db: &DbConn,
    course: Course,
    include_videos: bool,
) -> Result<CourseDetails, DbErr> {
    let sections = Section::list_for_course(db, course.id).await?;
    let section_ids: Vec<i64> = sections.iter().map(|s| s.id).collect();
    let lectures = SubSection::list_for_sections(db, &section_ids).await?;
    let total_duration_seconds = sub_section::total_seconds(&lectures);

    let mut by_section: HashMap<i64, Vec<SubSectionView>> = HashMap::new();
    for lecture in &lectures {
        by_section
            .entry(lecture.section_id)
            .or_default()
            .push(SubSectionView {
                id: lecture.id,
                title: lecture.title.clone(),
                description: lecture.description.clone(),
                duration_seconds: lecture.duration_seconds,
                video_url: include_videos.then(|| lecture.video_url.clone()),
            });
    }

    let section_views = sections
        .into_iter()
        .map(|s| SectionView {
            sub_sections: by_section.remove(&s.id).unwrap_or_default(),
            id: s.id,
            section_name: s.section_name,
            position: s.position,
        })
        .collect();

    let category = Category::find_by_id(db, course.category_id).await?;
    let instructor = user::Model::find_by_id(db, course.instructor_id)
        .await?
        .map(|u| InstructorSummary::from(&u))
        .unwrap_or_default();
    let rating = Rating::average_for_course(db, course.id).await?;
    let students_enrolled = Enrollment::count_for_course(db, course.id).await?;

    Ok(CourseDetails {
        id: course.id,
        tags: course.tag_list(),
        instructions: course.instruction_list(),
        course_name: course.course_name,
        course_description: course.course_description,
        what_you_will_learn: course.what_you_will_learn,
        price: course.price,
        thumbnail: course.thumbnail,
        status: course.status,
        category,
        instructor,
        sections: section_views,
        total_lectures: lectures.len(),
        total_duration_seconds,
        total_duration: format_duration(total_duration_seconds),
        average_rating: rating.average_rating,
        rating_count: rating.count,
        students_enrolled,
        created_at: course.created_at,
        completed_videos: None,
    })
}

/// Published courses with the most enrolments.
pub async fn most_selling(db: &DbConn, limit: usize) -> Result<Vec<CourseSummary>, DbErr> {
    let mut cards = summarize(db, Course::list_published(db).await?).await?;
    cards.sort_by(|a, b| b.students_enrolled.cmp(&a.students_enrolled));
    cards.truncate(limit);
    Ok(cards)
}

/// Landing page data for one category plus a random other category.
pub async fn category_page(db: &DbConn, category_id: i64) -> Result<CategoryPage, CatalogError> {
    let category = Category::find_by_id(db, category_id)
        .await?
        .ok_or(CatalogError::CategoryNotFound)?;

    let selected = Course::list_published_in_category(db, category_id).await?;
    if selected.is_empty() {
        return Err(CatalogError::NoPublishedCourses);
    }
    let selected_category = CategoryCourses {
        category,
        courses: summarize(db, selected).await?,
    };

    let mut others = Vec::new();
    for other in Category::all(db).await? {
        if other.id == category_id {
            continue;
        }
        let courses = Course::list_published_in_category(db, other.id).await?;
        if !courses.is_empty() {
            others.push((other, courses));
        }
    }
    let picked = {
        let mut rng = rand::thread_rng();
        others.choose_mut(&mut rng).map(|(c, courses)| (c.clone(), std::mem::take(courses)))
    };
    let different_category = match picked {
        Some((category, courses)) => Some(CategoryCourses {
            category,
            courses: summarize(db, courses).await?,
        }),
        None => None,
    };

    Ok(CategoryPage {
        selected_category,
        different_category,
        most_selling_courses: most_selling(db, MOST_SELLING_LIMIT).await?,
    })
}
