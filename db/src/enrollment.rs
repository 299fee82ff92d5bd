//! Purchase validation and enrolment.
//!
//! Enrolling always creates the matching `course_progress` row, and settling
//! a paid order enrols the buyer in every course of the order inside one
//! transaction.

use sea_orm::{ConnectionTrait, DbConn, DbErr, EntityTrait, TransactionTrait};
use std::collections::HashSet;

use crate::models::course::{self, Model as Course};
use crate::models::course_enrollment::Model as Enrollment;
use crate::models::course_progress::Model as Progress;
use crate::models::payment_order::Model as PaymentOrder;

#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Please select at least one course")]
    EmptySelection,

    #[error("Course {0} not found")]
    CourseNotFound(i64),

    #[error("Course {0} is not available for purchase")]
    NotPublished(i64),

    #[error("Student is already enrolled in course {0}")]
    AlreadyEnrolled(i64),

    #[error("Order total is too large")]
    AmountTooLarge,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Order has already been processed")]
    AlreadyProcessed,
}

/// Checks that every requested course can be bought by `user_id` and
/// returns them in request order, duplicates removed.
pub async fn validate_purchase(
    db: &DbConn,
    user_id: i64,
    course_ids: &[i64],
) -> Result<Vec<Course>, EnrollmentError> {
    let mut seen = HashSet::new();
    let ids: Vec<i64> = course_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();
    if ids.is_empty() {
        return Err(EnrollmentError::EmptySelection);
    }

    let found = Course::find_many_by_ids(db, &ids).await?;
    let mut courses = Vec::with_capacity(ids.len());
    for id in ids {
        let course = found
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(EnrollmentError::CourseNotFound(id))?;
        if !course.is_published() {
            return Err(EnrollmentError::NotPublished(id));
        }
        if Enrollment::is_enrolled(db, user_id, id).await? {
            return Err(EnrollmentError::AlreadyEnrolled(id));
        }
        courses.push(course);
    }
    Ok(courses)
}

/// Total order value in minor currency units.
pub fn order_amount(courses: &[Course]) -> Result<i64, EnrollmentError> {
    courses
        .iter()
        .try_fold(0i64, |total, c| total.checked_add(c.price))
        .and_then(|total| total.checked_mul(100))
        .ok_or(EnrollmentError::AmountTooLarge)
}

/// Enrols `user_id` in `course_id` and opens its progress record.
pub async fn enroll<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    course_id: i64,
) -> Result<(), EnrollmentError> {
    if Enrollment::is_enrolled(conn, user_id, course_id).await? {
        return Err(EnrollmentError::AlreadyEnrolled(course_id));
    }
    Enrollment::create(conn, user_id, course_id).await?;
    if Progress::find_for(conn, user_id, course_id).await?.is_none() {
        Progress::create(conn, user_id, course_id).await?;
    }
    Ok(())
}

/// Marks the caller's order paid and enrols them in its courses.
///
/// Courses the buyer already owns, or that were deleted after checkout, are
/// skipped. Returns the settled order and the courses newly enrolled in.
pub async fn settle_order(
    db: &DbConn,
    user_id: i64,
    gateway_order_id: &str,
    payment_id: &str,
) -> Result<(PaymentOrder, Vec<Course>), EnrollmentError> {
    let txn = db.begin().await?;

    let order = PaymentOrder::find_by_gateway_id(&txn, gateway_order_id)
        .await?
        .filter(|o| o.user_id == user_id)
        .ok_or(EnrollmentError::OrderNotFound)?;
    if order.is_paid() {
        return Err(EnrollmentError::AlreadyProcessed);
    }

    let mut enrolled = Vec::new();
    for course_id in order.course_id_list() {
        let Some(course) = course::Entity::find_by_id(course_id).one(&txn).await? else {
            tracing::warn!(course_id, order = %gateway_order_id, "Skipping deleted course in paid order");
            continue;
        };
        match enroll(&txn, user_id, course_id).await {
            Ok(()) => enrolled.push(course),
            Err(EnrollmentError::AlreadyEnrolled(_)) => {}
            Err(e) => return Err(e),
        }
    }

    let order = PaymentOrder::mark_paid(&txn, order.id, payment_id).await?;
    txn.commit().await?;
    Ok((order, enrolled))
}
