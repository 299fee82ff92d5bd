pub mod category;
pub mod completed_video;
pub mod course;
pub mod course_enrollment;
pub mod course_progress;
pub mod otp;
pub mod password_reset_token;
pub mod payment_order;
pub mod profile;
pub mod rating_review;
pub mod section;
pub mod sub_section;
pub mod user;

pub use category::Entity as Category;
pub use course::Entity as Course;
pub use course_enrollment::Entity as CourseEnrollment;
pub use section::Entity as Section;
pub use sub_section::Entity as SubSection;
pub use user::Entity as User;
