pub mod m202601010001_create_users;
pub mod m202601010002_create_profiles;
pub mod m202601010003_create_otps;
pub mod m202601010004_create_password_reset_tokens;
pub mod m202601010005_create_categories;
pub mod m202601010006_create_courses;
pub mod m202601010007_create_sections;
pub mod m202601010008_create_sub_sections;
pub mod m202601010009_create_course_enrollments;
pub mod m202601010010_create_course_progress;
pub mod m202601010011_create_ratings_and_reviews;
pub mod m202601010012_create_payment_orders;
