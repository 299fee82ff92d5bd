mod auth_test;
mod categories_test;
mod contact_test;
mod courses_test;
mod guards_test;
mod payments_test;
mod profile_test;
