pub mod email;
pub mod media;
pub mod payment;
