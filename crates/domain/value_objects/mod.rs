pub mod activity;
pub mod enums;
pub mod notifications;
pub mod plans;
pub mod subscription_requests;
