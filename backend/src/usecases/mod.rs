pub mod monthly_reset;
pub mod notifications;
pub mod plans;
pub mod seller_activity;
pub mod subscription_requests;
