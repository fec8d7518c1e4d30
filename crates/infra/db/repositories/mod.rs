pub mod notifications;
pub mod profiles;
pub mod subscription_requests;
