pub mod maintenance;
pub mod notifications;
pub mod plans;
pub mod seller_activity;
pub mod subscription_requests;

#[cfg(test)]
pub(crate) mod test_support;
