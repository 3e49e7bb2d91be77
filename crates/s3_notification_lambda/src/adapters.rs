pub mod notification_store;
pub mod response_signal;
