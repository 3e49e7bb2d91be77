pub use s3_notification_core::{contract, notification, response};
