use crate::runtime::notification::NotificationConfiguration;

pub trait NotificationStore {
    /// Replaces the bucket's whole notification configuration.
    fn put_notification_configuration(
        &self,
        bucket: &str,
        configuration: &NotificationConfiguration,
    ) -> Result<(), String>;
}
