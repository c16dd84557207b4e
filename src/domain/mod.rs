pub mod content_title;
pub mod email_address;
pub mod job;
pub mod new_subscriber;
pub mod publish_event;
pub mod subscriber;
pub mod subscriber_name;
pub mod video;

/// Trims optional text input, treating a blank value the same as a missing one.
pub fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}
