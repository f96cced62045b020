//! Resource implementations

pub mod application_key;
pub mod bucket;
pub mod bucket_file_version;
pub mod bucket_notification_rules;

pub use application_key::ApplicationKeyResource;
pub use bucket::BucketResource;
pub use bucket_file_version::BucketFileVersionResource;
pub use bucket_notification_rules::BucketNotificationRulesResource;

use tfbridge::AttributeStore;

fn state_id(state: &AttributeStore) -> String {
    state.id().unwrap_or_default().to_string()
}

/// A read that finds nothing for a resource Terraform already tracks
fn drifted(type_name: &str, id: &str, found: &str, is_new_resource: bool) -> bool {
    if found.is_empty() && !is_new_resource {
        tracing::warn!(resource = type_name, id, "Resource not found, possible resource drift");
        return true;
    }
    false
}
