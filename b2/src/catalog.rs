//! Backend entity kinds and the field registry built from their schemas

use crate::{data_sources, resources};
use std::fmt;
use tfbridge::Registry;

/// Sub-command of the bindings executable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceName {
    AccountInfo,
    ApplicationKey,
    Bucket,
    BucketFile,
    BucketFiles,
    BucketFileSignedUrl,
    BucketFileVersion,
    BucketNotificationRules,
}

impl ResourceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceName::AccountInfo => "account_info",
            ResourceName::ApplicationKey => "application_key",
            ResourceName::Bucket => "bucket",
            ResourceName::BucketFile => "bucket_file",
            ResourceName::BucketFiles => "bucket_files",
            ResourceName::BucketFileSignedUrl => "bucket_file_signed_url",
            ResourceName::BucketFileVersion => "bucket_file_version",
            ResourceName::BucketNotificationRules => "bucket_notification_rules",
        }
    }

    /// Terraform type name, e.g. `b2_bucket`
    pub fn type_name(&self) -> String {
        format!("b2_{}", self.as_str())
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptors for every resource and data source the provider serves
pub fn registry() -> Registry<ResourceName> {
    Registry::builder()
        .data_source(
            ResourceName::AccountInfo,
            &data_sources::AccountInfoDataSource::schema_static(),
        )
        .data_source(
            ResourceName::ApplicationKey,
            &data_sources::ApplicationKeyDataSource::schema_static(),
        )
        .data_source(
            ResourceName::Bucket,
            &data_sources::BucketDataSource::schema_static(),
        )
        .data_source(
            ResourceName::BucketFile,
            &data_sources::BucketFileDataSource::schema_static(),
        )
        .data_source(
            ResourceName::BucketFiles,
            &data_sources::BucketFilesDataSource::schema_static(),
        )
        .data_source(
            ResourceName::BucketFileSignedUrl,
            &data_sources::BucketFileSignedUrlDataSource::schema_static(),
        )
        .data_source(
            ResourceName::BucketNotificationRules,
            &data_sources::BucketNotificationRulesDataSource::schema_static(),
        )
        .resource(
            ResourceName::ApplicationKey,
            &resources::ApplicationKeyResource::schema_static(),
        )
        .resource(
            ResourceName::Bucket,
            &resources::BucketResource::schema_static(),
        )
        .resource(
            ResourceName::BucketFileVersion,
            &resources::BucketFileVersionResource::schema_static(),
        )
        .resource(
            ResourceName::BucketNotificationRules,
            &resources::BucketNotificationRulesResource::schema_static(),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfbridge::Surface;

    #[test]
    fn type_names_carry_provider_prefix() {
        assert_eq!(ResourceName::Bucket.type_name(), "b2_bucket");
        assert_eq!(
            ResourceName::BucketFileSignedUrl.type_name(),
            "b2_bucket_file_signed_url"
        );
    }

    #[test]
    fn registry_covers_both_surfaces() {
        let registry = registry();

        assert!(registry
            .descriptors(ResourceName::Bucket, Surface::Resource)
            .is_some());
        assert!(registry
            .descriptors(ResourceName::Bucket, Surface::DataSource)
            .is_some());
        assert!(registry
            .descriptors(ResourceName::AccountInfo, Surface::Resource)
            .is_none());
        assert!(registry
            .descriptors(ResourceName::BucketFileVersion, Surface::DataSource)
            .is_none());
    }

    #[test]
    fn registry_marks_secrets_and_deprecations() {
        let registry = registry();
        let descriptors = registry
            .descriptors(ResourceName::ApplicationKey, Surface::Resource)
            .unwrap();

        let find = |name: &str| descriptors.iter().find(|d| d.name == name).unwrap();
        assert!(find("application_key").sensitive);
        assert!(find("bucket_id").deprecated);
        assert!(!find("key_name").sensitive);
    }
}
