//! Typed input and output records exchanged with the bindings
//!
//! External names are the camelCase keys the bindings speak. State keys are
//! derived from them, so `bucketId` lands in the `bucket_id` attribute.

use crate::catalog::ResourceName;
use indexmap::IndexMap;
use tfbridge::{record, Decode, Encode};

/// Record bound to one backend entity kind
pub trait Record: Encode + Decode {
    const RESOURCE: ResourceName;
}

macro_rules! bind {
    ($resource:expr => $($record:ty),+ $(,)?) => {
        $(
            impl Record for $record {
                const RESOURCE: ResourceName = $resource;
            }
        )+
    };
}

// Shared blocks

record! {
    pub struct Allowed {
        buckets: Vec<AllowedBucket> = "buckets",
        /// Superseded by `buckets`
        bucket_id: String = "bucketId",
        /// Superseded by `buckets`
        bucket_name: String = "bucketName",
        capabilities: Vec<String> = "capabilities",
        name_prefix: String = "namePrefix",
    }
}

record! {
    pub struct AllowedBucket {
        id: String = "id",
        name: String = "name",
    }
}

record! {
    pub struct CorsRule {
        cors_rule_name: String = "corsRuleName",
        allowed_origins: Vec<String> = "allowedOrigins",
        allowed_operations: Vec<String> = "allowedOperations",
        max_age_seconds: i64 = "maxAgeSeconds",
        allowed_headers: Vec<String> = "allowedHeaders",
        expose_headers: Vec<String> = "exposeHeaders",
    }
}

record! {
    pub struct RetentionPeriod {
        duration: i64 = "duration",
        unit: String = "unit",
    }
}

record! {
    pub struct DefaultRetention {
        mode: String = "mode",
        period: Option<RetentionPeriod> = "period",
    }
}

record! {
    pub struct FileLockConfiguration {
        is_file_lock_enabled: bool = "isFileLockEnabled",
        default_retention: Option<DefaultRetention> = "defaultRetention",
    }
}

record! {
    pub struct ServerSideEncryption {
        mode: String = "mode",
        algorithm: String = "algorithm",
    }
}

record! {
    pub struct LifecycleRule {
        file_name_prefix: String = "fileNamePrefix",
        days_from_hiding_to_deleting: i64 = "daysFromHidingToDeleting",
        days_from_uploading_to_hiding: i64 = "daysFromUploadingToHiding",
        days_from_starting_to_canceling_unfinished_large_files: i64 =
            "daysFromStartingToCancelingUnfinishedLargeFiles",
    }
}

record! {
    pub struct FileVersion {
        action: String = "action",
        bucket_id: String = "bucketId",
        content_md5: String = "contentMd5",
        content_sha1: String = "contentSha1",
        content_type: String = "contentType",
        file_id: String = "fileId",
        file_info: IndexMap<String, String> = "fileInfo",
        file_name: String = "fileName",
        server_side_encryption: Option<ServerSideEncryption> = "serverSideEncryption",
        size: i64 = "size",
        upload_timestamp: i64 = "uploadTimestamp",
    }
}

record! {
    pub struct CustomHeader {
        name: String = "name",
        value: String = "value",
    }
}

record! {
    pub struct TargetConfiguration {
        custom_headers: Vec<CustomHeader> = "customHeaders",
        hmac_sha256_signing_secret: String = "hmacSha256SigningSecret",
        target_type: String = "targetType",
        url: String = "url",
    }
}

record! {
    pub struct NotificationRule {
        event_types: Vec<String> = "eventTypes",
        is_enabled: bool = "isEnabled",
        is_suspended: bool = "isSuspended",
        name: String = "name",
        object_name_prefix: String = "objectNamePrefix",
        suspension_reason: String = "suspensionReason",
        target_configuration: Option<TargetConfiguration> = "targetConfiguration",
    }
}

record! {
    pub struct FileEncryptionKey {
        key_id: String = "keyId",
        secret_b64: String = "secretB64",
    }
}

record! {
    pub struct FileEncryption {
        algorithm: String = "algorithm",
        key: Vec<FileEncryptionKey> = "key",
        mode: String = "mode",
    }
}

// Account info

record! {
    pub struct AccountInfoInput {}
}

record! {
    pub struct AccountInfoOutput {
        account_id: String = "accountId",
        account_auth_token: String = "accountAuthToken",
        api_url: String = "apiUrl",
        allowed: Vec<Allowed> = "allowed",
        download_url: String = "downloadUrl",
        s3_api_url: String = "s3ApiUrl",
        recommended_part_size: i64 = "recommendedPartSize",
        absolute_minimum_part_size: i64 = "absoluteMinimumPartSize",
    }
}

bind!(ResourceName::AccountInfo => AccountInfoInput, AccountInfoOutput);

// Application key

record! {
    pub struct ApplicationKeyInput {
        application_key_id: String = "applicationKeyId" omit_empty,
        key_name: String = "keyName" omit_empty,
        capabilities: Vec<String> = "capabilities" omit_empty,
        name_prefix: String = "namePrefix" omit_empty,
        valid_duration_in_seconds: i64 = "validDurationInSeconds" omit_empty,
        bucket_ids: Vec<String> = "bucketIds" omit_empty,
        /// Superseded by `bucket_ids`; requires `apiver`
        bucket_id: String = "bucketId" omit_empty,
        apiver: String = "apiver" omit_empty,
    }
}

record! {
    pub struct ApplicationKeyOutput {
        application_key_id: String = "applicationKeyId",
        application_key: String = "applicationKey",
        bucket_ids: Vec<String> = "bucketIds",
        bucket_id: String = "bucketId",
        capabilities: Vec<String> = "capabilities",
        expiration_timestamp: i64 = "expirationTimestamp",
        key_name: String = "keyName",
        name_prefix: String = "namePrefix",
        options: Vec<String> = "options",
        valid_duration_in_seconds: i64 = "validDurationInSeconds",
    }
}

bind!(ResourceName::ApplicationKey => ApplicationKeyInput, ApplicationKeyOutput);

// Bucket

record! {
    pub struct BucketInput {
        bucket_id: String = "bucketId" omit_empty,
        bucket_name: String = "bucketName" omit_empty,
        account_id: String = "accountId" omit_empty,
        bucket_type: String = "bucketType" omit_empty,
        bucket_info: IndexMap<String, String> = "bucketInfo" omit_empty,
        cors_rules: Vec<CorsRule> = "corsRules" omit_empty,
        file_lock_configuration: Option<FileLockConfiguration> = "fileLockConfiguration" omit_empty,
        default_server_side_encryption: Option<ServerSideEncryption> =
            "defaultServerSideEncryption" omit_empty,
        lifecycle_rules: Vec<LifecycleRule> = "lifecycleRules" omit_empty,
    }
}

record! {
    pub struct BucketOutput {
        account_id: String = "accountId",
        bucket_id: String = "bucketId",
        bucket_info: IndexMap<String, String> = "bucketInfo",
        bucket_name: String = "bucketName",
        bucket_type: String = "bucketType",
        cors_rules: Vec<CorsRule> = "corsRules",
        default_server_side_encryption: Option<ServerSideEncryption> =
            "defaultServerSideEncryption",
        file_lock_configuration: Option<FileLockConfiguration> = "fileLockConfiguration",
        lifecycle_rules: Vec<LifecycleRule> = "lifecycleRules",
        options: Vec<String> = "options",
        revision: i64 = "revision",
    }
}

bind!(ResourceName::Bucket => BucketInput, BucketOutput);

// Bucket file

record! {
    pub struct BucketFileInput {
        bucket_id: String = "bucketId",
        file_name: String = "fileName",
        show_versions: bool = "showVersions",
    }
}

record! {
    pub struct BucketFileOutput {
        input: BucketFileInput = flatten,
        sha1: String = "_sha1",
        file_versions: Vec<FileVersion> = "fileVersions",
    }
}

bind!(ResourceName::BucketFile => BucketFileInput, BucketFileOutput);

// Bucket files

record! {
    pub struct BucketFilesInput {
        bucket_id: String = "bucketId",
        folder_name: String = "folderName",
        show_versions: bool = "showVersions",
        recursive: bool = "recursive",
    }
}

record! {
    pub struct BucketFilesOutput {
        input: BucketFilesInput = flatten,
        sha1: String = "_sha1",
        file_versions: Vec<FileVersion> = "fileVersions",
    }
}

bind!(ResourceName::BucketFiles => BucketFilesInput, BucketFilesOutput);

// Signed URL

record! {
    pub struct BucketFileSignedUrlInput {
        bucket_id: String = "bucketId",
        file_name: String = "fileName",
        duration: i64 = "duration",
    }
}

record! {
    pub struct BucketFileSignedUrlOutput {
        input: BucketFileSignedUrlInput = flatten,
        signed_url: String = "signedUrl",
    }
}

bind!(ResourceName::BucketFileSignedUrl => BucketFileSignedUrlInput, BucketFileSignedUrlOutput);

// Bucket file version

record! {
    pub struct BucketFileVersionInput {
        file_id: String = "fileId" omit_empty,
        bucket_id: String = "bucketId" omit_empty,
        file_name: String = "fileName" omit_empty,
        content_type: String = "contentType" omit_empty,
        file_info: IndexMap<String, String> = "fileInfo" omit_empty,
        server_side_encryption: Option<FileEncryption> = "serverSideEncryption" omit_empty,
        source: String = "source" omit_empty,
    }
}

record! {
    pub struct BucketFileVersionOutput {
        action: String = "action",
        bucket_id: String = "bucketId",
        content_md5: String = "contentMd5",
        content_sha1: String = "contentSha1",
        content_type: String = "contentType",
        file_id: String = "fileId",
        file_info: IndexMap<String, String> = "fileInfo",
        file_name: String = "fileName",
        server_side_encryption: Option<FileEncryption> = "serverSideEncryption",
        size: i64 = "size",
        source: String = "source",
        upload_timestamp: i64 = "uploadTimestamp",
    }
}

bind!(ResourceName::BucketFileVersion => BucketFileVersionInput, BucketFileVersionOutput);

// Notification rules

record! {
    pub struct BucketNotificationRulesInput {
        bucket_id: String = "bucketId",
        notification_rules: Vec<NotificationRule> = "notificationRules" omit_empty,
    }
}

record! {
    pub struct BucketNotificationRulesOutput {
        bucket_id: String = "bucketId",
        notification_rules: Vec<NotificationRule> = "notificationRules",
    }
}

bind!(
    ResourceName::BucketNotificationRules =>
    BucketNotificationRulesInput,
    BucketNotificationRulesOutput,
);

#[cfg(test)]
mod tests {
    use super::*;
    use tfbridge::{decode, encode, Casing, Tree};

    #[test]
    fn bucket_input_drops_empty_fields_on_the_wire() {
        let input = BucketInput {
            bucket_id: "b1".to_string(),
            ..Default::default()
        };

        let tree = encode(&input, Casing::External);
        assert_eq!(tree.to_json().unwrap(), br#"{"bucketId":"b1"}"#);
    }

    #[test]
    fn nested_optional_block_is_a_single_element_list() {
        let output = BucketOutput {
            bucket_id: "b1".to_string(),
            default_server_side_encryption: Some(ServerSideEncryption {
                mode: "SSE-B2".to_string(),
                algorithm: "AES256".to_string(),
            }),
            ..Default::default()
        };

        let tree = encode(&output, Casing::Snake);
        let sse = tree.get("default_server_side_encryption").unwrap();
        assert_eq!(sse.as_list().map(|l| l.len()), Some(1));
        assert_eq!(
            tree.get("file_lock_configuration"),
            Some(&Tree::List(vec![]))
        );
    }

    #[test]
    fn embedded_input_is_flattened_into_output() {
        let json = br#"{"bucketId":"b1","fileName":"a.txt","showVersions":true,"_sha1":"abc","fileVersions":[]}"#;
        let output: BucketFileOutput =
            decode(&Tree::from_json(json).unwrap(), Casing::External).unwrap();

        assert_eq!(output.input.bucket_id, "b1");
        assert!(output.input.show_versions);
        assert_eq!(output.sha1, "abc");

        let state = encode(&output, Casing::Snake);
        let keys: Vec<_> = state.as_map().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["bucket_id", "file_name", "show_versions", "_sha1", "file_versions"]
        );
    }

    #[test]
    fn bucket_output_decodes_wire_response() {
        let json = br#"{
            "accountId": "acc",
            "bucketId": "b1",
            "bucketInfo": {"env": "prod"},
            "bucketName": "x",
            "bucketType": "allPublic",
            "corsRules": [],
            "defaultServerSideEncryption": {"mode": "none", "algorithm": null},
            "fileLockConfiguration": [{"isFileLockEnabled": false, "defaultRetention": [{"mode": "none", "period": null}]}],
            "lifecycleRules": [{"fileNamePrefix": "", "daysFromHidingToDeleting": 1, "daysFromUploadingToHiding": null}],
            "options": ["s3"],
            "revision": 1
        }"#;

        let output: BucketOutput =
            decode(&Tree::from_json(json).unwrap(), Casing::External).unwrap();

        assert_eq!(output.bucket_type, "allPublic");
        assert_eq!(output.revision, 1);
        assert_eq!(output.bucket_info.get("env").map(String::as_str), Some("prod"));
        assert_eq!(output.default_server_side_encryption.unwrap().mode, "none");
        let lock = output.file_lock_configuration.unwrap();
        assert_eq!(lock.default_retention.unwrap().period, None);
        assert_eq!(output.lifecycle_rules[0].days_from_hiding_to_deleting, 1);
        assert_eq!(output.lifecycle_rules[0].days_from_uploading_to_hiding, 0);
    }

    #[test]
    fn records_know_their_resource() {
        assert_eq!(BucketInput::RESOURCE, ResourceName::Bucket);
        assert_eq!(
            BucketFileSignedUrlOutput::RESOURCE,
            ResourceName::BucketFileSignedUrl
        );
    }
}
