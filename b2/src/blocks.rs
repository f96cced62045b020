//! Nested blocks shared between resource and data source schemas
//!
//! On a data source every field of a block is computed. On a resource the
//! same field is either required or optional.

use tfbridge::schema::Attribute;
use tfbridge::{AttributeBuilder, AttributeType, Surface};

#[derive(Clone, Copy)]
enum Presence {
    Required,
    Optional,
}

fn shaped(builder: AttributeBuilder, surface: Surface, presence: Presence) -> Attribute {
    match (surface, presence) {
        (Surface::DataSource, _) => builder.computed().build(),
        (Surface::Resource, Presence::Required) => builder.required().build(),
        (Surface::Resource, Presence::Optional) => builder.optional().build(),
    }
}

fn strings() -> AttributeType {
    AttributeType::list_of(AttributeType::String)
}

pub fn cors_rules(surface: Surface) -> AttributeType {
    use Presence::*;
    AttributeType::block(vec![
        shaped(
            AttributeBuilder::string("cors_rule_name")
                .description("A name for humans to recognize the rule in a user interface."),
            surface,
            Required,
        ),
        shaped(
            AttributeBuilder::new("allowed_origins", strings())
                .description("A non-empty list specifying which origins the rule covers."),
            surface,
            Required,
        ),
        shaped(
            AttributeBuilder::new("allowed_operations", strings())
                .description("A list specifying which operations the rule allows."),
            surface,
            Required,
        ),
        shaped(
            AttributeBuilder::number("max_age_seconds").description(
                "Maximum number of seconds that a browser may cache the response to a preflight request.",
            ),
            surface,
            Required,
        ),
        shaped(
            AttributeBuilder::new("allowed_headers", strings())
                .description("Headers allowed in a pre-flight request."),
            surface,
            Optional,
        ),
        shaped(
            AttributeBuilder::new("expose_headers", strings())
                .description("Headers that may be exposed to an application inside the client."),
            surface,
            Optional,
        ),
    ])
}

pub fn file_lock_configuration(surface: Surface) -> AttributeType {
    let period = AttributeType::block(vec![
        AttributeBuilder::number("duration")
            .description("Duration")
            .required()
            .build(),
        AttributeBuilder::string("unit")
            .description("Unit for duration (days|years)")
            .required()
            .build(),
    ]);
    let default_retention = AttributeType::block(vec![
        AttributeBuilder::string("mode")
            .description("Default retention mode (compliance|governance|none).")
            .required()
            .build(),
        AttributeBuilder::new("period", period)
            .description("How long for to make files immutable")
            .optional()
            .build(),
    ]);

    let is_file_lock_enabled = AttributeBuilder::bool("is_file_lock_enabled")
        .description("Whether the bucket is File Lock-enabled.");
    let is_file_lock_enabled = match surface {
        Surface::DataSource => is_file_lock_enabled.computed().build(),
        Surface::Resource => is_file_lock_enabled.optional().force_new().build(),
    };

    AttributeType::block(vec![
        is_file_lock_enabled,
        shaped(
            AttributeBuilder::new("default_retention", default_retention)
                .description("Default retention settings for files uploaded to this bucket"),
            surface,
            Presence::Optional,
        ),
    ])
}

pub fn server_side_encryption(surface: Surface) -> AttributeType {
    AttributeType::block(vec![
        shaped(
            AttributeBuilder::string("mode").description("Server-side encryption mode."),
            surface,
            Presence::Optional,
        ),
        shaped(
            AttributeBuilder::string("algorithm")
                .description("Server-side encryption algorithm. AES256 is the only one supported."),
            surface,
            Presence::Optional,
        ),
    ])
}

pub fn lifecycle_rules(surface: Surface) -> AttributeType {
    use Presence::*;
    AttributeType::block(vec![
        shaped(
            AttributeBuilder::string("file_name_prefix")
                .description("It specifies which files in the bucket it applies to."),
            surface,
            Required,
        ),
        shaped(
            AttributeBuilder::number("days_from_hiding_to_deleting").description(
                "It says how long to keep file versions that are not the current version.",
            ),
            surface,
            Optional,
        ),
        shaped(
            AttributeBuilder::number("days_from_uploading_to_hiding").description(
                "It causes files to be hidden automatically after the given number of days.",
            ),
            surface,
            Optional,
        ),
        shaped(
            AttributeBuilder::number("days_from_starting_to_canceling_unfinished_large_files")
                .description("It cancels unfinished large files after the given number of days."),
            surface,
            Optional,
        ),
    ])
}

/// Always computed; only data sources list file versions
pub fn file_versions() -> AttributeType {
    let computed = |builder: AttributeBuilder| builder.computed().build();
    AttributeType::block(vec![
        computed(AttributeBuilder::string("action").description(
            "One of 'start', 'upload', 'hide', 'folder', or other values added in the future.",
        )),
        computed(AttributeBuilder::string("bucket_id").description("The ID of the bucket.")),
        computed(AttributeBuilder::string("content_md5").description("MD5 sum of the content.")),
        computed(AttributeBuilder::string("content_sha1").description("SHA1 hash of the content.")),
        computed(AttributeBuilder::string("content_type").description("Content type.")),
        computed(
            AttributeBuilder::string("file_id")
                .description("The unique identifier for this version of this file."),
        ),
        computed(
            AttributeBuilder::new("file_info", AttributeType::map_of(AttributeType::String))
                .description("The custom information that is uploaded with the file."),
        ),
        computed(AttributeBuilder::string("file_name").description("The name of the B2 file.")),
        computed(
            AttributeBuilder::new(
                "server_side_encryption",
                server_side_encryption(Surface::DataSource),
            )
            .description("Server-side encryption settings."),
        ),
        computed(AttributeBuilder::number("size").description("The file size.")),
        computed(
            AttributeBuilder::number("upload_timestamp")
                .description("This is a UTC time when this file was uploaded."),
        ),
    ])
}

/// Capabilities of the key the provider authenticates with
pub fn allowed() -> AttributeType {
    let buckets = AttributeType::block(vec![
        AttributeBuilder::string("id")
            .description("The ID of the bucket.")
            .computed()
            .build(),
        AttributeBuilder::string("name")
            .description("The name of the bucket.")
            .computed()
            .build(),
    ]);

    AttributeType::block(vec![
        AttributeBuilder::new("buckets", buckets)
            .description("When present, restricts access to the listed buckets.")
            .computed()
            .build(),
        AttributeBuilder::string("bucket_id")
            .description("When present, restricts access to one bucket.")
            .computed()
            .deprecated("Use 'buckets' instead")
            .build(),
        AttributeBuilder::string("bucket_name")
            .description("The name of the bucket 'bucket_id' points at.")
            .computed()
            .deprecated("Use 'buckets' instead")
            .build(),
        AttributeBuilder::new("capabilities", strings())
            .description("A list of strings, each one naming a capability the key has.")
            .computed()
            .build(),
        AttributeBuilder::string("name_prefix")
            .description("When present, access is restricted to files whose names start with the prefix.")
            .computed()
            .build(),
    ])
}

pub fn notification_rules(surface: Surface) -> AttributeType {
    use Presence::*;

    let custom_headers = AttributeType::block(vec![
        AttributeBuilder::string("name")
            .description("Name of the header.")
            .required()
            .build(),
        AttributeBuilder::string("value")
            .description("Value of the header.")
            .required()
            .build(),
    ]);
    let target_configuration = AttributeType::block(vec![
        AttributeBuilder::new("custom_headers", custom_headers)
            .description("Additional header name/value pairs sent on the webhook invocation.")
            .optional()
            .build(),
        AttributeBuilder::string("hmac_sha256_signing_secret")
            .description("The signing secret for use in verifying the X-Bz-Event-Notification-Signature.")
            .optional()
            .sensitive()
            .build(),
        AttributeBuilder::string("target_type")
            .description("The type of the target configuration, currently \"webhook\" only.")
            .required()
            .build(),
        AttributeBuilder::string("url")
            .description("The URL for the webhook.")
            .required()
            .build(),
    ]);

    AttributeType::block(vec![
        shaped(
            AttributeBuilder::new("event_types", strings())
                .description("The list of event types for the event notification rule."),
            surface,
            Required,
        ),
        shaped(
            AttributeBuilder::bool("is_enabled")
                .description("Whether the event notification rule is enabled."),
            surface,
            Optional,
        ),
        AttributeBuilder::bool("is_suspended")
            .description("Whether the event notification rule is suspended.")
            .computed()
            .build(),
        shaped(
            AttributeBuilder::string("name").description(
                "A name for the event notification rule, unique among the bucket's rules.",
            ),
            surface,
            Required,
        ),
        shaped(
            AttributeBuilder::string("object_name_prefix")
                .description("Specifies which object(s) in the bucket the rule applies to."),
            surface,
            Optional,
        ),
        AttributeBuilder::string("suspension_reason")
            .description("A brief description of why the event notification rule was suspended.")
            .computed()
            .build(),
        shaped(
            AttributeBuilder::new("target_configuration", target_configuration)
                .description("The target configuration for the event notification rule."),
            surface,
            Required,
        ),
    ])
}

/// Encryption settings of an uploaded file, including the SSE-C key
pub fn file_encryption() -> AttributeType {
    let key = AttributeType::block(vec![
        AttributeBuilder::string("key_id")
            .description("Key identifier stored in file info metadata")
            .optional()
            .build(),
        AttributeBuilder::string("secret_b64")
            .description("Secret key value, in standard Base 64 encoding (RFC 4648)")
            .optional()
            .sensitive()
            .build(),
    ]);

    AttributeType::block(vec![
        AttributeBuilder::string("algorithm")
            .description("Server-side encryption algorithm. AES256 is the only one supported.")
            .optional()
            .build(),
        AttributeBuilder::new("key", key)
            .description("Key used in SSE-C mode.")
            .optional()
            .build(),
        AttributeBuilder::string("mode")
            .description("Server-side encryption mode.")
            .optional()
            .build(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(ty: &AttributeType) -> &[Attribute] {
        match ty {
            AttributeType::List(element) => match element.as_ref() {
                AttributeType::Object(attributes) => attributes,
                other => panic!("expected object, got {:?}", other),
            },
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn data_source_blocks_are_computed() {
        let rules = lifecycle_rules(Surface::DataSource);
        assert!(fields(&rules).iter().all(|a| a.computed && !a.required));
    }

    #[test]
    fn resource_blocks_keep_required_fields() {
        let rules = cors_rules(Surface::Resource);
        let find = |name: &str| fields(&rules).iter().find(|a| a.name == name).unwrap();

        assert!(find("cors_rule_name").required);
        assert!(find("expose_headers").optional);
    }

    #[test]
    fn notification_status_is_always_computed() {
        let rules = notification_rules(Surface::Resource);
        let find = |name: &str| fields(&rules).iter().find(|a| a.name == name).unwrap();

        assert!(find("is_suspended").computed);
        assert!(find("name").required);
    }
}
