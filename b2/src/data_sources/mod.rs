//! Data source implementations

pub mod account_info;
pub mod application_key;
pub mod bucket;
pub mod bucket_file;
pub mod bucket_file_signed_url;
pub mod bucket_files;
pub mod bucket_notification_rules;

pub use account_info::AccountInfoDataSource;
pub use application_key::ApplicationKeyDataSource;
pub use bucket::BucketDataSource;
pub use bucket_file::BucketFileDataSource;
pub use bucket_file_signed_url::BucketFileSignedUrlDataSource;
pub use bucket_files::BucketFilesDataSource;
pub use bucket_notification_rules::BucketNotificationRulesDataSource;

use tfbridge::data_source::ReadDataSourceResponse;
use tfbridge::{AttributeStore, Diagnostic, Result};

/// On failure the configuration is handed back with the error attached
fn respond(config: AttributeStore, result: Result<AttributeStore>) -> ReadDataSourceResponse {
    match result {
        Ok(state) => ReadDataSourceResponse {
            state,
            diagnostics: vec![],
        },
        Err(e) => ReadDataSourceResponse {
            state: config,
            diagnostics: vec![Diagnostic::from(e)],
        },
    }
}
