//! Field name casing

/// Which form of a record field's external name is used as the map key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    /// camelCase, as spoken by the external executable
    External,
    /// snake_case, as stored in Terraform state
    Snake,
}

impl Casing {
    pub fn apply(self, name: &str) -> String {
        match self {
            Casing::External => name.to_string(),
            Casing::Snake => camel_to_snake(name),
        }
    }
}

/// Converts `applicationKeyId` into `application_key_id`
///
/// A separator goes before every upper-case character except the first one,
/// so already snake_cased input comes back unchanged.
pub fn camel_to_snake(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }
    result
}
