//! Operations understood by the external executable

use std::fmt;

/// Which schema family an operation reads its fields from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    DataSource,
    Resource,
}

/// One call into the executable; the verb is passed as the second argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DataSourceRead,
    ResourceCreate,
    ResourceRead,
    ResourceUpdate,
    ResourceDelete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::DataSourceRead => "data_source_read",
            Operation::ResourceCreate => "resource_create",
            Operation::ResourceRead => "resource_read",
            Operation::ResourceUpdate => "resource_update",
            Operation::ResourceDelete => "resource_delete",
        }
    }

    /// Create, read, update and delete share the resource schema
    pub fn surface(&self) -> Surface {
        match self {
            Operation::DataSourceRead => Surface::DataSource,
            _ => Surface::Resource,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_match_wire_names() {
        assert_eq!(Operation::DataSourceRead.to_string(), "data_source_read");
        assert_eq!(Operation::ResourceCreate.as_str(), "resource_create");
        assert_eq!(Operation::ResourceDelete.as_str(), "resource_delete");
    }

    #[test]
    fn only_data_source_read_uses_data_source_surface() {
        assert_eq!(Operation::DataSourceRead.surface(), Surface::DataSource);
        for op in [
            Operation::ResourceCreate,
            Operation::ResourceRead,
            Operation::ResourceUpdate,
            Operation::ResourceDelete,
        ] {
            assert_eq!(op.surface(), Surface::Resource);
        }
    }
}
