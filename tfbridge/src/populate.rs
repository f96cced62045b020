use crate::error::{BridgeError, Result};
use crate::registry::FieldDescriptor;
use crate::store::AttributeStore;
use crate::tree::Tree;

/// Copy every visible, non-deprecated field of `decoded` into `store`
///
/// `decoded` is a record encoded with state key names. Writes go to a
/// staging copy and reach `store` only when all of them succeeded, so a
/// failed populate leaves the store as it was.
pub fn populate(
    decoded: &Tree,
    descriptors: &[FieldDescriptor],
    store: &mut AttributeStore,
) -> Result<()> {
    let mut staged = store.clone();

    for descriptor in descriptors.iter().filter(|d| !d.deprecated) {
        let value = decoded
            .get(&descriptor.name)
            .ok_or_else(|| BridgeError::MissingField(descriptor.name.clone()))?;
        staged.set(&descriptor.name, value.clone())?;
    }

    *store = staged;
    Ok(())
}
