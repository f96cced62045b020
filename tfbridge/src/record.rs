//! Typed records and their conversion to and from [`Tree`]
//!
//! A record is a plain struct whose fields each carry an external name, the
//! camelCase key the external executable uses for it. Records are declared
//! with the [`record!`](crate::record!) macro, which builds the field table
//! once at compile time and drives [`RecordEncoder`] and [`RecordDecoder`].
//!
//! Encoding rules:
//! - `None` encodes as an empty list, never as null or as a missing key
//! - `Some(record)` found inside another record or list encodes as a
//!   single-element list; at top level it is the bare record
//! - `flatten` fields merge their own fields into the enclosing map
//! - `omit_empty` fields are dropped when they hold their zero value
//!
//! Decoding is the inverse and is lenient about the shape of optional
//! records: `null`, `[]`, `[{..}]` and a bare `{..}` are all accepted.

use crate::case::Casing;
use crate::error::{BridgeError, Result};
use crate::tree::Tree;
use indexmap::IndexMap;

/// Position-aware encoding context
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    casing: Casing,
    nested: bool,
}

impl Encoder {
    /// Encoder for a top-level value
    pub fn new(casing: Casing) -> Self {
        Self {
            casing,
            nested: false,
        }
    }

    pub fn casing(&self) -> Casing {
        self.casing
    }

    /// True when the value being encoded is a field or list element
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    pub fn nested(self) -> Self {
        Self {
            nested: true,
            ..self
        }
    }

    /// Start encoding the fields of a record
    pub fn record(self) -> RecordEncoder {
        RecordEncoder {
            encoder: self.nested(),
            fields: IndexMap::new(),
        }
    }
}

/// Builder collecting the encoded fields of one record
pub struct RecordEncoder {
    encoder: Encoder,
    fields: IndexMap<String, Tree>,
}

impl RecordEncoder {
    pub fn field<T: Encode + ?Sized>(&mut self, name: &str, value: &T) -> &mut Self {
        let key = self.encoder.casing.apply(name);
        self.fields.insert(key, value.encode(self.encoder));
        self
    }

    /// Like [`field`](Self::field) but skips zero values
    pub fn field_omit_empty<T: Encode + ?Sized>(&mut self, name: &str, value: &T) -> &mut Self {
        if !value.is_empty() {
            self.field(name, value);
        }
        self
    }

    /// Merge an embedded record's fields into this one; later writes win
    pub fn flatten<T: Encode + ?Sized>(&mut self, value: &T) -> &mut Self {
        if let Tree::Map(embedded) = value.encode(self.encoder) {
            self.fields.extend(embedded);
        }
        self
    }

    pub fn finish(self) -> Tree {
        Tree::Map(self.fields)
    }
}

/// Conversion of a typed value into a [`Tree`]
pub trait Encode {
    /// Set for record types, which get list-wrapped behind `Option`
    const IS_RECORD: bool = false;

    fn encode(&self, encoder: Encoder) -> Tree;

    /// Whether this is the zero value, for `omit_empty` fields
    fn is_empty(&self) -> bool;
}

/// Decoding context
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    casing: Casing,
}

impl Decoder {
    pub fn new(casing: Casing) -> Self {
        Self { casing }
    }

    pub fn casing(&self) -> Casing {
        self.casing
    }

    /// Start reading the fields of a record; `null` reads as an empty record
    pub fn record<'a>(&self, tree: &'a Tree) -> Result<RecordDecoder<'a>> {
        match tree {
            Tree::Map(_) | Tree::Null => Ok(RecordDecoder {
                decoder: *self,
                tree,
            }),
            other => Err(mismatch("map", other)),
        }
    }
}

/// Reader over the fields of one encoded record
pub struct RecordDecoder<'a> {
    decoder: Decoder,
    tree: &'a Tree,
}

impl RecordDecoder<'_> {
    /// Missing and `null` fields decode to the zero value
    pub fn field<T: Decode + Default>(&self, name: &str) -> Result<T> {
        let key = self.decoder.casing.apply(name);
        match self.tree.get(&key) {
            None | Some(Tree::Null) => Ok(T::default()),
            Some(value) => T::decode(value, self.decoder).map_err(|e| match e {
                BridgeError::Decode(message) => BridgeError::Decode(format!("{key}: {message}")),
                other => other,
            }),
        }
    }

    /// Decode an embedded record from the same map
    pub fn flatten<T: Decode>(&self) -> Result<T> {
        T::decode(self.tree, self.decoder)
    }
}

/// Conversion of a [`Tree`] into a typed value
pub trait Decode: Sized {
    const IS_RECORD: bool = false;

    fn decode(tree: &Tree, decoder: Decoder) -> Result<Self>;
}

/// Encode a top-level value
pub fn encode<T: Encode + ?Sized>(value: &T, casing: Casing) -> Tree {
    value.encode(Encoder::new(casing))
}

/// Decode a top-level value
pub fn decode<T: Decode>(tree: &Tree, casing: Casing) -> Result<T> {
    T::decode(tree, Decoder::new(casing))
}

fn mismatch(expected: &str, actual: &Tree) -> BridgeError {
    BridgeError::Decode(format!("expected {expected}, got {}", actual.type_name()))
}

impl Encode for String {
    fn encode(&self, _: Encoder) -> Tree {
        Tree::String(self.clone())
    }

    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }
}

impl Decode for String {
    fn decode(tree: &Tree, _: Decoder) -> Result<Self> {
        match tree {
            Tree::String(s) => Ok(s.clone()),
            Tree::Null => Ok(String::new()),
            other => Err(mismatch("string", other)),
        }
    }
}

impl Encode for bool {
    fn encode(&self, _: Encoder) -> Tree {
        Tree::Bool(*self)
    }

    fn is_empty(&self) -> bool {
        !*self
    }
}

impl Decode for bool {
    fn decode(tree: &Tree, _: Decoder) -> Result<Self> {
        match tree {
            Tree::Bool(b) => Ok(*b),
            Tree::Null => Ok(false),
            other => Err(mismatch("bool", other)),
        }
    }
}

impl Encode for i64 {
    fn encode(&self, _: Encoder) -> Tree {
        Tree::Int(*self)
    }

    fn is_empty(&self) -> bool {
        *self == 0
    }
}

impl Decode for i64 {
    fn decode(tree: &Tree, _: Decoder) -> Result<Self> {
        match tree {
            Tree::Null => Ok(0),
            other => other.as_i64().ok_or_else(|| mismatch("integer", other)),
        }
    }
}

impl Encode for f64 {
    fn encode(&self, _: Encoder) -> Tree {
        Tree::Float(*self)
    }

    fn is_empty(&self) -> bool {
        *self == 0.0
    }
}

impl Decode for f64 {
    fn decode(tree: &Tree, _: Decoder) -> Result<Self> {
        match tree {
            Tree::Null => Ok(0.0),
            other => other.as_f64().ok_or_else(|| mismatch("number", other)),
        }
    }
}

/// Raw trees pass through untouched
impl Encode for Tree {
    fn encode(&self, _: Encoder) -> Tree {
        self.clone()
    }

    fn is_empty(&self) -> bool {
        match self {
            Tree::Null => true,
            Tree::List(items) => items.is_empty(),
            Tree::Map(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl Decode for Tree {
    fn decode(tree: &Tree, _: Decoder) -> Result<Self> {
        Ok(tree.clone())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: Encoder) -> Tree {
        let encoder = encoder.nested();
        Tree::List(self.iter().map(|item| item.encode(encoder)).collect())
    }

    fn is_empty(&self) -> bool {
        <[T]>::is_empty(self)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(tree: &Tree, decoder: Decoder) -> Result<Self> {
        match tree {
            Tree::List(items) => items.iter().map(|item| T::decode(item, decoder)).collect(),
            Tree::Null => Ok(Vec::new()),
            other => Err(mismatch("list", other)),
        }
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: Encoder) -> Tree {
        match self {
            None => Tree::List(Vec::new()),
            Some(inner) if T::IS_RECORD && encoder.is_nested() => {
                Tree::List(vec![inner.encode(encoder)])
            }
            Some(inner) => inner.encode(encoder),
        }
    }

    fn is_empty(&self) -> bool {
        self.is_none()
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(tree: &Tree, decoder: Decoder) -> Result<Self> {
        match tree {
            Tree::Null => Ok(None),
            Tree::List(items) if items.is_empty() => Ok(None),
            Tree::List(items) if T::IS_RECORD => match items.as_slice() {
                [single] => T::decode(single, decoder).map(Some),
                _ => Err(BridgeError::Decode(format!(
                    "expected at most one element, got {}",
                    items.len()
                ))),
            },
            other => T::decode(other, decoder).map(Some),
        }
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    const IS_RECORD: bool = T::IS_RECORD;

    fn encode(&self, encoder: Encoder) -> Tree {
        (**self).encode(encoder)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl<T: Decode> Decode for Box<T> {
    const IS_RECORD: bool = T::IS_RECORD;

    fn decode(tree: &Tree, decoder: Decoder) -> Result<Self> {
        T::decode(tree, decoder).map(Box::new)
    }
}

/// User-data maps; keys are not record fields and keep their spelling
impl<T: Encode> Encode for IndexMap<String, T> {
    fn encode(&self, encoder: Encoder) -> Tree {
        let encoder = encoder.nested();
        Tree::Map(
            self.iter()
                .map(|(key, value)| (key.clone(), value.encode(encoder)))
                .collect(),
        )
    }

    fn is_empty(&self) -> bool {
        IndexMap::is_empty(self)
    }
}

impl<T: Decode> Decode for IndexMap<String, T> {
    fn decode(tree: &Tree, decoder: Decoder) -> Result<Self> {
        match tree {
            Tree::Map(map) => map
                .iter()
                .map(|(key, value)| Ok((key.clone(), T::decode(value, decoder)?)))
                .collect(),
            Tree::Null => Ok(IndexMap::new()),
            other => Err(mismatch("map", other)),
        }
    }
}

/// Declares a record struct together with its field table
///
/// ```ignore
/// tfbridge::record! {
///     pub struct BucketFileOutput {
///         input: BucketFileInput = flatten,
///         sha1: String = "_sha1",
///         file_name: String = "fileName" omit_empty,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (@encode $record:ident, $value:expr, flatten) => {
        $record.flatten(&$value)
    };
    (@encode $record:ident, $value:expr, $ext:literal omit_empty) => {
        $record.field_omit_empty($ext, &$value)
    };
    (@encode $record:ident, $value:expr, $ext:literal) => {
        $record.field($ext, &$value)
    };
    (@decode $record:ident, flatten) => {
        $record.flatten()?
    };
    (@decode $record:ident, $ext:literal $($opt:ident)?) => {
        $record.field($ext)?
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty = $ext:tt $($opt:ident)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )*
        }

        impl $crate::record::Encode for $name {
            const IS_RECORD: bool = true;

            #[allow(unused_mut)]
            fn encode(&self, encoder: $crate::record::Encoder) -> $crate::tree::Tree {
                let mut record = encoder.record();
                $( $crate::record!(@encode record, self.$field, $ext $($opt)?); )*
                record.finish()
            }

            fn is_empty(&self) -> bool {
                *self == Self::default()
            }
        }

        impl $crate::record::Decode for $name {
            const IS_RECORD: bool = true;

            #[allow(unused_variables)]
            fn decode(
                tree: &$crate::tree::Tree,
                decoder: $crate::record::Decoder,
            ) -> $crate::error::Result<Self> {
                let record = decoder.record(tree)?;
                Ok(Self {
                    $( $field: $crate::record!(@decode record, $ext $($opt)?), )*
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::record! {
        struct Period {
            duration: i64 = "duration",
            unit: String = "unit",
        }
    }

    crate::record! {
        struct Retention {
            mode: String = "mode",
            period: Option<Period> = "period",
        }
    }

    crate::record! {
        struct Base {
            bucket_id: String = "bucketId",
            file_name: String = "fileName",
        }
    }

    crate::record! {
        struct WithBase {
            base: Base = flatten,
            content_sha1: String = "contentSha1",
        }
    }

    crate::record! {
        struct Sparse {
            bucket_id: String = "bucketId" omit_empty,
            capabilities: Vec<String> = "capabilities" omit_empty,
            rules: Vec<String> = "rules",
        }
    }

    fn period() -> Period {
        Period {
            duration: 7,
            unit: "days".to_string(),
        }
    }

    #[test]
    fn absent_nested_record_encodes_as_empty_list() {
        let retention = Retention {
            mode: "governance".to_string(),
            period: None,
        };

        let tree = encode(&retention, Casing::External);
        assert_eq!(tree.get("period"), Some(&Tree::List(vec![])));
    }

    #[test]
    fn nested_record_is_wrapped_in_single_element_list() {
        let retention = Retention {
            mode: "governance".to_string(),
            period: Some(period()),
        };

        let tree = encode(&retention, Casing::External);
        let expected: Tree = [("duration", Tree::Int(7)), ("unit", Tree::from("days"))]
            .into_iter()
            .collect();
        assert_eq!(tree.get("period"), Some(&Tree::List(vec![expected])));
    }

    #[test]
    fn top_level_optional_record_is_not_wrapped() {
        let tree = encode(&Some(period()), Casing::External);
        assert_eq!(tree.get("duration"), Some(&Tree::Int(7)));

        let none: Option<Period> = None;
        assert_eq!(encode(&none, Casing::External), Tree::List(vec![]));
    }

    #[test]
    fn list_elements_wrap_optional_records() {
        let items = vec![Some(period()), None];
        let tree = encode(&items, Casing::External);
        let list = tree.as_list().unwrap();
        assert_eq!(list[0].as_list().map(|l| l.len()), Some(1));
        assert_eq!(list[1], Tree::List(vec![]));
    }

    #[test]
    fn embedded_record_is_flattened() {
        let value = WithBase {
            base: Base {
                bucket_id: "b1".to_string(),
                file_name: "a.txt".to_string(),
            },
            content_sha1: "abc".to_string(),
        };

        let tree = encode(&value, Casing::Snake);
        let keys: Vec<_> = tree.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["bucket_id", "file_name", "content_sha1"]);
        assert!(tree.get("base").is_none());
    }

    #[test]
    fn empty_fields_marked_omit_empty_are_dropped() {
        let value = Sparse::default();
        let tree = encode(&value, Casing::External);
        let map = tree.as_map().unwrap();

        assert!(!map.contains_key("bucketId"));
        assert!(!map.contains_key("capabilities"));
        assert_eq!(map.get("rules"), Some(&Tree::List(vec![])));

        let value = Sparse {
            bucket_id: "b1".to_string(),
            ..Default::default()
        };
        let tree = encode(&value, Casing::External);
        assert_eq!(tree.get("bucketId"), Some(&Tree::from("b1")));
    }

    #[test]
    fn snake_casing_applies_to_field_names_only() {
        let mut info = IndexMap::new();
        info.insert("someKey".to_string(), "value".to_string());

        let tree = encode(&info, Casing::Snake);
        assert_eq!(tree.get("someKey"), Some(&Tree::from("value")));

        let tree = encode(&period(), Casing::Snake);
        assert!(tree.get("duration").is_some());
    }

    #[test]
    fn records_round_trip() {
        let values = vec![
            Retention {
                mode: "compliance".to_string(),
                period: Some(period()),
            },
            Retention {
                mode: "none".to_string(),
                period: None,
            },
        ];

        for casing in [Casing::External, Casing::Snake] {
            let tree = encode(&values, casing);
            let decoded: Vec<Retention> = decode(&tree, casing).unwrap();
            assert_eq!(decoded, values);
        }

        let value = WithBase {
            base: Base {
                bucket_id: "b1".to_string(),
                file_name: "a.txt".to_string(),
            },
            content_sha1: "abc".to_string(),
        };
        let decoded: WithBase = decode(&encode(&value, Casing::External), Casing::External).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn optional_record_accepts_bare_map() {
        let tree = Tree::from_json(br#"{"mode":"governance","period":{"duration":1,"unit":"years"}}"#)
            .unwrap();
        let decoded: Retention = decode(&tree, Casing::External).unwrap();
        assert_eq!(decoded.period.unwrap().unit, "years");
    }

    #[test]
    fn missing_and_null_fields_decode_to_zero_values() {
        let tree = Tree::from_json(br#"{"mode":null}"#).unwrap();
        let decoded: Retention = decode(&tree, Casing::External).unwrap();
        assert_eq!(decoded, Retention::default());
    }

    #[test]
    fn shape_mismatch_names_the_key() {
        let tree = Tree::from_json(br#"{"duration":"seven"}"#).unwrap();
        let err = decode::<Period>(&tree, Casing::External).unwrap_err();
        assert_eq!(err.to_string(), "duration: expected integer, got string");
    }

    #[test]
    fn out_of_range_integer_is_rejected() {
        for json in [
            &br#"{"duration":18446744073709551615}"#[..],
            &br#"{"duration":1e300}"#[..],
            &br#"{"duration":-1e300}"#[..],
        ] {
            let tree = Tree::from_json(json).unwrap();
            let err = decode::<Period>(&tree, Casing::External).unwrap_err();
            assert_eq!(err.to_string(), "duration: expected integer, got number");
        }
    }

    #[test]
    fn whole_float_within_range_decodes_as_integer() {
        let tree = Tree::from_json(br#"{"duration":3.0}"#).unwrap();
        let decoded: Period = decode(&tree, Casing::External).unwrap();
        assert_eq!(decoded.duration, 3);
    }
}
