//! A path-tracking `serde::Deserializer` over a `serde_json::Value` tree.
//!
//! Every failure leaving a `deserialize_*` method is located at the path of the node
//! being decoded, unless a deeper level already located it.

use std::any::type_name;
use std::str::FromStr;

use serde::de::value::BorrowedStrDeserializer;
use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use serde_json::{Map, Number, Value};

use super::error::{token_name, DecodeError};
use super::problem::{Problem, ProblemKind};
use crate::path::JsonPath;

/// Deserializes one node of the input tree.
pub(crate) struct NodeDeserializer<'de> {
    node: &'de Value,
    path: JsonPath,
    coerce: bool,
}

impl<'de> NodeDeserializer<'de> {
    pub(crate) fn new(node: &'de Value, path: JsonPath, coerce: bool) -> Self {
        Self { node, path, coerce }
    }

    fn fail(&self, problem: Problem) -> DecodeError {
        DecodeError::new(problem).locate(&self.path, self.node)
    }

    fn unexpected(&self, expected: &str) -> DecodeError {
        self.fail(Problem::new(
            ProblemKind::UnexpectedToken,
            format!("expected {}", expected),
        ))
    }

    fn missing_instantiator(&self, target: &str) -> DecodeError {
        self.fail(Problem::new(
            ProblemKind::MissingInstantiator,
            format!(
                "no way to construct {} from a {} value",
                target,
                token_name(self.node)
            ),
        ))
    }

    fn not_valid<T>(&self, kind: ProblemKind) -> DecodeError {
        self.fail(Problem::new(
            kind,
            format!("not a valid {} value", type_name::<T>()),
        ))
    }

    fn settle<T>(&self, result: Result<T, DecodeError>) -> Result<T, DecodeError> {
        result.map_err(|e| e.locate(&self.path, self.node))
    }

    fn integer<T>(&self) -> Result<T, DecodeError>
    where
        T: TryFrom<i128> + FromStr,
    {
        match self.node {
            Value::Number(n) => integral(n)
                .and_then(|i| T::try_from(i).ok())
                .ok_or_else(|| self.not_valid::<T>(ProblemKind::WeirdNumberValue)),
            Value::String(s) if self.coerce => s
                .trim()
                .parse::<T>()
                .map_err(|_| self.not_valid::<T>(ProblemKind::WeirdStringValue)),
            _ => Err(self.unexpected("integer")),
        }
    }

    fn float(&self) -> Result<f64, DecodeError> {
        match self.node {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| self.not_valid::<f64>(ProblemKind::WeirdNumberValue)),
            Value::String(s) if self.coerce => s
                .trim()
                .parse::<f64>()
                .map_err(|_| self.not_valid::<f64>(ProblemKind::WeirdStringValue)),
            _ => Err(self.unexpected("number")),
        }
    }

    fn walk_seq<V>(&self, items: &'de [Value], visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let mut walker = SeqWalker {
            items: items.iter().enumerate(),
            path: &self.path,
            coerce: self.coerce,
        };
        let value = visitor.visit_seq(&mut walker)?;
        if walker.items.len() == 0 {
            Ok(value)
        } else {
            Err(de::Error::invalid_length(items.len(), &"fewer elements"))
        }
    }

    fn walk_map<V>(
        &self,
        entries: &'de Map<String, Value>,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let mut walker = MapWalker {
            entries: entries.iter(),
            pending: None,
            path: &self.path,
            coerce: self.coerce,
        };
        visitor.visit_map(&mut walker)
    }
}

/// Integral value of a number, accepting floats without a fractional part.
fn integral(n: &Number) -> Option<i128> {
    if let Some(u) = n.as_u64() {
        return Some(u.into());
    }
    if let Some(i) = n.as_i64() {
        return Some(i.into());
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f.abs() < 1.8e19 {
        Some(f as i128)
    } else {
        None
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, DecodeError>
            where
                V: Visitor<'de>,
            {
                let value = self.integer::<$ty>()?;
                self.settle(visitor.$visit(value))
            }
        )*
    };
}

impl<'de> Deserializer<'de> for NodeDeserializer<'de> {
    type Error = DecodeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let result = match self.node {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
                (Some(u), _, _) => visitor.visit_u64(u),
                (_, Some(i), _) => visitor.visit_i64(i),
                (_, _, Some(f)) => visitor.visit_f64(f),
                _ => Err(self.not_valid::<f64>(ProblemKind::WeirdNumberValue)),
            },
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Array(items) => self.walk_seq(items, visitor),
            Value::Object(entries) => self.walk_map(entries, visitor),
        };
        self.settle(result)
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let value = self.float()?;
        if value.is_finite() && value.abs() > f64::from(f32::MAX) {
            return Err(self.not_valid::<f32>(ProblemKind::WeirdNumberValue));
        }
        self.settle(visitor.visit_f32(value as f32))
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let value = self.float()?;
        self.settle(visitor.visit_f64(value))
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let value = match self.node {
            Value::Bool(b) => *b,
            Value::String(s) if self.coerce => match s.trim() {
                "true" => true,
                "false" => false,
                _ => return Err(self.not_valid::<bool>(ProblemKind::WeirdStringValue)),
            },
            _ => return Err(self.unexpected("boolean")),
        };
        self.settle(visitor.visit_bool(value))
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let Value::String(s) = self.node else {
            return Err(self.unexpected("string"));
        };
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.settle(visitor.visit_char(c)),
            _ => Err(self.not_valid::<char>(ProblemKind::WeirdStringValue)),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let result = match self.node {
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Number(n) if self.coerce => visitor.visit_string(n.to_string()),
            Value::Bool(b) if self.coerce => visitor.visit_string(b.to_string()),
            _ => return Err(self.unexpected("string")),
        };
        self.settle(result)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let result = match self.node {
            Value::String(s) => visitor.visit_borrowed_bytes(s.as_bytes()),
            Value::Array(items) => self.walk_seq(items, visitor),
            _ => return Err(self.unexpected("bytes")),
        };
        self.settle(result)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        if self.node.is_null() {
            return self.settle(visitor.visit_none());
        }
        let (path, node) = (self.path.clone(), self.node);
        visitor.visit_some(self).map_err(|e| e.locate(&path, node))
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Value::Null => self.settle(visitor.visit_unit()),
            _ => Err(self.unexpected("null")),
        }
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let (path, node) = (self.path.clone(), self.node);
        visitor
            .visit_newtype_struct(self)
            .map_err(|e| e.locate(&path, node))
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Value::Array(items) => {
                let result = self.walk_seq(items, visitor);
                self.settle(result)
            }
            _ => Err(self.unexpected("array")),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Value::Object(entries) => {
                let result = self.walk_map(entries, visitor);
                self.settle(result)
            }
            Value::Null | Value::Array(_) => Err(self.unexpected("object")),
            _ => Err(self.missing_instantiator("map")),
        }
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let result = match self.node {
            Value::Object(entries) => self.walk_map(entries, visitor),
            Value::Array(items) => self.walk_seq(items, visitor),
            Value::Null => return Err(self.unexpected("object")),
            _ => return Err(self.missing_instantiator(&format!("`{}`", name))),
        };
        self.settle(result)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        let (variant, content) = match self.node {
            Value::String(s) => (s.as_str(), None),
            Value::Object(entries) if entries.len() == 1 => match entries.iter().next() {
                Some((key, value)) => (key.as_str(), Some(value)),
                None => return Err(self.unexpected("a variant name")),
            },
            _ => return Err(self.unexpected("a variant name or a single-key object")),
        };
        let result = visitor.visit_enum(VariantWalker {
            variant,
            content,
            path: self.path.clone(),
            coerce: self.coerce,
        });
        self.settle(result)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.settle(visitor.visit_unit())
    }
}

/// Walks array elements, extending the path with each index.
struct SeqWalker<'de, 'p> {
    items: std::iter::Enumerate<std::slice::Iter<'de, Value>>,
    path: &'p JsonPath,
    coerce: bool,
}

impl<'de> SeqAccess<'de> for SeqWalker<'de, '_> {
    type Error = DecodeError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, DecodeError>
    where
        T: DeserializeSeed<'de>,
    {
        let Some((index, item)) = self.items.next() else {
            return Ok(None);
        };
        let path = self.path.push_index(index);
        seed.deserialize(NodeDeserializer::new(item, path.clone(), self.coerce))
            .map(Some)
            .map_err(|e| e.locate(&path, item))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Walks object entries, extending the path with each key.
struct MapWalker<'de, 'p> {
    entries: serde_json::map::Iter<'de>,
    pending: Option<(&'de str, &'de Value)>,
    path: &'p JsonPath,
    coerce: bool,
}

impl<'de> MapAccess<'de> for MapWalker<'de, '_> {
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, DecodeError>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.entries.next() else {
            return Ok(None);
        };
        let key = key.as_str();
        self.pending = Some((key, value));
        let path = self.path.push_field(key);
        seed.deserialize(KeyDeserializer { key })
            .map(Some)
            .map_err(|e| e.as_key_error().locate_with(&path, || key.to_string()))
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, DecodeError>
    where
        V: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.pending.take() else {
            return Err(de::Error::custom("value requested before its key"));
        };
        let path = self.path.push_field(key);
        seed.deserialize(NodeDeserializer::new(value, path.clone(), self.coerce))
            .map_err(|e| e.locate(&path, value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Deserializes an object key, parsing it when a non-string key type is requested.
struct KeyDeserializer<'de> {
    key: &'de str,
}

impl KeyDeserializer<'_> {
    fn parse<T: FromStr>(&self) -> Result<T, DecodeError> {
        self.key.parse::<T>().map_err(|_| {
            DecodeError::new(
                Problem::new(
                    ProblemKind::WeirdKey,
                    format!("not a valid {} key", type_name::<T>()),
                )
                .with_value(self.key),
            )
        })
    }
}

macro_rules! deserialize_parsed_key {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, DecodeError>
            where
                V: Visitor<'de>,
            {
                visitor.$visit(self.parse::<$ty>()?)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for KeyDeserializer<'de> {
    type Error = DecodeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.key)
    }

    deserialize_parsed_key! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
        deserialize_char => visit_char: char,
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_enum(BorrowedStrDeserializer::<DecodeError>::new(self.key))
    }

    forward_to_deserialize_any! {
        str string bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

/// Externally tagged enum access: a bare variant name, or `{ "Variant": content }`.
struct VariantWalker<'de> {
    variant: &'de str,
    content: Option<&'de Value>,
    path: JsonPath,
    coerce: bool,
}

impl VariantWalker<'_> {
    fn content_path(&self) -> JsonPath {
        self.path.push_field(self.variant)
    }

    fn missing_content(&self, expected: &str) -> DecodeError {
        DecodeError::new(Problem::new(
            ProblemKind::UnexpectedToken,
            format!("expected {}", expected),
        ))
        .locate_with(&self.path, || self.variant.to_string())
    }
}

impl<'de> EnumAccess<'de> for VariantWalker<'de> {
    type Error = DecodeError;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self), DecodeError>
    where
        V: DeserializeSeed<'de>,
    {
        let tag = seed.deserialize(BorrowedStrDeserializer::<DecodeError>::new(self.variant))?;
        Ok((tag, self))
    }
}

impl<'de> VariantAccess<'de> for VariantWalker<'de> {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<(), DecodeError> {
        match self.content {
            None | Some(Value::Null) => Ok(()),
            Some(content) => Err(DecodeError::new(Problem::new(
                ProblemKind::UnexpectedToken,
                "expected a unit variant",
            ))
            .locate(&self.content_path(), content)),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, DecodeError>
    where
        T: DeserializeSeed<'de>,
    {
        match self.content {
            Some(content) => {
                seed.deserialize(NodeDeserializer::new(content, self.content_path(), self.coerce))
            }
            None => Err(self.missing_content("a newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.content {
            Some(content) => NodeDeserializer::new(content, self.content_path(), self.coerce)
                .deserialize_seq(visitor),
            None => Err(self.missing_content("a tuple variant")),
        }
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self.content {
            Some(content) => NodeDeserializer::new(content, self.content_path(), self.coerce)
                .deserialize_map(visitor),
            None => Err(self.missing_content("a struct variant")),
        }
    }
}
