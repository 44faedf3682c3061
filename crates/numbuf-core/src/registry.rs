//! Name-to-descriptor lookup.
//!
//! The registry is an ordinary value: build one with
//! [`TypeNameRegistry::standard`], add names with
//! [`register`](TypeNameRegistry::register), and pass it where parsing is
//! needed.

use std::collections::HashMap;

use crate::{BufferError, ByteOrder, Result, SampleFormat, TypeDescriptor};

#[derive(Clone, Debug, Default)]
pub struct TypeNameRegistry {
    names: HashMap<String, TypeDescriptor>,
}

impl TypeNameRegistry {
    /// A registry with no names.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Canonical names (`int8`..`float64`, `complex64`, `complex128`) and
    /// C-style aliases. All entries use native byte order.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        let entries: [(&str, TypeDescriptor); 15] = [
            ("int8", TypeDescriptor::int(1)),
            ("int16", TypeDescriptor::int(2)),
            ("int32", TypeDescriptor::int(4)),
            ("int64", TypeDescriptor::int(8)),
            ("uint8", TypeDescriptor::uint(1)),
            ("uint16", TypeDescriptor::uint(2)),
            ("uint32", TypeDescriptor::uint(4)),
            ("uint64", TypeDescriptor::uint(8)),
            ("float16", TypeDescriptor::float(2)),
            ("float32", TypeDescriptor::float(4)),
            ("float64", TypeDescriptor::float(8)),
            (
                "complex64",
                TypeDescriptor::new(SampleFormat::ComplexFloatingPoint, 8, ByteOrder::Native),
            ),
            (
                "complex128",
                TypeDescriptor::new(SampleFormat::ComplexFloatingPoint, 16, ByteOrder::Native),
            ),
            (
                "undefined",
                TypeDescriptor::new(SampleFormat::Undefined, 0, ByteOrder::Native),
            ),
            ("byte", TypeDescriptor::uint(1)),
        ];
        for (name, dtype) in entries {
            registry.register(name, dtype);
        }

        let aliases = [
            ("char", "int8"),
            ("short", "int16"),
            ("int", "int32"),
            ("long", "int64"),
            ("uchar", "uint8"),
            ("ushort", "uint16"),
            ("uint", "uint32"),
            ("ulong", "uint64"),
            ("half", "float16"),
            ("float", "float32"),
            ("double", "float64"),
        ];
        for (alias, target) in aliases {
            if let Some(&dtype) = registry.names.get(target) {
                registry.register(alias, dtype);
            }
        }
        registry
    }

    /// Add or replace a name. Names are case-insensitive.
    pub fn register(&mut self, name: impl Into<String>, dtype: TypeDescriptor) -> Option<TypeDescriptor> {
        self.names.insert(name.into().to_ascii_lowercase(), dtype)
    }

    /// Parse a type name, with an optional NumPy-style byte-order prefix:
    /// `<` little-endian, `>` big-endian, `=` or `|` native.
    pub fn parse(&self, name: &str) -> Result<TypeDescriptor> {
        let trimmed = name.trim();
        let (order, base) = match trimmed.chars().next() {
            Some('<') => (Some(ByteOrder::LittleEndian), &trimmed[1..]),
            Some('>') => (Some(ByteOrder::BigEndian), &trimmed[1..]),
            Some('=' | '|') => (Some(ByteOrder::Native), &trimmed[1..]),
            _ => (None, trimmed),
        };
        let dtype = self
            .names
            .get(&base.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| BufferError::UnknownTypeName(name.to_string()))?;
        Ok(match order {
            Some(order) => dtype.with_byte_order(order),
            None => dtype,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(&name.to_ascii_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl TypeDescriptor {
    /// Look up `name` in `registry`. See [`TypeNameRegistry::parse`].
    pub fn from_name(name: &str, registry: &TypeNameRegistry) -> Result<Self> {
        registry.parse(name)
    }
}
