//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**; identity doesn't
/// matter, only the attribute values do. To "modify" one, create a new value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
