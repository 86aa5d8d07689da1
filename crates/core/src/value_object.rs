//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. `Money`
/// is the canonical example in this workspace: two amounts of 1250 minor units
/// are the same value no matter where they came from.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
