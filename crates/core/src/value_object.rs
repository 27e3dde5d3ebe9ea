//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by their attribute values:
/// two `Money` amounts of 1299 cents are the same amount. They are immutable;
/// "changing" one means building a new value.
///
/// ```ignore
/// let a = Money::from_cents(1299);
/// let b = Money::from_units(12) + Money::from_cents(99);
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
