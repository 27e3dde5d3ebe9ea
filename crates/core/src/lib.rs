//! `storefront-core`: identifiers, money and the small set of traits the
//! catalog and cart crates build on. No I/O happens here.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CartId, CheckoutId, OrderId, ProductId};
pub use money::Money;
pub use value_object::ValueObject;
