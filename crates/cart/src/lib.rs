//! Cart and checkout domain module (event-sourced).
//!
//! Business rules for the shopping cart, order pricing and the two-step
//! checkout, implemented purely as deterministic domain logic (no IO, no
//! payment integration, no storage).

pub mod cart;
pub mod checkout;
pub mod pricing;

pub use cart::{
    AddItem, ApplyPromoCode, Cart, CartCommand, CartEvent, CartLine, RemoveItem, UpdateQuantity,
};
pub use checkout::{
    BillingAddress, Checkout, CheckoutCommand, CheckoutEvent, CheckoutStep, OrderPlaced,
    PaymentMethod, PlaceOrder, ShippingInfo, StartCheckout,
};
pub use pricing::{CartTotals, PromoCode, ShippingPolicy, quote};
