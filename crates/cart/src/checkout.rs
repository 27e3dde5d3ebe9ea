//! Two-step checkout: shipping details, then payment, then order placement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Aggregate, AggregateRoot, CheckoutId, DomainError, OrderId};

use crate::cart::{Cart, CartLine};
use crate::pricing::{self, CartTotals, PromoCode, ShippingPolicy};

pub const DEFAULT_COUNTRY: &str = "United States";

/// Checkout step lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    NotStarted,
    Shipping,
    Payment,
    Placed,
}

/// Shipping (or billing) contact and address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Optional.
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for ShippingInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl ShippingInfo {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    fn require_complete(&self, what: &str) -> Result<(), DomainError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "{what} is incomplete; missing: {}",
                missing.join(", ")
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Paypal,
    /// Apple Pay; the wire name is `apple`.
    #[serde(rename = "apple")]
    ApplePay,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingAddress {
    #[default]
    SameAsShipping,
    Separate(ShippingInfo),
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub totals: CartTotals,
    pub payment_method: PaymentMethod,
    pub occurred_at: DateTime<Utc>,
}

/// Aggregate root: Checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    id: CheckoutId,
    step: CheckoutStep,
    lines: Vec<CartLine>,
    promo: Option<PromoCode>,
    shipping: ShippingInfo,
    payment_method: PaymentMethod,
    billing: BillingAddress,
    placed: Option<OrderPlaced>,
    started_at: Option<DateTime<Utc>>,
    version: u64,
}

impl Checkout {
    pub fn empty(id: CheckoutId) -> Self {
        Self {
            id,
            step: CheckoutStep::NotStarted,
            lines: Vec::new(),
            promo: None,
            shipping: ShippingInfo::default(),
            payment_method: PaymentMethod::default(),
            billing: BillingAddress::default(),
            placed: None,
            started_at: None,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> CheckoutId {
        self.id
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn shipping(&self) -> &ShippingInfo {
        &self.shipping
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn billing(&self) -> &BillingAddress {
        &self.billing
    }

    pub fn placed(&self) -> Option<&OrderPlaced> {
        self.placed.as_ref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Order summary as shown during checkout (shipping is free).
    pub fn quote(&self) -> CartTotals {
        pricing::quote(&self.lines, self.promo, ShippingPolicy::Free)
    }
}

impl AggregateRoot for Checkout {
    type Id = CheckoutId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: StartCheckout (snapshot of the cart).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCheckout {
    pub lines: Vec<CartLine>,
    pub promo: Option<PromoCode>,
    pub occurred_at: DateTime<Utc>,
}

impl StartCheckout {
    pub fn from_cart(cart: &Cart, occurred_at: DateTime<Utc>) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            promo: cart.promo(),
            occurred_at,
        }
    }
}

/// Command: PlaceOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutCommand {
    Start(StartCheckout),
    UpdateShipping(ShippingInfo),
    ContinueToPayment,
    BackToShipping,
    SelectPaymentMethod(PaymentMethod),
    SetBillingAddress(BillingAddress),
    PlaceOrder(PlaceOrder),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutEvent {
    CheckoutStarted(StartCheckout),
    ShippingUpdated(ShippingInfo),
    AdvancedToPayment,
    ReturnedToShipping,
    PaymentMethodSelected(PaymentMethod),
    BillingAddressSet(BillingAddress),
    OrderPlaced(OrderPlaced),
}

impl Aggregate for Checkout {
    type Command = CheckoutCommand;
    type Event = CheckoutEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CheckoutEvent::CheckoutStarted(e) => {
                self.step = CheckoutStep::Shipping;
                self.lines = e.lines.clone();
                self.promo = e.promo;
                self.started_at = Some(e.occurred_at);
            }
            CheckoutEvent::ShippingUpdated(info) => {
                self.shipping = info.clone();
            }
            CheckoutEvent::AdvancedToPayment => {
                self.step = CheckoutStep::Payment;
            }
            CheckoutEvent::ReturnedToShipping => {
                self.step = CheckoutStep::Shipping;
            }
            CheckoutEvent::PaymentMethodSelected(method) => {
                self.payment_method = *method;
            }
            CheckoutEvent::BillingAddressSet(billing) => {
                self.billing = billing.clone();
            }
            CheckoutEvent::OrderPlaced(e) => {
                self.step = CheckoutStep::Placed;
                self.placed = Some(e.clone());
                tracing::info!(
                    order_id = %e.order_id,
                    total = %e.totals.total,
                    items = e.totals.item_count,
                    "order placed"
                );
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        if self.step == CheckoutStep::Placed {
            return Err(DomainError::invariant("order has already been placed"));
        }

        match command {
            CheckoutCommand::Start(cmd) => self.handle_start(cmd),
            CheckoutCommand::UpdateShipping(info) => {
                self.ensure_step(CheckoutStep::Shipping)?;
                Ok(vec![CheckoutEvent::ShippingUpdated(info.clone())])
            }
            CheckoutCommand::ContinueToPayment => {
                self.ensure_step(CheckoutStep::Shipping)?;
                self.shipping.require_complete("shipping information")?;
                Ok(vec![CheckoutEvent::AdvancedToPayment])
            }
            CheckoutCommand::BackToShipping => {
                self.ensure_step(CheckoutStep::Payment)?;
                Ok(vec![CheckoutEvent::ReturnedToShipping])
            }
            CheckoutCommand::SelectPaymentMethod(method) => {
                self.ensure_step(CheckoutStep::Payment)?;
                Ok(vec![CheckoutEvent::PaymentMethodSelected(*method)])
            }
            CheckoutCommand::SetBillingAddress(billing) => {
                self.ensure_step(CheckoutStep::Payment)?;
                Ok(vec![CheckoutEvent::BillingAddressSet(billing.clone())])
            }
            CheckoutCommand::PlaceOrder(cmd) => self.handle_place(cmd),
        }
    }
}

impl Checkout {
    fn ensure_step(&self, expected: CheckoutStep) -> Result<(), DomainError> {
        if self.step != expected {
            return Err(DomainError::invariant(format!(
                "checkout is in step {:?}, expected {:?}",
                self.step, expected
            )));
        }
        Ok(())
    }

    fn handle_start(&self, cmd: &StartCheckout) -> Result<Vec<CheckoutEvent>, DomainError> {
        if self.step != CheckoutStep::NotStarted {
            return Err(DomainError::conflict("checkout already started"));
        }
        if cmd.lines.is_empty() {
            return Err(DomainError::validation("cannot check out an empty cart"));
        }
        if let Some(line) = cmd.lines.iter().find(|l| !l.in_stock) {
            return Err(DomainError::invariant(format!("{} is out of stock", line.name)));
        }
        if cmd.lines.iter().any(|l| l.quantity == 0) {
            return Err(DomainError::validation("quantity must be at least 1"));
        }

        Ok(vec![CheckoutEvent::CheckoutStarted(cmd.clone())])
    }

    fn handle_place(&self, cmd: &PlaceOrder) -> Result<Vec<CheckoutEvent>, DomainError> {
        self.ensure_step(CheckoutStep::Payment)?;
        self.shipping.require_complete("shipping information")?;
        if let BillingAddress::Separate(billing) = &self.billing {
            billing.require_complete("billing address")?;
        }

        Ok(vec![CheckoutEvent::OrderPlaced(OrderPlaced {
            order_id: cmd.order_id,
            totals: self.quote(),
            payment_method: self.payment_method,
            occurred_at: cmd.occurred_at,
        })])
    }
}
