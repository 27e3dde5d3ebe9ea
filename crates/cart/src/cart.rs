use serde::{Deserialize, Serialize};

use storefront_core::{Aggregate, AggregateRoot, CartId, DomainError, Entity, Money, ProductId};

use crate::pricing::{self, CartTotals, PromoCode, ShippingPolicy};

/// Cart line: a product snapshot plus quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    /// Free-form variant description (e.g. "256GB, Space Black").
    pub variant: Option<String>,
    pub unit_price: Money,
    pub original_price: Option<Money>,
    pub quantity: u32,
    pub in_stock: bool,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Line total at the pre-sale price (or the current price when not on sale).
    pub fn original_line_total(&self) -> Money {
        self.original_price.unwrap_or(self.unit_price).times(self.quantity)
    }
}

impl Entity for CartLine {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}

/// Aggregate root: Cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: CartId,
    lines: Vec<CartLine>,
    promo: Option<PromoCode>,
    version: u64,
}

impl Cart {
    pub fn empty(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            promo: None,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    pub fn promo(&self) -> Option<PromoCode> {
        self.promo
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Totals as shown on the cart page.
    pub fn quote(&self) -> CartTotals {
        pricing::quote(&self.lines, self.promo, ShippingPolicy::STANDARD)
    }
}

impl AggregateRoot for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub line: CartLine,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub product_id: ProductId,
}

/// Command: UpdateQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantity {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Command: ApplyPromoCode (raw user input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyPromoCode {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
    UpdateQuantity(UpdateQuantity),
    ApplyPromoCode(ApplyPromoCode),
    RemovePromoCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded { line: CartLine },
    QuantityChanged { product_id: ProductId, quantity: u32 },
    ItemRemoved { product_id: ProductId },
    PromoApplied { code: PromoCode },
    PromoRemoved,
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded { line } => {
                self.lines.push(line.clone());
            }
            CartEvent::QuantityChanged { product_id, quantity } => {
                if let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == product_id) {
                    line.quantity = *quantity;
                }
            }
            CartEvent::ItemRemoved { product_id } => {
                self.lines.retain(|l| &l.product_id != product_id);
            }
            CartEvent::PromoApplied { code } => {
                self.promo = Some(*code);
            }
            CartEvent::PromoRemoved => {
                self.promo = None;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddItem(cmd) => self.handle_add(cmd),
            CartCommand::RemoveItem(cmd) => self.handle_remove(cmd),
            CartCommand::UpdateQuantity(cmd) => self.handle_update_quantity(cmd),
            CartCommand::ApplyPromoCode(cmd) => self.handle_apply_promo(cmd),
            CartCommand::RemovePromoCode => self.handle_remove_promo(),
        }
    }
}

impl Cart {
    fn existing_line(&self, product_id: &ProductId) -> Result<&CartLine, DomainError> {
        self.line(product_id)
            .ok_or_else(|| DomainError::not_found(format!("cart line for product {product_id}")))
    }

    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<CartEvent>, DomainError> {
        let line = &cmd.line;
        if line.quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if line.name.trim().is_empty() {
            return Err(DomainError::validation("line name cannot be empty"));
        }

        let Some(existing) = self.lines.iter().find(|l| l.same_entity(line)) else {
            return Ok(vec![CartEvent::ItemAdded { line: line.clone() }]);
        };

        if existing.variant != line.variant {
            return Err(DomainError::conflict(format!(
                "product {} is already in the cart with a different variant",
                line.product_id
            )));
        }
        if !existing.in_stock {
            return Err(DomainError::invariant("out-of-stock lines cannot change quantity"));
        }

        Ok(vec![CartEvent::QuantityChanged {
            product_id: line.product_id.clone(),
            quantity: existing.quantity.saturating_add(line.quantity),
        }])
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> Result<Vec<CartEvent>, DomainError> {
        self.existing_line(&cmd.product_id)?;
        Ok(vec![CartEvent::ItemRemoved {
            product_id: cmd.product_id.clone(),
        }])
    }

    fn handle_update_quantity(&self, cmd: &UpdateQuantity) -> Result<Vec<CartEvent>, DomainError> {
        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        let line = self.existing_line(&cmd.product_id)?;
        if !line.in_stock {
            return Err(DomainError::invariant("out-of-stock lines cannot change quantity"));
        }
        if line.quantity == cmd.quantity {
            return Ok(vec![]);
        }

        Ok(vec![CartEvent::QuantityChanged {
            product_id: cmd.product_id.clone(),
            quantity: cmd.quantity,
        }])
    }

    fn handle_apply_promo(&self, cmd: &ApplyPromoCode) -> Result<Vec<CartEvent>, DomainError> {
        let code = PromoCode::parse(&cmd.code)
            .ok_or_else(|| DomainError::validation(format!("unknown promo code {:?}", cmd.code)))?;
        if self.promo == Some(code) {
            return Err(DomainError::conflict(format!("promo code {code} already applied")));
        }
        Ok(vec![CartEvent::PromoApplied { code }])
    }

    fn handle_remove_promo(&self) -> Result<Vec<CartEvent>, DomainError> {
        if self.promo.is_none() {
            return Err(DomainError::not_found("applied promo code"));
        }
        Ok(vec![CartEvent::PromoRemoved])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, price_units: u64, quantity: u32, in_stock: bool) -> CartLine {
        CartLine {
            product_id: ProductId::new(id).unwrap(),
            name: format!("Product {id}"),
            variant: Some("Default".to_string()),
            unit_price: Money::from_units(price_units),
            original_price: None,
            quantity,
            in_stock,
        }
    }

    fn add(cart: &mut Cart, line: CartLine) {
        cart.execute(&CartCommand::AddItem(AddItem { line })).unwrap();
    }

    fn pid(id: &str) -> ProductId {
        ProductId::new(id).unwrap()
    }

    #[test]
    fn add_item_then_merge_quantity() {
        let mut cart = Cart::empty(CartId::new());
        add(&mut cart, line("1", 129, 1, true));
        let events = cart
            .execute(&CartCommand::AddItem(AddItem { line: line("1", 129, 2, true) }))
            .unwrap();

        assert_eq!(events, vec![CartEvent::QuantityChanged { product_id: pid("1"), quantity: 3 }]);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(&pid("1")).unwrap().quantity, 3);
        assert_eq!(cart.version(), 2);
    }

    #[test]
    fn add_rejects_zero_quantity_and_variant_mismatch() {
        let mut cart = Cart::empty(CartId::new());
        let err = cart
            .handle(&CartCommand::AddItem(AddItem { line: line("1", 10, 0, true) }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        add(&mut cart, line("1", 10, 1, true));
        let other_variant = CartLine { variant: Some("Blue".into()), ..line("1", 10, 1, true) };
        let err = cart
            .handle(&CartCommand::AddItem(AddItem { line: other_variant }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn update_quantity_rules() {
        let mut cart = Cart::empty(CartId::new());
        add(&mut cart, line("1", 10, 1, true));
        add(&mut cart, line("2", 20, 1, false));

        cart.execute(&CartCommand::UpdateQuantity(UpdateQuantity { product_id: pid("1"), quantity: 4 }))
            .unwrap();
        assert_eq!(cart.line(&pid("1")).unwrap().quantity, 4);

        let zero = cart.handle(&CartCommand::UpdateQuantity(UpdateQuantity { product_id: pid("1"), quantity: 0 }));
        assert!(matches!(zero, Err(DomainError::Validation(_))));

        let out_of_stock =
            cart.handle(&CartCommand::UpdateQuantity(UpdateQuantity { product_id: pid("2"), quantity: 2 }));
        assert!(matches!(out_of_stock, Err(DomainError::InvariantViolation(_))));

        let missing =
            cart.handle(&CartCommand::UpdateQuantity(UpdateQuantity { product_id: pid("9"), quantity: 2 }));
        assert!(matches!(missing, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn unchanged_quantity_emits_nothing() {
        let mut cart = Cart::empty(CartId::new());
        add(&mut cart, line("1", 10, 2, true));
        let events = cart
            .handle(&CartCommand::UpdateQuantity(UpdateQuantity { product_id: pid("1"), quantity: 2 }))
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn remove_item() {
        let mut cart = Cart::empty(CartId::new());
        add(&mut cart, line("1", 10, 1, true));
        cart.execute(&CartCommand::RemoveItem(RemoveItem { product_id: pid("1") }))
            .unwrap();
        assert!(cart.is_empty());

        let err = cart
            .handle(&CartCommand::RemoveItem(RemoveItem { product_id: pid("1") }))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn promo_code_lifecycle() {
        let mut cart = Cart::empty(CartId::new());
        add(&mut cart, line("1", 100, 1, true));

        let bogus = cart.handle(&CartCommand::ApplyPromoCode(ApplyPromoCode { code: "FREE".into() }));
        assert!(matches!(bogus, Err(DomainError::Validation(_))));

        cart.execute(&CartCommand::ApplyPromoCode(ApplyPromoCode { code: "save10".into() }))
            .unwrap();
        assert_eq!(cart.promo(), Some(PromoCode::Save10));
        assert_eq!(cart.quote().promo_discount, Money::from_units(10));

        let again = cart.handle(&CartCommand::ApplyPromoCode(ApplyPromoCode { code: "SAVE10".into() }));
        assert!(matches!(again, Err(DomainError::Conflict(_))));

        cart.execute(&CartCommand::RemovePromoCode).unwrap();
        assert_eq!(cart.promo(), None);
        assert!(matches!(
            cart.handle(&CartCommand::RemovePromoCode),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn handle_does_not_mutate() {
        let mut cart = Cart::empty(CartId::new());
        add(&mut cart, line("1", 10, 1, true));
        let before = cart.clone();

        let _ = cart.handle(&CartCommand::RemoveItem(RemoveItem { product_id: pid("1") }));
        assert_eq!(cart, before);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_command() -> impl Strategy<Value = CartCommand> {
            let id = prop::sample::select(vec!["1", "2", "3"]);
            prop_oneof![
                (id.clone(), 0u32..4, any::<bool>()).prop_map(|(id, qty, in_stock)| {
                    CartCommand::AddItem(AddItem { line: line(id, 25, qty, in_stock) })
                }),
                id.clone().prop_map(|id| CartCommand::RemoveItem(RemoveItem { product_id: pid(id) })),
                (id, 0u32..6).prop_map(|(id, quantity)| {
                    CartCommand::UpdateQuantity(UpdateQuantity { product_id: pid(id), quantity })
                }),
                prop::sample::select(vec!["save10", "nope"])
                    .prop_map(|code| CartCommand::ApplyPromoCode(ApplyPromoCode { code: code.into() })),
                Just(CartCommand::RemovePromoCode),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 300,
                ..ProptestConfig::default()
            })]

            /// Property: whatever the command sequence, every line keeps a
            /// positive quantity, product ids stay unique, and replaying the
            /// emitted events rebuilds the same cart.
            #[test]
            fn cart_invariants_hold(commands in proptest::collection::vec(arb_command(), 0..30)) {
                let id = CartId::new();
                let mut cart = Cart::empty(id);
                let mut history = Vec::new();

                for command in &commands {
                    if let Ok(events) = cart.execute(command) {
                        history.extend(events);
                    }
                }

                prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));
                let mut ids: Vec<&ProductId> = cart.lines().iter().map(|l| &l.product_id).collect();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), cart.lines().len());

                let mut replayed = Cart::empty(id);
                for event in &history {
                    replayed.apply(event);
                }
                prop_assert_eq!(replayed, cart);
            }
        }
    }
}
