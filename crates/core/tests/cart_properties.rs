//! Property tests for the cart mutation rules.

use gomarket_core::{Cart, NewProduct, Price, ProductId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Increment(u8),
    Decrement(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // A small ID space so operations keep colliding on the same products.
    prop_oneof![
        (0..6u8).prop_map(Op::Add),
        (0..6u8).prop_map(Op::Increment),
        (0..6u8).prop_map(Op::Decrement),
    ]
}

fn product(n: u8) -> NewProduct {
    NewProduct {
        id: ProductId::new(format!("p{n}")),
        title: format!("Product {n}"),
        image_url: format!("https://img.example/{n}.png"),
        price: Price::from_cents(i64::from(n) * 100),
    }
}

fn apply(cart: &mut Cart, op: &Op) {
    match op {
        Op::Add(n) => {
            cart.add(product(*n));
        }
        Op::Increment(n) => {
            cart.increment(&ProductId::new(format!("p{n}")));
        }
        Op::Decrement(n) => {
            cart.decrement(&ProductId::new(format!("p{n}")));
        }
    }
}

proptest! {
    #[test]
    fn prop_product_ids_stay_unique(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let mut cart = Cart::new();
        for op in &ops {
            apply(&mut cart, op);

            let mut ids: Vec<&str> = cart.products().iter().map(|item| item.id.as_str()).collect();
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), total);
        }
    }

    #[test]
    fn prop_quantities_stay_positive(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let mut cart = Cart::new();
        for op in &ops {
            apply(&mut cart, op);
            prop_assert!(cart.products().iter().all(|item| item.quantity.get() >= 1));
        }
    }

    #[test]
    fn prop_snapshot_decodes_to_same_cart(ops in proptest::collection::vec(op_strategy(), 0..32)) {
        let mut cart = Cart::new();
        for op in &ops {
            apply(&mut cart, op);
        }
        let json = serde_json::to_string(&cart).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let decoded: Cart = serde_json::from_str(&json).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(decoded, cart);
    }
}

#[test]
fn test_add_then_decrement_round_trip_empties_cart() {
    let mut cart = Cart::new();
    cart.add(product(1));
    cart.add(product(1));
    cart.decrement(&ProductId::new("p1"));
    cart.decrement(&ProductId::new("p1"));
    assert!(cart.is_empty());
}
