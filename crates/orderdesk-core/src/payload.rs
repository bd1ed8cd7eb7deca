//! # Order Payload
//!
//! The JSON body posted to the order endpoint.
//!
//! ```text
//! {
//!   "products": [
//!     { "id": "pizza", "amount": 2, "name": "Pizza", "priceSingle": 23,
//!       "params": { "sauce": { "label": "Sauce",
//!                              "options": { "cream": { "label": "Sour cream", "price": 2 } } } } }
//!   ],
//!   "phone": "123456789", "address": "Main Street 1",
//!   "totalNumber": 2, "subtotalPrice": 46, "totalPrice": 66, "deliveryFee": 20
//! }
//! ```
//!
//! Building a payload never mutates the cart.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, CartLineItem};
use crate::money::Money;
use crate::selection::SelectedParams;

/// One cart line as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product id (not the cart-local line id).
    pub id: String,
    pub amount: u32,
    /// Selected options only.
    pub params: SelectedParams,
    pub price_single: Money,
    pub name: String,
}

impl From<&CartLineItem> for OrderLine {
    fn from(item: &CartLineItem) -> Self {
        OrderLine {
            id: item.product_id().to_string(),
            amount: item.quantity(),
            params: item.params().clone(),
            price_single: item.unit_price(),
            name: item.name().to_string(),
        }
    }
}

/// The order body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    /// Lines in cart order.
    pub products: Vec<OrderLine>,
    pub phone: String,
    pub address: String,
    pub total_number: u32,
    pub subtotal_price: Money,
    pub total_price: Money,
    pub delivery_fee: Money,
}

impl OrderPayload {
    /// Projects the current cart state.
    pub fn from_cart(cart: &Cart) -> Self {
        let totals = cart.totals();
        let contact = cart.contact();

        OrderPayload {
            products: cart.items().iter().map(OrderLine::from).collect(),
            phone: contact.phone.clone(),
            address: contact.address.clone(),
            total_number: totals.total_number,
            subtotal_price: totals.subtotal,
            total_price: totals.total_price,
            delivery_fee: totals.delivery_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ContactDetails;
    use crate::configurator::tests::burger;
    use crate::configurator::ProductConfigurator;
    use crate::settings::{OrderSettings, QuantitySettings};
    use serde_json::json;

    fn filled_cart() -> Cart {
        let mut burger = ProductConfigurator::new(burger(), QuantitySettings::default());
        burger.set_quantity("2");
        burger.recompute([("sauce", ["ketchup"])].into_iter().collect());

        let mut cart = Cart::new(OrderSettings::default());
        cart.set_contact(ContactDetails::new("123456789", "Main Street 1"));
        cart.add(burger.configured());
        cart
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = filled_cart().build_order_payload();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            json!({
                "products": [{
                    "id": "burger",
                    "amount": 2,
                    "params": {
                        "sauce": {
                            "label": "Sauce",
                            "options": { "ketchup": { "label": "Ketchup", "price": 2 } }
                        }
                    },
                    "priceSingle": 23,
                    "name": "Burger"
                }],
                "phone": "123456789",
                "address": "Main Street 1",
                "totalNumber": 2,
                "subtotalPrice": 46,
                "totalPrice": 66,
                "deliveryFee": 20
            })
        );
    }

    #[test]
    fn test_building_twice_is_equal() {
        let cart = filled_cart();
        assert_eq!(cart.build_order_payload(), cart.build_order_payload());
    }

    #[test]
    fn test_payload_follows_line_edits() {
        let mut cart = filled_cart();
        let id = cart.items()[0].id();
        cart.increment_line(id);

        let payload = cart.build_order_payload();
        assert_eq!(payload.products[0].amount, 3);
        assert_eq!(payload.products[0].price_single, Money::new(23));
        assert_eq!(payload.subtotal_price, Money::new(69));
    }

    #[test]
    fn test_payload_params_follow_catalog_order() {
        let definition = crate::catalog::ProductDefinition::from_json(&json!({
            "id": "pizza", "name": "Pizza", "price": 20,
            "params": {
                "toppings": { "label": "Toppings", "options": {
                    "salami": { "label": "Salami", "price": 3 },
                    "basil": { "label": "Basil", "price": 1 }
                }},
                "crust": { "label": "Crust", "type": "radios", "options": {
                    "thin": { "label": "Thin", "price": 0, "default": true }
                }}
            }
        }))
        .unwrap();

        let mut pizza =
            ProductConfigurator::new(std::sync::Arc::new(definition), QuantitySettings::default());
        pizza.recompute(
            [("crust", vec!["thin"]), ("toppings", vec!["basil", "salami"])]
                .into_iter()
                .collect(),
        );

        let mut cart = Cart::new(OrderSettings::default());
        cart.add(pizza.configured());
        let body = serde_json::to_string(&cart.build_order_payload()).unwrap();

        let salami = body.find("\"salami\"").unwrap();
        let basil = body.find("\"basil\"").unwrap();
        let crust = body.find("\"crust\"").unwrap();
        assert!(salami < basil, "options keep catalog order");
        assert!(basil < crust, "parameters keep catalog order");
    }
}
