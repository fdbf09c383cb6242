//! The pizza store

use crate::menu::{MenuItem, MenuSellerAgent};

/// Static pizza menu, same price format as the burger store
const PIZZA_MENU: &[MenuItem] = &[
    MenuItem {
        name: "BBQ Chicken Pizza",
        price: 105,
        keywords: &["bbq chicken", "bbq"],
    },
    MenuItem {
        name: "Pepperoni Pizza",
        price: 100,
        keywords: &["pepperoni"],
    },
    MenuItem {
        name: "Hawaiian Pizza",
        price: 95,
        keywords: &["hawaiian"],
    },
    MenuItem {
        name: "Margherita Pizza",
        price: 90,
        keywords: &["margherita", "margarita"],
    },
    MenuItem {
        name: "Veggie Supreme Pizza",
        price: 85,
        keywords: &["veggie supreme", "veggie", "vegetarian"],
    },
];

/// The pizza seller agent
pub fn pizza_seller() -> MenuSellerAgent {
    MenuSellerAgent::new(
        "pizza_seller_agent",
        "Answers questions about the pizza menu and handles pizza order creation.",
        "pizza",
        "create_pizza_order",
        PIZZA_MENU.to_vec(),
    )
}
