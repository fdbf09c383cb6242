//! The burger store

use crate::menu::{MenuItem, MenuSellerAgent};

/// Static burger menu. More specific entries first so "double cheeseburger"
/// never matches as a classic.
const BURGER_MENU: &[MenuItem] = &[
    MenuItem {
        name: "Double Cheeseburger",
        price: 110,
        keywords: &["double cheeseburger", "double"],
    },
    MenuItem {
        name: "Classic Cheeseburger",
        price: 85,
        keywords: &["classic cheeseburger", "classic", "cheeseburger"],
    },
    MenuItem {
        name: "Spicy Chicken Burger",
        price: 80,
        keywords: &["spicy chicken", "chicken burger", "chicken"],
    },
    MenuItem {
        name: "Spicy Cajun Burger",
        price: 85,
        keywords: &["spicy cajun", "cajun"],
    },
];

/// The burger seller agent
pub fn burger_seller() -> MenuSellerAgent {
    MenuSellerAgent::new(
        "burger_seller_agent",
        "Answers questions about the burger menu and handles burger order creation.",
        "burger",
        "create_burger_order",
        BURGER_MENU.to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seller::SellerAgent;

    #[tokio::test]
    async fn test_menu_prices_match_advertised() {
        let seller = burger_seller();
        let menu = seller.handle("what are your prices?", None).await.unwrap();
        assert!(menu.contains("Classic Cheeseburger: IDR 85K"));
        assert!(menu.contains("Double Cheeseburger: IDR 110K"));
        assert!(menu.contains("Spicy Chicken Burger: IDR 80K"));
        assert!(menu.contains("Spicy Cajun Burger: IDR 85K"));
    }

    #[tokio::test]
    async fn test_cheeseburger_defaults_to_classic() {
        let seller = burger_seller();
        let reply = seller.handle("order 1 cheeseburger", None).await.unwrap();
        assert!(reply.contains("1 x Classic Cheeseburger: IDR 85K"));
        assert!(reply.contains("has been created"));
    }
}
