//! Order models shared by the food sellers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line item in an order. Prices are in thousands of IDR, matching the
/// menus the sellers advertise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: u32,
}

/// A created order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub status: String,
    pub order_items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// New order in the `created` state with a fresh id
    pub fn create(order_items: Vec<OrderItem>) -> Self {
        Self {
            order_id: Uuid::new_v4().to_string(),
            status: "created".to_string(),
            order_items,
            created_at: Utc::now(),
        }
    }

    /// Total price across all items, in thousands of IDR. Widened so a
    /// maximal quantity times price cannot overflow.
    pub fn total(&self) -> u64 {
        self.order_items
            .iter()
            .map(|item| u64::from(item.quantity) * u64::from(item.price))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order() {
        let order = Order::create(vec![OrderItem {
            name: "Classic Cheeseburger".to_string(),
            quantity: 2,
            price: 85,
        }]);
        assert_eq!(order.status, "created");
        assert!(!order.order_id.is_empty());
        assert!(Uuid::parse_str(&order.order_id).is_ok());
    }

    #[test]
    fn test_order_ids_unique() {
        let a = Order::create(vec![]);
        let b = Order::create(vec![]);
        assert_ne!(a.order_id, b.order_id);
    }

    #[test]
    fn test_total() {
        let order = Order::create(vec![
            OrderItem {
                name: "Classic Cheeseburger".to_string(),
                quantity: 2,
                price: 85,
            },
            OrderItem {
                name: "Spicy Chicken Burger".to_string(),
                quantity: 1,
                price: 80,
            },
        ]);
        assert_eq!(order.total(), 250);
    }

    #[test]
    fn test_total_widens_past_u32() {
        let order = Order::create(vec![OrderItem {
            name: "Double Cheeseburger".to_string(),
            quantity: u32::MAX,
            price: 110,
        }]);
        assert_eq!(order.total(), u64::from(u32::MAX) * 110);
    }

    #[test]
    fn test_serialization_shape() {
        let order = Order::create(vec![OrderItem {
            name: "Margherita".to_string(),
            quantity: 1,
            price: 90,
        }]);
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "created");
        assert_eq!(json["order_items"][0]["name"], "Margherita");
        assert_eq!(json["order_items"][0]["quantity"], 1);
    }
}
