//! Shared menu-store machinery for the food sellers
//!
//! Both food sellers are the same shape: a static menu, a create-order tool,
//! and deterministic intent handling (menu question, order, out of scope).

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use concierge_a2a::protocol::{AgentCapabilities, AgentCard, AgentSkill};
use concierge_core::tools::{ToolExecutor, ToolHandler, ToolRegistry, json_schema};

use crate::order::{Order, OrderItem};
use crate::seller::SellerAgent;

/// One menu entry. Keywords are matched against the query most-specific
/// first, in declaration order.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub name: &'static str,
    pub price: u32,
    pub keywords: &'static [&'static str],
}

/// Tool that creates an order from explicit line items
pub struct CreateOrderTool {
    tool_name: &'static str,
    store_kind: &'static str,
}

impl CreateOrderTool {
    pub fn new(tool_name: &'static str, store_kind: &'static str) -> Self {
        Self {
            tool_name,
            store_kind,
        }
    }
}

#[async_trait]
impl ToolHandler for CreateOrderTool {
    fn name(&self) -> &str {
        self.tool_name
    }

    fn description(&self) -> &str {
        "Creates a new order with the given order items."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "order_items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "quantity": {"type": "integer", "minimum": 1},
                            "price": {"type": "integer"}
                        },
                        "required": ["name", "quantity", "price"]
                    },
                    "description": "Line items for the order"
                }
            }),
            vec!["order_items"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let items_value = input
            .get("order_items")
            .cloned()
            .ok_or_else(|| anyhow!("Missing 'order_items' parameter"))?;

        let items: Vec<OrderItem> = serde_json::from_value(items_value)
            .map_err(|e| anyhow!("Invalid 'order_items': {e}"))?;

        if items.is_empty() {
            return Err(anyhow!("'order_items' cannot be empty"));
        }
        if items.iter().any(|item| item.quantity == 0) {
            return Err(anyhow!("Order item quantity must be at least 1"));
        }

        let order = Order::create(items);
        info!(
            "Created {} order {} ({} items)",
            self.store_kind,
            order.order_id,
            order.order_items.len()
        );
        Ok(format!(
            "Order {} has been created",
            serde_json::to_string(&order)?
        ))
    }
}

/// A food seller over a static menu
pub struct MenuSellerAgent {
    agent_name: &'static str,
    description: &'static str,
    store_kind: &'static str,
    menu: Vec<MenuItem>,
    order_tool: &'static str,
    registry: ToolRegistry,
}

impl MenuSellerAgent {
    pub fn new(
        agent_name: &'static str,
        description: &'static str,
        store_kind: &'static str,
        order_tool: &'static str,
        menu: Vec<MenuItem>,
    ) -> Self {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CreateOrderTool::new(order_tool, store_kind)));
        Self {
            agent_name,
            description,
            store_kind,
            menu,
            order_tool,
            registry,
        }
    }

    /// The advertised menu, one line per item
    pub fn format_menu(&self) -> String {
        let mut out = format!("Available {} menu:\n", self.store_kind);
        for item in &self.menu {
            out.push_str(&format!("- {}: IDR {}K\n", item.name, item.price));
        }
        out.trim_end().to_string()
    }

    /// Match menu items in the query. Each matched keyword is consumed so a
    /// broader keyword cannot re-match inside a more specific one.
    fn parse_order(&self, query: &str) -> Vec<OrderItem> {
        let mut remaining = query.to_lowercase();
        let mut items = Vec::new();

        for item in &self.menu {
            for keyword in item.keywords {
                if let Some(pos) = remaining.find(keyword) {
                    let quantity = parse_quantity(&remaining[..pos]);
                    remaining.replace_range(pos..pos + keyword.len(), "");
                    items.push(OrderItem {
                        name: item.name.to_string(),
                        quantity,
                        price: item.price,
                    });
                    break;
                }
            }
        }

        items
    }

    async fn place_order(&self, items: Vec<OrderItem>) -> Result<String> {
        let mut breakdown = String::new();
        // Widened so a maximal quantity cannot overflow the line total
        let mut total: u64 = 0;
        for item in &items {
            let line_total = u64::from(item.quantity) * u64::from(item.price);
            breakdown.push_str(&format!(
                "- {} x {}: IDR {}K\n",
                item.quantity, item.name, line_total
            ));
            total += line_total;
        }

        let confirmation = self
            .registry
            .execute(
                self.order_tool,
                serde_json::json!({"order_items": items}),
            )
            .await?;

        Ok(format!(
            "{breakdown}Total: IDR {total}K\n{confirmation}"
        ))
    }
}

/// Last integer token before the matched keyword, defaulting to 1
fn parse_quantity(prefix: &str) -> u32 {
    prefix
        .split_whitespace()
        .rev()
        .take(2)
        .find_map(|token| token.parse::<u32>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

#[async_trait]
impl SellerAgent for MenuSellerAgent {
    fn card(&self, base_url: &str) -> AgentCard {
        AgentCard {
            name: self.agent_name.to_string(),
            description: self.description.to_string(),
            url: base_url.to_string(),
            version: "1.0.0".to_string(),
            capabilities: AgentCapabilities { streaming: false },
            skills: vec![
                AgentSkill {
                    id: format!("{}_menu", self.store_kind),
                    name: format!("{} menu", self.store_kind),
                    description: format!(
                        "Answers questions about the {} menu and prices",
                        self.store_kind
                    ),
                    tags: vec![self.store_kind.to_string(), "menu".to_string()],
                    examples: vec![format!("show me the {} menu", self.store_kind)],
                },
                AgentSkill {
                    id: self.order_tool.to_string(),
                    name: format!("{} order creation", self.store_kind),
                    description: format!("Creates {} orders from menu items", self.store_kind),
                    tags: vec![self.store_kind.to_string(), "order".to_string()],
                    examples: self
                        .menu
                        .first()
                        .map(|item| format!("order 1 {}", item.name))
                        .into_iter()
                        .collect(),
                },
            ],
            default_input_modes: vec!["text/plain".to_string(), "application/json".to_string()],
            default_output_modes: vec!["text/plain".to_string(), "application/json".to_string()],
        }
    }

    async fn handle(&self, query: &str, _context_id: Option<&str>) -> Result<String> {
        let q = query.to_lowercase();

        let wants_order =
            q.contains("order") || q.contains("buy") || q.contains("i want") || q.contains("i'd like");

        if wants_order {
            let items = self.parse_order(&q);
            if items.is_empty() {
                return Ok(format!(
                    "I couldn't match anything on our menu in that order.\n{}",
                    self.format_menu()
                ));
            }
            return self.place_order(items).await;
        }

        if q.contains("menu") || q.contains("price") || q.contains("what do you") {
            return Ok(self.format_menu());
        }

        Ok(format!(
            "I can only assist with {}-related queries: menu questions and orders.",
            self.store_kind
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::burger::burger_seller;

    #[tokio::test]
    async fn test_create_order_tool() {
        let tool = CreateOrderTool::new("create_burger_order", "burger");
        let result = tool
            .execute(serde_json::json!({
                "order_items": [{"name": "Classic Cheeseburger", "quantity": 2, "price": 85}]
            }))
            .await
            .unwrap();
        assert!(result.contains("has been created"));
        assert!(result.contains("\"status\":\"created\""));
    }

    #[tokio::test]
    async fn test_create_order_tool_rejects_empty() {
        let tool = CreateOrderTool::new("create_burger_order", "burger");
        let err = tool
            .execute(serde_json::json!({"order_items": []}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[tokio::test]
    async fn test_create_order_tool_rejects_zero_quantity() {
        let tool = CreateOrderTool::new("create_burger_order", "burger");
        let err = tool
            .execute(serde_json::json!({
                "order_items": [{"name": "Classic Cheeseburger", "quantity": 0, "price": 85}]
            }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("order 2 "), 2);
        assert_eq!(parse_quantity("i want "), 1);
        assert_eq!(parse_quantity("order 0 "), 1);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("order 4294967295 "), u32::MAX);
    }

    #[tokio::test]
    async fn test_maximal_quantity_does_not_overflow_totals() {
        let seller = burger_seller();
        let reply = seller
            .handle("order 4294967295 cheeseburgers", None)
            .await
            .unwrap();
        assert!(reply.contains("4294967295 x Classic Cheeseburger: IDR 365072220075K"));
        assert!(reply.contains("Total: IDR 365072220075K"));
        assert!(reply.contains("has been created"));
    }

    #[test]
    fn test_parse_order_specific_before_broad() {
        let seller = burger_seller();
        let items = seller.parse_order("order 1 double cheeseburger");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Double Cheeseburger");
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn test_parse_order_multiple_items() {
        let seller = burger_seller();
        let items = seller.parse_order("order 2 classic cheeseburgers and 1 spicy cajun burger");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Classic Cheeseburger");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].name, "Spicy Cajun Burger");
        assert_eq!(items[1].quantity, 1);
    }

    #[tokio::test]
    async fn test_menu_intent() {
        let seller = burger_seller();
        let reply = seller.handle("show me the menu", None).await.unwrap();
        assert!(reply.contains("Classic Cheeseburger: IDR 85K"));
        assert!(reply.contains("Double Cheeseburger: IDR 110K"));
    }

    #[tokio::test]
    async fn test_order_intent_with_totals() {
        let seller = burger_seller();
        let reply = seller
            .handle("I'd like to order 2 classic cheeseburgers", None)
            .await
            .unwrap();
        assert!(reply.contains("2 x Classic Cheeseburger: IDR 170K"));
        assert!(reply.contains("Total: IDR 170K"));
        assert!(reply.contains("has been created"));
    }

    #[tokio::test]
    async fn test_order_with_no_matching_items() {
        let seller = burger_seller();
        let reply = seller.handle("order 3 sushi rolls", None).await.unwrap();
        assert!(reply.contains("couldn't match"));
        assert!(reply.contains("menu"));
    }

    #[tokio::test]
    async fn test_out_of_scope_query() {
        let seller = burger_seller();
        let reply = seller
            .handle("what's the weather today?", None)
            .await
            .unwrap();
        assert!(reply.contains("burger-related"));
    }

    #[test]
    fn test_card_with_empty_menu() {
        let seller = MenuSellerAgent::new(
            "noodle_seller_agent",
            "Answers questions about the noodle menu.",
            "noodle",
            "create_noodle_order",
            Vec::new(),
        );
        let card = seller.card("http://localhost:10003");
        assert_eq!(card.skills.len(), 2);
        assert!(card.skills[1].examples.is_empty());
    }

    #[test]
    fn test_card_shape() {
        let seller = burger_seller();
        let card = seller.card("http://localhost:10000");
        assert_eq!(card.name, "burger_seller_agent");
        assert_eq!(card.url, "http://localhost:10000");
        assert_eq!(card.skills.len(), 2);
        assert!(!card.capabilities.streaming);
    }
}
