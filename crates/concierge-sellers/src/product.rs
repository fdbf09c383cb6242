//! The product-lookup seller — static inventory, lookup by product ID

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use concierge_a2a::protocol::{AgentCapabilities, AgentCard, AgentSkill};
use concierge_core::tools::{ToolExecutor, ToolHandler, ToolRegistry, json_schema};

use crate::seller::SellerAgent;

/// One product in the static inventory. Prices are stored as decimal
/// strings, as in the source dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub cost: String,
    pub category: String,
    pub name: String,
    pub brand: String,
    pub retail_price: String,
    pub department: String,
    pub sku: String,
    pub distribution_center_id: String,
}

/// The fixed ten-product inventory
const STATIC_PRODUCTS_JSON: &str = r#"
[{"product_id": "27837", "cost": "14.22500004991889", "category": "Swim", "name": "Beach Rays Men's Cargo Pocket Boardshort", "brand": "Beach Rays", "retail_price": "25.0", "department": "Men", "sku": "AF1A4EA496C2D7D01D9D1EBD8D5C82F4", "distribution_center_id": "6"},
{"product_id": "25930", "cost": "12.649999978020787", "category": "Underwear", "name": "Hanes Men's 3 Pack Comfortblend Short Leg Boxer Brief", "brand": "Hanes", "retail_price": "25.0", "department": "Men", "sku": "F21C444A5DD33EEA45CE16801C289D23", "distribution_center_id": "3"},
{"product_id": "28953", "cost": "7.4298698834899071", "category": "Accessories", "name": "100% Silk Woven Gold Plaid Self-Tie Bow Tie", "brand": "TheTieBar", "retail_price": "17.989999771118164", "department": "Men", "sku": "7B889DA86FA368B083E6B41F1C879FA9", "distribution_center_id": "7"},
{"product_id": "24316", "cost": "31.156109792127609", "category": "Outerwear & Coats", "name": "Dickies - Fleece-Lined Hooded Nylon Jacket", "brand": "Dickies", "retail_price": "69.389999389648438", "department": "Men", "sku": "70A3E3E59BC61C8EB7ACFBBA1073980C", "distribution_center_id": "1"},
{"product_id": "20309", "cost": "7.32914969935119", "category": "Suits & Sport Coats", "name": "Allegra K Mens Stylish Solid Color Small Pocket Upper Button Closure Fall Blazer Gray S", "brand": "Allegra K", "retail_price": "16.469999313354492", "department": "Men", "sku": "B05F00551528BDA221276D01A40B7EF2", "distribution_center_id": "9"},
{"product_id": "12638", "cost": "4.4284999975934634", "category": "Intimates", "name": "Fashion Forms Low Back Straps", "brand": "Fashion Forms", "retail_price": "8.5", "department": "Women", "sku": "195D221C982E47EB58347E5D06CE3180", "distribution_center_id": "10"},
{"product_id": "4568", "cost": "96.668000105768442", "category": "Jeans", "name": "Joe's Jeans Women's Yasmin Skinny Jean", "brand": "Joe's Jeans", "retail_price": "169.0", "department": "Women", "sku": "BCFA8A783AAF938CDEF361634D5F9289", "distribution_center_id": "6"},
{"product_id": "24631", "cost": "5.8500000182539225", "category": "Socks", "name": "K. Bell Socks Men's Wide Mouth Shark", "brand": "K. Bell", "retail_price": "10.0", "department": "Men", "sku": "EB3CEE21198139FA6A21866D764CC4B8", "distribution_center_id": "5"},
{"product_id": "5433", "cost": "11.640959460911304", "category": "Pants & Capris", "name": "BKE Women's Casual Linen Cotton Natural Comfortable Pants", "brand": "BKE", "retail_price": "20.209999084472656", "department": "Women", "sku": "BF25356FD2A6E038F1A3A59C26687E80", "distribution_center_id": "1"},
{"product_id": "23456", "cost": "41.118000108748674", "category": "Shorts", "name": "Jet Lag Men's Take Off 3 Cargo Shorts", "brand": "Jet Lag", "retail_price": "89.0", "department": "Men", "sku": "ADCAEC3805AA912C0D0B14A81BEDB6FF", "distribution_center_id": "6"}]
"#;

/// Tool that looks a product up by its ID
pub struct GetProductDetailsTool {
    products: Arc<Vec<Product>>,
}

impl GetProductDetailsTool {
    pub fn new(products: Arc<Vec<Product>>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ToolHandler for GetProductDetailsTool {
    fn name(&self) -> &str {
        "get_product_details"
    }

    fn description(&self) -> &str {
        "Retrieves detailed information for a product using its ID from the static inventory."
    }

    fn input_schema(&self) -> Value {
        json_schema(
            serde_json::json!({
                "product_id": {
                    "type": "string",
                    "description": "The product ID to look up"
                }
            }),
            vec!["product_id"],
        )
    }

    async fn execute(&self, input: Value) -> Result<String> {
        let product_id = input
            .get("product_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Missing 'product_id' parameter"))?;

        debug!("Looking up product {}", product_id);

        let Some(product) = self.products.iter().find(|p| p.product_id == product_id) else {
            return Ok(format!(
                "Product with ID {product_id} not found in the static inventory."
            ));
        };

        let cost: f64 = product.cost.parse().unwrap_or(0.0);
        let retail_price: f64 = product.retail_price.parse().unwrap_or(0.0);

        Ok(serde_json::to_string_pretty(&serde_json::json!({
            "product_id": product.product_id,
            "name": product.name,
            "brand": product.brand,
            "category": product.category,
            "department": product.department,
            "retail_price": format!("${retail_price:.2}"),
            "cost": format!("${cost:.2}"),
            "sku": product.sku,
        }))?)
    }
}

/// The product seller agent
pub struct ProductSeller {
    registry: ToolRegistry,
}

impl ProductSeller {
    pub fn new() -> Self {
        let products: Vec<Product> = serde_json::from_str(STATIC_PRODUCTS_JSON)
            .expect("static product inventory is valid JSON");
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(GetProductDetailsTool::new(Arc::new(products))));
        Self { registry }
    }
}

impl Default for ProductSeller {
    fn default() -> Self {
        Self::new()
    }
}

/// First run of consecutive digits in the query, treated as a product ID
fn extract_product_id(query: &str) -> Option<String> {
    let mut id = String::new();
    for c in query.chars() {
        if c.is_ascii_digit() {
            id.push(c);
        } else if !id.is_empty() {
            break;
        }
    }
    (!id.is_empty()).then_some(id)
}

#[async_trait]
impl SellerAgent for ProductSeller {
    fn card(&self, base_url: &str) -> AgentCard {
        AgentCard {
            name: "product_seller_agent".to_string(),
            description: "Provides product details based on a product ID.".to_string(),
            url: base_url.to_string(),
            version: "1.0.0".to_string(),
            capabilities: AgentCapabilities { streaming: false },
            skills: vec![AgentSkill {
                id: "get_product_details".to_string(),
                name: "Product Details Lookup Tool".to_string(),
                description: "Retrieves product details using a product ID from static inventory."
                    .to_string(),
                tags: vec!["product lookup".to_string(), "inventory".to_string()],
                examples: vec!["What are the details for product 27837?".to_string()],
            }],
            default_input_modes: vec!["text".to_string(), "text/plain".to_string()],
            default_output_modes: vec!["text".to_string(), "text/plain".to_string()],
        }
    }

    async fn handle(&self, query: &str, _context_id: Option<&str>) -> Result<String> {
        match extract_product_id(query) {
            Some(product_id) => {
                self.registry
                    .execute(
                        "get_product_details",
                        serde_json::json!({"product_id": product_id}),
                    )
                    .await
            }
            None => Ok(
                "I can only assist with product lookups. Please provide a product ID, \
                 for example: \"What are the details for product 27837?\""
                    .to_string(),
            ),
        }
    }
}
