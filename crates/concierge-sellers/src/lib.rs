//! concierge-sellers — specialized seller agents served over A2A
//!
//! Three sellers over static in-memory data: burger and pizza stores with
//! order creation, and a product-lookup agent over a fixed inventory. Each
//! is exposed through the same axum server speaking the A2A wire format.

pub mod burger;
pub mod menu;
pub mod order;
pub mod pizza;
pub mod product;
pub mod seller;
pub mod server;

pub use burger::burger_seller;
pub use order::{Order, OrderItem};
pub use pizza::pizza_seller;
pub use product::ProductSeller;
pub use seller::SellerAgent;
pub use server::{SellerServer, SellerServerConfig};
