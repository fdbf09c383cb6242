//! The purchasing concierge — routes buyer requests to remote sellers
//!
//! Connections are established once at startup by fetching each configured
//! seller's card, then reused for every request. Routing is deliberately a
//! trait seam so a smarter (e.g. LLM-backed) router can slot in without
//! touching the delegation path.

use anyhow::{Context, Result, anyhow};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use concierge_a2a::auth::{MetadataTokenProvider, StaticTokenProvider, TokenProvider};
use concierge_a2a::connection::RemoteAgentConnection;
use concierge_a2a::discovery::AgentCardClient;
use concierge_a2a::protocol::AgentCard;
use concierge_a2a::tool::SendTaskTool;
use concierge_a2a::transport::AuthenticatedTransport;
use concierge_core::config::{AuthMode, ConciergeConfig};
use concierge_core::tools::ToolHandler;

/// Build the token provider a seller's auth mode calls for
pub fn token_provider(auth: &AuthMode) -> Option<Arc<dyn TokenProvider>> {
    match auth {
        AuthMode::None => None,
        AuthMode::Metadata => Some(Arc::new(MetadataTokenProvider::new())),
        AuthMode::Static { token } => Some(Arc::new(StaticTokenProvider::new(token.clone()))),
    }
}

/// Picks which seller agent should handle a request
pub trait RequestRouter: Send + Sync {
    /// Name of the chosen agent, or `None` when nothing matches
    fn route(&self, query: &str, cards: &[AgentCard]) -> Option<String>;
}

/// Matches query text against the vocabulary each card advertises: its name,
/// skill tags, skill names, and skill examples.
pub struct KeywordRouter;

/// Words too generic to distinguish one seller from another
const STOPWORDS: &[&str] = &[
    "seller", "agent", "menu", "order", "show", "what", "the", "creates", "creation",
    "questions", "about", "and", "prices", "from", "items", "details", "tool",
];

impl KeywordRouter {
    fn vocabulary(card: &AgentCard) -> Vec<String> {
        let mut words = Vec::new();
        let mut push = |text: &str| {
            for word in text
                .split(|c: char| !c.is_ascii_alphanumeric())
                .map(str::to_lowercase)
            {
                if word.len() >= 4 && !STOPWORDS.contains(&word.as_str()) && !words.contains(&word)
                {
                    words.push(word);
                }
            }
        };

        push(&card.name);
        for skill in &card.skills {
            push(&skill.name);
            for tag in &skill.tags {
                push(tag);
            }
            for example in &skill.examples {
                push(example);
            }
        }
        words
    }
}

impl RequestRouter for KeywordRouter {
    fn route(&self, query: &str, cards: &[AgentCard]) -> Option<String> {
        let q = query.to_lowercase();

        let best = cards
            .iter()
            .map(|card| {
                let score = Self::vocabulary(card)
                    .iter()
                    .filter(|word| q.contains(word.as_str()))
                    .count();
                (card, score)
            })
            .max_by_key(|(_, score)| *score)?;

        (best.1 > 0).then(|| best.0.name.clone())
    }
}

/// The coordinator agent buyers talk to
pub struct PurchasingAgent {
    cards: Vec<AgentCard>,
    router: Box<dyn RequestRouter>,
    send_task: SendTaskTool,
}

impl PurchasingAgent {
    /// Discover every configured seller and bind a connection to each.
    /// A seller whose card cannot be fetched fails startup; a concierge with
    /// a dead seller in its roster is misconfigured.
    pub async fn connect(config: &ConciergeConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let mut connections = Vec::with_capacity(config.sellers.len());

        for seller in &config.sellers {
            let provider = token_provider(&seller.auth);
            let card_client = AgentCardClient::with_timeout(provider.clone(), timeout);
            let mut card = card_client
                .fetch(&seller.url)
                .await
                .with_context(|| format!("Failed to discover seller '{}'", seller.name))?;

            // The configured address wins over whatever the card advertises;
            // local runs often front a card minted for a public URL.
            if card.url != seller.url {
                debug!(
                    "Seller '{}' card advertises {}, using configured {}",
                    seller.name, card.url, seller.url
                );
                card.url = seller.url.clone();
            }

            info!("Connected to seller '{}' ({})", card.name, seller.url);
            let transport = AuthenticatedTransport::with_timeout(provider, timeout);
            connections.push(Arc::new(RemoteAgentConnection::new(card, transport)));
        }

        Ok(Self::with_router(connections, Box::new(KeywordRouter)))
    }

    pub fn with_router(
        connections: Vec<Arc<RemoteAgentConnection>>,
        router: Box<dyn RequestRouter>,
    ) -> Self {
        let cards = connections.iter().map(|c| c.card().clone()).collect();
        Self {
            cards,
            router,
            send_task: SendTaskTool::new(connections),
        }
    }

    /// Names of the sellers currently bound
    pub fn seller_names(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.name.as_str()).collect()
    }

    /// Handle one buyer request: pick a seller and delegate
    pub async fn ask(&self, query: &str, session_id: Option<&str>) -> Result<String> {
        if self.cards.is_empty() {
            return Err(anyhow!("No sellers configured"));
        }

        let Some(agent) = self.router.route(query, &self.cards) else {
            return Ok(format!(
                "I couldn't tell which seller that request is for. Available sellers: {}.",
                self.seller_names().join(", ")
            ));
        };

        let session = session_id
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        debug!("Routing request to '{}' (session {})", agent, session);

        self.send_task
            .execute(serde_json::json!({
                "agent": agent,
                "task": query,
                "session_id": session,
            }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::config::SellerEndpoint;
    use concierge_sellers::{SellerServer, SellerServerConfig, burger_seller, pizza_seller};

    fn sample_cards() -> Vec<AgentCard> {
        use concierge_sellers::SellerAgent;
        vec![
            burger_seller().card("http://localhost:10000"),
            pizza_seller().card("http://localhost:10001"),
            concierge_sellers::ProductSeller::new().card("http://localhost:10002"),
        ]
    }

    #[test]
    fn test_router_picks_burger_for_cheeseburger() {
        let cards = sample_cards();
        assert_eq!(
            KeywordRouter.route("I'd like to order 2 cheeseburgers", &cards),
            Some("burger_seller_agent".to_string())
        );
    }

    #[test]
    fn test_router_picks_pizza() {
        let cards = sample_cards();
        assert_eq!(
            KeywordRouter.route("show me the pizza menu", &cards),
            Some("pizza_seller_agent".to_string())
        );
    }

    #[test]
    fn test_router_picks_product_lookup() {
        let cards = sample_cards();
        assert_eq!(
            KeywordRouter.route("what are the details for product 27837?", &cards),
            Some("product_seller_agent".to_string())
        );
    }

    #[test]
    fn test_router_gives_up_on_unrelated_query() {
        let cards = sample_cards();
        assert_eq!(KeywordRouter.route("how is the weather?", &cards), None);
    }

    #[test]
    fn test_token_provider_wiring() {
        assert!(token_provider(&AuthMode::None).is_none());
        assert!(token_provider(&AuthMode::Metadata).is_some());
        assert!(
            token_provider(&AuthMode::Static {
                token: "tok-123".to_string()
            })
            .is_some()
        );
    }

    async fn spawn_seller(server: SellerServer) -> String {
        let router = server.router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_connect_and_ask_end_to_end() {
        let burger_url = spawn_seller(SellerServer::new(
            Arc::new(burger_seller()),
            SellerServerConfig::default(),
        ))
        .await;
        let pizza_url = spawn_seller(SellerServer::new(
            Arc::new(pizza_seller()),
            SellerServerConfig {
                require_token: Some("tok-123".to_string()),
                ..Default::default()
            },
        ))
        .await;

        let config = ConciergeConfig {
            timeout_secs: 10,
            sellers: vec![
                SellerEndpoint {
                    name: "burger".to_string(),
                    url: burger_url,
                    auth: AuthMode::None,
                },
                SellerEndpoint {
                    name: "pizza".to_string(),
                    url: pizza_url,
                    auth: AuthMode::Static {
                        token: "tok-123".to_string(),
                    },
                },
            ],
        };

        let agent = PurchasingAgent::connect(&config).await.unwrap();
        assert_eq!(
            agent.seller_names(),
            vec!["burger_seller_agent", "pizza_seller_agent"]
        );

        let reply = agent
            .ask("order 1 pepperoni pizza", Some("session-1"))
            .await
            .unwrap();
        assert!(reply.contains("Pepperoni Pizza"));
        assert!(reply.contains("has been created"));

        let reply = agent.ask("order 1 cheeseburger", None).await.unwrap();
        assert!(reply.contains("Classic Cheeseburger"));
    }

    #[tokio::test]
    async fn test_connect_fails_on_unreachable_seller() {
        let config = ConciergeConfig {
            timeout_secs: 1,
            sellers: vec![SellerEndpoint {
                name: "burger".to_string(),
                url: "http://127.0.0.1:9".to_string(),
                auth: AuthMode::None,
            }],
        };
        let err = PurchasingAgent::connect(&config)
            .await
            .err()
            .expect("connect should fail for an unreachable seller");
        assert!(err.to_string().contains("burger"));
    }

    #[tokio::test]
    async fn test_ask_with_no_sellers() {
        let agent = PurchasingAgent::with_router(vec![], Box::new(KeywordRouter));
        assert!(agent.ask("order a pizza", None).await.is_err());
    }

    #[tokio::test]
    async fn test_unroutable_query_lists_sellers() {
        let burger_url = spawn_seller(SellerServer::new(
            Arc::new(burger_seller()),
            SellerServerConfig::default(),
        ))
        .await;

        let config = ConciergeConfig {
            timeout_secs: 10,
            sellers: vec![SellerEndpoint {
                name: "burger".to_string(),
                url: burger_url,
                auth: AuthMode::None,
            }],
        };
        let agent = PurchasingAgent::connect(&config).await.unwrap();

        let reply = agent.ask("how is the weather?", None).await.unwrap();
        assert!(reply.contains("burger_seller_agent"));
        assert!(reply.contains("couldn't tell"));
    }
}
