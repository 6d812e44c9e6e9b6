//! Application context: the dependency-injection root.
//!
//! One `App` is built at startup and owns the long-lived collaborators:
//! session, HTTP gateway, and cart synchronizer. Replaces the original
//! design's module-level singletons with explicitly passed references.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cart::CartSynchronizer;
use crate::config::{Config, ConfigError};
use crate::domain::User;
use crate::gateway::{AuthGateway, CartGateway, Client, ClientConfig, GatewayError, HttpApi};
use crate::session::{Session, SessionEvent};

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Long-lived application context.
pub struct App {
    cfg: Config,
    session: Arc<Session>,
    api: Arc<HttpApi>,
    cart: Arc<CartSynchronizer>,
}

impl App {
    /// Builds the context from a loaded configuration.
    pub fn new(cfg: Config) -> Self {
        let session = Arc::new(match cfg.api.access_token.clone() {
            Some(token) => Session::with_token(token),
            None => Session::new(),
        });

        let mut client_config = ClientConfig::new(cfg.api.base_url.clone());
        client_config.timeout = cfg.api.timeout;

        let client = Client::new(client_config, Arc::clone(&session));
        let api = Arc::new(HttpApi::new(client));
        let cart = Arc::new(CartSynchronizer::new(
            Arc::clone(&api) as Arc<dyn CartGateway>
        ));

        Self {
            cfg,
            session,
            api,
            cart,
        }
    }

    /// Loads the config file and builds the context.
    pub fn from_config_path(path: &str) -> Result<Self, AppError> {
        let cfg = Config::load(path)?;
        Ok(Self::new(cfg))
    }

    /// Spawns a task that clears the cart mirror whenever the session is
    /// revoked, whether by explicit logout or a 403-forced one.
    pub fn start_session_watcher(&self) -> JoinHandle<()> {
        let mut events = self.session.subscribe();
        let cart = Arc::clone(&self.cart);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::LoggedOut) => {
                        info!("session ended, clearing cart state");
                        cart.clear();
                    }
                    Ok(SessionEvent::LoggedIn) => {}
                    // Lagged receivers just catch the next event.
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Exchanges credentials for a token, authenticates the session, and
    /// performs the initial cart refresh.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let token = self.api.login(email, password).await?;
        self.session.set_access_token(token);

        let user = self.api.current_user().await?;
        self.session.authenticate(user.clone());

        if let Err(e) = self.cart.refresh().await {
            warn!(error = %e, "initial cart refresh failed");
        }

        info!(user_id = user.id, "logged in");
        Ok(user)
    }

    /// Validates a stored token, if any, and hydrates session and cart.
    ///
    /// Returns `None` when there is no token or the token is no longer
    /// accepted; the session is left anonymous in that case.
    pub async fn bootstrap(&self) -> Result<Option<User>, AppError> {
        if self.session.access_token().is_none() {
            return Ok(None);
        }

        let user = match self.api.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "stored token rejected");
                self.session.revoke();
                return Ok(None);
            }
        };

        self.session.authenticate(user.clone());

        if let Err(e) = self.cart.refresh().await {
            warn!(error = %e, "initial cart refresh failed");
        }

        Ok(Some(user))
    }

    /// Revokes the session. The session watcher clears the cart.
    pub fn logout(&self) {
        self.session.revoke();
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The HTTP gateway, usable through any of the gateway traits.
    pub fn api(&self) -> &Arc<HttpApi> {
        &self.api
    }

    pub fn cart(&self) -> &Arc<CartSynchronizer> {
        &self.cart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, AppConfig};
    use std::time::Duration;

    fn test_config() -> Config {
        Config {
            app: AppConfig {
                name: "test".to_string(),
                env: "test".to_string(),
                log_level: None,
            },
            api: ApiConfig {
                base_url: "http://localhost:1".to_string(),
                timeout: Duration::from_secs(1),
                access_token: None,
            },
        }
    }

    #[tokio::test]
    async fn test_bootstrap_without_token_stays_anonymous() {
        let app = App::new(test_config());

        let user = app.bootstrap().await.unwrap();

        assert!(user.is_none());
        assert!(!app.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_bootstrap_with_rejected_token_revokes_session() {
        // No server is listening on the configured port, so validation
        // fails and the stored token must be dropped.
        let mut cfg = test_config();
        cfg.api.access_token = Some("stale".to_string());
        let app = App::new(cfg);

        let user = app.bootstrap().await.unwrap();

        assert!(user.is_none());
        assert!(app.session().access_token().is_none());
    }

    #[tokio::test]
    async fn test_session_watcher_clears_cart_on_logout() {
        let mut cfg = test_config();
        cfg.api.access_token = Some("tok".to_string());
        let app = App::new(cfg);
        let watcher = app.start_session_watcher();

        app.logout();

        // Give the watcher a chance to observe the event.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(app.cart().items().is_empty());

        watcher.abort();
    }
}
