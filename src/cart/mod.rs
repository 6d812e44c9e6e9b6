//! Cart synchronization: a local mirror of the server-side cart plus the
//! client-local checkout selection.
//!
//! The server cart is the source of truth. Mutations are never applied
//! optimistically: each one calls the gateway and then re-fetches the cart,
//! so server-computed fields (prices, merged quantities) can never drift.
//! The checkout selection is keyed by product id and is reconciled against
//! every refresh, keeping it a subset of the current cart at all times.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::domain::{Cart, CartItem};
use crate::gateway::{CartGateway, GatewayError};

/// Cart synchronization errors.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity must be positive; removal is a distinct operation.
    #[error("quantity must be positive")]
    InvalidQuantity,

    /// The remote cart API rejected or failed the call.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;

#[derive(Default)]
struct CartState {
    /// Mirror of the server cart, in server order.
    items: Vec<CartItem>,
    /// Product ids selected for the next checkout. Always a subset of the
    /// product ids in `items`.
    selected: HashSet<u64>,
}

/// Maintains the cart mirror and checkout selection.
///
/// This is the only writer of both; everything else reads through the
/// accessors. Gateway failures propagate to the caller and leave local
/// state at its last known-good value.
pub struct CartSynchronizer {
    gateway: Arc<dyn CartGateway>,
    state: Mutex<CartState>,
    /// Serializes refreshes: at most one fetch in flight, and responses are
    /// applied in request order, so a stale fetch can never overwrite a
    /// newer one.
    refresh_lock: AsyncMutex<()>,
}

impl CartSynchronizer {
    /// Creates a synchronizer in the initial state: empty mirror, empty
    /// selection. Call [`refresh`](Self::refresh) to populate it.
    pub fn new(gateway: Arc<dyn CartGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(CartState::default()),
            refresh_lock: AsyncMutex::new(()),
        }
    }

    /// Re-fetches the cart and reconciles the checkout selection.
    ///
    /// Selected products missing from the fresh cart are dropped; surviving
    /// selections are served with fresh attributes because the selection
    /// only stores ids and rendering always reads the mirror.
    pub async fn refresh(&self) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;

        let cart = self.gateway.get_cart().await?;
        self.apply(cart);

        Ok(())
    }

    fn apply(&self, cart: Cart) {
        let mut state = self.state.lock().unwrap();

        let fresh: HashSet<u64> = cart.items.iter().map(|i| i.product_id).collect();
        let before = state.selected.len();
        state.selected.retain(|id| fresh.contains(id));

        debug!(
            items = cart.items.len(),
            selected = state.selected.len(),
            dropped = before - state.selected.len(),
            "cart refreshed"
        );

        state.items = cart.items;
    }

    /// Adds `quantity` of a product to the cart and resynchronizes.
    /// If the product is already in the cart the server increments the
    /// existing line.
    pub async fn add_item(&self, product_id: u64, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        self.gateway.add_item(product_id, quantity).await?;
        self.refresh().await
    }

    /// Removes a product's line from the cart and resynchronizes.
    pub async fn remove_item(&self, product_id: u64) -> Result<()> {
        self.gateway.remove_item(product_id).await?;
        self.refresh().await
    }

    /// Sets the quantity of an existing line and resynchronizes.
    /// Zero is rejected; use [`remove_item`](Self::remove_item) instead.
    pub async fn set_quantity(&self, product_id: u64, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        self.gateway.set_quantity(product_id, quantity).await?;
        self.refresh().await
    }

    /// Toggles a product's checkout selection. Purely local, no network.
    ///
    /// Selecting a product not currently in the mirror is a no-op, which
    /// keeps the subset invariant unconditional. Returns whether the
    /// product is selected after the call.
    pub fn toggle_checkout(&self, product_id: u64) -> bool {
        let mut state = self.state.lock().unwrap();

        if state.selected.remove(&product_id) {
            return false;
        }

        if state.items.iter().any(|i| i.product_id == product_id) {
            state.selected.insert(product_id);
            return true;
        }

        false
    }

    /// Returns the cart mirror in server order.
    pub fn items(&self) -> Vec<CartItem> {
        self.state.lock().unwrap().items.clone()
    }

    /// Returns the checkout selection, rendered in cart order with current
    /// attributes.
    pub fn checkout_items(&self) -> Vec<CartItem> {
        let state = self.state.lock().unwrap();
        state
            .items
            .iter()
            .filter(|i| state.selected.contains(&i.product_id))
            .cloned()
            .collect()
    }

    pub fn is_selected(&self, product_id: u64) -> bool {
        self.state.lock().unwrap().selected.contains(&product_id)
    }

    /// Resets to the initial state (empty mirror, empty selection).
    /// Used on logout.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.items.clear();
        state.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{ApiError, Result as GatewayResult};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn item(product_id: u64, quantity: u32) -> CartItem {
        CartItem {
            product_id,
            product_name: format!("product-{}", product_id),
            product_price: Decimal::new(999, 2),
            quantity,
            product_price_id: product_id * 10,
            vendor_id: 1,
            vendor_name: "vendor-1".to_string(),
        }
    }

    fn cart(items: Vec<CartItem>) -> Cart {
        Cart { items }
    }

    /// Mock gateway serving queued cart responses in call order.
    struct MockCartGateway {
        responses: Mutex<VecDeque<(Cart, Duration)>>,
        fail_mutations: AtomicBool,
        fail_get: AtomicBool,
        add_calls: Mutex<Vec<(u64, u32)>>,
        remove_calls: Mutex<Vec<u64>>,
        set_calls: Mutex<Vec<(u64, u32)>>,
    }

    impl MockCartGateway {
        fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                fail_mutations: AtomicBool::new(false),
                fail_get: AtomicBool::new(false),
                add_calls: Mutex::new(Vec::new()),
                remove_calls: Mutex::new(Vec::new()),
                set_calls: Mutex::new(Vec::new()),
            }
        }

        fn queue(&self, cart: Cart) {
            self.queue_delayed(cart, Duration::ZERO);
        }

        fn queue_delayed(&self, cart: Cart, delay: Duration) {
            self.responses.lock().unwrap().push_back((cart, delay));
        }

        fn api_error() -> GatewayError {
            GatewayError::Api(ApiError {
                code: "generic_error".to_string(),
                message: "mock failure".to_string(),
            })
        }
    }

    #[async_trait]
    impl CartGateway for MockCartGateway {
        async fn get_cart(&self) -> GatewayResult<Cart> {
            if self.fail_get.load(Ordering::SeqCst) {
                return Err(Self::api_error());
            }

            let (cart, delay) = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no queued cart response");

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            Ok(cart)
        }

        async fn add_item(&self, product_id: u64, quantity: u32) -> GatewayResult<()> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(Self::api_error());
            }
            self.add_calls.lock().unwrap().push((product_id, quantity));
            Ok(())
        }

        async fn remove_item(&self, product_id: u64) -> GatewayResult<()> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(Self::api_error());
            }
            self.remove_calls.lock().unwrap().push(product_id);
            Ok(())
        }

        async fn set_quantity(&self, product_id: u64, quantity: u32) -> GatewayResult<()> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(Self::api_error());
            }
            self.set_calls.lock().unwrap().push((product_id, quantity));
            Ok(())
        }
    }

    fn synchronizer() -> (Arc<MockCartGateway>, CartSynchronizer) {
        let gateway = Arc::new(MockCartGateway::new());
        let sync = CartSynchronizer::new(gateway.clone());
        (gateway, sync)
    }

    #[tokio::test]
    async fn test_initial_state_is_empty() {
        let (_, sync) = synchronizer();
        assert!(sync.items().is_empty());
        assert!(sync.checkout_items().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_replaces_mirror() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(1, 2), item(2, 1)]));

        sync.refresh().await.unwrap();

        let items = sync.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id, 1);
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_refresh_drops_selection_for_missing_items() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(1, 2), item(2, 1)]));
        sync.refresh().await.unwrap();

        sync.toggle_checkout(1);
        sync.toggle_checkout(2);

        // Item 2 disappears server-side.
        gateway.queue(cart(vec![item(1, 2)]));
        sync.refresh().await.unwrap();

        let selected: Vec<u64> = sync.checkout_items().iter().map(|i| i.product_id).collect();
        assert_eq!(selected, vec![1]);
        assert!(!sync.is_selected(2));
    }

    #[tokio::test]
    async fn test_refresh_serves_selection_with_fresh_attributes() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(1, 2)]));
        sync.refresh().await.unwrap();
        sync.toggle_checkout(1);

        // Quantity changed server-side.
        gateway.queue(cart(vec![item(1, 5)]));
        sync.refresh().await.unwrap();

        let checkout = sync.checkout_items();
        assert_eq!(checkout.len(), 1);
        assert_eq!(checkout[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_refresh_emptying_cart_empties_selection() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(1, 1), item(2, 1)]));
        sync.refresh().await.unwrap();
        sync.toggle_checkout(1);

        gateway.queue(cart(vec![]));
        sync.refresh().await.unwrap();

        assert!(sync.items().is_empty());
        assert!(sync.checkout_items().is_empty());
    }

    #[tokio::test]
    async fn test_add_item_calls_gateway_then_refreshes() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(5, 3)]));

        sync.add_item(5, 3).await.unwrap();

        assert_eq!(*gateway.add_calls.lock().unwrap(), vec![(5, 3)]);
        let items = sync.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, 5);
        assert_eq!(items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_add_item_rejects_zero_quantity() {
        let (gateway, sync) = synchronizer();

        let err = sync.add_item(5, 0).await.unwrap_err();

        assert!(matches!(err, CartError::InvalidQuantity));
        assert!(gateway.add_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_state_untouched() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(1, 1)]));
        sync.refresh().await.unwrap();
        sync.toggle_checkout(1);

        gateway.fail_mutations.store(true, Ordering::SeqCst);

        let err = sync.add_item(9, 1).await.unwrap_err();
        assert!(matches!(err, CartError::Gateway(GatewayError::Api(_))));

        // Mirror and selection are still the last known-good state.
        assert_eq!(sync.items().len(), 1);
        assert!(sync.is_selected(1));
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_state_untouched() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(1, 1)]));
        sync.refresh().await.unwrap();

        gateway.fail_get.store(true, Ordering::SeqCst);
        assert!(sync.refresh().await.is_err());

        assert_eq!(sync.items().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_item_refreshes() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(1, 1), item(2, 1)]));
        sync.refresh().await.unwrap();

        gateway.queue(cart(vec![item(2, 1)]));
        sync.remove_item(1).await.unwrap();

        assert_eq!(*gateway.remove_calls.lock().unwrap(), vec![1]);
        assert_eq!(sync.items().len(), 1);
        assert_eq!(sync.items()[0].product_id, 2);
    }

    #[tokio::test]
    async fn test_set_quantity_rejects_zero() {
        let (_, sync) = synchronizer();
        assert!(matches!(
            sync.set_quantity(1, 0).await.unwrap_err(),
            CartError::InvalidQuantity
        ));
    }

    #[tokio::test]
    async fn test_set_quantity_refreshes() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(1, 1)]));
        sync.refresh().await.unwrap();

        gateway.queue(cart(vec![item(1, 4)]));
        sync.set_quantity(1, 4).await.unwrap();

        assert_eq!(*gateway.set_calls.lock().unwrap(), vec![(1, 4)]);
        assert_eq!(sync.items()[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_double_toggle_is_net_noop() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(1, 1)]));
        sync.refresh().await.unwrap();

        assert!(sync.toggle_checkout(1));
        assert!(!sync.toggle_checkout(1));
        assert!(sync.checkout_items().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_unknown_product_is_noop() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(1, 1)]));
        sync.refresh().await.unwrap();

        assert!(!sync.toggle_checkout(42));
        assert!(sync.checkout_items().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_items_in_cart_order() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(3, 1), item(1, 1), item(2, 1)]));
        sync.refresh().await.unwrap();

        sync.toggle_checkout(2);
        sync.toggle_checkout(3);

        let ids: Vec<u64> = sync.checkout_items().iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_clear_resets_to_initial_state() {
        let (gateway, sync) = synchronizer();
        gateway.queue(cart(vec![item(1, 1)]));
        sync.refresh().await.unwrap();
        sync.toggle_checkout(1);

        sync.clear();

        assert!(sync.items().is_empty());
        assert!(sync.checkout_items().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_apply_in_request_order() {
        let (gateway, sync) = synchronizer();
        let sync = Arc::new(sync);

        // First response is slow, second is instant. Without serialization
        // the slow first response would be applied last and clobber the
        // fresher second one.
        gateway.queue_delayed(cart(vec![item(1, 1)]), Duration::from_millis(50));
        gateway.queue(cart(vec![item(2, 7)]));

        let first = {
            let sync = Arc::clone(&sync);
            tokio::spawn(async move { sync.refresh().await })
        };
        // Let the first refresh take the lock before issuing the second.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = {
            let sync = Arc::clone(&sync);
            tokio::spawn(async move { sync.refresh().await })
        };

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let items = sync.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, 2);
        assert_eq!(items[0].quantity, 7);
    }
}
