//! End-to-end order status updates against the mock API and a cache

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;

use super::{SyncManager, SyncOperation};
use crate::cache::{ButteryCache, ManualClock, MemoryStore, ProgressiveCache};
use crate::client::models::OrderItem;
use crate::client::{ButteryApi, MockButteryClient, Order, OrderStatus};

fn pending_order() -> Order {
    Order {
        id: "ORD-1".to_string(),
        status: OrderStatus::Pending,
        buttery: Some("North".to_string()),
        customer: Some("abc123".to_string()),
        items: vec![OrderItem {
            menu_item_id: "m1".to_string(),
            quantity: 1,
            name: Some("Grilled Cheese".to_string()),
            modifiers: vec![],
        }],
        total_price: 450,
        created_at: None,
    }
}

fn cache_with_order() -> ButteryCache<MemoryStore> {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let cache = ButteryCache::new(ProgressiveCache::new(MemoryStore::new()).with_clock(clock));
    cache.store_orders(&[pending_order()], Some("North"));
    cache
}

fn cached_status(cache: &ButteryCache<MemoryStore>) -> OrderStatus {
    cache.orders(Some("North")).unwrap()[0].status
}

/// Build the same operation the `order status` command issues.
fn status_update(
    api: MockButteryClient,
    cache: ButteryCache<MemoryStore>,
    on_success: oneshot::Sender<(Order, Instant)>,
    errors: Arc<Mutex<Vec<u32>>>,
) -> SyncOperation<'static, Order> {
    let local = cache.clone();
    let reconcile = cache;
    SyncOperation::new(
        move || {
            local.set_order_status("ORD-1", OrderStatus::Ready);
        },
        move || {
            let api = api.clone();
            async move { api.update_order_status("ORD-1", OrderStatus::Ready).await }
        },
        move |_, attempts| errors.lock().unwrap().push(attempts),
    )
    .with_id("order-status:ORD-1")
    .on_success(move |order: Order| {
        reconcile.replace_order(order.clone());
        let _ = on_success.send((order, Instant::now()));
    })
}

#[tokio::test(start_paused = true)]
async fn test_status_update_recovers_after_two_failures() {
    let api = MockButteryClient::new()
        .with_orders(vec![pending_order()])
        .await
        .failing("update_order_status", 2)
        .await;
    let cache = cache_with_order();
    let manager = SyncManager::default();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let (tx, rx) = oneshot::channel();
    let start = Instant::now();

    manager.execute(status_update(api.clone(), cache.clone(), tx, errors.clone()));

    // Visible before any network round trip
    assert_eq!(cached_status(&cache), OrderStatus::Ready);

    let (order, at) = rx.await.unwrap();
    assert_eq!(order.status, OrderStatus::Ready);
    assert_eq!(at.duration_since(start), Duration::from_secs(30));
    assert_eq!(api.call_counts().await.update_order_status, 3);
    assert!(errors.lock().unwrap().is_empty());

    // Reconciled with the server copy, names kept from the cache
    let cached = cache.orders(Some("North")).unwrap();
    assert_eq!(cached[0].status, OrderStatus::Ready);
    assert_eq!(cached[0].items[0].name.as_deref(), Some("Grilled Cheese"));
    assert_eq!(manager.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_status_update_exhausts_retries_without_reverting() {
    let api = MockButteryClient::new()
        .with_orders(vec![pending_order()])
        .await
        .failing("update_order_status", 10)
        .await;
    let cache = cache_with_order();
    let manager = SyncManager::default();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let (tx, _rx) = oneshot::channel();

    manager.execute(status_update(api.clone(), cache.clone(), tx, errors.clone()));
    assert_eq!(cached_status(&cache), OrderStatus::Ready);

    tokio::time::sleep(Duration::from_secs(61)).await;

    assert_eq!(*errors.lock().unwrap(), vec![4]);
    assert_eq!(api.call_counts().await.update_order_status, 4);
    assert_eq!(cached_status(&cache), OrderStatus::Ready);
    // The server never saw the change
    assert_eq!(api.orders().await[0].status, OrderStatus::Pending);
    assert_eq!(manager.pending_count(), 0);
}
