//! Menu and order views backed by the buttery cache

use std::sync::Arc;

use super::{RefreshOutcome, ViewState, refresh};
use crate::cache::ButteryCache;
use crate::cache::storage::KeyValueStore;
use crate::client::ButteryApi;
use crate::client::models::{MenuItem, Order, join_item_names};
use crate::error::{Error, Result};

/// Progressive loaders for the buttery collections.
pub struct ButteryViews<S, A> {
    cache: ButteryCache<S>,
    api: Arc<A>,
}

impl<S, A> Clone for ButteryViews<S, A> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            api: Arc::clone(&self.api),
        }
    }
}

impl<S: KeyValueStore, A: ButteryApi> ButteryViews<S, A> {
    pub fn new(cache: ButteryCache<S>, api: Arc<A>) -> Self {
        Self { cache, api }
    }

    pub fn cache(&self) -> &ButteryCache<S> {
        &self.cache
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Show the cached menu for `buttery`, then the server's.
    pub async fn load_menu<R>(&self, buttery: Option<&str>, render: R) -> RefreshOutcome<Vec<MenuItem>>
    where
        R: FnMut(ViewState<&Vec<MenuItem>>),
    {
        refresh(
            self.cache.menu(buttery),
            self.api.list_menu_items(buttery),
            |items| self.cache.store_menu(items, buttery),
            render,
        )
        .await
    }

    /// Show the cached orders for `buttery`, then the server's.
    ///
    /// Fetched orders have their item names filled in from `menu`, or from
    /// the menu for the same buttery when `menu` is not given. Names are
    /// cached with the orders.
    pub async fn load_orders<R>(
        &self,
        buttery: Option<&str>,
        menu: Option<&[MenuItem]>,
        render: R,
    ) -> RefreshOutcome<Vec<Order>>
    where
        R: FnMut(ViewState<&Vec<Order>>),
    {
        let fetch = async {
            let mut orders = self.api.list_orders(buttery).await?;
            match menu {
                Some(menu) => join_item_names(&mut orders, menu),
                None => join_item_names(&mut orders, &self.menu_for_join(buttery).await),
            }
            Ok::<_, Error>(orders)
        };

        refresh(
            self.cache.orders(buttery),
            fetch,
            |orders| self.cache.store_orders(orders, buttery),
            render,
        )
        .await
    }

    /// Menu used to name order lines: cached if possible, else fetched.
    async fn menu_for_join(&self, buttery: Option<&str>) -> Vec<MenuItem> {
        if let Some(menu) = self.cache.menu(buttery) {
            return menu;
        }
        match self.fetch_menu(buttery).await {
            Ok(menu) => menu,
            Err(e) => {
                log::warn!("Could not load menu to name order items: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_menu(&self, buttery: Option<&str>) -> Result<Vec<MenuItem>> {
        let menu = self.api.list_menu_items(buttery).await?;
        self.cache.store_menu(&menu, buttery);
        Ok(menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, MemoryStore, ProgressiveCache};
    use crate::client::MockButteryClient;
    use crate::client::models::{OrderItem, OrderStatus, UNKNOWN_ITEM_NAME};
    use crate::error::ApiError;

    fn item(id: &str, name: &str, buttery: &str) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            price: 250,
            category: None,
            buttery: Some(buttery.to_string()),
            available: true,
            modifiers: vec![],
        }
    }

    fn order(id: &str, menu_item_id: &str, buttery: &str) -> Order {
        Order {
            id: id.to_string(),
            status: OrderStatus::Pending,
            buttery: Some(buttery.to_string()),
            customer: None,
            items: vec![OrderItem {
                menu_item_id: menu_item_id.to_string(),
                quantity: 1,
                name: None,
                modifiers: vec![],
            }],
            total_price: 250,
            created_at: None,
        }
    }

    fn views(api: MockButteryClient) -> ButteryViews<MemoryStore, MockButteryClient> {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let cache = ButteryCache::new(ProgressiveCache::new(MemoryStore::new()).with_clock(clock));
        ButteryViews::new(cache, Arc::new(api))
    }

    fn labels<T>(states: &[ViewState<T>]) -> Vec<&'static str> {
        states
            .iter()
            .map(|s| match s {
                ViewState::Loading => "loading",
                ViewState::Cached(_) => "cached",
                ViewState::Fresh(_) => "fresh",
                ViewState::Failed(_) => "failed",
            })
            .collect()
    }

    #[tokio::test]
    async fn test_menu_fetched_then_served_from_cache() {
        let api = MockButteryClient::new()
            .with_menu(vec![item("m1", "Bagel", "North"), item("m2", "Chai", "South")])
            .await;
        let views = views(api);

        let mut first = Vec::new();
        let outcome = views
            .load_menu(Some("North"), |s| first.push(s.cloned()))
            .await;
        assert_eq!(labels(&first), vec!["fresh"]);
        assert_eq!(outcome.data().map(Vec::len), Some(1));

        let mut second = Vec::new();
        views
            .load_menu(Some("North"), |s| second.push(s.cloned()))
            .await;
        assert_eq!(labels(&second), vec!["cached", "fresh"]);

        // Another buttery never sees North's cache
        let mut south = Vec::new();
        views
            .load_menu(Some("South"), |s| south.push(s.cloned()))
            .await;
        assert_eq!(labels(&south), vec!["fresh"]);
        assert_eq!(south[0].data().unwrap()[0].name, "Chai");
    }

    #[tokio::test]
    async fn test_offline_menu_falls_back_to_cache() {
        let api = MockButteryClient::new()
            .with_menu(vec![item("m1", "Bagel", "North")])
            .await;
        let views = views(api.clone());
        views.load_menu(Some("North"), |_| {}).await;

        let _ = api.clone().failing("list_menu_items", 1).await;
        let mut rendered = Vec::new();
        let outcome = views
            .load_menu(Some("North"), |s| rendered.push(s.cloned()))
            .await;

        assert!(matches!(outcome, RefreshOutcome::Stale { .. }));
        assert_eq!(labels(&rendered), vec!["cached"]);
    }

    #[tokio::test]
    async fn test_offline_without_cache_is_unavailable() {
        let api = MockButteryClient::new()
            .with_error(ApiError::Network("offline".to_string()))
            .await;
        let views = views(api);

        let mut rendered = Vec::new();
        let outcome = views
            .load_menu(None, |s| rendered.push(s.cloned()))
            .await;

        assert!(matches!(outcome, RefreshOutcome::Unavailable(_)));
        assert_eq!(labels(&rendered), vec!["failed"]);
    }

    #[tokio::test]
    async fn test_orders_joined_with_menu() {
        let api = MockButteryClient::new()
            .with_menu(vec![item("m1", "Bagel", "North")])
            .await
            .with_orders(vec![
                order("ORD-1", "m1", "North"),
                order("ORD-2", "gone", "North"),
            ])
            .await;
        let views = views(api.clone());

        let orders = views
            .load_orders(Some("North"), None, |_| {})
            .await
            .into_result()
            .unwrap();

        assert_eq!(orders[0].items[0].display_name(), "Bagel");
        assert_eq!(orders[1].items[0].display_name(), UNKNOWN_ITEM_NAME);
        // Menu fetched once for the join and cached alongside
        assert_eq!(api.call_counts().await.list_menu_items, 1);
        assert!(views.cache().menu(Some("North")).is_some());

        // Cached orders keep their names
        let cached = views.cache().orders(Some("North")).unwrap();
        assert_eq!(cached[0].items[0].name.as_deref(), Some("Bagel"));
    }

    #[tokio::test]
    async fn test_orders_use_provided_menu() {
        let api = MockButteryClient::new()
            .with_orders(vec![order("ORD-1", "m9", "North")])
            .await;
        let views = views(api.clone());
        let menu = vec![item("m9", "Quesadilla", "North")];

        let orders = views
            .load_orders(Some("North"), Some(&menu), |_| {})
            .await
            .into_result()
            .unwrap();

        assert_eq!(orders[0].items[0].display_name(), "Quesadilla");
        assert_eq!(api.call_counts().await.list_menu_items, 0);
    }
}
