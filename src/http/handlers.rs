//! Demonstration items API audited by the server.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub name: String,
}

/// In-memory item storage.
#[derive(Clone, Default)]
pub struct ItemStore {
    items: Arc<Mutex<HashMap<u64, Item>>>,
    next_id: Arc<AtomicU64>,
}

impl ItemStore {
    pub fn insert(&self, name: String) -> Item {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let item = Item { id, name };
        self.items
            .lock()
            .expect("item store mutex poisoned")
            .insert(id, item.clone());
        item
    }

    pub fn get(&self, id: u64) -> Option<Item> {
        self.items.lock().expect("item store mutex poisoned").get(&id).cloned()
    }
}

pub fn api_router(store: ItemStore) -> Router {
    Router::new()
        .route("/items", post(create_item))
        .route("/items/{id}", get(get_item))
        .route("/health", get(health))
        .with_state(store)
}

async fn create_item(State(store): State<ItemStore>, Json(new): Json<NewItem>) -> impl IntoResponse {
    let item = store.insert(new.name);
    tracing::debug!(id = item.id, "Item created");
    (StatusCode::CREATED, Json(item))
}

async fn get_item(State(store): State<ItemStore>, Path(id): Path<u64>) -> impl IntoResponse {
    match store.get(id) {
        Some(item) => Json(item).into_response(),
        None => (StatusCode::NOT_FOUND, "Item not found").into_response(),
    }
}

async fn health() -> &'static str {
    "ok"
}
