//! A small order service.
//!
//! ```text
//! HERON__AUTH__SECRET=dev-secret cargo run -p heron --example orders
//! curl localhost:8080/orders/7
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use heron::prelude::*;
use serde_json::{json, Value};

#[derive(Default)]
struct Orders {
    store: Arc<RwLock<HashMap<u64, Value>>>,
}

impl Controller for Orders {
    fn prefix(&self) -> &str {
        "/orders"
    }

    fn routes(&self, routes: &mut Routes) {
        let store = Arc::clone(&self.store);
        routes
            .get("/:id", "orders.get")
            .params()
            .cached(30)
            .handler(move |(params,): (Value,)| {
                let store = Arc::clone(&store);
                async move {
                    let id: u64 = params["id"]
                        .as_str()
                        .and_then(|id| id.parse().ok())
                        .ok_or_else(|| HeronError::bad_request("id must be a number"))?;
                    let orders = store
                        .read()
                        .map_err(|_| HeronError::internal("order store poisoned"))?;
                    orders
                        .get(&id)
                        .cloned()
                        .ok_or_else(|| HeronError::not_found(format!("order {id}")))
                }
            });

        let store = Arc::clone(&self.store);
        routes
            .post("/", "orders.create")
            .body()
            .claim("sub")
            .handler(move |(order, owner): (Value, String)| {
                let store = Arc::clone(&store);
                async move {
                    let mut orders = store
                        .write()
                        .map_err(|_| HeronError::internal("order store poisoned"))?;
                    let id = orders.len() as u64 + 1;
                    let record = json!({ "id": id, "owner": owner, "order": order });
                    orders.insert(id, record.clone());
                    HeronResult::Ok(record)
                }
            });
    }
}

fn main() -> Result<(), AppError> {
    App::from_env()?.controller(Orders::default()).run()
}
