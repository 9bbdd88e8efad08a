#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use chrono::Utc;
use serde_json::{Map, Value, json};
use shared::{
    abstract_trait::DynJwtService,
    config::{Hashing, JwtConfig},
    errors::{RepositoryError, ServiceError},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use storefront::{
    abstract_trait::{
        admin::AdminRepositoryTrait,
        gateway::PaymentGatewayTrait,
        order::repository::{OrderCommandRepositoryTrait, OrderQueryRepositoryTrait},
        order_item::repository::{OrderItemCommandRepositoryTrait, OrderItemQueryRepositoryTrait},
    },
    config::AdminConfig,
    di::DependenciesInjectDeps,
    domain::{
        admin_entity::AdminEntity,
        requests::{
            admin::AdminListQuery,
            order::{
                CreateOrderItemRecord, CreatePendingOrderRecord, FindAllOrders,
                UpsertOrderPaymentRecord,
            },
            page_window,
            payment_intent::CreatePaymentIntentParams,
        },
        response::payment_intent::PaymentIntentResponse,
        status::PaymentStatus,
    },
    gateway::StripeSignatureVerifier,
    handler::AppRouter,
    model::{order::Order, order_item::OrderItem},
    state::AppState,
};
use tower::ServiceExt;

pub const WEBHOOK_SECRET: &str = "whsec_test_secret";
pub const JWT_SECRET: &str = "test-jwt-secret";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Orders keyed by `order_id`, mirroring the Postgres upsert.
#[derive(Default)]
pub struct InMemoryOrders {
    rows: Mutex<HashMap<String, Order>>,
    fail_upsert: Mutex<bool>,
}

impl InMemoryOrders {
    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.rows.lock().unwrap().get(order_id).cloned()
    }

    /// The next payment upsert fails as if the pool were exhausted.
    pub fn fail_next_upsert(&self) {
        *self.fail_upsert.lock().unwrap() = true;
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for InMemoryOrders {
    async fn create_pending(
        &self,
        req: &CreatePendingOrderRecord,
    ) -> Result<Order, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&req.order_id) {
            return Err(RepositoryError::AlreadyExists(format!(
                "order {} already exists",
                req.order_id
            )));
        }

        let now = Some(Utc::now());
        let order = Order {
            order_id: req.order_id.clone(),
            total_amount: req.total_amount,
            currency: req.currency.clone(),
            payment_status: PaymentStatus::Pending.as_str().to_string(),
            payment_intent_id: None,
            customer_name: req.customer_name.clone(),
            customer_email: req.customer_email.clone(),
            customer_phone: req.customer_phone.clone(),
            applications_count: req.applications_count,
            services_count: req.services_count,
            line_items: req.line_items.clone(),
            payment_metadata: json!({}),
            admin_notes: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };

        rows.insert(order.order_id.clone(), order.clone());
        Ok(order)
    }

    async fn upsert_payment(
        &self,
        req: &UpsertOrderPaymentRecord,
    ) -> Result<Order, RepositoryError> {
        if std::mem::take(&mut *self.fail_upsert.lock().unwrap()) {
            return Err(RepositoryError::Sqlx(sqlx::Error::PoolTimedOut));
        }

        let mut rows = self.rows.lock().unwrap();
        let now = Some(Utc::now());
        let previous = rows.get(&req.order_id).cloned();

        let order = Order {
            order_id: req.order_id.clone(),
            total_amount: req.total_amount,
            currency: req.currency.clone(),
            payment_status: req.payment_status.as_str().to_string(),
            payment_intent_id: Some(req.payment_intent_id.clone()),
            customer_name: req
                .customer_name
                .clone()
                .or_else(|| previous.as_ref().and_then(|o| o.customer_name.clone())),
            customer_email: req
                .customer_email
                .clone()
                .or_else(|| previous.as_ref().and_then(|o| o.customer_email.clone())),
            customer_phone: req
                .customer_phone
                .clone()
                .or_else(|| previous.as_ref().and_then(|o| o.customer_phone.clone())),
            applications_count: req.applications_count,
            services_count: req.services_count,
            line_items: req.line_items.clone(),
            payment_metadata: req.payment_metadata.clone(),
            admin_notes: previous.as_ref().and_then(|o| o.admin_notes.clone()),
            paid_at: req.paid_at.or_else(|| previous.as_ref().and_then(|o| o.paid_at)),
            created_at: previous.as_ref().and_then(|o| o.created_at).or(now),
            updated_at: now,
        };

        rows.insert(order.order_id.clone(), order.clone());
        Ok(order)
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for InMemoryOrders {
    async fn find_all(&self, req: &FindAllOrders) -> Result<(Vec<Order>, i64), RepositoryError> {
        let search = req.search.trim().to_lowercase();
        let rows = self.rows.lock().unwrap();

        let mut matching: Vec<Order> = rows
            .values()
            .filter(|order| {
                search.is_empty()
                    || order.order_id.to_lowercase().contains(&search)
                    || order
                        .customer_email
                        .as_deref()
                        .is_some_and(|email| email.to_lowercase().contains(&search))
                    || order
                        .customer_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&search))
            })
            .filter(|order| {
                req.status
                    .is_none_or(|status| order.payment_status == status.as_str())
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let (limit, offset) = page_window(req.page, req.page_size);
        let page = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, order_id: &str) -> Result<Option<Order>, RepositoryError> {
        Ok(self.get(order_id))
    }
}

/// Order items with the `(order_id, item_type, line_index)` natural key.
#[derive(Default)]
pub struct InMemoryOrderItems {
    rows: Mutex<Vec<OrderItem>>,
    fail_insert: Mutex<bool>,
}

impl InMemoryOrderItems {
    /// The next batch insert fails before writing any row.
    pub fn fail_next_insert(&self) {
        *self.fail_insert.lock().unwrap() = true;
    }

    pub fn for_order(&self, order_id: &str) -> Vec<OrderItem> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderItemCommandRepositoryTrait for InMemoryOrderItems {
    async fn insert_items(&self, items: &[CreateOrderItemRecord]) -> Result<u64, RepositoryError> {
        if std::mem::take(&mut *self.fail_insert.lock().unwrap()) {
            return Err(RepositoryError::Sqlx(sqlx::Error::PoolTimedOut));
        }

        let mut rows = self.rows.lock().unwrap();
        let mut inserted = 0;

        for item in items {
            let exists = rows.iter().any(|row| {
                row.order_id == item.order_id
                    && row.item_type == item.item_type.as_str()
                    && row.line_index == item.line_index
            });
            if exists {
                continue;
            }

            let order_item_id = rows.len() as i64 + 1;
            rows.push(OrderItem {
                order_item_id,
                order_id: item.order_id.clone(),
                item_type: item.item_type.as_str().to_string(),
                line_index: item.line_index,
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                total_price: item.total_price,
                currency: item.currency.clone(),
                metadata: item.metadata.clone(),
                created_at: Some(Utc::now()),
            });
            inserted += 1;
        }

        Ok(inserted)
    }
}

#[async_trait]
impl OrderItemQueryRepositoryTrait for InMemoryOrderItems {
    async fn find_by_order(&self, order_id: &str) -> Result<Vec<OrderItem>, RepositoryError> {
        let mut items = self.for_order(order_id);
        items.sort_by(|a, b| (&a.item_type, a.line_index).cmp(&(&b.item_type, b.line_index)));
        Ok(items)
    }
}

/// Admin rows per table, identified by their `id_column` rendered as text.
#[derive(Default)]
pub struct InMemoryAdmin {
    tables: Mutex<HashMap<&'static str, Vec<Map<String, Value>>>>,
    next_id: Mutex<i64>,
}

fn id_text(row: &Map<String, Value>, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl InMemoryAdmin {
    pub fn seed(&self, table: &'static str, row: Value) {
        if let Value::Object(row) = row {
            self.tables
                .lock()
                .unwrap()
                .entry(table)
                .or_default()
                .push(row);
        }
    }

    pub fn rows(&self, table: &str) -> Vec<Map<String, Value>> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn is_referenced(&self, entity: &AdminEntity, id: &str) -> bool {
        let tables = self.tables.lock().unwrap();
        entity.references.iter().any(|(table, column)| {
            tables.get(table).is_some_and(|rows| {
                rows.iter()
                    .any(|row| id_text(row, column).as_deref() == Some(id))
            })
        })
    }
}

#[async_trait]
impl AdminRepositoryTrait for InMemoryAdmin {
    async fn list(
        &self,
        entity: &'static AdminEntity,
        query: &AdminListQuery,
    ) -> Result<(Vec<Value>, i64), RepositoryError> {
        let search = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let status = query.status.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let matching: Vec<Value> = self
            .rows(entity.table)
            .into_iter()
            .filter(|row| {
                search.as_ref().is_none_or(|needle| {
                    entity.search_columns.iter().any(|column| {
                        row.get(*column)
                            .and_then(Value::as_str)
                            .is_some_and(|v| v.to_lowercase().contains(needle))
                    })
                })
            })
            .filter(|row| match (entity.status_column, status) {
                (Some(column), Some(wanted)) => {
                    row.get(column).and_then(Value::as_str) == Some(wanted)
                }
                _ => true,
            })
            .map(Value::Object)
            .collect();

        let total = matching.len() as i64;
        let (limit, offset) = page_window(query.page, query.page_size);
        let page = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(
        &self,
        entity: &'static AdminEntity,
        id: &str,
    ) -> Result<Option<Value>, RepositoryError> {
        Ok(self
            .rows(entity.table)
            .into_iter()
            .find(|row| id_text(row, entity.id_column).as_deref() == Some(id))
            .map(Value::Object))
    }

    async fn update(
        &self,
        entity: &'static AdminEntity,
        id: &str,
        columns: &[&'static str],
        fields: &Map<String, Value>,
    ) -> Result<Option<Value>, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables.get_mut(entity.table).and_then(|rows| {
            rows.iter_mut()
                .find(|row| id_text(row, entity.id_column).as_deref() == Some(id))
        }) else {
            return Ok(None);
        };

        for column in columns {
            if let Some(value) = fields.get(*column) {
                row.insert(column.to_string(), value.clone());
            }
        }
        row.insert("updated_at".into(), json!(Utc::now().to_rfc3339()));

        Ok(Some(Value::Object(row.clone())))
    }

    async fn create(
        &self,
        entity: &'static AdminEntity,
        columns: &[&'static str],
        fields: &Map<String, Value>,
    ) -> Result<Value, RepositoryError> {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            1000 + *next
        };

        let mut row = Map::new();
        row.insert(entity.id_column.to_string(), json!(id));
        for column in columns {
            if let Some(value) = fields.get(*column) {
                row.insert(column.to_string(), value.clone());
            }
        }

        self.tables
            .lock()
            .unwrap()
            .entry(entity.table)
            .or_default()
            .push(row.clone());

        Ok(Value::Object(row))
    }

    async fn delete(&self, entity: &'static AdminEntity, id: &str) -> Result<(), RepositoryError> {
        if self.is_referenced(entity, id) {
            return Err(RepositoryError::Conflict(format!(
                "Cannot delete {} {id}: still referenced",
                entity.name
            )));
        }

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(entity.table).or_default();
        let before = rows.len();
        rows.retain(|row| id_text(row, entity.id_column).as_deref() != Some(id));

        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Records every call instead of talking to the processor.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<CreatePaymentIntentParams>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingGateway {
    pub fn calls(&self) -> Vec<CreatePaymentIntentParams> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_next(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl PaymentGatewayTrait for RecordingGateway {
    async fn create_payment_intent(
        &self,
        params: &CreatePaymentIntentParams,
    ) -> Result<PaymentIntentResponse, ServiceError> {
        if let Some(message) = self.fail_with.lock().unwrap().take() {
            return Err(ServiceError::Processing(message));
        }

        let mut calls = self.calls.lock().unwrap();
        calls.push(params.clone());
        let id = format!("pi_test_{}", calls.len());

        Ok(PaymentIntentResponse {
            client_secret: format!("{id}_secret_abc"),
            payment_intent_id: id,
        })
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub orders: Arc<InMemoryOrders>,
    pub items: Arc<InMemoryOrderItems>,
    pub admin: Arc<InMemoryAdmin>,
    pub gateway: Arc<RecordingGateway>,
    pub jwt: DynJwtService,
    pub verifier: StripeSignatureVerifier,
}

impl TestApp {
    pub fn new() -> Self {
        let orders = Arc::new(InMemoryOrders::default());
        let items = Arc::new(InMemoryOrderItems::default());
        let admin = Arc::new(InMemoryAdmin::default());
        let gateway = Arc::new(RecordingGateway::default());
        let jwt = Arc::new(JwtConfig::new(JWT_SECRET)) as DynJwtService;

        let password_hash = bcrypt::hash(ADMIN_PASSWORD, 4).expect("hash admin password");

        let deps = DependenciesInjectDeps {
            order_command: orders.clone(),
            order_query: orders.clone(),
            order_item_command: items.clone(),
            order_item_query: items.clone(),
            admin_repository: admin.clone(),
            gateway: gateway.clone(),
            hashing: Arc::new(Hashing::new()),
            jwt: jwt.clone(),
            webhook_secret: WEBHOOK_SECRET.to_string(),
            default_currency: "usd".to_string(),
            admin: AdminConfig {
                username: ADMIN_USERNAME.to_string(),
                password_hash,
            },
        };

        Self {
            state: Arc::new(AppState::from_deps(deps)),
            orders,
            items,
            admin,
            gateway,
            jwt,
            verifier: StripeSignatureVerifier::new(WEBHOOK_SECRET),
        }
    }

    pub fn router(&self) -> Router {
        AppRouter::build(self.state.clone())
    }

    pub fn sign(&self, payload: &[u8]) -> String {
        self.verifier
            .sign(payload, Utc::now().timestamp())
            .expect("sign payload")
    }

    pub fn admin_token(&self) -> String {
        self.jwt
            .generate_token(ADMIN_USERNAME, "access")
            .expect("issue admin token")
    }

    pub async fn send(&self, request: Request<Body>) -> (u16, Value) {
        let response = self.router().oneshot(request).await.expect("router call");
        read_json(response).await
    }
}

pub async fn read_json(response: Response<Body>) -> (u16, Value) {
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

/// A Stripe-shaped `payment_intent.*` event carrying string metadata.
pub fn payment_event(
    event_id: &str,
    event_type: &str,
    intent_id: &str,
    amount_minor: i64,
    metadata: Value,
) -> Vec<u8> {
    json!({
        "id": event_id,
        "type": event_type,
        "created": Utc::now().timestamp(),
        "data": { "object": {
            "id": intent_id,
            "object": "payment_intent",
            "amount": amount_minor,
            "currency": "usd",
            "receipt_email": "owner@example.com",
            "metadata": metadata,
        }}
    })
    .to_string()
    .into_bytes()
}

/// Metadata the checkout attaches for one BVI company and one service.
pub fn checkout_metadata(order_id: &str) -> Value {
    json!({
        "order_id": order_id,
        "customer_name": "Jane Owner",
        "customer_email": "jane@example.com",
        "applications": json!([{ "jurisdictionName": "BVI", "price": 599, "companyName": "Acme Holdings" }]).to_string(),
        "standalone_services": json!([{ "serviceName": "Registered agent", "price": 150 }]).to_string(),
    })
}
