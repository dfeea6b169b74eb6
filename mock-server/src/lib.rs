use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const DOCUMENTS_BOUNDARY: &str = "customer-documents-boundary";

/// PNG signature; avatars are this followed by the big-endian customer id.
pub const AVATAR_PREFIX: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
}

#[derive(Default)]
pub struct Store {
    customers: BTreeMap<u64, Customer>,
    next_id: u64,
}

pub type Db = Arc<RwLock<Store>>;

type ApiError = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/customers", get(list_customers).post(create_customer))
        .route("/api/customers/export", get(export_customers))
        .route(
            "/api/customers/{id}",
            get(get_customer)
                .put(update_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
        .route("/api/customers/{id}/avatar", get(get_avatar))
        .route("/api/customers/{id}/documents", get(get_documents))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, msg: &str) -> ApiError {
    (status, Json(json!({ "msg": msg })))
}

/// Require `Authorization: Bearer <token>` with a non-empty token.
fn authorize(headers: &HeaderMap) -> Result<(), ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty());
    match token {
        Some(_) => Ok(()),
        None => Err(error(StatusCode::UNAUTHORIZED, "unauthorized")),
    }
}

async fn list_customers(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Customer>> {
    let store = db.read().await;
    let customers = store
        .customers
        .values()
        .filter(|c| params.name.as_ref().map_or(true, |n| c.name.contains(n.as_str())))
        .cloned()
        .collect();
    Json(customers)
}

async fn create_customer(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    authorize(&headers)?;
    let mut store = db.write().await;
    store.next_id += 1;
    let customer = Customer {
        id: store.next_id,
        name: input.name,
        email: input.email,
    };
    store.customers.insert(customer.id, customer.clone());
    tracing::info!(id = customer.id, "created customer");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// `Prefer: example=vip` returns a canned customer regardless of the store.
async fn get_customer(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Customer>, ApiError> {
    authorize(&headers)?;
    let prefer = headers.get("prefer").and_then(|v| v.to_str().ok());
    if prefer == Some("example=vip") {
        return Ok(Json(Customer {
            id,
            name: "Example VIP".to_string(),
            email: "vip@example.com".to_string(),
        }));
    }
    let store = db.read().await;
    store
        .customers
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "not found"))
}

async fn update_customer(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(input): Json<UpdateCustomer>,
) -> Result<Json<Customer>, ApiError> {
    authorize(&headers)?;
    let mut store = db.write().await;
    let customer = store
        .customers
        .get_mut(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "not found"))?;
    if let Some(name) = input.name {
        customer.name = name;
    }
    if let Some(email) = input.email {
        customer.email = email;
    }
    Ok(Json(customer.clone()))
}

async fn delete_customer(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    authorize(&headers)?;
    let mut store = db.write().await;
    store
        .customers
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "not found"))
}

async fn export_customers(State(db): State<Db>, headers: HeaderMap) -> Result<Response, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    let mut csv = String::from("id,name,email\n");
    for c in store.customers.values() {
        csv.push_str(&format!("{},{},{}\n", c.id, c.name, c.email));
    }
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

async fn get_avatar(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Response, ApiError> {
    authorize(&headers)?;
    if !db.read().await.customers.contains_key(&id) {
        return Err(error(StatusCode::NOT_FOUND, "not found"));
    }
    Ok(([(header::CONTENT_TYPE, "image/png")], avatar_body(id)).into_response())
}

pub fn avatar_body(id: u64) -> Vec<u8> {
    let mut png = AVATAR_PREFIX.to_vec();
    png.extend_from_slice(&id.to_be_bytes());
    png
}

async fn get_documents(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Response, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    let customer = store
        .customers
        .get(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "not found"))?;
    let body = documents_body(customer);
    let content_type = format!("multipart/form-data; boundary={DOCUMENTS_BOUNDARY}");
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

/// Two parts: a `name` text field and a `contract` file attachment.
pub fn documents_body(customer: &Customer) -> String {
    format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"name\"\r\n\r\n\
         {name}\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"contract\"; filename=\"contract-{id}.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         Contract for {email}\r\n\
         --{b}--\r\n",
        b = DOCUMENTS_BOUNDARY,
        name = customer.name,
        id = customer.id,
        email = customer.email,
    )
}
