use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::{Db, Rejection, Store};

type Params = Query<HashMap<String, String>>;
type Reply = Result<Json<Value>, Rejection>;
type Created = Result<(StatusCode, Json<Value>), Rejection>;

pub(crate) fn api() -> Router<Db> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/rewards", get(list_rewards))
        .route("/rewards/{id}", get(get_reward))
        .route("/rewards/{id}/generate_link", post(generate_link))
        .route("/rewards/{id}/resend", post(resend_reward))
        .route("/rewards/{id}/cancel", post(cancel_reward))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order))
        .route("/order_approvals/{id}/approve", post(approve_order))
        .route("/order_approvals/{id}/reject", post(reject_order))
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route("/campaigns/{id}", get(get_campaign).put(update_campaign))
        .route("/funding_sources", get(list_funding_sources))
        .route("/funding_sources/{id}", get(get_funding_source))
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/{id}", get(get_invoice).delete(delete_invoice))
        .route("/topups", get(list_topups).post(create_topup))
        .route("/topups/{id}", get(get_topup))
        .route("/balance_transactions", get(list_transactions))
        .route(
            "/organizations",
            get(list_organizations).post(create_organization),
        )
        .route("/organizations/create_api_key", post(create_api_key))
        .route("/organizations/{id}", get(get_organization))
        .route("/members", get(list_members).post(create_member))
        .route("/members/{id}", get(get_member))
        .route("/roles", get(list_roles))
        .route("/fields", get(list_fields))
        .route("/webhooks", get(list_webhooks).post(create_webhook))
        .route("/webhooks/{id}", get(get_webhook).delete(delete_webhook))
        .route("/webhooks/{id}/simulate", post(simulate_webhook))
        .route("/webhooks/{id}/events", get(webhook_events))
        .route("/forex", get(forex))
}

const WEBHOOK_EVENTS: &[&str] = &[
    "ORDERS.CREATED",
    "ORDERS.APPROVED",
    "ORDERS.DECLINED",
    "REWARDS.DELIVERY.SUCCEEDED",
    "REWARDS.DELIVERY.FAILED",
    "REWARDS.CANCELED",
];

const USD_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("CAD", 1.36),
    ("JPY", 151.2),
];

fn envelope(key: &str, value: Value) -> Json<Value> {
    let mut body = Map::new();
    body.insert(key.to_string(), value);
    Json(Value::Object(body))
}

fn created(key: &str, value: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, envelope(key, value))
}

/// Drops `null` members so optional fields are absent rather than null.
fn compact(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        map.retain(|_, v| !v.is_null());
    }
    value
}

fn find<'a>(items: &'a [Value], id: &str) -> Result<&'a Value, Rejection> {
    items
        .iter()
        .find(|item| item["id"] == id)
        .ok_or_else(Rejection::not_found)
}

fn find_mut<'a>(items: &'a mut [Value], id: &str) -> Result<&'a mut Value, Rejection> {
    items
        .iter_mut()
        .find(|item| item["id"] == id)
        .ok_or_else(Rejection::not_found)
}

fn number(params: &HashMap<String, String>, key: &str, default: usize) -> Result<usize, Rejection> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            Rejection::new(StatusCode::BAD_REQUEST, format!("{key} must be a non-negative integer"))
        }),
    }
}

fn page<'a, I>(items: I, params: &HashMap<String, String>) -> Result<Value, Rejection>
where
    I: IntoIterator<Item = &'a Value>,
{
    let offset = number(params, "offset", 0)?;
    let limit = number(params, "limit", 10)?;
    Ok(Value::Array(
        items.into_iter().skip(offset).take(limit).cloned().collect(),
    ))
}

fn in_range(item: &Value, params: &HashMap<String, String>) -> bool {
    let created_at = item["created_at"].as_str().unwrap_or_default();
    let after = params
        .get("created_at[gte]")
        .map_or(true, |gte| created_at >= gte.as_str());
    let before = params
        .get("created_at[lte]")
        .map_or(true, |lte| created_at <= lte.as_str());
    after && before
}

fn rewards(store: &Store) -> impl Iterator<Item = &Value> {
    store
        .orders
        .iter()
        .filter_map(|order| order["rewards"].as_array())
        .flatten()
}

fn reward_mut<'a>(store: &'a mut Store, id: &str) -> Result<&'a mut Value, Rejection> {
    store
        .orders
        .iter_mut()
        .filter_map(|order| order["rewards"].as_array_mut())
        .flatten()
        .find(|reward| reward["id"] == id)
        .ok_or_else(Rejection::not_found)
}

// products

async fn list_products(State(db): State<Db>, Query(params): Params) -> Json<Value> {
    let country = params.get("country").map(String::as_str).unwrap_or("US");
    let currency = params.get("currency").map(String::as_str).unwrap_or("USD");
    let subcategory = params.get("subcategory");
    let store = db.read().await;
    let products: Vec<Value> = store
        .products
        .iter()
        .filter(|p| {
            p["currency_codes"]
                .as_array()
                .is_some_and(|codes| codes.iter().any(|c| c == currency))
        })
        .filter(|p| {
            p["countries"]
                .as_array()
                .is_some_and(|cs| cs.iter().any(|c| c["abbr"] == country))
        })
        .filter(|p| subcategory.map_or(true, |s| p["subcategory"] == s.as_str()))
        .cloned()
        .collect();
    envelope("products", Value::Array(products))
}

async fn get_product(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    Ok(envelope("product", find(&store.products, &id)?.clone()))
}

// rewards

async fn list_rewards(State(db): State<Db>, Query(params): Params) -> Reply {
    let store = db.read().await;
    Ok(envelope("rewards", page(rewards(&store), &params)?))
}

async fn get_reward(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    let reward = rewards(&store)
        .find(|r| r["id"] == id.as_str())
        .ok_or_else(Rejection::not_found)?;
    Ok(envelope("reward", reward.clone()))
}

async fn generate_link(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let mut store = db.write().await;
    let reward = reward_mut(&mut store, &id)?;
    let link = format!("https://testflight.tremendous.com/rewards/payout/{id}");
    Ok(envelope("reward", json!({"id": reward["id"], "link": link})))
}

async fn resend_reward(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let mut store = db.write().await;
    let reward = reward_mut(&mut store, &id)?;
    if reward["delivery"]["status"] == "CANCELED" {
        return Err(Rejection::unprocessable("Canceled rewards cannot be resent"));
    }
    Ok(Json(json!({})))
}

async fn cancel_reward(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let mut store = db.write().await;
    let reward = reward_mut(&mut store, &id)?;
    if reward["delivery"]["status"] == "SUCCEEDED" {
        return Err(Rejection::unprocessable("Delivered rewards cannot be canceled"));
    }
    reward["delivery"]["status"] = json!("CANCELED");
    Ok(envelope("reward", reward.clone()))
}

// orders

#[derive(Deserialize)]
struct NewOrder {
    external_id: Option<String>,
    payment: NewPayment,
    reward: NewReward,
}

#[derive(Deserialize)]
struct NewPayment {
    funding_source_id: String,
}

#[derive(Deserialize)]
struct NewReward {
    campaign_id: Option<String>,
    products: Option<Vec<String>>,
    recipient: Value,
    value: NewValue,
    deliver_at: Option<String>,
    delivery: Option<NewDelivery>,
}

#[derive(Deserialize)]
struct NewValue {
    denomination: f64,
    currency_code: String,
}

#[derive(Deserialize)]
struct NewDelivery {
    method: String,
}

async fn list_orders(State(db): State<Db>, Query(params): Params) -> Reply {
    let store = db.read().await;
    let matches = store
        .orders
        .iter()
        .filter(|o| {
            params
                .get("campaign_id")
                .map_or(true, |c| o["campaign_id"] == c.as_str())
        })
        .filter(|o| {
            params
                .get("external_id")
                .map_or(true, |e| o["external_id"] == e.as_str())
        })
        .filter(|o| in_range(o, &params));
    Ok(envelope("orders", page(matches, &params)?))
}

async fn get_order(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    Ok(envelope("order", find(&store.orders, &id)?.clone()))
}

async fn create_order(State(db): State<Db>, Json(body): Json<NewOrder>) -> Created {
    let mut store = db.write().await;
    find(&store.funding_sources, &body.payment.funding_source_id)
        .map_err(|_| Rejection::unprocessable("Funding source not found"))?;
    if body.reward.value.denomination <= 0.0 {
        return Err(Rejection::unprocessable("Denomination must be positive"));
    }
    if let Some(external_id) = &body.external_id {
        if store.orders.iter().any(|o| o["external_id"] == external_id.as_str()) {
            return Err(Rejection::new(
                StatusCode::CONFLICT,
                "An order with this external_id already exists",
            ));
        }
    }
    let mut products = Vec::new();
    for product_id in body.reward.products.iter().flatten() {
        let product = find(&store.products, product_id)
            .map_err(|_| Rejection::unprocessable(format!("Unknown product {product_id}")))?;
        products.push(product.clone());
    }

    let total = body.reward.value.denomination;
    let from_balance = body.payment.funding_source_id == "BALANCE";
    if from_balance && total > store.balance {
        return Err(Rejection::unprocessable("Insufficient balance"));
    }

    let order_id = store.next_id();
    let reward_id = store.next_id();
    let created_at = store.now();
    let status = if store.approvals_required {
        "PENDING APPROVAL"
    } else {
        "EXECUTED"
    };
    let method = body
        .reward
        .delivery
        .map(|d| d.method)
        .unwrap_or_else(|| "EMAIL".to_string());
    let delivery_status = if body.reward.deliver_at.is_some() {
        "SCHEDULED"
    } else {
        "PENDING"
    };
    let reward = compact(json!({
        "id": reward_id,
        "order_id": order_id,
        "created_at": created_at,
        "campaign_id": body.reward.campaign_id,
        "value": {
            "denomination": total,
            "currency_code": body.reward.value.currency_code,
        },
        "delivery": {"method": method, "status": delivery_status},
        "recipient": body.reward.recipient,
        "products": products,
    }));
    let order = compact(json!({
        "id": order_id,
        "external_id": body.external_id,
        "campaign_id": body.reward.campaign_id,
        "created_at": created_at,
        "status": status,
        "channel": "API",
        "payment": {"subtotal": total, "total": total, "fees": 0.0, "discount": 0.0},
        "rewards": [reward],
    }));

    if from_balance {
        store.balance -= total;
        let balance = store.balance;
        store.transactions.insert(
            0,
            json!({
                "created_at": created_at,
                "amount": -total,
                "balance": balance,
                "action": "Order",
                "description": format!("Order {order_id}"),
                "order": order,
            }),
        );
    }
    store.orders.insert(0, order.clone());
    Ok(created("order", order))
}

async fn approve_order(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    decide(db, &id, "EXECUTED").await
}

async fn reject_order(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    decide(db, &id, "REJECTED").await
}

async fn decide(db: Db, id: &str, status: &str) -> Reply {
    let mut store = db.write().await;
    let order = find_mut(&mut store.orders, id)?;
    if order["status"] != "PENDING APPROVAL" {
        return Err(Rejection::unprocessable("Order is not pending approval"));
    }
    order["status"] = json!(status);
    Ok(envelope("order", order.clone()))
}

// campaigns

#[derive(Deserialize)]
struct NewCampaign {
    name: String,
    description: String,
    products: Vec<String>,
    webpage_style: Option<Value>,
    email_style: Option<Value>,
}

async fn list_campaigns(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    envelope("campaigns", Value::Array(store.campaigns.clone()))
}

async fn get_campaign(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    Ok(envelope("campaign", find(&store.campaigns, &id)?.clone()))
}

async fn create_campaign(State(db): State<Db>, Json(body): Json<NewCampaign>) -> Created {
    if body.products.is_empty() {
        return Err(Rejection::unprocessable("A campaign needs at least one product"));
    }
    let mut store = db.write().await;
    let campaign = compact(json!({
        "id": store.next_id(),
        "name": body.name,
        "description": body.description,
        "products": body.products,
        "webpage_style": body.webpage_style,
        "email_style": body.email_style,
    }));
    store.campaigns.insert(0, campaign.clone());
    Ok(created("campaign", campaign))
}

async fn update_campaign(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(changes): Json<Map<String, Value>>,
) -> Reply {
    let mut store = db.write().await;
    let campaign = find_mut(&mut store.campaigns, &id)?;
    for (key, value) in changes {
        if key != "id" && !value.is_null() {
            campaign[key.as_str()] = value;
        }
    }
    Ok(envelope("campaign", campaign.clone()))
}

// funding sources

async fn list_funding_sources(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    envelope("funding_sources", Value::Array(store.funding_sources.clone()))
}

async fn get_funding_source(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    Ok(envelope(
        "funding_source",
        find(&store.funding_sources, &id)?.clone(),
    ))
}

// invoices

#[derive(Deserialize)]
struct NewInvoice {
    amount: f64,
    po_number: Option<String>,
    memo: Option<String>,
}

async fn list_invoices(State(db): State<Db>, Query(params): Params) -> Reply {
    let store = db.read().await;
    Ok(envelope("invoices", page(&store.invoices, &params)?))
}

async fn get_invoice(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    Ok(envelope("invoice", find(&store.invoices, &id)?.clone()))
}

async fn create_invoice(State(db): State<Db>, Json(body): Json<NewInvoice>) -> Created {
    if body.amount <= 0.0 {
        return Err(Rejection::unprocessable("Amount must be positive"));
    }
    let mut store = db.write().await;
    let invoice = compact(json!({
        "id": store.next_id(),
        "amount": body.amount,
        "po_number": body.po_number,
        "memo": body.memo,
        "international": false,
        "status": "OPEN",
        "orders": [],
        "rewards": [],
        "created_at": store.now(),
    }));
    store.invoices.insert(0, invoice.clone());
    Ok(created("invoice", invoice))
}

async fn delete_invoice(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let mut store = db.write().await;
    let index = store
        .invoices
        .iter()
        .position(|i| i["id"] == id.as_str())
        .ok_or_else(Rejection::not_found)?;
    if store.invoices[index]["status"] == "PAID" {
        return Err(Rejection::unprocessable("Paid invoices cannot be deleted"));
    }
    let mut invoice = store.invoices.remove(index);
    invoice["status"] = json!("DELETED");
    Ok(envelope("invoice", invoice))
}

// topups

#[derive(Deserialize)]
struct NewTopup {
    amount: f64,
    idempotency_key: String,
    funding_source_id: String,
}

async fn list_topups(State(db): State<Db>, Query(params): Params) -> Reply {
    let store = db.read().await;
    Ok(envelope("topups", page(&store.topups, &params)?))
}

async fn get_topup(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    Ok(envelope("topup", find(&store.topups, &id)?.clone()))
}

async fn create_topup(State(db): State<Db>, Json(body): Json<NewTopup>) -> Created {
    let mut store = db.write().await;
    if let Some(existing) = store
        .topups
        .iter()
        .find(|t| t["idempotency_key"] == body.idempotency_key.as_str())
    {
        return Ok(created("topup", existing.clone()));
    }
    find(&store.funding_sources, &body.funding_source_id)
        .map_err(|_| Rejection::unprocessable("Funding source not found"))?;
    if body.amount <= 0.0 {
        return Err(Rejection::unprocessable("Amount must be positive"));
    }
    let created_at = store.now();
    let topup = json!({
        "id": store.next_id(),
        "amount": body.amount,
        "processing_fee": 0.0,
        "funding_source_id": body.funding_source_id,
        "status": "CREATED",
        "created_at": created_at,
        "idempotency_key": body.idempotency_key,
    });
    store.balance += body.amount;
    let balance = store.balance;
    store.transactions.insert(
        0,
        json!({
            "created_at": created_at,
            "amount": body.amount,
            "balance": balance,
            "action": "Topup",
            "description": "Balance top-up",
        }),
    );
    store.topups.insert(0, topup.clone());
    Ok(created("topup", topup))
}

// balance transactions

async fn list_transactions(State(db): State<Db>, Query(params): Params) -> Reply {
    let store = db.read().await;
    let matches = store.transactions.iter().filter(|t| in_range(t, &params));
    Ok(envelope("transactions", page(matches, &params)?))
}

// organizations

#[derive(Deserialize)]
struct NewOrganization {
    name: String,
    website: String,
    #[serde(default)]
    with_api_key: bool,
}

async fn list_organizations(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    envelope("organizations", Value::Array(store.organizations.clone()))
}

async fn get_organization(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    Ok(envelope(
        "organization",
        find(&store.organizations, &id)?.clone(),
    ))
}

async fn create_organization(State(db): State<Db>, Json(body): Json<NewOrganization>) -> Created {
    let mut store = db.write().await;
    let organization = json!({
        "id": store.next_id(),
        "name": body.name,
        "website": body.website,
        "status": "PENDING",
        "created_at": store.now(),
    });
    store.organizations.insert(0, organization.clone());
    let mut reply = organization;
    if body.with_api_key {
        reply["api_key"] = json!(format!("TEST_{}", store.next_id()));
    }
    Ok(created("organization", reply))
}

async fn create_api_key(State(db): State<Db>) -> Json<Value> {
    let mut store = db.write().await;
    Json(json!({"api_key": format!("TEST_{}", store.next_id())}))
}

// members

#[derive(Deserialize)]
struct NewMember {
    email: String,
    role: String,
}

async fn list_members(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    envelope("members", Value::Array(store.members.clone()))
}

async fn get_member(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    Ok(envelope("member", find(&store.members, &id)?.clone()))
}

async fn create_member(State(db): State<Db>, Json(body): Json<NewMember>) -> Created {
    let mut store = db.write().await;
    find(&store.roles, &body.role).map_err(|_| Rejection::unprocessable("Unknown role"))?;
    if store.members.iter().any(|m| m["email"] == body.email.as_str()) {
        return Err(Rejection::unprocessable("Member already exists"));
    }
    let member = json!({
        "id": store.next_id(),
        "email": body.email,
        "role": body.role,
        "active": false,
        "status": "INVITED",
        "created_at": store.now(),
    });
    store.members.insert(0, member.clone());
    Ok(created("member", member))
}

// roles and fields

async fn list_roles(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    envelope("roles", Value::Array(store.roles.clone()))
}

async fn list_fields(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    envelope("fields", Value::Array(store.fields.clone()))
}

// webhooks

#[derive(Deserialize)]
struct NewWebhook {
    url: String,
}

#[derive(Deserialize)]
struct Simulation {
    event: String,
}

async fn list_webhooks(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    envelope("webhooks", Value::Array(store.webhooks.clone()))
}

async fn get_webhook(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    Ok(envelope("webhook", find(&store.webhooks, &id)?.clone()))
}

async fn create_webhook(State(db): State<Db>, Json(body): Json<NewWebhook>) -> Created {
    if !body.url.starts_with("https://") && !body.url.starts_with("http://") {
        return Err(Rejection::unprocessable("url must be an http(s) URL"));
    }
    let mut store = db.write().await;
    let id = store.next_id();
    let webhook = json!({"id": id, "url": body.url});
    store.webhooks.insert(0, webhook.clone());
    let mut reply = webhook;
    reply["private_key"] = json!(store.next_id().to_lowercase());
    Ok(created("webhook", reply))
}

async fn delete_webhook(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let mut store = db.write().await;
    let index = store
        .webhooks
        .iter()
        .position(|w| w["id"] == id.as_str())
        .ok_or_else(Rejection::not_found)?;
    Ok(envelope("webhook", store.webhooks.remove(index)))
}

async fn simulate_webhook(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(body): Json<Simulation>,
) -> Result<StatusCode, Rejection> {
    let store = db.read().await;
    find(&store.webhooks, &id)?;
    if !WEBHOOK_EVENTS.contains(&body.event.as_str()) {
        return Err(Rejection::unprocessable(format!("Unknown event {}", body.event)));
    }
    Ok(StatusCode::OK)
}

async fn webhook_events(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let store = db.read().await;
    find(&store.webhooks, &id)?;
    Ok(Json(json!({"events": WEBHOOK_EVENTS})))
}

// forex

async fn forex(Query(params): Params) -> Reply {
    let base = params.get("base").map(String::as_str).unwrap_or("USD");
    let base_rate = USD_RATES
        .iter()
        .find(|(code, _)| *code == base)
        .map(|(_, rate)| *rate)
        .ok_or_else(|| {
            Rejection::new(StatusCode::BAD_REQUEST, format!("Unsupported base currency {base}"))
        })?;
    let rates: Map<String, Value> = USD_RATES
        .iter()
        .filter(|(code, _)| *code != base)
        .map(|(code, rate)| (code.to_string(), json!(rate / base_rate)))
        .collect();
    Ok(Json(json!({"forex": rates})))
}
