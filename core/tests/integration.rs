//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port and talks to it
//! through the real `UreqTransport`, so request building, the wire, and
//! response parsing are all exercised together.

use mock_server::Store;
use tremendous::{
    ClientConfig, CreateCampaign, CreateInvoice, CreateMember, CreateOrder, CreateOrganization,
    CreateTopup, DeliveryMethod, Environment, Error, ListBalanceTransactions, ListOrders,
    ListProducts, ListRewards, ListTopups, Recipient, RewardValue, TremendousClient,
    UpdateCampaign, UreqTransport,
};

fn start(store: Store) -> TremendousClient {
    start_with_key(store, "TEST_TOKEN")
}

fn start_with_key(store: Store, api_key: &str) -> TremendousClient {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, store).await
        })
        .unwrap();
    });

    let config = ClientConfig::new(api_key, Environment::Sandbox)
        .with_base_url(format!("http://{addr}{}", mock_server::API_PREFIX));
    TremendousClient::with_transport(config, UreqTransport::new())
}

fn ada() -> Recipient {
    Recipient::new("Ada Lovelace", "ada@example.com")
}

#[test]
fn catalog_reads() {
    let client = start(Store::seeded());

    let products = client.products().list(&ListProducts::default()).unwrap();
    assert_eq!(products.len(), 3);
    let amazon = client.products().get("OKMHM2X2OHYV").unwrap();
    assert_eq!(amazon.name, "Amazon.com");
    assert_eq!(amazon.images[0].kind.as_deref(), Some("card"));

    let canadian = client
        .products()
        .list(&ListProducts {
            country: "CA".to_string(),
            currency: "CAD".to_string(),
            subcategory: None,
        })
        .unwrap();
    assert_eq!(canadian.len(), 1);
    assert!(canadian[0].documents.is_some());

    let sources = client.funding_sources().list().unwrap();
    assert_eq!(sources[0].id, "BALANCE");
    let balance = client.funding_sources().get("BALANCE").unwrap();
    assert_eq!(balance.kind.as_deref(), Some("COMMERCIAL"));

    assert_eq!(client.roles().list().unwrap().len(), 2);
    assert_eq!(client.fields().list().unwrap()[0].label.as_deref(), Some("Department"));

    let rates = client.forex().rates("USD").unwrap();
    assert_eq!(rates.rate("EUR"), Some(0.92));
    assert_eq!(rates.rate("USD"), None);
}

#[test]
fn order_lifecycle() {
    let client = start(Store::seeded());

    let request = CreateOrder::new("BALANCE", ada(), RewardValue::usd(25.0))
        .external_id("payout-1")
        .products(["OKMHM2X2OHYV"])
        .delivery_method(DeliveryMethod::Link);
    let order = client.orders().create(&request).unwrap();
    assert_eq!(order.external_id.as_deref(), Some("payout-1"));
    assert_eq!(order.status.as_deref(), Some("EXECUTED"));
    let rewards = order.rewards.clone().unwrap();
    assert_eq!(rewards.len(), 1);
    let reward_id = rewards[0].id.clone();
    assert_eq!(rewards[0].delivery.method, "LINK");
    assert_eq!(rewards[0].products[0].id, "OKMHM2X2OHYV");

    let fetched = client.orders().get(&order.id).unwrap();
    assert_eq!(fetched, order);

    let filtered = client
        .orders()
        .list(&ListOrders {
            external_id: Some("payout-1".to_string()),
            ..ListOrders::default()
        })
        .unwrap();
    assert_eq!(filtered.len(), 1);

    let rewards = client.rewards().list(&ListRewards::default()).unwrap();
    assert_eq!(rewards[0].id, reward_id);
    assert_eq!(client.rewards().get(&reward_id).unwrap().order_id, order.id);

    let link = client.rewards().generate_link(&reward_id).unwrap();
    assert!(link["reward"]["link"].as_str().unwrap().ends_with(&reward_id));
    client.rewards().resend(&reward_id).unwrap();

    let canceled = client.rewards().cancel(&reward_id).unwrap();
    assert_eq!(canceled["reward"]["delivery"]["status"], "CANCELED");
    let err = client.rewards().resend(&reward_id).unwrap_err();
    assert_eq!(err.status(), Some(422));

    let transactions = client
        .balance_transactions()
        .list(&ListBalanceTransactions::default())
        .unwrap();
    assert_eq!(transactions[0].amount, Some(-25.0));
    assert_eq!(transactions[0].order.as_ref().unwrap().id, order.id);
}

#[test]
fn duplicate_external_id_is_api_error() {
    let client = start(Store::seeded());
    let request = CreateOrder::new("BALANCE", ada(), RewardValue::usd(5.0)).external_id("once");
    client.orders().create(&request).unwrap();

    match client.orders().create(&request) {
        Err(Error::Api { status, payload }) => {
            assert_eq!(status, 409);
            let body = payload.as_json().unwrap();
            assert!(body["errors"]["message"].as_str().unwrap().contains("external_id"));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn approvals() {
    let client = start(Store::seeded().with_approvals());
    let first = client
        .orders()
        .create(&CreateOrder::new("BALANCE", ada(), RewardValue::usd(5.0)))
        .unwrap();
    let second = client
        .orders()
        .create(&CreateOrder::new("BALANCE", ada(), RewardValue::usd(6.0)))
        .unwrap();
    assert_eq!(first.status.as_deref(), Some("PENDING APPROVAL"));

    let approved = client.orders().approve(&first.id).unwrap();
    assert_eq!(approved.status.as_deref(), Some("EXECUTED"));
    let rejected = client.orders().reject(&second.id).unwrap();
    assert_eq!(rejected.status.as_deref(), Some("REJECTED"));

    assert_eq!(client.orders().approve(&second.id).unwrap_err().status(), Some(422));
}

#[test]
fn campaign_create_and_update() {
    let client = start(Store::seeded());
    let created = client
        .campaigns()
        .create(&CreateCampaign::new(
            "Holiday",
            "Year-end thanks",
            vec!["OKMHM2X2OHYV".to_string()],
        ))
        .unwrap();
    assert_eq!(created.name.as_deref(), Some("Holiday"));

    let changes = UpdateCampaign {
        description: Some("Updated".to_string()),
        ..UpdateCampaign::default()
    };
    let updated = client.campaigns().update(&created.id, &changes).unwrap();
    assert_eq!(updated.name.as_deref(), Some("Holiday"));
    assert_eq!(updated.description.as_deref(), Some("Updated"));

    assert_eq!(client.campaigns().get(&created.id).unwrap(), updated);
    assert_eq!(client.campaigns().list().unwrap().len(), 1);

    let order = client
        .orders()
        .create(&CreateOrder::new("BALANCE", ada(), RewardValue::usd(5.0)).campaign(&created.id))
        .unwrap();
    let by_campaign = client
        .orders()
        .list(&ListOrders {
            campaign_id: Some(created.id.clone()),
            ..ListOrders::default()
        })
        .unwrap();
    assert_eq!(by_campaign[0].id, order.id);
}

#[test]
fn invoice_create_and_delete() {
    let client = start(Store::seeded());
    let mut request = CreateInvoice::new(120.0);
    request.po_number = Some("PO-7".to_string());
    let invoice = client.invoices().create(&request).unwrap();
    assert_eq!(invoice.po_number.as_deref(), Some("PO-7"));
    assert_eq!(invoice.status.as_deref(), Some("OPEN"));
    assert_eq!(client.invoices().get(&invoice.id).unwrap().amount, Some(120.0));

    let deleted = client.invoices().delete(&invoice.id).unwrap();
    assert_eq!(deleted.status.as_deref(), Some("DELETED"));
    assert!(client.invoices().get(&invoice.id).unwrap_err().is_not_found());
}

#[test]
fn topups_with_same_key_are_deduplicated() {
    let client = start(Store::seeded());
    let request = CreateTopup::new(200.0, "BALANCE");
    let first = client.topups().create(&request).unwrap();
    let again = client.topups().create(&request).unwrap();
    assert_eq!(first.id, again.id);
    assert_eq!(first.idempotency_key.as_deref(), Some(request.idempotency_key.as_str()));

    assert_eq!(client.topups().list(&ListTopups::default()).unwrap().len(), 1);
    assert_eq!(client.topups().get(&first.id).unwrap(), first);
}

#[test]
fn organizations_and_members() {
    let client = start(Store::seeded());
    let org = client
        .organizations()
        .create(&CreateOrganization::new("Sub team", "https://sub.example"))
        .unwrap();
    assert_eq!(client.organizations().get(&org.id).unwrap().name.as_deref(), Some("Sub team"));
    assert_eq!(client.organizations().list().unwrap().len(), 1);
    let key = client.organizations().create_api_key().unwrap();
    assert!(key["api_key"].is_string());

    let member = client
        .members()
        .create(&CreateMember::new("grace@example.com", "MEMBER"))
        .unwrap();
    assert_eq!(member.status.as_deref(), Some("INVITED"));
    assert_eq!(client.members().get(&member.id).unwrap().email, member.email);
    assert_eq!(client.members().list().unwrap().len(), 1);

    let err = client
        .members()
        .create(&CreateMember::new("linus@example.com", "OWNER"))
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
}

#[test]
fn webhook_lifecycle() {
    let client = start(Store::seeded());
    let hook = client.webhooks().create("https://hooks.example/tremendous").unwrap();
    assert!(hook.private_key.is_some());
    assert_eq!(client.webhooks().get(&hook.id).unwrap().private_key, None);

    let events = client.webhooks().list_events(&hook.id).unwrap();
    assert!(events.events.iter().any(|e| e == "REWARDS.CANCELED"));

    let ack = client.webhooks().simulate(&hook.id, "ORDERS.CREATED").unwrap();
    assert!(ack.is_null());

    client.webhooks().delete(&hook.id).unwrap();
    assert!(client.webhooks().list().unwrap().is_empty());
    assert!(client.webhooks().get(&hook.id).unwrap_err().is_not_found());
}

#[test]
fn missing_records_are_not_found() {
    let client = start(Store::seeded());
    let err = client.orders().get("NOPE").unwrap_err();
    assert!(err.is_not_found());
    let body = err.payload().and_then(|p| p.as_json()).unwrap();
    assert_eq!(body["errors"]["message"], "Resource not found");
}

#[test]
fn blank_api_key_is_unauthorized() {
    let client = start_with_key(Store::seeded(), "");
    let err = client.roles().list().unwrap_err();
    assert_eq!(err.status(), Some(401));
}
