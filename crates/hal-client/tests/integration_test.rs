use async_trait::async_trait;
use hal_client::mock::MockTransport;
use hal_client::{
    BlockingNavigator, Follow, HalError, HttpResponse, Navigator, Parameters, Payload, Resource,
    Transport,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Models ---

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Order {
    order_ref: String,
    status: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct OrderItem {
    sku: String,
    quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderAdd {
    order_ref: String,
    user_ref: u32,
}

// --- Fixtures ---

fn root_document() -> Value {
    json!({
        "version": "1.0",
        "_links": {
            "self": { "href": "/v1/version/1.0" },
            "curies": [{ "href": "/v1/docs/{rel}", "name": "ns", "templated": true }],
            "ns:order": { "href": "/v1/order{?orderRef}", "templated": true },
            "ns:order-add": { "href": "/v1/order" },
            "ns:order-edit": { "href": "/v1/order/{orderRef}", "templated": true },
            "ns:order-delete": { "href": "/v1/order/{orderRef}", "templated": true }
        }
    })
}

fn order_document() -> Value {
    json!({
        "orderRef": "123",
        "status": "AwaitingPayment",
        "_links": {
            "self": { "href": "/v1/order/123", "name": "123" },
            "ns:user": { "href": "/v1/user/1" }
        },
        "_embedded": {
            "ns:orderitem": [
                { "sku": "A", "quantity": 1, "_links": { "self": { "href": "/v1/item/A" } } },
                { "sku": "B", "quantity": 2, "_links": { "self": { "href": "/v1/item/B" } } },
                { "sku": "C", "quantity": 3, "_links": { "self": { "href": "/v1/item/C" } } }
            ]
        }
    })
}

async fn at_root(mock: &MockTransport) -> Navigator {
    mock.expect_get("").return_json(200, root_document());
    Navigator::new(mock.clone()).root().await.unwrap()
}

async fn at_order(mock: &MockTransport) -> Navigator {
    let root = at_root(mock).await;
    mock.expect_get("/v1/order?orderRef=123").return_json(200, order_document());
    root.get("order", Follow::with_curie("ns").param("orderRef", "123"))
        .await
        .unwrap()
}

// --- Navigation ---

#[tokio::test]
async fn test_templated_order_lookup() {
    let mock = MockTransport::new();
    let order = at_order(&mock).await;

    assert_eq!(order.current().len(), 1);
    assert_eq!(order.current()[0].data["orderRef"], "123");
    assert_eq!(order.current()[0].href.as_deref(), Some("/v1/order/123"));

    let typed = order.item::<Order>().unwrap();
    assert_eq!(typed.data.order_ref, "123");
    assert_eq!(typed.data.status, "AwaitingPayment");
    assert_eq!(typed.name.as_deref(), Some("123"));

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, "GET");
    assert_eq!(requests[1].uri, "/v1/order?orderRef=123");
    mock.verify();
}

#[tokio::test]
async fn test_embedded_items_need_no_request() {
    let mock = MockTransport::new();
    let order = at_order(&mock).await;
    let before = mock.requests().len();

    let items = order.get("orderitem", Follow::with_curie("ns")).await.unwrap();

    assert_eq!(mock.requests().len(), before);
    assert_eq!(items.current().len(), 3);
    assert_eq!(items.current(), &order.current()[0].embedded[..]);

    let typed = items.items::<OrderItem>().unwrap();
    let skus: Vec<_> = typed.iter().map(|item| item.data.sku.as_str()).collect();
    assert_eq!(skus, ["A", "B", "C"]);
    assert_eq!(typed[2].data.quantity, 3);
    assert_eq!(typed[0].rel.as_deref(), Some("ns:orderitem"));
}

#[tokio::test]
async fn test_link_get_issues_one_request() {
    let mock = MockTransport::new();
    let order = at_order(&mock).await;
    mock.expect_get("/v1/user/1").return_json(200, json!({ "userRef": 1 }));

    let user = order.get("user", Follow::with_curie("ns")).await.unwrap();

    assert_eq!(mock.requests().len(), 3);
    assert_eq!(user.current().len(), 1);
    assert_eq!(user.current()[0].data, json!({ "userRef": 1 }));
    mock.verify();
}

#[tokio::test]
async fn test_parameter_names_ignore_case() {
    let mock = MockTransport::new();
    let root = at_root(&mock).await;
    mock.expect_get("/v1/order?orderRef=123").return_json(200, order_document());

    let order = root
        .get("order", Follow::with_curie("ns").param("OrderRef", "123"))
        .await
        .unwrap();

    assert_eq!(order.item::<Order>().unwrap().data.order_ref, "123");
    mock.verify();
}

#[tokio::test]
async fn test_templated_link_without_parameters_fails_before_io() {
    let mock = MockTransport::new();
    let root = at_root(&mock).await;

    let get = root.get("order", Follow::with_curie("ns")).await;
    let delete = root.delete("order-delete", Follow::with_curie("ns")).await;

    assert!(matches!(get, Err(HalError::TemplateParametersRequired { ref href }) if href == "/v1/order{?orderRef}"));
    assert!(matches!(delete, Err(HalError::TemplateParametersRequired { .. })));
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_untemplated_link_ignores_parameters() {
    let mock = MockTransport::new();
    let order = at_order(&mock).await;
    mock.expect_get("/v1/user/1").return_json(200, json!({}));

    order
        .get("user", Follow::with_curie("ns").param("unused", "x"))
        .await
        .unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_unknown_relation_is_reported() {
    let mock = MockTransport::new();
    let root = at_root(&mock).await;

    let unqualified = root.get("order", Follow::new()).await;
    let missing = root.post("invoice", &json!({}), Follow::with_curie("ns")).await;

    assert!(matches!(unqualified, Err(HalError::RelationNotFound(ref rel)) if rel == "order"));
    assert!(matches!(missing, Err(HalError::RelationNotFound(ref rel)) if rel == "ns:invoice"));
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_has_agrees_with_get() {
    let mock = MockTransport::new();
    let order = at_order(&mock).await;
    let seen = mock.requests().len();

    assert!(order.has("orderitem", Some("ns")));
    assert!(order.has("user", Some("ns")));
    assert!(order.has("self", None));
    assert!(!order.has("user", None));
    assert!(!order.has("invoice", Some("ns")));
    assert_eq!(mock.requests().len(), seen);

    for (rel, curie) in [("orderitem", Some("ns")), ("user", Some("ns")), ("invoice", Some("ns")), ("user", None)] {
        let follow = match curie {
            Some(curie) => Follow::with_curie(curie),
            None => Follow::new(),
        };
        if rel == "user" && curie.is_some() {
            mock.expect_get("/v1/user/1").return_json(200, json!({}));
        }
        let result = order.get(rel, follow).await;
        assert_eq!(
            order.has(rel, curie),
            !matches!(result, Err(HalError::RelationNotFound(_))),
            "has and get disagree on {rel} / {curie:?}"
        );
    }
    mock.verify();
}

// --- Projections ---

#[tokio::test]
async fn test_item_before_navigation_has_no_active_resource() {
    let navigator = Navigator::new(MockTransport::new());

    assert!(matches!(navigator.item::<Value>(), Err(HalError::NoActiveResource)));
    assert!(navigator.items::<Value>().unwrap().is_empty());
}

#[tokio::test]
async fn test_root_then_item() {
    #[derive(Deserialize)]
    struct Version {
        version: String,
    }

    let mock = MockTransport::new();
    let root = at_root(&mock).await;

    let version = root.item::<Version>().unwrap();
    assert_eq!(version.data.version, "1.0");
    assert_eq!(version.href.as_deref(), Some("/v1/version/1.0"));
    assert_eq!(version.links.len(), 6);
}

#[tokio::test]
async fn test_item_with_wrong_shape_fails_to_decode() {
    let mock = MockTransport::new();
    let root = at_root(&mock).await;

    assert!(matches!(root.item::<Order>(), Err(HalError::DecodeFailed(_))));
}

// --- Failures ---

#[tokio::test]
async fn test_failed_request_leaves_state_reusable() {
    let mock = MockTransport::new();
    let root = at_root(&mock).await;
    let snapshot = root.current().to_vec();

    mock.expect_get("/v1/order?orderRef=999").return_status(404);
    let failed = root
        .get("order", Follow::with_curie("ns").param("orderRef", "999"))
        .await;
    assert!(matches!(failed, Err(HalError::HttpRequestFailed { status: 404 })));
    assert_eq!(root.current(), &snapshot[..]);

    mock.expect_get("/v1/order?orderRef=123").return_json(200, order_document());
    let order = root
        .get("order", Follow::with_curie("ns").param("orderRef", "123"))
        .await
        .unwrap();
    assert_eq!(order.item::<Order>().unwrap().data.order_ref, "123");
    mock.verify();
}

#[tokio::test]
async fn test_every_verb_reports_status() {
    let mock = MockTransport::new();
    let root = at_root(&mock).await;
    let follow = || Follow::with_curie("ns").param("orderRef", "1");

    mock.expect_post("/v1/order").return_status(400);
    mock.expect_put("/v1/order/1").return_status(409);
    mock.expect_patch("/v1/order/1").return_status(422);
    mock.expect_delete("/v1/order/1").return_status(500);

    let post = root.post("order-add", &json!({}), Follow::with_curie("ns")).await;
    let put = root.put("order-edit", &json!({}), follow()).await;
    let patch = root.patch("order-edit", &json!({}), follow()).await;
    let delete = root.delete("order-delete", follow()).await;

    assert!(matches!(post, Err(HalError::HttpRequestFailed { status: 400 })));
    assert!(matches!(put, Err(HalError::HttpRequestFailed { status: 409 })));
    assert!(matches!(patch, Err(HalError::HttpRequestFailed { status: 422 })));
    assert!(matches!(delete, Err(HalError::HttpRequestFailed { status: 500 })));
    mock.verify();
}

#[tokio::test]
async fn test_transport_errors_propagate() {
    let mock = MockTransport::new();
    mock.expect_get("").return_err(HalError::Transport("connection refused".into()));

    let result = Navigator::new(mock.clone()).root().await;

    assert!(matches!(result, Err(HalError::Transport(_))));
}

// --- Mutations ---

#[tokio::test]
async fn test_post_sends_encoded_payload() {
    let mock = MockTransport::new();
    let root = at_root(&mock).await;
    mock.expect_post("/v1/order").return_json(201, order_document());

    let payload = OrderAdd {
        order_ref: "123".to_string(),
        user_ref: 1,
    };
    let created = root
        .post("order-add", &payload, Follow::with_curie("ns"))
        .await
        .unwrap();

    assert_eq!(created.item::<Order>().unwrap().data.order_ref, "123");
    let request = &mock.requests()[1];
    assert_eq!(request.method, "POST");
    assert_eq!(
        request.payload.as_ref().map(|p| p.content_type.as_str()),
        Some("application/hal+json")
    );
    assert_eq!(request.json(), Some(json!({ "orderRef": "123", "userRef": 1 })));
    mock.verify();
}

#[tokio::test]
async fn test_put_patch_delete_follow_expanded_links() {
    let mock = MockTransport::new();
    let root = at_root(&mock).await;
    mock.expect_put("/v1/order/123").return_status(204);
    mock.expect_patch("/v1/order/123").return_json(200, json!({ "status": "Shipped" }));
    mock.expect_delete("/v1/order/123").return_status(204);

    let params = Parameters::new().with("orderRef", "123");
    let put = root
        .put("order-edit", &json!({ "status": "Paid" }), Follow::with_curie("ns").parameters(params.clone()))
        .await
        .unwrap();
    let patched = root
        .patch("order-edit", &json!({ "status": "Shipped" }), Follow::with_curie("ns").parameters(params.clone()))
        .await
        .unwrap();
    let deleted = root
        .delete("order-delete", Follow::with_curie("ns").parameters(params))
        .await
        .unwrap();

    assert_eq!(put.current(), &[Resource::empty()]);
    assert_eq!(patched.current()[0].data["status"], "Shipped");
    assert_eq!(deleted.current(), &[Resource::empty()]);

    let requests = mock.requests();
    assert_eq!(requests[1].json(), Some(json!({ "status": "Paid" })));
    assert_eq!(requests[3].payload, None);
    mock.verify();
}

#[tokio::test]
async fn test_mutations_never_target_embedded_resources() {
    let mock = MockTransport::new();
    let order = at_order(&mock).await;

    let result = order.post("orderitem", &json!({}), Follow::with_curie("ns")).await;

    assert!(matches!(result, Err(HalError::RelationNotFound(_))));
    assert_eq!(mock.requests().len(), 2);
}

#[tokio::test]
async fn test_parameters_from_a_struct() {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct OrderQuery {
        order_ref: String,
    }

    let mock = MockTransport::new();
    let root = at_root(&mock).await;
    mock.expect_get("/v1/order?orderRef=123").return_json(200, order_document());

    let params = Parameters::from_serialize(&OrderQuery {
        order_ref: "123".to_string(),
    })
    .unwrap();
    root.get("order", Follow::with_parameters(params).curie("ns"))
        .await
        .unwrap();
    mock.verify();
}

// --- Resolution Precedence ---

#[tokio::test]
async fn test_embedded_on_later_resource_beats_link_on_earlier() {
    let mock = MockTransport::new();
    mock.expect_get("").return_json(200, json!({
        "_embedded": {
            "page": [
                { "id": 1, "_links": { "detail": { "href": "/detail/1" } } },
                { "id": 2, "_embedded": { "detail": { "inline": true } } }
            ]
        }
    }));
    let root = Navigator::new(mock.clone()).root().await.unwrap();
    let page = root.get("page", Follow::new()).await.unwrap();
    assert_eq!(page.current().len(), 2);

    let detail = page.get("detail", Follow::new()).await.unwrap();

    assert_eq!(detail.current().len(), 1);
    assert_eq!(detail.current()[0].data, json!({ "inline": true }));
    assert_eq!(mock.requests().len(), 1);

    // Mutation only sees the link on the first resource.
    mock.expect_post("/detail/1").return_status(201);
    page.post("detail", &json!({}), Follow::new()).await.unwrap();
    mock.verify();
}

#[tokio::test]
async fn test_get_from_branches_without_touching_state() {
    let mock = MockTransport::new();
    let order = at_order(&mock).await;
    let items = order.get("orderitem", Follow::with_curie("ns")).await.unwrap();

    let second = items.items::<OrderItem>().unwrap().remove(1);
    mock.expect_get("/v1/item/B").return_json(200, json!({ "sku": "B", "quantity": 2 }));

    let detail = items.get_from(&second, "self", Follow::new()).await.unwrap();

    assert_eq!(detail.item::<OrderItem>().unwrap().data.sku, "B");
    assert_eq!(items.current().len(), 3);

    // Embedded children of the captured resource short-circuit too.
    let embedded = order
        .get_from(&order.current()[0], "orderitem", Follow::with_curie("ns"))
        .await
        .unwrap();
    assert_eq!(embedded.current().len(), 3);

    let missing = items.get_from(&second, "ns:user", Follow::new()).await;
    assert!(matches!(missing, Err(HalError::RelationNotFound(_))));
    mock.verify();
}

// --- Concurrency ---

/// Answers by URI so concurrent branches may arrive in any order.
#[derive(Default)]
struct RoutedTransport {
    routes: HashMap<String, Value>,
    calls: AtomicUsize,
}

#[async_trait]
impl Transport for RoutedTransport {
    async fn get(&self, uri: &str) -> Result<HttpResponse, HalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match self.routes.get(uri) {
            Some(body) => HttpResponse::new(200)
                .with_header("Content-Type", "application/hal+json")
                .with_body(body.to_string()),
            None => HttpResponse::new(404),
        })
    }

    async fn post(&self, _uri: &str, _payload: Payload) -> Result<HttpResponse, HalError> {
        Ok(HttpResponse::new(405))
    }

    async fn put(&self, _uri: &str, _payload: Payload) -> Result<HttpResponse, HalError> {
        Ok(HttpResponse::new(405))
    }

    async fn patch(&self, _uri: &str, _payload: Payload) -> Result<HttpResponse, HalError> {
        Ok(HttpResponse::new(405))
    }

    async fn delete(&self, _uri: &str) -> Result<HttpResponse, HalError> {
        Ok(HttpResponse::new(405))
    }
}

#[tokio::test]
async fn test_concurrent_branches_from_one_state() {
    let mut routes = HashMap::new();
    routes.insert("/v1/order/123".to_string(), order_document());
    for (sku, quantity) in [("A", 1), ("B", 2), ("C", 3)] {
        routes.insert(format!("/v1/item/{sku}"), json!({ "sku": sku, "quantity": quantity * 10 }));
    }
    let transport = Arc::new(RoutedTransport {
        routes,
        calls: AtomicUsize::new(0),
    });
    let shared: Arc<dyn Transport> = transport.clone();
    let start = Navigator::from_shared(shared, Arc::default());

    let order = start.root_at("/v1/order/123").await.unwrap();
    let items = order.get("orderitem", Follow::with_curie("ns")).await.unwrap();

    let handles: Vec<_> = items
        .current()
        .iter()
        .cloned()
        .map(|item| {
            let items = items.clone();
            tokio::spawn(async move {
                let detail = items.get_from(&item, "self", Follow::new()).await?;
                detail.item::<OrderItem>()
            })
        })
        .collect();

    let mut quantities = Vec::new();
    for handle in handles {
        quantities.push(handle.await.unwrap().unwrap().data.quantity);
    }

    assert_eq!(quantities, [10, 20, 30]);
    assert_eq!(items.current().len(), 3);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
}

// --- Blocking Adapter ---

#[test]
fn test_blocking_matches_async_results() {
    let mock = MockTransport::new();
    mock.expect_get("").return_json(200, root_document());
    mock.expect_get("/v1/order?orderRef=123").return_json(200, order_document());

    let root = BlockingNavigator::new(mock.clone()).unwrap().root().unwrap();
    let order = root
        .get("order", Follow::with_curie("ns").param("orderRef", "123"))
        .unwrap();
    let items = order.get("orderitem", Follow::with_curie("ns")).unwrap();

    assert_eq!(order.item::<Order>().unwrap().data.status, "AwaitingPayment");
    assert_eq!(items.items::<OrderItem>().unwrap().len(), 3);
    assert_eq!(mock.requests().len(), 2);
    mock.verify();
}
