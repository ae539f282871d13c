use super::*;
use crate::test_support::ScriptedTransport;
use serde_json::json;

const INDEX_URL: &str = "http://svc/api/route/routes";

fn resolver_with(transport: ScriptedTransport) -> (IndexResolver, Arc<ScriptedTransport>) {
    let transport = Arc::new(transport);
    (IndexResolver::new(transport.clone()), transport)
}

#[tokio::test]
async fn resolves_identifiers_in_listed_order() {
    let transport = ScriptedTransport::new();
    transport.respond(INDEX_URL, json!({ "routes": [3, 1, "x-2"] }));
    let (resolver, transport) = resolver_with(transport);

    let ids = resolver
        .resolve_index(INDEX_URL, "routes")
        .await
        .expect("index");

    assert_eq!(
        ids.as_slice(),
        &[
            Identifier::Int(3),
            Identifier::Int(1),
            Identifier::Str("x-2".into())
        ]
    );
    assert_eq!(transport.requested(), vec![INDEX_URL.to_string()]);
}

#[tokio::test]
async fn missing_ids_field_degrades_to_empty_list() {
    let transport = ScriptedTransport::new();
    transport.respond(INDEX_URL, json!({ "message": "no routes yet" }));
    let (resolver, _) = resolver_with(transport);

    let ids = resolver
        .resolve_index(INDEX_URL, "routes")
        .await
        .expect("shape errors are absorbed");
    assert!(ids.is_empty());
}

#[tokio::test]
async fn malformed_ids_field_degrades_to_empty_list() {
    let transport = ScriptedTransport::new();
    transport.respond(INDEX_URL, json!({ "routes": { "1": true } }));
    let (resolver, _) = resolver_with(transport);

    let ids = resolver
        .resolve_index(INDEX_URL, "routes")
        .await
        .expect("shape errors are absorbed");
    assert_eq!(ids, IndexList::default());
}

#[tokio::test]
async fn transport_failure_propagates_without_retry() {
    let transport = ScriptedTransport::new();
    transport.fail(
        INDEX_URL,
        TransportError::Unreachable {
            url: INDEX_URL.to_string(),
            message: "dns error".to_string(),
        },
    );
    let (resolver, transport) = resolver_with(transport);

    let err = resolver
        .resolve_index(INDEX_URL, "routes")
        .await
        .expect_err("transport errors surface");
    assert!(matches!(err, TransportError::Unreachable { .. }));
    assert_eq!(err.url(), INDEX_URL);
    assert_eq!(transport.requested().len(), 1);
}

#[tokio::test]
async fn server_error_status_is_a_transport_failure() {
    let transport = ScriptedTransport::new();
    transport.fail_with_status(INDEX_URL, 503);
    let (resolver, _) = resolver_with(transport);

    let err = resolver
        .resolve_index(INDEX_URL, "routes")
        .await
        .expect_err("5xx surfaces");
    assert_eq!(
        err,
        TransportError::Status {
            url: INDEX_URL.to_string(),
            status: 503
        }
    );
}
