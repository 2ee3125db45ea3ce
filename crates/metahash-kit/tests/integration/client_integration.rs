//! Integration tests for the `Metahash` client against a mock node.

use metahash_kit::*;
use num_bigint::BigInt;

use crate::common::{
    RECIPIENT, TEST_ADDRESS, TEST_PRIVATE_KEY, client_for, start_mock_node, start_routed_node,
};

fn recipient() -> Address {
    RECIPIENT.parse().unwrap()
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn test_submit_success() {
    let node = start_mock_node(200, r#"{"result":"ok","params":"c0ffee42"}"#).await;
    let client = client_for(Network::Dev, &node)
        .private_key(TEST_PRIVATE_KEY)
        .unwrap()
        .build();

    let tx = Transaction::new(recipient(), 126894, 55647, 255);
    let hash = client.submit(tx.clone()).await.unwrap();
    assert_eq!(hash.as_str(), "c0ffee42");

    let requests = node.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/");

    let json = requests[0].json();
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["method"], "mhc_send");

    let params = &json["params"];
    assert_eq!(params["to"], RECIPIENT);
    assert_eq!(params["value"], "126894");
    assert_eq!(params["fee"], "55647");
    assert_eq!(params["nonce"], "255");
    assert_eq!(params["data"], "");

    // The node can check the signature with nothing but the request.
    let public: PublicKey = params["pubkey"].as_str().unwrap().parse().unwrap();
    let signature: Signature = params["sign"].as_str().unwrap().parse().unwrap();
    let payload = tx.canonical_payload(ProtocolVersion::V1).unwrap();
    assert!(public.verify(&payload, &signature).unwrap());
    assert_eq!(public.to_hex(), client.public_key().unwrap().to_hex());
}

#[tokio::test]
async fn test_submit_rejected_is_not_retried() {
    let node = start_mock_node(200, r#"{"result":"","params":"","error":"nonce too low"}"#).await;
    let client = client_for(Network::Dev, &node)
        .signer(KeyPair::generate())
        .build();

    let err = client
        .submit(Transaction::new(recipient(), 1, 0, 0))
        .await
        .unwrap_err();

    match err {
        Error::Rpc(RpcError::Rejected { message }) => assert_eq!(message, "nonce too low"),
        other => panic!("expected Rejected, got {:?}", other),
    }
    assert_eq!(node.requests().len(), 1);
}

#[tokio::test]
async fn test_submit_http_error() {
    let node = start_mock_node(503, "maintenance").await;
    let client = client_for(Network::Prod, &node)
        .signer(KeyPair::generate())
        .build();

    let err = client
        .submit(Transaction::new(recipient(), 1, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Rpc(RpcError::Network { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_submit_negative_value_sends_nothing() {
    let node = start_mock_node(200, r#"{"result":"ok","params":"x"}"#).await;
    let client = client_for(Network::Dev, &node)
        .signer(KeyPair::generate())
        .build();

    let err = client
        .submit(Transaction::new(recipient(), -5, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Codec(_)));
    assert!(node.requests().is_empty());
}

#[tokio::test]
async fn test_submit_legacy_version_signs_zero_fee() {
    let node = start_mock_node(200, r#"{"result":"ok","params":"abc"}"#).await;
    let client = client_for(Network::Dev, &node)
        .signer(KeyPair::generate())
        .protocol_version(ProtocolVersion::V1Legacy)
        .build();

    let tx = Transaction::new(recipient(), 10, 7, 1).with_data(b"memo".to_vec());
    client.submit(tx.clone()).await.unwrap();

    let params = node.requests()[0].json()["params"].clone();
    assert_eq!(params["fee"], "7");
    assert_eq!(params["data"], hex::encode(b"memo"));

    let public: PublicKey = params["pubkey"].as_str().unwrap().parse().unwrap();
    let signature: Signature = params["sign"].as_str().unwrap().parse().unwrap();
    let legacy = tx.canonical_payload(ProtocolVersion::V1Legacy).unwrap();
    let current = tx.canonical_payload(ProtocolVersion::V1).unwrap();
    assert!(public.verify(&legacy, &signature).unwrap());
    assert!(!public.verify(&current, &signature).unwrap());
}

// =============================================================================
// Queries
// =============================================================================

#[tokio::test]
async fn test_balance_query() {
    let node = start_mock_node(
        200,
        format!(
            r#"{{"id":0,"result":{{"address":"{}","received":"1000000000000000000000","spent":250,"count_received":4,"count_spent":1,"block_number":90,"currentBlock":120}}}}"#,
            TEST_ADDRESS
        ),
    )
    .await;
    let client = client_for(Network::Dev, &node).build();

    let address: Address = TEST_ADDRESS.parse().unwrap();
    let balance = client.balance(&address).await.unwrap();

    assert_eq!(balance.address, address);
    assert_eq!(
        balance.received,
        "1000000000000000000000".parse::<BigInt>().unwrap()
    );
    assert_eq!(balance.spent, BigInt::from(250));
    assert_eq!(balance.count_received, 4);
    assert_eq!(balance.current_block, 120);

    let requests = node.requests();
    assert_eq!(requests[0].target, "/fetch-balance");
    let json = requests[0].json();
    assert_eq!(json["method"], "fetch-balance");
    assert_eq!(json["params"]["address"], TEST_ADDRESS);
    assert!(json["id"].is_u64());
}

#[tokio::test]
async fn test_history_query_with_paging() {
    let node = start_mock_node(
        200,
        format!(
            r#"{{"id":1,"result":[{{"from":"{}","to":"{}","value":"5","transaction":"aa11"}},{{"from":"{}","to":"{}","value":7,"transaction":"bb22","timestamp":1600000000}}]}}"#,
            TEST_ADDRESS, RECIPIENT, RECIPIENT, TEST_ADDRESS
        ),
    )
    .await;
    let client = client_for(Network::Dev, &node).build();

    let address: Address = TEST_ADDRESS.parse().unwrap();
    let records = client
        .history(&address)
        .begin_tx(20)
        .count_txs(2)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].hash.as_str(), "aa11");
    assert_eq!(records[0].to, recipient());
    assert_eq!(records[1].value, BigInt::from(7));
    assert_eq!(records[1].timestamp, Some(1600000000));

    let json = node.requests()[0].json();
    assert_eq!(node.requests()[0].target, "/fetch-history");
    assert_eq!(json["params"]["beginTx"], 20);
    assert_eq!(json["params"]["countTxs"], 2);
}

#[tokio::test]
async fn test_history_query_without_paging() {
    let node = start_mock_node(200, r#"{"id":1,"result":[]}"#).await;
    let client = client_for(Network::Dev, &node).build();

    let records = client
        .history(&TEST_ADDRESS.parse().unwrap())
        .await
        .unwrap();
    assert!(records.is_empty());

    let params = node.requests()[0].json()["params"].clone();
    assert!(params.get("beginTx").is_none());
    assert!(params.get("countTxs").is_none());
}

#[tokio::test]
async fn test_transaction_query() {
    let node = start_mock_node(
        200,
        format!(
            r#"{{"id":2,"result":{{"transaction":{{"from":"{}","to":"{}","value":"126894","transaction":"c0ffee42","fee":"55647","nonce":"255","data":""}}}}}}"#,
            TEST_ADDRESS, RECIPIENT
        ),
    )
    .await;
    let client = client_for(Network::Prod, &node).build();

    let record = client
        .transaction(&TxHash::new("c0ffee42"))
        .await
        .unwrap();
    assert_eq!(record.hash.as_str(), "c0ffee42");
    assert_eq!(record.value, BigInt::from(126894));
    assert_eq!(record.fee, Some(BigInt::from(55647)));
    assert_eq!(record.data, Some(vec![]));

    let request = &node.requests()[0];
    assert_eq!(request.target, "/get-tx");
    assert_eq!(request.json()["params"]["hash"], "c0ffee42");
}

#[tokio::test]
async fn test_query_error_member() {
    let node = start_mock_node(200, r#"{"id":3,"error":{"code":-1,"message":"unknown address"}}"#).await;
    let client = client_for(Network::Dev, &node).build();

    let err = client
        .balance(&TEST_ADDRESS.parse().unwrap())
        .await
        .unwrap_err();
    match err {
        Error::Rpc(RpcError::Rejected { message }) => assert_eq!(message, "unknown address"),
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_query_missing_result() {
    let node = start_mock_node(200, r#"{"id":3}"#).await;
    let client = client_for(Network::Dev, &node).build();

    let err = client
        .balance(&TEST_ADDRESS.parse().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Rpc(RpcError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_queries_and_submissions_use_their_roles() {
    let tor = start_routed_node(|_| (200, r#"{"id":0,"result":[]}"#.to_string())).await;
    let proxy = start_routed_node(|_| (200, r#"{"result":"ok","params":"h"}"#.to_string())).await;

    let client = Metahash::dev()
        .resolver(StaticResolver::new(["127.0.0.1"]))
        .tor_port(tor.port())
        .proxy_port(proxy.port())
        .signer(KeyPair::generate())
        .build();

    client
        .history(&TEST_ADDRESS.parse().unwrap())
        .await
        .unwrap();
    client
        .submit(Transaction::new(recipient(), 1, 0, 0))
        .await
        .unwrap();

    assert_eq!(tor.requests().len(), 1);
    assert_eq!(tor.requests()[0].target, "/fetch-history");
    assert_eq!(proxy.requests().len(), 1);
    assert_eq!(proxy.requests()[0].json()["method"], "mhc_send");
}

#[tokio::test]
async fn test_unresolvable_host() {
    let client = Metahash::dev()
        .resolver(StaticResolver::default())
        .build();

    let err = client
        .balance(&TEST_ADDRESS.parse().unwrap())
        .await
        .unwrap_err();
    match err {
        Error::Rpc(RpcError::CannotResolve(host)) => {
            assert_eq!(host, "tor.net-dev.metahashnetwork.com")
        }
        other => panic!("expected CannotResolve, got {:?}", other),
    }
}

// =============================================================================
// Test address registration
// =============================================================================

#[tokio::test]
async fn test_add_test_address_on_dev() {
    let node = start_mock_node(200, r#"{"result":"ok"}"#).await;
    let client = client_for(Network::Dev, &node).build();

    client
        .add_test_address(&TEST_ADDRESS.parse().unwrap())
        .await
        .unwrap();

    let requests = node.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].target,
        format!("/?act=addWallet&p_addr={}", TEST_ADDRESS)
    );
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_add_test_address_on_prod_sends_nothing() {
    let node = start_mock_node(200, r#"{"result":"ok"}"#).await;
    let client = client_for(Network::Prod, &node).build();

    let err = client
        .add_test_address(&TEST_ADDRESS.parse().unwrap())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Rpc(RpcError::UnsupportedMethod {
            network: Network::Prod,
            ..
        })
    ));
    assert!(node.requests().is_empty());
}

#[tokio::test]
async fn test_add_test_address_error_member() {
    let node = start_mock_node(200, r#"{"error":"wallet already exists"}"#).await;
    let client = client_for(Network::Dev, &node).build();

    let err = client
        .add_test_address(&TEST_ADDRESS.parse().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Rpc(RpcError::Rejected { .. })));
}
