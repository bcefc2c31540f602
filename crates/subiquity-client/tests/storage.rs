//! Storage flows end to end against the stub backend.

use pretty_assertions::assert_eq;
use serde_json::json;
use subiquity_client::{ClientError, Endpoint, SubiquityClient};
use subiquity_test_utils::tracing_setup::init_test_tracing;
use subiquity_test_utils::{CannedResponse, StubBackend, fixtures};
use subiquity_types::*;

fn client_for(stub: &StubBackend) -> SubiquityClient {
    init_test_tracing();
    SubiquityClient::connect(Endpoint::unix(stub.socket_path()))
}

#[tokio::test]
async fn test_add_partition_sends_tagged_body_and_returns_snapshot() {
    let stub = StubBackend::start().await;
    stub.route(
        "/storage/v2/add_partition",
        CannedResponse::json(&fixtures::storage_snapshot()),
    );
    let client = client_for(&stub);

    let gap = Gap {
        offset: 0,
        size: 1000,
        usable: GapUsable::Yes,
    };
    let partition = Partition::default().with_size(500);
    let snapshot = client
        .add_partition_v2("disk0", gap, partition)
        .await
        .unwrap();

    let request = stub.last_request();
    assert_eq!(request.method, "POST");
    let body = request.json();
    assert_eq!(body["disk_id"], json!("disk0"));
    assert_eq!(body["gap"]["$type"], json!("Gap"));
    assert_eq!(body["gap"]["offset"], json!(0));
    assert_eq!(body["gap"]["size"], json!(1000));
    assert_eq!(body["partition"]["$type"], json!("Partition"));
    assert_eq!(body["partition"]["size"], json!(500));
    assert_eq!(body["partition"]["mount"], json!(null));

    let disk = snapshot.disk("disk0").unwrap();
    assert_eq!(disk.partitions.len(), 2);
    assert_eq!(disk.iter_partitions().next().and_then(|p| p.number), Some(1));
    assert_eq!(disk.largest_gap().map(|g| g.size), Some(9662627840));
}

#[tokio::test]
async fn test_edit_partition_from_snapshot() {
    let stub = StubBackend::start().await;
    stub.route("/storage/v2", CannedResponse::json(&fixtures::storage_snapshot()));
    stub.route(
        "/storage/v2/edit_partition",
        CannedResponse::json(&fixtures::storage_snapshot()),
    );
    let client = client_for(&stub);

    let snapshot = client.storage_v2(true).await.unwrap();
    let existing = snapshot
        .disk("disk0")
        .and_then(|d| d.iter_partitions().next())
        .cloned()
        .unwrap();
    let edited = existing.clone().with_mount("/home").with_wipe("superblock");
    client.edit_partition_v2("disk0", edited).await.unwrap();

    let body = stub.last_request().json();
    assert_eq!(body["partition"]["$type"], json!("Partition"));
    assert_eq!(body["partition"]["number"], json!(1));
    assert_eq!(body["partition"]["mount"], json!("/home"));
    assert_eq!(body["partition"]["wipe"], json!("superblock"));
    // The decoded snapshot is untouched.
    assert_eq!(existing.mount, None);
}

#[tokio::test]
async fn test_reformat_and_boot_partition() {
    let stub = StubBackend::start_with_fallback(CannedResponse::json(&fixtures::storage_snapshot()))
        .await;
    let client = client_for(&stub);

    client
        .reformat_disk_v2(&ReformatDisk {
            disk_id: "disk0".to_string(),
            ptable: Some("gpt".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(
        stub.last_request().json(),
        json!({"disk_id": "disk0", "ptable": "gpt"})
    );

    client.add_boot_partition_v2("disk0").await.unwrap();
    let request = stub.last_request();
    assert_eq!(request.query.as_deref(), Some("disk_id=%22disk0%22"));
    assert_eq!(request.content_type, None);
}

#[tokio::test]
async fn test_guided_targets_decode() {
    let stub = StubBackend::start().await;
    stub.route(
        "/storage/v2/guided",
        CannedResponse::json(&fixtures::guided_storage_response("pw")),
    );
    let client = client_for(&stub);

    let guided = client.guided_storage_v2().await.unwrap();
    assert_eq!(guided.targets.len(), 3);
    assert!(matches!(guided.targets[0], GuidedStorageTarget::Reformat(_)));
    assert!(guided.targets[0].is_allowed(GuidedCapability::LvmLuks));
    match &guided.targets[1] {
        GuidedStorageTarget::UseGap(target) => assert_eq!(target.gap.size, 9662627840),
        other => panic!("unexpected target {other:?}"),
    }
    assert_eq!(guided.targets[2].disk_id(), None);
}

#[tokio::test]
async fn test_unknown_partition_kind_is_rejected() {
    let stub = StubBackend::start().await;
    let mut snapshot = fixtures::storage_snapshot();
    snapshot["disks"][0]["partitions"][1]["$type"] = json!("Hole");
    stub.route("/storage/v2", CannedResponse::json(&snapshot));
    let client = client_for(&stub);

    let err = client.storage_v2(false).await.unwrap_err();
    assert!(err.to_string().contains("Hole"));
    let decode = match err {
        ClientError::Decode(decode) => decode,
        other => panic!("unexpected error {other:?}"),
    };
    assert!(matches!(decode, DecodeError::Nested { .. }));
    match decode.root_cause() {
        DecodeError::UnknownDiscriminator { union, value, .. } => {
            assert_eq!(*union, "PartitionOrGap");
            assert_eq!(value, "Hole");
        }
        other => panic!("unexpected root cause {other:?}"),
    }
}
