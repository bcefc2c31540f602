//! Every client operation hits the right verb and path, and reports a
//! backend failure as a status error.

use std::future::Future;

use pretty_assertions::assert_eq;
use subiquity_client::{ClientError, Endpoint, SubiquityClient};
use subiquity_test_utils::{CannedResponse, StubBackend};
use subiquity_types::*;

async fn assert_boom<T, F>(stub: &StubBackend, method: &str, path: &str, call: F)
where
    T: std::fmt::Debug,
    F: Future<Output = Result<T, ClientError>>,
{
    match call.await {
        Err(ClientError::Status { status, body, .. }) => {
            assert_eq!(status, 500, "{method} {path}");
            assert_eq!(body, "boom", "{method} {path}");
        }
        other => panic!("{method} {path}: expected status error, got {other:?}"),
    }
    let request = stub.last_request();
    assert_eq!(request.method, method);
    assert_eq!(request.path, path);
}

fn sample_gap() -> Gap {
    Gap {
        offset: 0,
        size: 1000,
        usable: GapUsable::Yes,
    }
}

fn manual_choice() -> GuidedChoiceV2 {
    GuidedChoiceV2::new(
        GuidedStorageTarget::Manual(GuidedStorageTargetManual::default()),
        GuidedCapability::Manual,
    )
}

#[test_log::test(tokio::test)]
async fn test_every_operation_reports_backend_failure() {
    let stub = StubBackend::start_with_fallback(CannedResponse::status(500, "boom")).await;
    let c = SubiquityClient::connect(Endpoint::unix(stub.socket_path()));
    let s = &stub;

    // meta
    assert_boom(s, "GET", "/meta/status", c.status(None)).await;
    assert_boom(s, "GET", "/meta/client_variant", c.variant()).await;
    assert_boom(s, "POST", "/meta/client_variant", c.set_variant(ClientVariant::Server)).await;
    assert_boom(s, "POST", "/meta/mark_configured", c.mark_configured(&["network"])).await;
    assert_boom(s, "POST", "/meta/confirm", c.confirm("/dev/tty1")).await;
    assert_boom(s, "POST", "/shutdown", c.shutdown(ShutdownMode::Reboot, false)).await;

    // locale and keyboard
    let setting = KeyboardSetting::new("us", "");
    assert_boom(s, "GET", "/locale", c.locale()).await;
    assert_boom(s, "POST", "/locale", c.set_locale("en_US.UTF-8")).await;
    assert_boom(s, "GET", "/keyboard", c.keyboard()).await;
    assert_boom(s, "POST", "/keyboard", c.set_keyboard(&setting)).await;
    assert_boom(
        s,
        "POST",
        "/keyboard/input_source",
        c.set_input_source(&setting, Some("ubuntu")),
    )
    .await;
    assert_boom(s, "GET", "/keyboard/steps", c.keyboard_step("0")).await;

    // source, network, proxy, mirror
    assert_boom(s, "GET", "/source", c.source()).await;
    assert_boom(s, "POST", "/source", c.set_source("ubuntu-server", true)).await;
    assert_boom(s, "GET", "/network", c.network()).await;
    assert_boom(s, "GET", "/network/has_network", c.has_network()).await;
    assert_boom(s, "GET", "/proxy", c.proxy()).await;
    assert_boom(s, "POST", "/proxy", c.set_proxy("http://proxy:3128")).await;
    assert_boom(s, "GET", "/mirror", c.mirror()).await;
    assert_boom(
        s,
        "POST",
        "/mirror",
        c.set_mirror(&MirrorPost::elect("http://archive.ubuntu.com/ubuntu")),
    )
    .await;

    // time zone, identity, ssh
    assert_boom(s, "GET", "/timezone", c.timezone()).await;
    assert_boom(s, "POST", "/timezone", c.set_timezone("Europe/Paris")).await;
    assert_boom(s, "GET", "/identity", c.identity()).await;
    assert_boom(s, "POST", "/identity", c.set_identity(&IdentityData::default())).await;
    assert_boom(
        s,
        "GET",
        "/identity/validate_username",
        c.validate_username("alice"),
    )
    .await;
    assert_boom(s, "GET", "/ssh", c.ssh()).await;
    assert_boom(s, "POST", "/ssh", c.set_ssh(&SshData::default())).await;

    // storage
    let partition = Partition::default().with_size(500);
    let reformat = ReformatDisk {
        disk_id: "disk0".to_string(),
        ptable: None,
    };
    assert_boom(s, "GET", "/storage/v2", c.storage_v2(false)).await;
    assert_boom(s, "GET", "/storage/v2/orig_config", c.original_storage_v2()).await;
    assert_boom(s, "POST", "/storage/v2", c.set_storage_v2()).await;
    assert_boom(s, "POST", "/storage/v2/reset", c.reset_storage_v2()).await;
    assert_boom(s, "GET", "/storage/v2/guided", c.guided_storage_v2()).await;
    assert_boom(
        s,
        "POST",
        "/storage/v2/guided",
        c.set_guided_storage_v2(&manual_choice()),
    )
    .await;
    assert_boom(
        s,
        "POST",
        "/storage/v2/add_partition",
        c.add_partition_v2("disk0", sample_gap(), partition.clone()),
    )
    .await;
    assert_boom(
        s,
        "POST",
        "/storage/v2/edit_partition",
        c.edit_partition_v2("disk0", partition.clone()),
    )
    .await;
    assert_boom(
        s,
        "POST",
        "/storage/v2/delete_partition",
        c.delete_partition_v2("disk0", partition),
    )
    .await;
    assert_boom(
        s,
        "POST",
        "/storage/v2/reformat_disk",
        c.reformat_disk_v2(&reformat),
    )
    .await;
    assert_boom(
        s,
        "POST",
        "/storage/v2/add_boot_partition",
        c.add_boot_partition_v2("disk0"),
    )
    .await;
    assert_boom(s, "GET", "/storage/has_rst", c.has_rst()).await;
    assert_boom(s, "GET", "/storage/has_bitlocker", c.has_bitlocker()).await;

    // refresh
    assert_boom(s, "GET", "/refresh", c.check_refresh(false)).await;
    assert_boom(s, "POST", "/refresh", c.start_refresh()).await;
    assert_boom(s, "GET", "/refresh/progress", c.refresh_progress("7")).await;

    // drivers, codecs, Ubuntu Pro
    assert_boom(s, "GET", "/drivers", c.drivers(false)).await;
    assert_boom(s, "POST", "/drivers", c.set_drivers(true)).await;
    assert_boom(s, "GET", "/codecs", c.codecs()).await;
    assert_boom(s, "POST", "/codecs", c.set_codecs(true)).await;
    assert_boom(s, "GET", "/ubuntu_pro", c.ubuntu_pro()).await;
    assert_boom(s, "POST", "/ubuntu_pro", c.set_ubuntu_pro("C123")).await;
    assert_boom(
        s,
        "GET",
        "/ubuntu_pro/check_token",
        c.check_ubuntu_pro_token("C123"),
    )
    .await;

    // Active Directory
    assert_boom(
        s,
        "GET",
        "/active_directory/has_support",
        c.has_active_directory_support(),
    )
    .await;
    assert_boom(s, "GET", "/active_directory", c.active_directory()).await;
    assert_boom(
        s,
        "POST",
        "/active_directory",
        c.set_active_directory(&AdConnectionInfo::default()),
    )
    .await;
    assert_boom(
        s,
        "POST",
        "/active_directory/check_domain_name",
        c.check_ad_domain_name("corp.example.com"),
    )
    .await;
    assert_boom(
        s,
        "POST",
        "/active_directory/check_admin_name",
        c.check_ad_admin_name("Administrator"),
    )
    .await;
    assert_boom(
        s,
        "POST",
        "/active_directory/check_password",
        c.check_ad_password("hunter2"),
    )
    .await;
    assert_boom(
        s,
        "GET",
        "/active_directory/join_result",
        c.ad_join_result(true),
    )
    .await;
}

#[test_log::test(tokio::test)]
async fn test_void_operations_accept_any_success_body() {
    let stub = StubBackend::start().await;
    let client = SubiquityClient::connect(Endpoint::unix(stub.socket_path()));

    client.confirm("/dev/tty1").await.unwrap();
    client.set_codecs(false).await.unwrap();
    client
        .shutdown(ShutdownMode::Poweroff, true)
        .await
        .unwrap();

    let request = stub.last_request();
    assert_eq!(
        request.query.as_deref(),
        Some("mode=%22POWEROFF%22&immediate=true")
    );
}

#[test_log::test(tokio::test)]
async fn test_query_parameters_of_misc_operations() {
    let stub = StubBackend::start().await;
    let client = SubiquityClient::connect(Endpoint::unix(stub.socket_path()));

    client.set_timezone("Europe/Paris").await.unwrap();
    assert_eq!(
        stub.last_request().query.as_deref(),
        Some("tz=%22Europe%2FParis%22")
    );

    client.set_source("ubuntu-desktop-minimal", false).await.unwrap();
    assert_eq!(
        stub.last_request().query.as_deref(),
        Some("source_id=%22ubuntu-desktop-minimal%22&search_drivers=false")
    );

    client
        .set_input_source(&KeyboardSetting::new("fr", "azerty"), None)
        .await
        .unwrap();
    let request = stub.last_request();
    assert_eq!(request.query, None);
    assert_eq!(
        request.json(),
        serde_json::json!({"layout": "fr", "variant": "azerty", "toggle": null})
    );
}

#[test_log::test(tokio::test)]
async fn test_typed_responses() {
    let stub = StubBackend::start().await;
    stub.route("/meta/client_variant", CannedResponse::ok(r#""desktop""#));
    stub.route("/refresh", CannedResponse::ok(r#""1234""#));
    stub.route(
        "/active_directory/check_domain_name",
        CannedResponse::ok(r#"["START_DOT", "REALM_NOT_FOUND"]"#),
    );
    stub.route(
        "/refresh/progress",
        CannedResponse::json(&subiquity_test_utils::fixtures::finished_change("1234")),
    );
    let client = SubiquityClient::connect(Endpoint::unix(stub.socket_path()));

    assert_eq!(client.variant().await.unwrap(), ClientVariant::Desktop);
    assert_eq!(client.start_refresh().await.unwrap(), "1234");
    assert_eq!(
        client.check_ad_domain_name(".corp").await.unwrap(),
        vec![
            AdDomainNameValidation::StartDot,
            AdDomainNameValidation::RealmNotFound
        ]
    );

    let change = client.refresh_progress("1234").await.unwrap();
    assert!(change.ready);
    assert_eq!(change.status, TaskStatus::Done);
    assert_eq!(
        stub.last_request().query.as_deref(),
        Some("change_id=%221234%22")
    );
}

#[test_log::test(tokio::test)]
async fn test_unknown_enum_value_is_a_decode_error() {
    let stub = StubBackend::start().await;
    stub.route(
        "/identity/validate_username",
        CannedResponse::ok(r#""TOO_FANCY""#),
    );
    let client = SubiquityClient::connect(Endpoint::unix(stub.socket_path()));

    let err = client.validate_username("root").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(DecodeError::Shape { .. })));
}
