//! Canned backend payloads.
//!
//! JSON exactly as the installer backend sends it, for stubbing responses
//! and for decode tests.

use serde_json::{Value, json};

/// A one-disk storage snapshot: an existing ext4 partition followed by free
/// space.
pub fn storage_snapshot() -> Value {
    json!({
        "status": "DONE",
        "error_report": null,
        "disks": [{
            "id": "disk0",
            "label": "VBOX HARDDISK",
            "type": "local disk",
            "size": 10737418240u64,
            "usage_labels": [],
            "partitions": [
                {
                    "$type": "Partition",
                    "size": 1073741824u64,
                    "number": 1,
                    "preserve": true,
                    "wipe": null,
                    "annotations": ["existing"],
                    "mount": null,
                    "format": "ext4",
                    "grub_device": null,
                    "boot": false,
                    "os": null,
                    "offset": 1048576,
                    "estimated_min_size": 52428800,
                    "resize": null,
                    "path": "/dev/sda1",
                    "is_in_use": false
                },
                {
                    "$type": "Gap",
                    "offset": 1074790400u64,
                    "size": 9662627840u64,
                    "usable": "YES"
                }
            ],
            "ok_for_guided": true,
            "ptable": "gpt",
            "preserve": true,
            "path": "/dev/sda",
            "boot_device": false,
            "can_be_boot_device": true,
            "model": "VBOX HARDDISK",
            "vendor": "ATA",
            "has_in_use_partition": false
        }],
        "need_root": true,
        "need_boot": true,
        "install_minimum_size": 5368709120u64
    })
}

/// Guided storage state with a reformat and a use-gap target, and a
/// configured encrypted choice protected by `password`.
pub fn guided_storage_response(password: &str) -> Value {
    json!({
        "status": "DONE",
        "error_report": null,
        "configured": {
            "target": {
                "$type": "GuidedStorageTargetReformat",
                "disk_id": "disk0",
                "allowed": ["DIRECT", "LVM", "LVM_LUKS"],
                "disallowed": []
            },
            "capability": "LVM_LUKS",
            "password": password,
            "recovery_key": null,
            "sizing_policy": "SCALED",
            "reset_partition": false,
            "reset_partition_size": null
        },
        "targets": [
            {
                "$type": "GuidedStorageTargetReformat",
                "disk_id": "disk0",
                "allowed": ["DIRECT", "LVM", "LVM_LUKS"],
                "disallowed": [{
                    "capability": "CORE_BOOT_ENCRYPTED",
                    "reason": "CORE_BOOT_ENCRYPTION_UNAVAILABLE",
                    "message": null
                }]
            },
            {
                "$type": "GuidedStorageTargetUseGap",
                "disk_id": "disk0",
                "gap": {"$type": "Gap", "offset": 1074790400u64, "size": 9662627840u64, "usable": "YES"},
                "allowed": ["DIRECT"],
                "disallowed": []
            },
            {
                "$type": "GuidedStorageTargetManual",
                "allowed": ["MANUAL"],
                "disallowed": []
            }
        ]
    })
}

/// `GET /meta/status` in the given application state.
pub fn application_status(state: &str) -> Value {
    json!({
        "state": state,
        "confirming_tty": "",
        "error": null,
        "cloud_init_ok": true,
        "interactive": true,
        "echo_syslog_id": "subiquity_echo.1234",
        "log_syslog_id": "subiquity_log.1234",
        "event_syslog_id": "subiquity_event.1234"
    })
}

/// A three-step keyboard detection run: press a key, confirm a symbol,
/// result. Returned as `(index, step)` pairs.
pub fn keyboard_detection_steps() -> Vec<(&'static str, Value)> {
    vec![
        (
            "0",
            json!({
                "$type": "StepPressKey",
                "symbols": ["z", "y"],
                "keycodes": {"44": "1", "21": "2"}
            }),
        ),
        (
            "1",
            json!({
                "$type": "StepKeyPresent",
                "symbol": "ü",
                "yes": "3",
                "no": "4"
            }),
        ),
        (
            "3",
            json!({
                "$type": "StepResult",
                "layout": "de",
                "variant": ""
            }),
        ),
    ]
}

/// A finished snapd change with a single task.
pub fn finished_change(change_id: &str) -> Value {
    json!({
        "id": change_id,
        "kind": "refresh-snap",
        "summary": "Refresh \"subiquity\" snap",
        "status": "Done",
        "tasks": [{
            "id": "101",
            "kind": "download-snap",
            "summary": "Download snap \"subiquity\"",
            "status": "Done",
            "progress": {"label": "", "done": 1, "total": 1}
        }],
        "ready": true,
        "err": null,
        "data": null
    })
}
