use json_patch::Patch;
use k8s_openapi::api::core::v1::Container;
use serde_json::json;

use crate::constants::{SIDECAR_COMMAND, SIDECAR_IMAGE, SIDECAR_NAME, SIDECAR_PATCH_PATH};

/// The container appended to every admitted Pod.
pub fn sidecar_container() -> Container {
    Container {
        name: SIDECAR_NAME.to_owned(),
        command: Some(SIDECAR_COMMAND.iter().map(|arg| arg.to_string()).collect()),
        image: Some(SIDECAR_IMAGE.to_owned()),
        ..Default::default()
    }
}

/// RFC 6902 document appending [`sidecar_container`] to `/spec/containers`.
pub fn sidecar_patch() -> serde_json::Result<Patch> {
    let container = serde_json::to_value(sidecar_container())?;
    serde_json::from_value(json!([{
        "op": "add",
        "path": SIDECAR_PATCH_PATH,
        "value": container,
    }]))
}
