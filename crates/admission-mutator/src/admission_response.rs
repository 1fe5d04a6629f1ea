use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// PatchType is the type of patch being used to represent the mutated object
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum PatchType {
    #[serde(rename = "JSONPatch")]
    #[default]
    JSONPatch,
}

/// Values that Status.Status of an AdmissionResponse can have
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum AdmissionResponseStatusValue {
    Success,
    Failure,
}

/// Subset of the meta/v1 Status object carried by an AdmissionResponse.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct AdmissionResponseStatus {
    /// Status of the operation.
    /// One of: "Success" or "Failure".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AdmissionResponseStatusValue>,

    /// A human-readable description of the status of this operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// A machine-readable description of why this operation is in the
    /// "Failure" status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Suggested HTTP return code for this status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl AdmissionResponseStatus {
    pub fn success() -> Self {
        AdmissionResponseStatus {
            status: Some(AdmissionResponseStatusValue::Success),
            ..Default::default()
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        AdmissionResponseStatus {
            message: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Version neutral admission response.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct AdmissionResponse {
    /// Copied over from the corresponding AdmissionRequest.
    pub uid: String,

    pub allowed: bool,

    pub patch_type: Option<PatchType>,

    /// The serialized JSONPatch document, not yet encoded for the wire.
    pub patch: Option<Vec<u8>>,

    pub audit_annotations: BTreeMap<String, String>,

    /// Called `status` on the wire.
    pub result: Option<AdmissionResponseStatus>,

    pub warnings: Vec<String>,
}

impl AdmissionResponse {
    /// A response carrying only an error message, everything else is left
    /// unset. Used when the incoming review cannot be decoded.
    pub fn from_decode_error(message: impl Into<String>) -> Self {
        AdmissionResponse {
            result: Some(AdmissionResponseStatus::with_message(message)),
            ..Default::default()
        }
    }
}

/// This models the admission/v1 AdmissionResponse object of Kubernetes
/// See https://pkg.go.dev/k8s.io/kubernetes/pkg/apis/admission#AdmissionResponse
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireAdmissionResponse {
    /// UID is an identifier for the individual request/response.
    pub uid: String,

    /// Allowed indicates whether or not the admission request was permitted.
    pub allowed: bool,

    /// The type of Patch. Currently we only allow "JSONPatch".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,

    /// The base64 encoded patch body, implementing RFC 6902.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,

    /// Result contains extra details into why an admission request was denied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AdmissionResponseStatus>,

    /// AuditAnnotations is an unstructured key value map set by remote admission controller.
    /// The API server prefixes the keys with the admission webhook name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_annotations: Option<BTreeMap<String, String>>,

    /// Warning messages to return to the requesting API client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}
