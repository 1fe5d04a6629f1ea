//! Conversion between the wire representation of an AdmissionReview and the
//! version neutral one used by the transformer.

use base64::{engine::general_purpose, Engine as _};
use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use serde_json::Value;

use crate::admission_request::{AdmissionRequest, WireAdmissionRequest};
use crate::admission_response::{AdmissionResponse, WireAdmissionResponse};
use crate::admission_review::{AdmissionReview, ApiVersion, TypeMeta, WireAdmissionReview};
use crate::errors::AdapterError;

/// Key used by the `{"raw": "..."}` representation of an embedded object.
const RAW_OBJECT_KEY: &str = "raw";

pub trait VersionAdapter: Send + Sync {
    /// Turn a decoded wire review into its version neutral representation.
    fn to_internal(&self, review: WireAdmissionReview) -> Result<AdmissionReview, AdapterError>;

    /// Render a version neutral review using the given API version.
    fn from_internal(&self, review: AdmissionReview, api_version: ApiVersion)
        -> WireAdmissionReview;
}

/// Adapter for the `admission.k8s.io` `v1` and `v1beta1` wire formats.
#[derive(Clone, Copy, Debug, Default)]
pub struct KubeAdapter;

impl VersionAdapter for KubeAdapter {
    fn to_internal(&self, review: WireAdmissionReview) -> Result<AdmissionReview, AdapterError> {
        let request = review.request.ok_or(AdapterError::MissingRequest)?;

        let response = review.response.map(response_to_internal).transpose()?;

        Ok(AdmissionReview {
            type_meta: TypeMeta {
                api_version: review.api_version,
                kind: review.kind,
            },
            request: Some(request_to_internal(request)?),
            response,
        })
    }

    fn from_internal(
        &self,
        review: AdmissionReview,
        api_version: ApiVersion,
    ) -> WireAdmissionReview {
        WireAdmissionReview {
            api_version,
            kind: review.type_meta.kind,
            request: review.request.map(request_from_internal),
            response: review.response.map(response_from_internal),
        }
    }
}

fn request_to_internal(request: WireAdmissionRequest) -> Result<AdmissionRequest, AdapterError> {
    Ok(AdmissionRequest {
        object: raw_bytes(request.object)?,
        old_object: raw_bytes(request.old_object)?,
        uid: request.uid,
        kind: request.kind,
        resource: request.resource,
        sub_resource: request.sub_resource,
        name: request.name,
        namespace: request.namespace,
        operation: request.operation,
        user_info: request.user_info,
        dry_run: request.dry_run.unwrap_or_default(),
    })
}

fn request_from_internal(request: AdmissionRequest) -> WireAdmissionRequest {
    WireAdmissionRequest {
        object: raw_extension(&request.object),
        old_object: raw_extension(&request.old_object),
        uid: request.uid,
        kind: request.kind,
        resource: request.resource,
        sub_resource: request.sub_resource,
        name: request.name,
        namespace: request.namespace,
        operation: request.operation,
        user_info: request.user_info,
        dry_run: Some(request.dry_run),
    }
}

fn response_to_internal(response: WireAdmissionResponse) -> Result<AdmissionResponse, AdapterError> {
    let patch = response
        .patch
        .map(|patch| general_purpose::STANDARD.decode(patch))
        .transpose()
        .map_err(AdapterError::PatchEncoding)?;

    Ok(AdmissionResponse {
        uid: response.uid,
        allowed: response.allowed,
        patch_type: response.patch_type,
        patch,
        audit_annotations: response.audit_annotations.unwrap_or_default(),
        result: response.status,
        warnings: response.warnings.unwrap_or_default(),
    })
}

fn response_from_internal(response: AdmissionResponse) -> WireAdmissionResponse {
    WireAdmissionResponse {
        uid: response.uid,
        allowed: response.allowed,
        patch_type: response.patch_type,
        patch: response
            .patch
            .map(|patch| general_purpose::STANDARD.encode(patch)),
        status: response.result,
        audit_annotations: (!response.audit_annotations.is_empty())
            .then_some(response.audit_annotations),
        warnings: (!response.warnings.is_empty()).then_some(response.warnings),
    }
}

/// Extract the raw bytes of an embedded object. A missing object yields an
/// empty buffer.
fn raw_bytes(object: Option<RawExtension>) -> Result<Vec<u8>, AdapterError> {
    let Some(RawExtension(value)) = object else {
        return Ok(Vec::new());
    };

    if let Some(raw) = embedded_raw(&value) {
        return Ok(raw.as_bytes().to_vec());
    }

    serde_json::to_vec(&value).map_err(AdapterError::RawObject)
}

/// Returns the payload of a `{"raw": "<serialized object>"}` document.
fn embedded_raw(value: &Value) -> Option<&str> {
    value
        .as_object()
        .filter(|map| map.len() == 1)
        .and_then(|map| map.get(RAW_OBJECT_KEY))
        .and_then(Value::as_str)
}

/// Inline the raw bytes when they hold a JSON document, otherwise fall back to
/// the `{"raw": "..."}` representation.
fn raw_extension(raw: &[u8]) -> Option<RawExtension> {
    if raw.is_empty() {
        return None;
    }

    let value = serde_json::from_slice(raw).unwrap_or_else(|_| {
        serde_json::json!({ RAW_OBJECT_KEY: String::from_utf8_lossy(raw) })
    });
    Some(RawExtension(value))
}
