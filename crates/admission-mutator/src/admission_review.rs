use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::admission_request::{AdmissionRequest, WireAdmissionRequest};
use crate::admission_response::{AdmissionResponse, WireAdmissionResponse};
use crate::constants::{
    ADMISSION_API_VERSION_V1, ADMISSION_API_VERSION_V1BETA1, ADMISSION_REVIEW_KIND,
};

/// The versions of the `admission.k8s.io` group this webhook speaks.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    #[serde(rename = "admission.k8s.io/v1")]
    #[default]
    V1,
    #[serde(rename = "admission.k8s.io/v1beta1")]
    V1Beta1,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => ADMISSION_API_VERSION_V1,
            ApiVersion::V1Beta1 => ADMISSION_API_VERSION_V1BETA1,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMeta {
    pub api_version: ApiVersion,
    pub kind: String,
}

impl Default for TypeMeta {
    fn default() -> Self {
        TypeMeta {
            api_version: ApiVersion::default(),
            kind: String::from(ADMISSION_REVIEW_KIND),
        }
    }
}

/// Version neutral AdmissionReview, produced and consumed by a
/// [`VersionAdapter`](crate::adapter::VersionAdapter).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdmissionReview {
    pub type_meta: TypeMeta,
    pub request: Option<AdmissionRequest>,
    pub response: Option<AdmissionResponse>,
}

impl AdmissionReview {
    pub fn new_with_response(type_meta: TypeMeta, response: AdmissionResponse) -> Self {
        AdmissionReview {
            type_meta,
            request: None,
            response: Some(response),
        }
    }
}

/// This models the admission.k8s.io AdmissionReview object as it travels
/// over the wire, both for `v1` and `v1beta1`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireAdmissionReview {
    pub api_version: ApiVersion,

    #[serde(deserialize_with = "review_kind")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<WireAdmissionRequest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<WireAdmissionResponse>,
}

/// Documents of any other kind cannot be decoded as an AdmissionReview.
fn review_kind<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let kind = String::deserialize(deserializer)?;
    if kind != ADMISSION_REVIEW_KIND {
        return Err(de::Error::invalid_value(
            de::Unexpected::Str(&kind),
            &ADMISSION_REVIEW_KIND,
        ));
    }

    Ok(kind)
}

/// The type information of a review that could not be decoded as a whole.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartialTypeMeta {
    #[serde(default)]
    pub api_version: Option<ApiVersion>,
}

impl PartialTypeMeta {
    /// Best effort lookup of the API version declared by `body`.
    pub(crate) fn api_version_of(body: &[u8]) -> ApiVersion {
        serde_json::from_slice::<PartialTypeMeta>(body)
            .ok()
            .and_then(|meta| meta.api_version)
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn build_wire_admission_review() -> WireAdmissionReview {
        let input = r#"
            {
                "apiVersion": "admission.k8s.io/v1",
                "kind": "AdmissionReview",
                "request": {
                    "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
                    "kind": {"group":"","version":"v1","kind":"Pod"},
                    "resource": {"group":"","version":"v1","resource":"pods"},
                    "name": "nginx",
                    "namespace": "default",
                    "operation": "CREATE",
                    "userInfo": {
                      "username": "admin",
                      "uid": "014fbff9a07c",
                      "groups": ["system:authenticated"]
                    },
                    "object": {
                        "apiVersion": "v1",
                        "kind": "Pod",
                        "metadata": {"name": "nginx"},
                        "spec": {"containers": [{"name": "nginx", "image": "nginx:1.27"}]}
                    },
                    "dryRun": false
                }
            }
        "#;

        serde_json::from_str(input).expect("deserialization should work")
    }

    #[test]
    fn good_input() {
        let review = build_wire_admission_review();
        assert_eq!(review.api_version, ApiVersion::V1);
        assert_eq!(review.kind, "AdmissionReview");
        assert!(review.response.is_none());

        let request = review.request.expect("request should be set");
        assert_eq!(request.uid, "705ab4f5-6393-11e8-b7cc-42010a800002");
        assert_eq!(request.name.unwrap(), "nginx");
        assert_eq!(request.namespace.unwrap(), "default");
        assert_eq!(request.operation.unwrap(), "CREATE");
        assert_eq!(request.kind.unwrap().kind, "Pod");
        assert_eq!(request.resource.unwrap().resource, "pods");
        assert_eq!(request.user_info.unwrap().username.unwrap(), "admin");
        assert!(!request.dry_run.unwrap());

        let object = request.object.expect("object should be set");
        assert_eq!(object.0.get("kind").unwrap().as_str().unwrap(), "Pod");
    }

    #[test]
    fn unknown_api_version_is_rejected() {
        let input = r#"{"apiVersion":"admission.k8s.io/v2","kind":"AdmissionReview"}"#;
        let result = serde_json::from_str::<WireAdmissionReview>(input);
        assert!(result.is_err());
    }

    #[test]
    fn other_kinds_are_rejected() {
        for kind in ["Pod", "", "admissionreview"] {
            let input = format!(r#"{{"apiVersion":"admission.k8s.io/v1","kind":"{kind}"}}"#);
            let error = serde_json::from_str::<WireAdmissionReview>(&input).unwrap_err();
            assert!(
                error.to_string().contains("expected AdmissionReview"),
                "unexpected error: {error}"
            );
        }
    }

    #[test]
    fn api_version_is_serialized_as_group_version() {
        let review = WireAdmissionReview {
            api_version: ApiVersion::V1Beta1,
            kind: String::from("AdmissionReview"),
            request: None,
            response: None,
        };

        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["apiVersion"], "admission.k8s.io/v1beta1");
        assert_eq!(value["kind"], "AdmissionReview");
        assert!(value.get("request").is_none());
        assert!(value.get("response").is_none());
    }

    #[test]
    fn api_version_of_broken_documents() {
        assert_eq!(
            PartialTypeMeta::api_version_of(br#"{"apiVersion":"admission.k8s.io/v1beta1","kind":42}"#),
            ApiVersion::V1Beta1
        );
        assert_eq!(
            PartialTypeMeta::api_version_of(br#"{"apiVersion":"apps/v1"}"#),
            ApiVersion::V1
        );
        assert_eq!(PartialTypeMeta::api_version_of(b"not json"), ApiVersion::V1);
    }
}
