use admission_mutator::{
    admission_review::{ApiVersion, WireAdmissionReview},
    admission_response::{AdmissionResponseStatusValue, PatchType},
    MutateError, ReviewTransformer,
};
use base64::{engine::general_purpose, Engine as _};
use rstest::*;
use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;

fn expected_patch() -> Value {
    json!([{
        "op": "add",
        "path": "/spec/containers/-",
        "value": {
            "name": "test",
            "command": ["/usr/sbin/init"],
            "image": "harbor.ziroom.com/public/centos:7",
        },
    }])
}

fn transform(body: &str) -> Result<WireAdmissionReview, MutateError> {
    ReviewTransformer::new()
        .transform(body.as_bytes(), false)
        .map(|body| serde_json::from_slice(&body).expect("cannot decode response"))
}

#[rstest]
#[case::v1beta1_raw_pod(
    include_str!("data/review_v1beta1_raw_pod.json"),
    ApiVersion::V1Beta1,
    "abc-123"
)]
#[case::v1_inline_pod(
    include_str!("data/review_v1_inline_pod.json"),
    ApiVersion::V1,
    "0df28fbd-5f5f-11e8-bc74-36e6bb280816"
)]
fn pod_is_admitted_with_sidecar(
    #[case] payload: &str,
    #[case] expected_api_version: ApiVersion,
    #[case] expected_uid: &str,
) {
    let review = transform(payload).expect("transformation should work");

    assert_eq!(review.api_version, expected_api_version);
    assert_eq!(review.kind, "AdmissionReview");
    assert!(review.request.is_none());

    let response = review.response.expect("response should be set");
    assert_eq!(response.uid, expected_uid);
    assert!(response.allowed);
    assert_eq!(response.patch_type, Some(PatchType::JSONPatch));
    assert_eq!(
        response.status.and_then(|status| status.status),
        Some(AdmissionResponseStatusValue::Success)
    );
    assert_eq!(
        response
            .audit_annotations
            .expect("audit annotations should be set")
            .get("mutateme")
            .map(String::as_str),
        Some("yup it did it")
    );

    let patch = general_purpose::STANDARD
        .decode(response.patch.expect("patch should be set"))
        .expect("patch should be base64 encoded");
    let patch: Value = serde_json::from_slice(&patch).expect("patch should be JSON");
    assert_eq!(patch, expected_patch());
}

#[test]
fn pod_that_is_not_json_is_a_hard_failure() {
    let result = transform(include_str!("data/review_pod_not_json.json"));

    let error = result.expect_err("transformation should fail");
    assert!(matches!(error, MutateError::PodDecode(_)));
    assert!(error
        .to_string()
        .starts_with("unable to unmarshal pod json object"));
}

#[rstest]
#[case::not_json("{\"apiVersion\": ")]
#[case::missing_kind(r#"{"apiVersion":"admission.k8s.io/v1","request":{"uid":"abc-123"}}"#)]
#[case::wrong_kind(
    r#"{"apiVersion":"admission.k8s.io/v1","kind":"Pod","request":{"uid":"a","object":{}}}"#
)]
#[case::empty_kind(
    r#"{"apiVersion":"admission.k8s.io/v1","kind":"","request":{"uid":"a","object":{}}}"#
)]
#[case::unsupported_version(
    r#"{"apiVersion":"admission.k8s.io/v2","kind":"AdmissionReview","request":{"uid":"abc-123"}}"#
)]
#[case::wrong_uid_type(
    r#"{"apiVersion":"admission.k8s.io/v1","kind":"AdmissionReview","request":{"uid":42}}"#
)]
fn undecodable_review_is_answered_with_the_error(#[case] payload: &str) {
    let decode_error = serde_json::from_str::<WireAdmissionReview>(payload)
        .expect_err("payload must not be decodable")
        .to_string();

    let review = transform(payload).expect("soft failures produce a review");

    let response = review.response.expect("response should be set");
    assert!(!response.allowed);
    assert!(response.patch.is_none());
    assert!(response.patch_type.is_none());
    assert_eq!(
        response.status.and_then(|status| status.message),
        Some(decode_error)
    );
}

#[test]
fn concurrent_transformations_share_one_transformer() {
    let transformer = Arc::new(ReviewTransformer::new());
    let payload = include_str!("data/review_v1beta1_raw_pod.json");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let transformer = Arc::clone(&transformer);
            thread::spawn(move || transformer.transform(payload.as_bytes(), false))
        })
        .collect();

    let bodies: Vec<Vec<u8>> = handles
        .into_iter()
        .map(|handle| {
            handle
                .join()
                .expect("thread panicked")
                .expect("transformation should work")
        })
        .collect();

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}
