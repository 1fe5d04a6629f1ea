use k8s_openapi::api::core::v1::Pod;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::adapter::{KubeAdapter, VersionAdapter};
use crate::admission_response::{AdmissionResponse, AdmissionResponseStatus, PatchType};
use crate::admission_review::{AdmissionReview, PartialTypeMeta, TypeMeta, WireAdmissionReview};
use crate::constants::{AUDIT_ANNOTATION_KEY, AUDIT_ANNOTATION_VALUE};
use crate::errors::{AdapterError, MutateError, Result};
use crate::sidecar::sidecar_patch;

/// Summary of the answer produced by [`ReviewTransformer`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub uid: String,
    pub allowed: bool,
    pub mutated: bool,
    pub message: Option<String>,
}

impl From<&AdmissionResponse> for ReviewOutcome {
    fn from(response: &AdmissionResponse) -> Self {
        ReviewOutcome {
            uid: response.uid.clone(),
            allowed: response.allowed,
            mutated: response.patch.is_some(),
            message: response
                .result
                .as_ref()
                .and_then(|status| status.message.clone()),
        }
    }
}

/// Turns the body of an AdmissionReview request into the body of the
/// AdmissionReview to send back, injecting the sidecar container.
///
/// The transformer holds no mutable state: build it once and share it
/// between requests.
#[derive(Clone, Debug, Default)]
pub struct ReviewTransformer<A = KubeAdapter> {
    adapter: A,
}

impl ReviewTransformer<KubeAdapter> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: VersionAdapter> ReviewTransformer<A> {
    pub fn with_adapter(adapter: A) -> Self {
        ReviewTransformer { adapter }
    }

    /// Process a raw AdmissionReview.
    ///
    /// A body that cannot be decoded as an AdmissionReview still produces a
    /// review, whose status message describes the decoding error. An error is
    /// returned only when the review cannot be adapted, when the admitted
    /// object is not a Pod, or when the answer cannot be serialized.
    pub fn transform(&self, body: &[u8], verbose: bool) -> Result<Vec<u8>> {
        self.transform_with_outcome(body, verbose)
            .map(|(response_body, _)| response_body)
    }

    /// Like [`transform`](Self::transform), also returning a summary of the
    /// answer so callers don't have to decode the body again.
    pub fn transform_with_outcome(
        &self,
        body: &[u8],
        verbose: bool,
    ) -> Result<(Vec<u8>, ReviewOutcome)> {
        if verbose {
            info!(body = %String::from_utf8_lossy(body), "recv");
        }

        let review = match serde_json::from_slice::<WireAdmissionReview>(body) {
            Ok(wire_review) => {
                debug!(
                    api_version = %wire_review.api_version,
                    kind = wire_review.kind.as_str(),
                    "admission review decoded"
                );
                let review = self.adapter.to_internal(wire_review)?;
                self.admit(review)?
            }
            Err(e) => {
                warn!(error = %e, "cannot decode admission review");
                let type_meta = TypeMeta {
                    api_version: PartialTypeMeta::api_version_of(body),
                    ..Default::default()
                };
                AdmissionReview::new_with_response(
                    type_meta,
                    AdmissionResponse::from_decode_error(e.to_string()),
                )
            }
        };

        let outcome = review
            .response
            .as_ref()
            .map(ReviewOutcome::from)
            .unwrap_or_default();
        let api_version = review.type_meta.api_version;
        let wire_review = self.adapter.from_internal(review, api_version);
        let response_body = serde_json::to_vec(&wire_review).map_err(MutateError::Encode)?;

        if verbose {
            info!(body = %String::from_utf8_lossy(&response_body), "resp");
        }

        Ok((response_body, outcome))
    }

    /// Admit the Pod found inside of `review`, answering with the sidecar patch.
    fn admit(&self, review: AdmissionReview) -> Result<AdmissionReview> {
        let request = review.request.ok_or(AdapterError::MissingRequest)?;

        // `null` is accepted and means there's no Pod to look at
        let pod: Option<Pod> =
            serde_json::from_slice(&request.object).map_err(MutateError::PodDecode)?;
        if let Some(pod) = &pod {
            debug!(
                request_uid = request.uid.as_str(),
                pod = pod.metadata.name.as_deref().unwrap_or_default(),
                namespace = request.namespace.as_deref().unwrap_or_default(),
                "injecting sidecar"
            );
        }

        let patch = serde_json::to_vec(&sidecar_patch().map_err(MutateError::Patch)?)
            .map_err(MutateError::Patch)?;

        let response = AdmissionResponse {
            uid: request.uid,
            allowed: true,
            patch_type: Some(PatchType::JSONPatch),
            patch: Some(patch),
            audit_annotations: BTreeMap::from([(
                AUDIT_ANNOTATION_KEY.to_owned(),
                AUDIT_ANNOTATION_VALUE.to_owned(),
            )]),
            result: Some(AdmissionResponseStatus::success()),
            warnings: Vec::new(),
        };

        Ok(AdmissionReview::new_with_response(review.type_meta, response))
    }
}
