pub const ADMISSION_REVIEW_KIND: &str = "AdmissionReview";
pub const ADMISSION_API_VERSION_V1: &str = "admission.k8s.io/v1";
pub const ADMISSION_API_VERSION_V1BETA1: &str = "admission.k8s.io/v1beta1";

/// The sidecar injected into every admitted Pod. Not configurable.
pub const SIDECAR_NAME: &str = "test";
pub const SIDECAR_COMMAND: &[&str] = &["/usr/sbin/init"];
pub const SIDECAR_IMAGE: &str = "harbor.ziroom.com/public/centos:7";

/// JSON pointer appending to the Pod container list.
pub const SIDECAR_PATCH_PATH: &str = "/spec/containers/-";

pub const AUDIT_ANNOTATION_KEY: &str = "mutateme";
pub const AUDIT_ANNOTATION_VALUE: &str = "yup it did it";
