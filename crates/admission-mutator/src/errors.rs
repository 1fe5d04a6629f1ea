use thiserror::Error;

pub type Result<T> = std::result::Result<T, MutateError>;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("no request object defined inside AdmissionReview object")]
    MissingRequest,

    #[error("cannot read raw object: {0}")]
    RawObject(#[source] serde_json::Error),

    #[error("patch is not base64 encoded: {0}")]
    PatchEncoding(#[source] base64::DecodeError),
}

#[derive(Debug, Error)]
pub enum MutateError {
    #[error("could not convert admission review: {0}")]
    Adapter(#[from] AdapterError),

    #[error("unable to unmarshal pod json object: {0}")]
    PodDecode(#[source] serde_json::Error),

    #[error("cannot build sidecar patch: {0}")]
    Patch(#[source] serde_json::Error),

    #[error("cannot serialize admission review: {0}")]
    Encode(#[source] serde_json::Error),
}
