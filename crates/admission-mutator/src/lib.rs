extern crate k8s_openapi;

pub mod adapter;
pub mod admission_request;
pub mod admission_response;
pub mod admission_review;
pub mod constants;
pub mod errors;
pub mod sidecar;
pub mod transformer;

pub use adapter::{KubeAdapter, VersionAdapter};
pub use errors::{AdapterError, MutateError};
pub use transformer::{ReviewOutcome, ReviewTransformer};
