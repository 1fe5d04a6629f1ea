use admission_mutator::ReviewTransformer;

pub(crate) struct ApiServerState {
    pub(crate) transformer: ReviewTransformer,
    /// Log the AdmissionReview documents received and sent
    pub(crate) verbose: bool,
}
