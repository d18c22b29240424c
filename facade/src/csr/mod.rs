mod generator;

pub use generator::{CsrError, RcgenCsrGenerator};
use tokio::sync::oneshot;
use tracing::{instrument, trace};

use crate::{
    error::{BoxError, FacadeError},
    types::{SigningRequestOptions, SigningRequestResult},
};

/// Creates certificate signing requests.
///
/// Implementations receive a [`CsrCompletion`] and report the outcome through
/// it exactly once, from any thread or task. Dropping the completion without
/// reporting is treated as a failure by the caller.
pub trait CsrGenerator: Send + Sync {
    fn create_csr(&self, options: SigningRequestOptions, completion: CsrCompletion);
}

pub struct CsrCompletion {
    sender: oneshot::Sender<Result<SigningRequestResult, BoxError>>,
}

impl CsrCompletion {
    pub fn complete(self, result: Result<SigningRequestResult, BoxError>) {
        // receiver gone means the caller stopped waiting
        let _ = self.sender.send(result);
    }
    pub fn succeed(self, result: SigningRequestResult) {
        self.complete(Ok(result))
    }
    pub fn fail(self, error: impl Into<BoxError>) {
        self.complete(Err(error.into()))
    }
}

#[instrument(name = "csr::generate", skip(generator))]
pub async fn generate_csr(
    generator: &dyn CsrGenerator,
    options: SigningRequestOptions,
) -> Result<SigningRequestResult, FacadeError> {
    let (sender, receiver) = oneshot::channel();
    generator.create_csr(options, CsrCompletion { sender });
    trace!("waiting for csr generator");
    match receiver.await {
        Ok(Ok(result)) => {
            trace!("csr generated");
            Ok(result)
        }
        Ok(Err(e)) => Err(FacadeError::CsrGeneration(e)),
        Err(_) => Err(FacadeError::CsrGenerationAbandoned),
    }
}
