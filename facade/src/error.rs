use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum FacadeError {
    #[error("CSR Generation Error: {0}")]
    CsrGeneration(#[source] BoxError),
    #[error("CSR Generation Error: generator finished without a result")]
    CsrGenerationAbandoned,
    #[error("ACM PCA Error: {0}")]
    Acmpca(#[from] aws_sdk_acmpca::Error),
    #[error("ACM PCA Request Error: {0}")]
    AcmpcaBuild(#[from] aws_sdk_acmpca::error::BuildError),
    #[error("ACM Error: {0}")]
    Acm(#[from] aws_sdk_acm::Error),
    #[error("Certificate Issuance Error: {0}")]
    IssuanceWait(#[source] BoxError),
    #[error("PEM Error: {0}")]
    Pem(#[from] pem::PemError),
    #[error("Missing {0} in response")]
    MissingField(&'static str),
    #[error("Invalid {0}")]
    Invalid(&'static str),
}
