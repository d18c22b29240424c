mod acm;
mod acmpca;
#[cfg(test)]
pub(crate) mod mock;

pub use acm::AcmClient;
pub use acmpca::{AcmPcaClient, DEFAULT_ISSUANCE_MAX_WAIT};
use async_trait::async_trait;

use crate::{
    error::FacadeError,
    types::{
        CertificateBundle, IssueCertificateRequest, IssuedCertificate, RequestCertificateRequest,
        RequestedCertificate,
    },
};

/// The private certificate authority service.
#[async_trait]
pub trait CertificateAuthorityClient: Send + Sync {
    async fn issue_certificate(
        &self,
        request: IssueCertificateRequest,
    ) -> Result<IssuedCertificate, FacadeError>;
    /// Resolves once the certificate reached the issued state. Polling and
    /// its timeout belong to the implementation.
    async fn wait_for_issued(
        &self,
        certificate_authority_arn: &str,
        certificate_arn: &str,
    ) -> Result<IssuedCertificate, FacadeError>;
    async fn get_certificate(
        &self,
        certificate_authority_arn: &str,
        certificate_arn: &str,
    ) -> Result<CertificateBundle, FacadeError>;
    async fn get_certificate_authority_certificate(
        &self,
        certificate_authority_arn: &str,
    ) -> Result<CertificateBundle, FacadeError>;
}

/// The certificate manager service that requests and exports certificates
/// on behalf of a private authority.
#[async_trait]
pub trait CertificateManagerClient: Send + Sync {
    async fn request_certificate(
        &self,
        request: RequestCertificateRequest,
    ) -> Result<RequestedCertificate, FacadeError>;
    async fn export_certificate(
        &self,
        certificate_arn: &str,
        passphrase: &str,
    ) -> Result<CertificateBundle, FacadeError>;
}
