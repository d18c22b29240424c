use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::{
    client::CertificateAuthorityClient,
    csr::{generate_csr, CsrGenerator},
    error::FacadeError,
    types::{
        CertificateAuthorityArn, CertificateBundle, IssueCertificateRequest, IssuedCertificate,
        SigningParameters, SigningRequestOptions, SigningRequestResult,
    },
};

enum IssuanceState {
    Submitted {
        submission: IssuedCertificate,
        certificate_arn: String,
    },
    Issued(IssuedCertificate),
}

/// Issues certificates by signing locally generated CSRs with a private
/// certificate authority.
#[derive(Clone)]
pub struct PcaIssuer {
    acmpca: Arc<dyn CertificateAuthorityClient>,
    csr_generator: Arc<dyn CsrGenerator>,
    ca_arn: CertificateAuthorityArn,
}

impl PcaIssuer {
    pub fn new(
        acmpca: Arc<dyn CertificateAuthorityClient>,
        csr_generator: Arc<dyn CsrGenerator>,
        ca_arn: impl Into<CertificateAuthorityArn>,
    ) -> Self {
        Self {
            acmpca,
            csr_generator,
            ca_arn: ca_arn.into(),
        }
    }

    pub fn ca_arn(&self) -> &CertificateAuthorityArn {
        &self.ca_arn
    }

    pub async fn create_csr(
        &self,
        options: SigningRequestOptions,
    ) -> Result<SigningRequestResult, FacadeError> {
        generate_csr(self.csr_generator.as_ref(), options).await
    }

    /// Submits `csr` for signing and waits until the authority reports the
    /// certificate as issued. The result holds the submission response
    /// overlaid with the final wait response.
    #[instrument(name = "pca::issue_certificate", skip(self, csr), fields(ca = %self.ca_arn))]
    pub async fn issue_certificate(
        &self,
        csr: &str,
        params: SigningParameters,
    ) -> Result<IssuedCertificate, FacadeError> {
        let mut state = self.submit(csr, params).await?;
        loop {
            state = match state {
                IssuanceState::Submitted {
                    submission,
                    certificate_arn,
                } => {
                    trace!("waiting for {} to be issued", certificate_arn);
                    let waited = self
                        .acmpca
                        .wait_for_issued(self.ca_arn.as_str(), &certificate_arn)
                        .await?;
                    IssuanceState::Issued(submission.merge(waited))
                }
                IssuanceState::Issued(result) => {
                    debug!("certificate issued: {:?}", result.certificate_arn);
                    return Ok(result);
                }
            };
        }
    }

    async fn submit(
        &self,
        csr: &str,
        params: SigningParameters,
    ) -> Result<IssuanceState, FacadeError> {
        if !csr.is_ascii() {
            return Err(FacadeError::Invalid("CSR encoding, expected ASCII"));
        }
        let request = IssueCertificateRequest {
            certificate_authority_arn: self.ca_arn.to_string(),
            csr: csr.as_bytes().to_vec(),
            signing_algorithm: params.signing_algorithm,
            validity: params.validity,
            template_arn: params.template_arn,
            idempotency_token: params.idempotency_token,
        };
        trace!("submitting issue request");
        let submission = self.acmpca.issue_certificate(request).await?;
        let certificate_arn = submission
            .certificate_arn
            .clone()
            .ok_or(FacadeError::MissingField("CertificateArn"))?;
        debug!("issue request submitted: {}", certificate_arn);
        Ok(IssuanceState::Submitted {
            submission,
            certificate_arn,
        })
    }

    #[instrument(name = "pca::get_certificate", skip(self), fields(ca = %self.ca_arn))]
    pub async fn get_certificate(
        &self,
        certificate_arn: &str,
    ) -> Result<CertificateBundle, FacadeError> {
        self.acmpca
            .get_certificate(self.ca_arn.as_str(), certificate_arn)
            .await
    }

    #[instrument(name = "pca::get_ca_certificate", skip(self), fields(ca = %self.ca_arn))]
    pub async fn get_ca_certificate(&self) -> Result<CertificateBundle, FacadeError> {
        self.acmpca
            .get_certificate_authority_certificate(self.ca_arn.as_str())
            .await
    }
}
