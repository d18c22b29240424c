use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_acm::{primitives::Blob, Client};
use tracing::{debug, instrument};

use super::CertificateManagerClient;
use crate::{
    error::FacadeError,
    types::{CertificateBundle, RequestCertificateRequest, RequestedCertificate},
};

#[derive(Debug, Clone)]
pub struct AcmClient {
    client: Client,
}

impl AcmClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl CertificateManagerClient for AcmClient {
    #[instrument(name = "acm::request_certificate", skip_all, fields(domain = %request.domain_name))]
    async fn request_certificate(
        &self,
        request: RequestCertificateRequest,
    ) -> Result<RequestedCertificate, FacadeError> {
        let subject_alternative_names =
            Some(request.subject_alternative_names).filter(|names| !names.is_empty());
        let output = self
            .client
            .request_certificate()
            .domain_name(request.domain_name)
            .certificate_authority_arn(request.certificate_authority_arn)
            .set_subject_alternative_names(subject_alternative_names)
            .set_idempotency_token(request.idempotency_token)
            .send()
            .await
            .map_err(aws_sdk_acm::Error::from)?;
        debug!("certificate requested: {:?}", output.certificate_arn());
        Ok(RequestedCertificate {
            certificate_arn: output
                .certificate_arn()
                .ok_or(FacadeError::MissingField("CertificateArn"))?
                .to_owned(),
        })
    }

    #[instrument(name = "acm::export_certificate", skip(self, passphrase))]
    async fn export_certificate(
        &self,
        certificate_arn: &str,
        passphrase: &str,
    ) -> Result<CertificateBundle, FacadeError> {
        let output = self
            .client
            .export_certificate()
            .certificate_arn(certificate_arn)
            .passphrase(Blob::new(passphrase.as_bytes()))
            .send()
            .await
            .map_err(aws_sdk_acm::Error::from)?;
        Ok(CertificateBundle {
            certificate: output.certificate().map(str::to_owned),
            certificate_chain: output.certificate_chain().map(str::to_owned),
            private_key: output.private_key().map(str::to_owned),
        })
    }
}
