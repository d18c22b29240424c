use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_acmpca::{
    client::Waiters,
    operation::get_certificate::GetCertificateOutput,
    primitives::Blob,
    types::{SigningAlgorithm, Validity, ValidityPeriodType},
    Client,
};
use tracing::{debug, instrument, trace};

use super::CertificateAuthorityClient;
use crate::{
    error::FacadeError,
    types::{CertificateBundle, IssueCertificateRequest, IssuedCertificate},
};

/// Budget of the stock certificateIssued waiter: 60 polls, one second apart.
pub const DEFAULT_ISSUANCE_MAX_WAIT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct AcmPcaClient {
    client: Client,
    max_wait: Duration,
}

impl AcmPcaClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_wait: DEFAULT_ISSUANCE_MAX_WAIT,
        }
    }
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

fn bundle(certificate: Option<&str>, certificate_chain: Option<&str>) -> CertificateBundle {
    CertificateBundle {
        certificate: certificate.map(str::to_owned),
        certificate_chain: certificate_chain.map(str::to_owned),
        private_key: None,
    }
}

fn issued<E>(
    final_poll: Result<GetCertificateOutput, E>,
) -> Result<IssuedCertificate, FacadeError>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let output = final_poll.map_err(|e| FacadeError::IssuanceWait(Box::new(e)))?;
    Ok(IssuedCertificate {
        certificate_arn: None,
        certificate: output.certificate().map(str::to_owned),
        certificate_chain: output.certificate_chain().map(str::to_owned),
    })
}

#[async_trait]
impl CertificateAuthorityClient for AcmPcaClient {
    #[instrument(name = "acmpca::issue_certificate", skip_all)]
    async fn issue_certificate(
        &self,
        request: IssueCertificateRequest,
    ) -> Result<IssuedCertificate, FacadeError> {
        let validity = Validity::builder()
            .r#type(ValidityPeriodType::from(request.validity.kind.as_str()))
            .value(request.validity.value)
            .build()?;
        let output = self
            .client
            .issue_certificate()
            .certificate_authority_arn(request.certificate_authority_arn)
            .csr(Blob::new(request.csr))
            .signing_algorithm(SigningAlgorithm::from(request.signing_algorithm.as_str()))
            .validity(validity)
            .set_template_arn(request.template_arn)
            .set_idempotency_token(request.idempotency_token)
            .send()
            .await
            .map_err(aws_sdk_acmpca::Error::from)?;
        debug!("issue request accepted: {:?}", output.certificate_arn());
        Ok(IssuedCertificate {
            certificate_arn: output.certificate_arn().map(str::to_owned),
            ..Default::default()
        })
    }

    #[instrument(name = "acmpca::wait_for_issued", skip(self))]
    async fn wait_for_issued(
        &self,
        certificate_authority_arn: &str,
        certificate_arn: &str,
    ) -> Result<IssuedCertificate, FacadeError> {
        trace!("waiting up to {:?}", self.max_wait);
        let final_poll = self
            .client
            .wait_until_certificate_issued()
            .certificate_authority_arn(certificate_authority_arn)
            .certificate_arn(certificate_arn)
            .wait(self.max_wait)
            .await
            .map_err(|e| FacadeError::IssuanceWait(Box::new(e)))?;
        trace!("certificate issued");
        issued(final_poll.into_result())
    }

    #[instrument(name = "acmpca::get_certificate", skip(self))]
    async fn get_certificate(
        &self,
        certificate_authority_arn: &str,
        certificate_arn: &str,
    ) -> Result<CertificateBundle, FacadeError> {
        let output = self
            .client
            .get_certificate()
            .certificate_authority_arn(certificate_authority_arn)
            .certificate_arn(certificate_arn)
            .send()
            .await
            .map_err(aws_sdk_acmpca::Error::from)?;
        Ok(bundle(output.certificate(), output.certificate_chain()))
    }

    #[instrument(name = "acmpca::get_certificate_authority_certificate", skip(self))]
    async fn get_certificate_authority_certificate(
        &self,
        certificate_authority_arn: &str,
    ) -> Result<CertificateBundle, FacadeError> {
        let output = self
            .client
            .get_certificate_authority_certificate()
            .certificate_authority_arn(certificate_authority_arn)
            .send()
            .await
            .map_err(aws_sdk_acmpca::Error::from)?;
        Ok(bundle(output.certificate(), output.certificate_chain()))
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_acmpca::config::{BehaviorVersion, Credentials, Region};
    use aws_smithy_http_client::test_util::{capture_request, CaptureRequestReceiver};
    use serde_json::{json, Value};

    use super::*;
    use crate::types::{
        SigningAlgorithm as Algorithm, Validity as Period, ValidityPeriodType as Kind,
    };

    fn client() -> (AcmPcaClient, CaptureRequestReceiver) {
        let (http_client, request) = capture_request(None);
        let config = aws_sdk_acmpca::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-west-2"))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .http_client(http_client)
            .build();
        (AcmPcaClient::new(Client::from_conf(config)), request)
    }

    fn sent(request: CaptureRequestReceiver) -> (String, Value) {
        let request = request.expect_request();
        let target = request
            .headers()
            .get("x-amz-target")
            .unwrap_or_default()
            .to_owned();
        let body = serde_json::from_slice(request.body().bytes().unwrap()).unwrap();
        (target, body)
    }

    #[tokio::test]
    async fn issue_sends_csr_bytes_and_service_names() {
        let (acmpca, request) = client();
        let issued = acmpca
            .issue_certificate(IssueCertificateRequest {
                certificate_authority_arn: "arn:test:ca/1".into(),
                csr: b"CSR-BYTES".to_vec(),
                signing_algorithm: Algorithm::Sha256WithRsa,
                validity: Period {
                    kind: Kind::Years,
                    value: 1,
                },
                template_arn: None,
                idempotency_token: None,
            })
            .await
            .unwrap();
        assert_eq!(issued, IssuedCertificate::default());

        let (target, body) = sent(request);
        assert_eq!(target, "ACMPrivateCA.IssueCertificate");
        assert_eq!(
            body,
            json!({
                "CertificateAuthorityArn": "arn:test:ca/1",
                "Csr": "Q1NSLUJZVEVT",
                "SigningAlgorithm": "SHA256WITHRSA",
                "Validity": {"Value": 1, "Type": "YEARS"},
            })
        );
    }

    #[tokio::test]
    async fn wait_polls_issued_certificate() {
        let (acmpca, request) = client();
        let issued = acmpca
            .wait_for_issued("arn:test:ca/1", "arn:test:ca/1/certificate/1")
            .await
            .unwrap();
        assert_eq!(issued, IssuedCertificate::default());

        let (target, body) = sent(request);
        assert_eq!(target, "ACMPrivateCA.GetCertificate");
        assert_eq!(
            body,
            json!({
                "CertificateAuthorityArn": "arn:test:ca/1",
                "CertificateArn": "arn:test:ca/1/certificate/1",
            })
        );
    }

    #[tokio::test]
    async fn retrieval_returns_response_as_is() {
        let (acmpca, request) = client();
        let bundle = acmpca
            .get_certificate_authority_certificate("arn:test:ca/1")
            .await
            .unwrap();
        assert_eq!(bundle, CertificateBundle::default());

        let (target, body) = sent(request);
        assert_eq!(target, "ACMPrivateCA.GetCertificateAuthorityCertificate");
        assert_eq!(body, json!({"CertificateAuthorityArn": "arn:test:ca/1"}));
    }

    #[test]
    fn final_poll_is_mapped() {
        let output = GetCertificateOutput::builder()
            .certificate("leaf")
            .certificate_chain("chain")
            .build();
        let certificate = issued::<std::io::Error>(Ok(output)).unwrap();
        assert_eq!(certificate.certificate_arn, None);
        assert_eq!(certificate.certificate.as_deref(), Some("leaf"));
        assert_eq!(certificate.certificate_chain.as_deref(), Some("chain"));

        let err = issued::<std::io::Error>(Err(std::io::ErrorKind::TimedOut.into())).unwrap_err();
        let cause = match err {
            FacadeError::IssuanceWait(cause) => cause,
            other => panic!("unexpected error: {other}"),
        };
        assert_eq!(
            cause.downcast_ref::<std::io::Error>().unwrap().kind(),
            std::io::ErrorKind::TimedOut
        );
    }
}
