use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateAuthorityArn(String);

impl CertificateAuthorityArn {
    pub fn new(arn: impl Into<String>) -> Self {
        Self(arn.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CertificateAuthorityArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CertificateAuthorityArn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CertificateAuthorityArn {
    fn from(arn: String) -> Self {
        Self(arn)
    }
}

impl From<&str> for CertificateAuthorityArn {
    fn from(arn: &str) -> Self {
        Self(arn.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    #[default]
    EcdsaP256,
    EcdsaP384,
    Ed25519,
    Rsa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

/// Input of CSR generation. Every field is optional; defaults belong to the
/// [`CsrGenerator`](crate::csr::CsrGenerator) that consumes it.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningRequestOptions {
    /// PEM encoded private key to sign the request with instead of a fresh one.
    pub client_key: Option<String>,
    pub key_algorithm: KeyAlgorithm,
    pub key_bitsize: Option<u32>,
    pub hash: Option<HashAlgorithm>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
    pub common_name: Option<String>,
    pub email_address: Option<String>,
    pub alt_names: Vec<String>,
}

impl fmt::Debug for SigningRequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningRequestOptions")
            .field("client_key", &self.client_key.as_ref().map(|_| "XXXX"))
            .field("key_algorithm", &self.key_algorithm)
            .field("key_bitsize", &self.key_bitsize)
            .field("hash", &self.hash)
            .field("country", &self.country)
            .field("state", &self.state)
            .field("locality", &self.locality)
            .field("organization", &self.organization)
            .field("organization_unit", &self.organization_unit)
            .field("common_name", &self.common_name)
            .field("email_address", &self.email_address)
            .field("alt_names", &self.alt_names)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SigningRequestResult {
    pub csr: String,
    pub client_key: String,
}

impl fmt::Debug for SigningRequestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningRequestResult")
            .field("csr", &self.csr)
            .field("client_key", &"XXXX")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    #[serde(rename = "SHA256WITHECDSA")]
    Sha256WithEcdsa,
    #[serde(rename = "SHA384WITHECDSA")]
    Sha384WithEcdsa,
    #[serde(rename = "SHA512WITHECDSA")]
    Sha512WithEcdsa,
    #[serde(rename = "SHA256WITHRSA")]
    Sha256WithRsa,
    #[serde(rename = "SHA384WITHRSA")]
    Sha384WithRsa,
    #[serde(rename = "SHA512WITHRSA")]
    Sha512WithRsa,
}

impl SigningAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256WithEcdsa => "SHA256WITHECDSA",
            Self::Sha384WithEcdsa => "SHA384WITHECDSA",
            Self::Sha512WithEcdsa => "SHA512WITHECDSA",
            Self::Sha256WithRsa => "SHA256WITHRSA",
            Self::Sha384WithRsa => "SHA384WITHRSA",
            Self::Sha512WithRsa => "SHA512WITHRSA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidityPeriodType {
    #[serde(rename = "END_DATE")]
    EndDate,
    #[serde(rename = "ABSOLUTE")]
    Absolute,
    #[serde(rename = "DAYS")]
    Days,
    #[serde(rename = "MONTHS")]
    Months,
    #[serde(rename = "YEARS")]
    Years,
}

impl ValidityPeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndDate => "END_DATE",
            Self::Absolute => "ABSOLUTE",
            Self::Days => "DAYS",
            Self::Months => "MONTHS",
            Self::Years => "YEARS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    #[serde(rename = "type")]
    pub kind: ValidityPeriodType,
    pub value: i64,
}

/// Authority specific signing parameters. The authority itself is never part
/// of these; the issuer always supplies its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningParameters {
    pub signing_algorithm: SigningAlgorithm,
    pub validity: Validity,
    #[serde(default)]
    pub template_arn: Option<String>,
    #[serde(default)]
    pub idempotency_token: Option<String>,
}

impl Default for SigningParameters {
    fn default() -> Self {
        Self {
            signing_algorithm: SigningAlgorithm::Sha256WithEcdsa,
            validity: Validity {
                kind: ValidityPeriodType::Years,
                value: 1,
            },
            template_arn: None,
            idempotency_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCertificateRequest {
    pub certificate_authority_arn: String,
    pub csr: Vec<u8>,
    pub signing_algorithm: SigningAlgorithm,
    pub validity: Validity,
    pub template_arn: Option<String>,
    pub idempotency_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCertificate {
    pub certificate_arn: Option<String>,
    pub certificate: Option<String>,
    pub certificate_chain: Option<String>,
}

impl IssuedCertificate {
    /// Fields present in `later` replace the ones in `self`.
    pub fn merge(self, later: IssuedCertificate) -> Self {
        Self {
            certificate_arn: later.certificate_arn.or(self.certificate_arn),
            certificate: later.certificate.or(self.certificate),
            certificate_chain: later.certificate_chain.or(self.certificate_chain),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRequest {
    pub domain_name: String,
    #[serde(default)]
    pub subject_alternative_names: Vec<String>,
    #[serde(default)]
    pub idempotency_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCertificateRequest {
    pub certificate_authority_arn: String,
    pub domain_name: String,
    pub subject_alternative_names: Vec<String>,
    pub idempotency_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedCertificate {
    pub certificate_arn: String,
}

/// Certificate material as the service returned it. Nothing is required;
/// a field the service left out stays `None`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateBundle {
    pub certificate: Option<String>,
    pub certificate_chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

impl fmt::Debug for CertificateBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateBundle")
            .field("certificate", &self.certificate)
            .field("certificate_chain", &self.certificate_chain)
            .field("private_key", &self.private_key.as_ref().map(|_| "XXXX"))
            .finish()
    }
}
