use rcgen::{
    Certificate, CertificateParams, DistinguishedName, DnType, KeyPair, RcgenError,
    SignatureAlgorithm,
};
use rsa::{
    pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding},
    traits::PublicKeyParts,
    RsaPrivateKey,
};
use thiserror::Error;
use tracing::{debug, trace};

use super::{CsrCompletion, CsrGenerator};
use crate::types::{HashAlgorithm, KeyAlgorithm, SigningRequestOptions, SigningRequestResult};

const DEFAULT_COMMON_NAME: &str = "localhost";
const DEFAULT_RSA_BITS: u32 = 2048;
const MIN_RSA_BITS: u32 = 2048;
// pkcs-9 emailAddress
const EMAIL_ADDRESS_OID: [u64; 7] = [1, 2, 840, 113549, 1, 9, 1];

#[derive(Error, Debug)]
pub enum CsrError {
    #[error("Rcgen Error: {0}")]
    Rcgen(#[from] RcgenError),
    #[error("RSA Error: {0}")]
    Rsa(#[from] rsa::Error),
    #[error("PKCS#8 Error: {0}")]
    Pkcs8(#[from] rsa::pkcs8::Error),
    #[error("Unsupported combination: {0:?} with {1:?}")]
    UnsupportedAlgorithm(KeyAlgorithm, Option<HashAlgorithm>),
    #[error("Key size {1} does not match {0:?}")]
    KeySize(KeyAlgorithm, u32),
    #[error("CSR generation task failed")]
    TaskFailed,
}

/// [`CsrGenerator`] backed by rcgen. Key generation runs on the blocking
/// pool, so it must be called from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct RcgenCsrGenerator;

impl CsrGenerator for RcgenCsrGenerator {
    fn create_csr(&self, options: SigningRequestOptions, completion: CsrCompletion) {
        let task = tokio::task::spawn_blocking(move || build_request(&options));
        tokio::spawn(async move {
            match task.await {
                Ok(Ok(result)) => completion.succeed(result),
                Ok(Err(e)) => completion.fail(e),
                Err(_) => completion.fail(CsrError::TaskFailed),
            }
        });
    }
}

fn signature_algorithm(
    options: &SigningRequestOptions,
) -> Result<&'static SignatureAlgorithm, CsrError> {
    let key_algorithm = options.key_algorithm;
    let alg = match (key_algorithm, options.hash) {
        (KeyAlgorithm::EcdsaP256, None | Some(HashAlgorithm::Sha256)) => {
            &rcgen::PKCS_ECDSA_P256_SHA256
        }
        (KeyAlgorithm::EcdsaP384, None | Some(HashAlgorithm::Sha384)) => {
            &rcgen::PKCS_ECDSA_P384_SHA384
        }
        (KeyAlgorithm::Ed25519, None) => &rcgen::PKCS_ED25519,
        (KeyAlgorithm::Rsa, None | Some(HashAlgorithm::Sha256)) => &rcgen::PKCS_RSA_SHA256,
        (KeyAlgorithm::Rsa, Some(HashAlgorithm::Sha384)) => &rcgen::PKCS_RSA_SHA384,
        (KeyAlgorithm::Rsa, Some(HashAlgorithm::Sha512)) => &rcgen::PKCS_RSA_SHA512,
        (key_algorithm, hash) => return Err(CsrError::UnsupportedAlgorithm(key_algorithm, hash)),
    };
    match (key_algorithm, options.key_bitsize) {
        (KeyAlgorithm::EcdsaP256, Some(bits)) if bits != 256 => {
            Err(CsrError::KeySize(key_algorithm, bits))
        }
        (KeyAlgorithm::EcdsaP384, Some(bits)) if bits != 384 => {
            Err(CsrError::KeySize(key_algorithm, bits))
        }
        (KeyAlgorithm::Rsa, Some(bits)) if bits < MIN_RSA_BITS => {
            Err(CsrError::KeySize(key_algorithm, bits))
        }
        _ => Ok(alg),
    }
}

fn distinguished_name(options: &SigningRequestOptions) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    let fields = [
        (DnType::CountryName, &options.country),
        (DnType::StateOrProvinceName, &options.state),
        (DnType::LocalityName, &options.locality),
        (DnType::OrganizationName, &options.organization),
        (DnType::OrganizationalUnitName, &options.organization_unit),
    ];
    for (ty, value) in fields {
        if let Some(value) = value {
            dn.push(ty, value.as_str());
        }
    }
    dn.push(
        DnType::CommonName,
        options.common_name.as_deref().unwrap_or(DEFAULT_COMMON_NAME),
    );
    if let Some(email_address) = &options.email_address {
        dn.push(
            DnType::CustomDnType(EMAIL_ADDRESS_OID.to_vec()),
            email_address.as_str(),
        );
    }
    dn
}

fn rsa_key_bits(pem: &str) -> Result<u32, CsrError> {
    let key = RsaPrivateKey::from_pkcs8_pem(pem)?;
    Ok((key.size() * 8) as u32)
}

fn build_request(options: &SigningRequestOptions) -> Result<SigningRequestResult, CsrError> {
    debug!(
        "generating csr for {:?} with {:?}",
        options.common_name, options.key_algorithm
    );
    let alg = signature_algorithm(options)?;
    let mut params = CertificateParams::new(options.alt_names.clone());
    params.alg = alg;
    params.distinguished_name = distinguished_name(options);
    params.key_pair = match (&options.client_key, options.key_algorithm) {
        (Some(client_key), key_algorithm) => {
            trace!("using supplied client key");
            if let (KeyAlgorithm::Rsa, Some(bits)) = (key_algorithm, options.key_bitsize) {
                let size = rsa_key_bits(client_key)?;
                if size != bits {
                    return Err(CsrError::KeySize(key_algorithm, size));
                }
            }
            Some(KeyPair::from_pem_and_sign_algo(client_key, alg)?)
        }
        (None, KeyAlgorithm::Rsa) => {
            let bits = options.key_bitsize.unwrap_or(DEFAULT_RSA_BITS);
            trace!("generating {} bit rsa key", bits);
            let key = RsaPrivateKey::new(&mut rand::thread_rng(), bits as usize)?;
            let key = key.to_pkcs8_pem(LineEnding::LF)?;
            Some(KeyPair::from_pem_and_sign_algo(&key, alg)?)
        }
        (None, _) => None,
    };
    let cert = Certificate::from_params(params)?;
    let csr = cert.serialize_request_pem()?;
    let client_key = match &options.client_key {
        Some(client_key) => client_key.clone(),
        None => cert.serialize_private_key_pem(),
    };
    Ok(SigningRequestResult { csr, client_key })
}
