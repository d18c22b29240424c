use std::time::Duration;

use pem::Pem;
use x509_parser::prelude::{FromDer, X509Certificate};

use crate::{error::FacadeError, types::CertificateBundle};

impl CertificateBundle {
    /// Certificate, chain and key as PEM blocks, in that order.
    pub fn to_pems(&self) -> Result<Vec<Pem>, FacadeError> {
        let mut pems = Vec::new();
        for part in [&self.certificate, &self.certificate_chain, &self.private_key]
            .into_iter()
            .flatten()
        {
            pems.extend(pem::parse_many(part)?);
        }
        Ok(pems)
    }

    pub fn encode(&self) -> Result<String, FacadeError> {
        Ok(pem::encode_many(&self.to_pems()?))
    }

    /// Remaining validity of the leaf certificate, `None` once it expired.
    pub fn time_to_expiration(&self) -> Result<Option<Duration>, FacadeError> {
        let Some(certificate) = &self.certificate else {
            return Err(FacadeError::MissingField("Certificate"));
        };
        let leaf = pem::parse(certificate)?;
        let Ok((_, cert)) = X509Certificate::from_der(leaf.contents()) else {
            return Err(FacadeError::Invalid("certificate"));
        };
        Ok(cert
            .validity()
            .time_to_expiration()
            .map(|d| d.unsigned_abs()))
    }
}
