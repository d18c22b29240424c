use std::{env, fs, io::Read, path::PathBuf, time::Duration};

use acmpca_facade::types::{SigningParameters, SigningRequestOptions};
use serde::Deserialize;
use tracing::{debug, trace};
use validator::{Validate, ValidationError};

use crate::error::IssuerError;

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "Self::verify"))]
pub struct Config {
    #[validate(length(min = 1))]
    pub certificate_authority_arn: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    /// Seconds to wait for an issued certificate.
    #[serde(default = "_default_issuance_timeout")]
    #[validate(range(min = 1))]
    pub issuance_timeout: u64,
    #[serde(default)]
    pub csr: SigningRequestOptions,
    #[serde(default)]
    pub signing: SigningParameters,
}

impl Config {
    pub fn verify(&self) -> Result<(), ValidationError> {
        trace!("verifying config");
        if !self.certificate_authority_arn.starts_with("arn:") {
            return Err(ValidationError::new(
                "certificate_authority_arn must be an ARN",
            ));
        }
        if self.signing.validity.value < 1 {
            return Err(ValidationError::new(
                "signing validity value must be positive",
            ));
        }
        trace!("config successfully verified");
        Ok(())
    }
    pub fn issuance_timeout(&self) -> Duration {
        Duration::from_secs(self.issuance_timeout)
    }
    pub fn load(path: Option<String>) -> Result<Self, IssuerError> {
        trace!("loading config");
        let custom_path = if let Some(path) = path {
            debug!("loading config from custom path: {:?}", path);
            let path = PathBuf::from(path);
            Some(
                if let Some(stripped_path) = path.strip_prefix("~/").ok().filter(|_| !cfg!(windows))
                {
                    let home_dir = dirs::home_dir().ok_or(IssuerError::InvalidConfigPath)?;
                    home_dir.join(stripped_path)
                } else {
                    path
                },
            )
        } else {
            None
        };

        let current_dir = env::current_dir()
            .map(|mut d| {
                d.push("issuer");
                d.set_extension("yaml");
                d
            })
            .ok()
            .filter(|f| f.is_file());
        let config_dir = dirs::config_dir()
            .map(|mut d| {
                d.push("acmpca");
                d.push("issuer");
                d.set_extension("yaml");
                d
            })
            .filter(|f| f.is_file());
        let home_dir = dirs::home_dir()
            .map(|mut d| {
                d.push(".acmpca");
                d.push("issuer");
                d.set_extension("yaml");
                d
            })
            .filter(|f| f.is_file());
        let etc = if cfg!(target_os = "linux") {
            Some(PathBuf::from("/etc/acmpca/issuer.yaml"))
        } else {
            None
        }
        .filter(|f| f.is_file());
        let path = custom_path
            .or(current_dir)
            .or(config_dir)
            .or(home_dir)
            .or(etc)
            .ok_or(IssuerError::ConfigNotFound)?;
        debug!("loading config file: {:?}", path);
        let mut file = fs::File::open(path)?;
        let mut configuration_data = String::new();
        file.read_to_string(&mut configuration_data)?;
        Self::parse(&configuration_data)
    }
    pub fn parse(configuration_data: &str) -> Result<Self, IssuerError> {
        trace!("parsing config file");
        serde_yaml::from_str(configuration_data).or(Err(IssuerError::InvalidConfig))
    }
}

pub fn _default_issuance_timeout() -> u64 {
    60
}
