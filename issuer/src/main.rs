use std::{
    env,
    io::{self, IsTerminal},
    sync::Arc,
};

use acmpca_facade::{
    client::{AcmClient, AcmPcaClient},
    csr::RcgenCsrGenerator,
    types::{CertificateBundle, CertificateRequest},
    AcmIssuer, PcaIssuer,
};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use error::IssuerError;
use futures_util::future::try_join;
use serde::Serialize;
use tracing::{debug, info, span, trace, warn, Instrument, Level};
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    args::{Args, Command},
    config::Config,
};
mod args;
mod config;
mod error;

#[derive(Serialize)]
struct Issued {
    certificate_arn: String,
    certificate: CertificateBundle,
    ca_certificate: CertificateBundle,
}

async fn sdk_config(conf: &Config) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &conf.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &conf.profile {
        loader = loader.profile_name(profile);
    }
    loader.load().await
}

fn print_json(value: &impl Serialize) -> Result<(), IssuerError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn write_pem(path: &str, bundle: &CertificateBundle) -> Result<(), IssuerError> {
    tokio::fs::write(path, bundle.encode()?).await?;
    info!("certificate written to {}", path);
    Ok(())
}

fn log_expiration(bundle: &CertificateBundle) {
    match bundle.time_to_expiration() {
        Ok(Some(remaining)) => info!(
            "certificate valid for {} more days",
            remaining.as_secs() / (24 * 60 * 60)
        ),
        Ok(None) => warn!("certificate already expired"),
        Err(e) => debug!("unable to read certificate validity: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<(), IssuerError> {
    let (stderr, _stderr_guard) = tracing_appender::non_blocking(io::stderr());

    let cmd = tracing_subscriber::fmt::layer()
        .with_ansi(io::stderr().is_terminal())
        .compact()
        .with_writer(stderr)
        .with_filter(
            env::var("RUST_LOG")
                .ok()
                .and_then(|e| e.parse::<Targets>().ok())
                .unwrap_or(Targets::new().with_default(LevelFilter::INFO)),
        );

    tracing_subscriber::registry().with(cmd).init();
    let span = span!(Level::TRACE, "main");
    let _gaurd = span.enter();
    let args = Args::parse(env::args())?;
    let conf = Config::load(args.config_path)?;

    trace!("config successfully read");
    conf.validate()?;
    trace!("config successfully validated");
    debug!("config: {:?}", &conf);
    drop(_gaurd);

    let sdk_config = sdk_config(&conf).instrument(span.clone()).await;
    let acmpca = Arc::new(
        AcmPcaClient::from_sdk_config(&sdk_config).with_max_wait(conf.issuance_timeout()),
    );
    let pca = PcaIssuer::new(
        acmpca.clone(),
        Arc::new(RcgenCsrGenerator),
        conf.certificate_authority_arn.as_str(),
    );

    match args.command {
        Command::Csr => {
            let generated = pca.create_csr(conf.csr.clone()).instrument(span).await?;
            print_json(&generated)?;
        }
        Command::Issue { out } => {
            let generated = pca
                .create_csr(conf.csr.clone())
                .instrument(span.clone())
                .await?;
            let issued = pca
                .issue_certificate(&generated.csr, conf.signing.clone())
                .instrument(span.clone())
                .await?;
            let certificate_arn = issued.certificate_arn.unwrap_or_default();
            span.in_scope(|| info!("certificate issued: {}", certificate_arn));
            let (mut certificate, ca_certificate) = try_join(
                pca.get_certificate(&certificate_arn),
                pca.get_ca_certificate(),
            )
            .instrument(span.clone())
            .await?;
            certificate.private_key = Some(generated.client_key);
            log_expiration(&certificate);
            if let Some(out) = out {
                write_pem(&out, &certificate).instrument(span).await?;
            }
            print_json(&Issued {
                certificate_arn,
                certificate,
                ca_certificate,
            })?;
        }
        Command::Get { certificate_arn } => {
            let certificate = pca
                .get_certificate(&certificate_arn)
                .instrument(span)
                .await?;
            log_expiration(&certificate);
            print_json(&certificate)?;
        }
        Command::Ca => {
            print_json(&pca.get_ca_certificate().instrument(span).await?)?;
        }
        Command::Request {
            domain_name,
            subject_alternative_names,
        } => {
            let acm = AcmIssuer::new(
                Arc::new(AcmClient::from_sdk_config(&sdk_config)),
                acmpca,
                conf.certificate_authority_arn.as_str(),
            );
            let requested = acm
                .request_certificate(CertificateRequest {
                    domain_name,
                    subject_alternative_names,
                    idempotency_token: Some(Uuid::new_v4().simple().to_string()),
                })
                .instrument(span)
                .await?;
            print_json(&requested)?;
        }
        Command::Export {
            certificate_arn,
            passphrase,
            out,
        } => {
            let acm =
                AcmIssuer::from_sdk_config(&sdk_config, conf.certificate_authority_arn.as_str());
            let exported = acm
                .export_certificate(&certificate_arn, &passphrase)
                .instrument(span.clone())
                .await?;
            if let Some(out) = out {
                write_pem(&out, &exported).instrument(span).await?;
            }
            print_json(&exported)?;
        }
    }
    Ok(())
}
