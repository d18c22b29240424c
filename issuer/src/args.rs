use std::{ffi::OsStr, process};

use clap_lex::{ArgCursor, RawArgs};
use tracing::{debug, instrument, trace};

use crate::error::IssuerError;

static HELP: &str = include_str!("../main.help.arg");

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Csr,
    Issue {
        out: Option<String>,
    },
    Get {
        certificate_arn: String,
    },
    Ca,
    Request {
        domain_name: String,
        subject_alternative_names: Vec<String>,
    },
    Export {
        certificate_arn: String,
        passphrase: String,
        out: Option<String>,
    },
}

pub struct Args {
    pub config_path: Option<String>,
    pub command: Command,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let command = match &self.command {
            Command::Export { .. } => "export".to_owned(),
            command => format!("{:?}", command),
        };
        f.debug_struct("Args")
            .field("config_path", &self.config_path)
            .field("command", &command)
            .finish()
    }
}

fn string_value(value: Option<&OsStr>, name: &'static str) -> Result<String, IssuerError> {
    value
        .ok_or(IssuerError::RequiredValue(name))?
        .to_str()
        .ok_or(IssuerError::Encoding)
        .map(str::to_owned)
}

fn long_value(
    value: Option<&OsStr>,
    raw: &RawArgs,
    cursor: &mut ArgCursor,
    name: &'static str,
) -> Result<String, IssuerError> {
    match value {
        Some(value) => string_value(Some(value), name),
        None => string_value(raw.next_os(cursor), name),
    }
}

impl Args {
    #[instrument(name = "args::parse", skip(raw))]
    pub fn parse(
        raw: impl IntoIterator<Item = impl Into<std::ffi::OsString>>,
    ) -> Result<Self, IssuerError> {
        trace!("parsing args");
        let raw = RawArgs::new(raw);
        let mut cursor = raw.cursor();
        raw.next(&mut cursor);
        let mut config_path = None;
        let mut out = None;
        let mut passphrase = None;
        let mut subject_alternative_names = Vec::new();
        let mut positionals = Vec::new();
        while let Some(arg) = raw.next(&mut cursor) {
            if let Some((long, value)) = arg.to_long() {
                match long {
                    Ok("config") => {
                        config_path = Some(long_value(value, &raw, &mut cursor, "config")?);
                        debug!("config path: {:?}", config_path);
                    }
                    Ok("out") => {
                        out = Some(long_value(value, &raw, &mut cursor, "out")?);
                    }
                    Ok("san") => {
                        subject_alternative_names
                            .push(long_value(value, &raw, &mut cursor, "san")?);
                    }
                    Ok("passphrase") => {
                        passphrase = Some(long_value(value, &raw, &mut cursor, "passphrase")?);
                    }
                    Ok("help") => {
                        print!("{}", HELP);
                        process::exit(0x0);
                    }
                    Ok("version") => {
                        println!("acmpca-issuer, version {}", env!("CARGO_PKG_VERSION"));
                        process::exit(0x0);
                    }
                    _ => {
                        return Err(IssuerError::CommandNotFound);
                    }
                }
            } else if let Some(mut shorts) = arg.to_short() {
                while let Some(short) = shorts.next_flag() {
                    match short {
                        Ok('c') => {
                            let value = match shorts.next_value_os() {
                                Some(v) => Some(v),
                                None => raw.next_os(&mut cursor),
                            };
                            config_path = Some(
                                value
                                    .and_then(OsStr::to_str)
                                    .filter(|v| !v.is_empty() && !v.starts_with('-'))
                                    .map(str::to_owned)
                                    .ok_or(IssuerError::RequiredValue("config"))?,
                            );
                            debug!("config path: {:?}", config_path);
                        }
                        Ok('h') => {
                            print!("{}", HELP);
                            process::exit(0x0);
                        }
                        _ => {
                            return Err(IssuerError::CommandNotFound);
                        }
                    }
                }
            } else {
                positionals.push(string_value(Some(arg.to_value_os()), "command")?);
            }
        }

        let mut positionals = positionals.into_iter();
        let command = match positionals.next().as_deref() {
            Some("csr") => Command::Csr,
            Some("issue") => Command::Issue { out },
            Some("get") => Command::Get {
                certificate_arn: positionals
                    .next()
                    .ok_or(IssuerError::RequiredValue("certificate arn"))?,
            },
            Some("ca") => Command::Ca,
            Some("request") => Command::Request {
                domain_name: positionals
                    .next()
                    .ok_or(IssuerError::RequiredValue("domain"))?,
                subject_alternative_names,
            },
            Some("export") => Command::Export {
                certificate_arn: positionals
                    .next()
                    .ok_or(IssuerError::RequiredValue("certificate arn"))?,
                passphrase: passphrase.ok_or(IssuerError::RequiredValue("passphrase"))?,
                out,
            },
            Some(_) => return Err(IssuerError::CommandNotFound),
            None => return Err(IssuerError::RequiredValue("command")),
        };
        if positionals.next().is_some() {
            return Err(IssuerError::CommandNotFound);
        }
        trace!("args successfully parsed");
        Ok(Self {
            config_path,
            command,
        })
    }
}
