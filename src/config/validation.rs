//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check issuer and serial prefix settings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ResponderConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ResponderConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("source.responses_file must be set")]
    MissingResponsesFile,

    #[error("filter.issuer_certs must list at least one certificate")]
    NoIssuerCerts,

    #[error("filter.serial_prefixes: {0:?} is not a non-empty lowercase hex string")]
    InvalidSerialPrefix(String),
}

pub fn validate_config(config: &ResponderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }

    if config.http.max_body_bytes == 0 {
        errors.push(ValidationError::Zero {
            field: "http.max_body_bytes",
        });
    }

    if config.source.responses_file.as_os_str().is_empty() {
        errors.push(ValidationError::MissingResponsesFile);
    }

    if config.filter.issuer_certs.is_empty() {
        errors.push(ValidationError::NoIssuerCerts);
    }

    // Canonical serials are lowercase hex; anything else can never match.
    for prefix in &config.filter.serial_prefixes {
        let valid = !prefix.is_empty()
            && prefix
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if !valid {
            errors.push(ValidationError::InvalidSerialPrefix(prefix.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
