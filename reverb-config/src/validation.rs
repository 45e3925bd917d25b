//! Per-domain validation of the resolved configuration

use std::fmt::Display;

use crate::error::{ConfigError, ConfigResult};

/// A configuration domain that can check its own values
pub trait Validatable {
    fn validate(&self) -> ConfigResult<()>;

    /// Section name used in error messages
    fn domain_name(&self) -> &'static str;

    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        domain_error(self.domain_name(), message)
    }
}

fn domain_error(domain: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::DomainError {
        domain: domain.to_string(),
        message: message.into(),
    }
}

pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(domain_error(domain, format!("{} must not be blank", field_name)));
    }
    Ok(())
}

/// `value` must be strictly above the type's zero
pub fn validate_positive<T>(value: T, field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: PartialOrd + Default + Display,
{
    if value > T::default() {
        Ok(())
    } else {
        Err(domain_error(
            domain,
            format!("{} must be positive (got {})", field_name, value),
        ))
    }
}

/// `name` must be an IANA zone known to chrono-tz, e.g. `US/Pacific`
pub fn validate_timezone(name: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    match name.parse::<chrono_tz::Tz>() {
        Ok(_) => Ok(()),
        Err(_) => Err(domain_error(
            domain,
            format!("{} '{}' is not a known timezone", field_name, name),
        )),
    }
}
