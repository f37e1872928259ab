use crate::error::BookingError;
use serde::{Deserialize, Serialize};

/// Contact details written into the appointment event.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    /// Full name, "first last".
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub birthdate: Option<String>,
    pub service: String,
}

impl ClientDetails {
    /// Rejects blank required fields and obviously malformed emails.
    pub fn validate(&self) -> Result<(), BookingError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("phone", &self.phone)?;
        require("service", &self.service)?;
        validate_email(&self.email)
    }

    /// Appointment title as shown on the provider calendar.
    pub fn appointment_title(&self) -> String {
        format!("{} - {}", self.service.trim(), self.name.trim())
    }

    /// One `Label: value` line per field, optional fields only when present.
    pub fn description_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Client: {}", self.name.trim()),
            format!("Email: {}", self.email.trim()),
            format!("Phone: {}", self.phone.trim()),
        ];
        if let Some(address) = non_blank(&self.address) {
            lines.push(format!("Address: {}", address));
        }
        if let Some(birthdate) = non_blank(&self.birthdate) {
            lines.push(format!("Birthdate: {}", birthdate));
        }
        lines.push(format!("Service: {}", self.service.trim()));
        lines
    }
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), BookingError> {
    if value.trim().is_empty() {
        return Err(BookingError::MissingField(field));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), BookingError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(BookingError::InvalidField {
            field: "email",
            message: format!("'{}' is not an email address", email),
        }),
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
