// grindvakt-config/src/validation.rs
//! Custom validation functions for configuration.
//!
//! Templates are split on single spaces when rendered. Stray whitespace is
//! allowed through: it only yields empty arguments for the tool to reject.

use std::borrow::Cow;

use validator::ValidationError;

use crate::Placeholder;

fn error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Validate that a template is non-blank and carries `placeholder`.
pub fn validate_template(template: &str, placeholder: Placeholder) -> Result<(), ValidationError> {
    if template.trim().is_empty() {
        return Err(error("empty_template", "template must not be empty".into()));
    }
    if !template.contains(placeholder.token()) {
        return Err(error(
            "missing_placeholder",
            format!("template must contain {placeholder}"),
        ));
    }
    Ok(())
}

/// Whether the single-space split of `template` contains an empty argument
/// or an argument with embedded whitespace.
pub fn has_irregular_spacing(template: &str) -> bool {
    template
        .split(' ')
        .any(|arg| arg.is_empty() || arg.contains(char::is_whitespace))
}

/// The ARP probe is addressed by client IP.
pub fn validate_arping_template(template: &str) -> Result<(), ValidationError> {
    validate_template(template, Placeholder::IpAddress)
}

/// The MAC-scoped firewall rule is keyed on the discovered hardware address.
pub fn validate_iptables_mac_template(template: &str) -> Result<(), ValidationError> {
    validate_template(template, Placeholder::MacAddress)
}

/// The fallback firewall rule is keyed on client IP.
pub fn validate_iptables_ip_template(template: &str) -> Result<(), ValidationError> {
    validate_template(template, Placeholder::IpAddress)
}

/// Validate that a program name is a single non-empty word.
pub fn validate_program(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(error(
            "invalid_program",
            format!("'{name}' is not a valid program name"),
        ));
    }
    Ok(())
}

/// Like [`validate_program`], but empty disables privilege elevation.
pub fn validate_privilege_command(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Ok(());
    }
    validate_program(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_templates() {
        assert!(validate_arping_template("-c 1 -I eth0 {ip_address}").is_ok());
        assert!(validate_iptables_mac_template(
            "-t mangle -I internet 1 -m mac --mac-source {mac_address} -j RETURN"
        )
        .is_ok());
        assert!(validate_iptables_ip_template("-I internet 1 -s {ip_address} -j RETURN").is_ok());
    }

    #[test]
    fn rejects_missing_placeholder() {
        let err = validate_iptables_mac_template("-I internet -s {ip_address}").unwrap_err();
        assert_eq!(err.code, "missing_placeholder");
    }

    #[test]
    fn stray_spacing_is_accepted() {
        for template in [" {ip_address}", "{ip_address} ", "-c 1  {ip_address}", "-c\t1 {ip_address}"] {
            assert!(validate_arping_template(template).is_ok(), "template {template:?}");
            assert!(has_irregular_spacing(template), "template {template:?}");
        }
        assert!(!has_irregular_spacing("-c 1 -I eth0 {ip_address}"));
    }

    #[test]
    fn rejects_blank_template() {
        assert_eq!(validate_arping_template("").unwrap_err().code, "empty_template");
    }

    #[test]
    fn program_names() {
        assert!(validate_program("iptables").is_ok());
        assert!(validate_program("/usr/sbin/iptables").is_ok());
        assert!(validate_program("").is_err());
        assert!(validate_program("sudo -n").is_err());
        assert!(validate_privilege_command("").is_ok());
        assert!(validate_privilege_command("doas").is_ok());
    }
}
