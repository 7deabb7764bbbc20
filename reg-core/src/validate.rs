//! Validation gate for raw registration payloads.
//!
//! All rules run and every violation is collected, so a caller can show
//! the complete list at once. Any violation rejects the whole payload;
//! there is no partial success.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_AGE, MIN_AGE, MIN_PHONE_DIGITS};
use crate::events::EventId;
use crate::types::{Experience, Gender, Grade, RegistrationPayload, ShirtSize};

/// One field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A payload that passed every rule, with normalized values and parsed
/// enumerations.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRegistration {
    pub first_name: String,
    pub last_name: String,
    /// Lower-cased.
    pub email: String,
    pub phone: String,
    pub age: u8,
    pub grade: Grade,
    pub gender: Gender,
    pub shirt_size: ShirtSize,
    pub experience: Experience,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub event: EventId,
}

/// Run every rule over the payload. Returns the normalized registration
/// or the complete list of violations.
pub fn validate(payload: &RegistrationPayload) -> Result<ValidRegistration, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let first_name = required(&mut violations, "first_name", &payload.first_name);
    let last_name = required(&mut violations, "last_name", &payload.last_name);
    let guardian_name = required(&mut violations, "guardian_name", &payload.guardian_name);

    let email = payload.email.trim().to_lowercase();
    if email.is_empty() {
        violations.push(FieldViolation::new("email", "is required"));
    } else if !is_valid_email(&email) {
        violations.push(FieldViolation::new("email", "is not a valid email address"));
    }

    let phone = validate_phone(&mut violations, "phone", &payload.phone);
    let guardian_phone = validate_phone(&mut violations, "guardian_phone", &payload.guardian_phone);

    let age = match payload.age {
        None => {
            violations.push(FieldViolation::new("age", "is required"));
            0
        }
        Some(age) if age < MIN_AGE as u16 || age > MAX_AGE as u16 => {
            violations.push(FieldViolation::new(
                "age",
                format!("must be between {} and {}", MIN_AGE, MAX_AGE),
            ));
            0
        }
        Some(age) => age as u8,
    };

    let grade = parse_enum(&mut violations, "grade", &payload.grade, Grade::parse);
    let gender = parse_enum(&mut violations, "gender", &payload.gender, Gender::parse);
    let shirt_size = parse_enum(
        &mut violations,
        "shirt_size",
        &payload.shirt_size,
        ShirtSize::parse,
    );
    let experience = parse_enum(
        &mut violations,
        "experience",
        &payload.experience,
        Experience::parse,
    );

    // Unknown events fail fast; nothing downstream ever sees a slug that
    // is not in the catalog.
    let event = match EventId::parse(payload.event.trim()) {
        Some(event) => Some(event),
        None => {
            let field = "event";
            if payload.event.trim().is_empty() {
                violations.push(FieldViolation::new(field, "is required"));
            } else {
                violations.push(FieldViolation::new(
                    field,
                    format!("unknown event '{}'", payload.event.trim()),
                ));
            }
            None
        }
    };

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(ValidRegistration {
        first_name,
        last_name,
        email,
        phone,
        age,
        grade: grade.expect("checked above"),
        gender: gender.expect("checked above"),
        shirt_size: shirt_size.expect("checked above"),
        experience: experience.expect("checked above"),
        guardian_name,
        guardian_phone,
        event: event.expect("checked above"),
    })
}

fn required(violations: &mut Vec<FieldViolation>, field: &str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        violations.push(FieldViolation::new(field, "is required"));
    }
    trimmed.to_string()
}

fn parse_enum<T>(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: &str,
    parse: fn(&str) -> Option<T>,
) -> Option<T> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        violations.push(FieldViolation::new(field, "is required"));
        return None;
    }
    match parse(trimmed) {
        Some(parsed) => Some(parsed),
        None => {
            violations.push(FieldViolation::new(
                field,
                format!("'{}' is not an accepted value", trimmed),
            ));
            None
        }
    }
}

fn validate_phone(violations: &mut Vec<FieldViolation>, field: &str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        violations.push(FieldViolation::new(field, "is required"));
        return String::new();
    }
    let well_formed = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+' | '.'));
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    if !well_formed || digits < MIN_PHONE_DIGITS || digits > 15 {
        violations.push(FieldViolation::new(
            field,
            format!("must contain at least {} digits", MIN_PHONE_DIGITS),
        ));
    }
    trimmed.to_string()
}

/// Strict-enough address grammar: one `@`, a non-empty local part of
/// known-safe characters, and a dotted domain with non-empty labels.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => (local, domain),
        _ => return false,
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..");
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.starts_with('-')
        && !domain.contains("..")
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'));
    local_ok && domain_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> RegistrationPayload {
        RegistrationPayload {
            first_name: "Jordan".to_string(),
            last_name: "Hale".to_string(),
            email: "Jordan.Hale@Example.COM".to_string(),
            phone: "(205) 555-0142".to_string(),
            age: Some(14),
            grade: "8".to_string(),
            gender: "male".to_string(),
            shirt_size: "am".to_string(),
            experience: "intermediate".to_string(),
            guardian_name: "Casey Hale".to_string(),
            guardian_phone: "205-555-0143".to_string(),
            event: "birmingham-slam-camp".to_string(),
            amount: Some("249.00".to_string()),
        }
    }

    #[test]
    fn test_valid_payload_is_normalized() {
        let valid = validate(&valid_payload()).unwrap();
        assert_eq!(valid.email, "jordan.hale@example.com");
        assert_eq!(valid.event, EventId::BirminghamSlamCamp);
        assert_eq!(valid.grade, Grade::G8);
        assert_eq!(valid.age, 14);
    }

    #[test]
    fn test_all_violations_are_collected() {
        let payload = RegistrationPayload {
            first_name: String::new(),
            email: "not-an-email".to_string(),
            phone: "123".to_string(),
            age: Some(42),
            grade: "14".to_string(),
            event: "unknown-camp".to_string(),
            ..valid_payload()
        };
        let violations = validate(&payload).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"first_name"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"phone"));
        assert!(fields.contains(&"age"));
        assert!(fields.contains(&"grade"));
        assert!(fields.contains(&"event"));
        assert!(violations.len() >= 6);
    }

    #[test]
    fn test_unknown_event_fails_fast() {
        let payload = RegistrationPayload {
            event: "midnight-madness".to_string(),
            ..valid_payload()
        };
        let violations = validate(&payload).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "event");
    }

    #[test]
    fn test_email_grammar() {
        assert!(is_valid_email("a.b+c@example.co"));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("a@@example.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email(".leading@example.com"));
        assert!(!is_valid_email("double..dot@example.com"));
        assert!(!is_valid_email("a@.example.com"));
        assert!(!is_valid_email("spaced name@example.com"));
    }

    #[test]
    fn test_phone_rules() {
        let payload = RegistrationPayload {
            phone: "205x555x0142".to_string(),
            ..valid_payload()
        };
        assert!(validate(&payload).is_err());

        let payload = RegistrationPayload {
            phone: "+1 (205) 555-0142".to_string(),
            ..valid_payload()
        };
        assert!(validate(&payload).is_ok());
    }
}
