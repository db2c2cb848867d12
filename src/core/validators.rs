use crate::core::validation::{ErrorMap, Validator, ValidatorArgs, failed};
use crate::core::value::Value;
use chrono::{NaiveDate, Utc};
use regex::Regex;

const NAME_MAX: usize = 50;
const CITY_MAX: usize = 85;
const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 12;
const PASSWORD_MAX: usize = 64;
const EMAIL_MAX_TOTAL: usize = 254;
const EMAIL_MAX_LOCAL: usize = 64;
const EMAIL_MAX_DOMAIN: usize = 255;

fn text_of(value: &Value) -> &str {
    value.as_text().unwrap_or_default()
}

/// Personal-name characters: Unicode letters and marks plus the usual
/// separators found in real names.
pub struct NameValidator {
    label: String,
    pattern: Regex,
}

impl NameValidator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: Regex::new(r"^[\p{L}\p{M} '\-.]+$").expect("Invalid regex pattern"),
        }
    }
}

impl Validator for NameValidator {
    fn label(&self) -> &str {
        &self.label
    }

    fn rules(&self) -> &[(&'static str, &'static str)] {
        &[
            ("maxLength", "Name must be at most 50 characters long."),
            ("validCharacters", "Name contains characters that are not allowed."),
        ]
    }

    fn check(&self, value: &Value, _args: &ValidatorArgs) -> Option<ErrorMap> {
        let text = text_of(value);
        let mut errors = ErrorMap::new();
        if text.chars().count() > NAME_MAX {
            errors.insert("maxLength".to_string(), true);
        }
        if !self.pattern.is_match(text) {
            errors.insert("validCharacters".to_string(), true);
        }
        (!errors.is_empty()).then_some(errors)
    }
}

/// City names additionally allow parentheses for disambiguations.
pub struct CityValidator {
    label: String,
    pattern: Regex,
}

impl CityValidator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: Regex::new(r"^[\p{L}\p{M} '\-.()]+$").expect("Invalid regex pattern"),
        }
    }
}

impl Validator for CityValidator {
    fn label(&self) -> &str {
        &self.label
    }

    fn rules(&self) -> &[(&'static str, &'static str)] {
        &[
            ("maxLength", "City must be at most 85 characters long."),
            ("validCharacters", "City contains characters that are not allowed."),
        ]
    }

    fn check(&self, value: &Value, _args: &ValidatorArgs) -> Option<ErrorMap> {
        let text = text_of(value);
        let mut errors = ErrorMap::new();
        if text.chars().count() > CITY_MAX {
            errors.insert("maxLength".to_string(), true);
        }
        if !self.pattern.is_match(text) {
            errors.insert("validCharacters".to_string(), true);
        }
        (!errors.is_empty()).then_some(errors)
    }
}

pub struct UsernameValidator {
    label: String,
    pattern: Regex,
}

impl UsernameValidator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: Regex::new(r"^[\p{L}\p{M}0-9._-]+$").expect("Invalid regex pattern"),
        }
    }
}

impl Validator for UsernameValidator {
    fn label(&self) -> &str {
        &self.label
    }

    fn rules(&self) -> &[(&'static str, &'static str)] {
        &[
            ("minLength", "Username must be at least 3 characters long."),
            ("maxLength", "Username must be at most 30 characters long."),
            (
                "validCharacters",
                "Username may only contain letters, numbers, dots, dashes and underscores.",
            ),
        ]
    }

    fn check(&self, value: &Value, _args: &ValidatorArgs) -> Option<ErrorMap> {
        let text = text_of(value);
        let count = text.chars().count();
        let mut errors = ErrorMap::new();
        if count < USERNAME_MIN {
            errors.insert("minLength".to_string(), true);
        }
        if count > USERNAME_MAX {
            errors.insert("maxLength".to_string(), true);
        }
        if !self.pattern.is_match(text) {
            errors.insert("validCharacters".to_string(), true);
        }
        (!errors.is_empty()).then_some(errors)
    }
}

/// Generic character-count bounds for free-text fields.
pub struct LengthValidator {
    label: String,
    min: Option<usize>,
    max: Option<usize>,
}

impl LengthValidator {
    pub fn new(label: impl Into<String>, min: Option<usize>, max: Option<usize>) -> Self {
        Self {
            label: label.into(),
            min,
            max,
        }
    }

    pub fn max(label: impl Into<String>, max: usize) -> Self {
        Self::new(label, None, Some(max))
    }
}

impl Validator for LengthValidator {
    fn label(&self) -> &str {
        &self.label
    }

    fn rules(&self) -> &[(&'static str, &'static str)] {
        &[
            ("minLength", "Value is too short."),
            ("maxLength", "Value is too long."),
        ]
    }

    fn message_for(&self, rule: &str) -> String {
        match (rule, self.min, self.max) {
            ("minLength", Some(min), _) => {
                format!("{} must be at least {min} characters long.", self.label)
            }
            ("maxLength", _, Some(max)) => {
                format!("{} must be at most {max} characters long.", self.label)
            }
            _ => format!("Invalid input: {rule}."),
        }
    }

    fn check(&self, value: &Value, _args: &ValidatorArgs) -> Option<ErrorMap> {
        let count = text_of(value).chars().count();
        let mut errors = ErrorMap::new();
        if let Some(min) = self.min
            && count < min
        {
            errors.insert("minLength".to_string(), true);
        }
        if let Some(max) = self.max
            && count > max
        {
            errors.insert("maxLength".to_string(), true);
        }
        (!errors.is_empty()).then_some(errors)
    }
}

/// Matching-field comparison, e.g. password confirmation against the
/// password field passed in `args.compare_to`.
pub struct MatchValidator {
    label: String,
    message: String,
}

impl MatchValidator {
    pub fn new(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            message: message.into(),
        }
    }
}

impl Validator for MatchValidator {
    fn label(&self) -> &str {
        &self.label
    }

    fn rules(&self) -> &[(&'static str, &'static str)] {
        &[("matchesField", "Values do not match.")]
    }

    fn message_for(&self, rule: &str) -> String {
        if rule == "matchesField" {
            return self.message.clone();
        }
        format!("Invalid input: {rule}.")
    }

    fn check(&self, value: &Value, args: &ValidatorArgs) -> Option<ErrorMap> {
        let matches = args
            .compare_to
            .as_ref()
            .is_some_and(|other| other == value);
        (!matches).then(|| failed(&["matchesField"]))
    }
}

/// Case-insensitive uniqueness against an existing collection, exempting
/// the field's own original value so editing an entry does not flag it as
/// a duplicate of itself.
pub struct UniqueHandleValidator {
    label: String,
}

impl UniqueHandleValidator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Validator for UniqueHandleValidator {
    fn label(&self) -> &str {
        &self.label
    }

    fn rules(&self) -> &[(&'static str, &'static str)] {
        &[("isUnique", "This Instagram handle has already been added.")]
    }

    fn check(&self, value: &Value, args: &ValidatorArgs) -> Option<ErrorMap> {
        let text = text_of(value).to_lowercase();
        if let Some(original) = &args.original
            && original.to_lowercase() == text
        {
            return None;
        }
        let taken = args
            .existing
            .iter()
            .any(|existing| existing.to_lowercase() == text);
        taken.then(|| failed(&["isUnique"]))
    }
}

/// Rejects lists whose entries are all whitespace. A fully empty list is
/// blank and handled by the required rule instead.
pub struct NonEmptyListValidator {
    label: String,
}

impl NonEmptyListValidator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Validator for NonEmptyListValidator {
    fn label(&self) -> &str {
        &self.label
    }

    fn rules(&self) -> &[(&'static str, &'static str)] {
        &[("notEmpty", "Add at least one entry.")]
    }

    fn check(&self, value: &Value, _args: &ValidatorArgs) -> Option<ErrorMap> {
        let Some(list) = value.as_list() else {
            return Some(failed(&["notEmpty"]));
        };
        let has_content = list.iter().any(|entry| !entry.trim().is_empty());
        (!has_content).then(|| failed(&["notEmpty"]))
    }
}

/// ISO-8601 date that must not lie in the future (birthdays).
pub struct PastDateValidator {
    label: String,
}

impl PastDateValidator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

impl Validator for PastDateValidator {
    fn label(&self) -> &str {
        &self.label
    }

    fn rules(&self) -> &[(&'static str, &'static str)] {
        &[
            ("validDate", "Enter a valid date."),
            ("notInFuture", "Date cannot be in the future."),
        ]
    }

    fn check(&self, value: &Value, _args: &ValidatorArgs) -> Option<ErrorMap> {
        let Ok(date) = NaiveDate::parse_from_str(text_of(value), "%Y-%m-%d") else {
            return Some(failed(&["validDate"]));
        };
        (date > Self::today()).then(|| failed(&["notInFuture"]))
    }
}

/// Composite password strength: length range, one of each character class,
/// and a permitted-character allowlist.
pub struct PasswordValidator {
    label: String,
    allowed: Regex,
}

impl PasswordValidator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            allowed: Regex::new(r#"^[A-Za-z0-9!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?~ ]+$"#)
                .expect("Invalid regex pattern"),
        }
    }
}

impl Validator for PasswordValidator {
    fn label(&self) -> &str {
        &self.label
    }

    fn rules(&self) -> &[(&'static str, &'static str)] {
        &[
            ("minLength", "Password must be at least 12 characters long."),
            ("maxLength", "Password must be at most 64 characters long."),
            ("hasLowercase", "Password must contain a lowercase letter."),
            ("hasUppercase", "Password must contain an uppercase letter."),
            ("hasNumber", "Password must contain a number."),
            (
                "hasSpecialCharacter",
                "Password must contain a special character.",
            ),
            (
                "validCharacters",
                "Password contains characters that are not allowed.",
            ),
        ]
    }

    fn check(&self, value: &Value, _args: &ValidatorArgs) -> Option<ErrorMap> {
        let text = text_of(value);
        let count = text.chars().count();
        let mut errors = ErrorMap::new();

        if count < PASSWORD_MIN {
            errors.insert("minLength".to_string(), true);
        }
        if count > PASSWORD_MAX {
            errors.insert("maxLength".to_string(), true);
        }
        if !text.chars().any(|c| c.is_ascii_lowercase()) {
            errors.insert("hasLowercase".to_string(), true);
        }
        if !text.chars().any(|c| c.is_ascii_uppercase()) {
            errors.insert("hasUppercase".to_string(), true);
        }
        if !text.chars().any(|c| c.is_ascii_digit()) {
            errors.insert("hasNumber".to_string(), true);
        }
        if !text.chars().any(|c| !c.is_ascii_alphanumeric()) {
            errors.insert("hasSpecialCharacter".to_string(), true);
        }
        if !self.allowed.is_match(text) {
            errors.insert("validCharacters".to_string(), true);
        }

        (!errors.is_empty()).then_some(errors)
    }
}

/// Structural email validation: local/domain patterns plus the RFC length
/// ceilings (254 total, 64 local, 255 domain).
pub struct EmailValidator {
    label: String,
    local: Regex,
    domain: Regex,
}

impl EmailValidator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            local: Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
                .expect("Invalid regex pattern"),
            domain: Regex::new(
                r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
            )
            .expect("Invalid regex pattern"),
        }
    }
}

impl Validator for EmailValidator {
    fn label(&self) -> &str {
        &self.label
    }

    fn rules(&self) -> &[(&'static str, &'static str)] {
        &[
            ("isEmail", "This email address is not valid."),
            ("maxLength", "This email address is too long."),
        ]
    }

    fn check(&self, value: &Value, _args: &ValidatorArgs) -> Option<ErrorMap> {
        let text = text_of(value);
        let mut errors = ErrorMap::new();

        match text.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.contains('@')
                    && self.local.is_match(local)
                    && self.domain.is_match(domain) =>
            {
                if text.len() > EMAIL_MAX_TOTAL
                    || local.len() > EMAIL_MAX_LOCAL
                    || domain.len() > EMAIL_MAX_DOMAIN
                {
                    errors.insert("maxLength".to_string(), true);
                }
            }
            _ => {
                errors.insert("isEmail".to_string(), true);
            }
        }

        (!errors.is_empty()).then_some(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::{Validator, ValidatorArgs};
    use crate::core::value::Value;

    fn args() -> ValidatorArgs {
        ValidatorArgs::default()
    }

    #[test]
    fn email_rejects_structureless_input() {
        let validator = EmailValidator::new("Email");
        let result = validator.validate(&Value::text("invalid"), &args());
        assert!(result.has_rule("isEmail"));
        assert!(result.messages()[0].contains("not valid"));
    }

    #[test]
    fn email_accepts_plain_address() {
        let validator = EmailValidator::new("Email");
        let result = validator.validate(&Value::text("user@example.com"), &args());
        assert!(result.is_valid());
    }

    #[test]
    fn email_enforces_local_part_ceiling() {
        let validator = EmailValidator::new("Email");
        let long_local = format!("{}@example.com", "a".repeat(65));
        let result = validator.validate(&Value::text(long_local), &args());
        assert!(result.has_rule("maxLength"));
    }

    #[test]
    fn password_below_minimum_length() {
        let validator = PasswordValidator::new("Password");
        let result = validator.validate(&Value::text("Abcdefg123!"), &args());
        assert!(result.has_rule("minLength"));
    }

    #[test]
    fn password_with_all_classes_passes() {
        let validator = PasswordValidator::new("Password");
        let result = validator.validate(&Value::text("Abcdefgh1234!"), &args());
        assert!(result.is_valid());
    }

    #[test]
    fn password_missing_classes_reports_each() {
        let validator = PasswordValidator::new("Password");
        let result = validator.validate(&Value::text("abcdefghijkl"), &args());
        assert!(result.has_rule("hasUppercase"));
        assert!(result.has_rule("hasNumber"));
        assert!(result.has_rule("hasSpecialCharacter"));
        assert!(!result.has_rule("minLength"));
    }

    #[test]
    fn duplicate_handle_is_flagged() {
        let validator = UniqueHandleValidator::new("Instagram handle");
        let context = ValidatorArgs {
            existing: vec!["banjo".to_string()],
            ..ValidatorArgs::default()
        };
        let result = validator.validate(&Value::text("Banjo"), &context);
        assert!(result.has_rule("isUnique"));
        assert!(result.messages()[0].contains("already been added"));
    }

    #[test]
    fn original_handle_is_exempt_when_editing() {
        let validator = UniqueHandleValidator::new("Instagram handle");
        let context = ValidatorArgs {
            existing: vec!["banjo".to_string()],
            original: Some("banjo".to_string()),
            ..ValidatorArgs::default()
        };
        let result = validator.validate(&Value::text("banjo"), &context);
        assert!(result.is_valid());
    }

    #[test]
    fn confirm_password_mismatch() {
        let validator = MatchValidator::new("Confirm password", "Passwords do not match.");
        let context = ValidatorArgs {
            compare_to: Some(Value::text("secret")),
            ..ValidatorArgs::default()
        };

        let mismatch = validator.validate(&Value::text("other"), &context);
        assert!(mismatch.has_rule("matchesField"));
        assert_eq!(mismatch.messages(), &["Passwords do not match.".to_string()]);

        let matching = validator.validate(&Value::text("secret"), &context);
        assert!(matching.is_valid());
    }

    #[test]
    fn name_allows_unicode_letters() {
        let validator = NameValidator::new("Name");
        assert!(validator.validate(&Value::text("Zoë O'Brien-Lindqvist"), &args()).is_valid());
        assert!(
            validator
                .validate(&Value::text("Robot #7"), &args())
                .has_rule("validCharacters")
        );
    }

    #[test]
    fn username_bounds_and_characters() {
        let validator = UsernameValidator::new("Username");
        assert!(validator.validate(&Value::text("ab"), &args()).has_rule("minLength"));
        assert!(
            validator
                .validate(&Value::text("plush_fan.01"), &args())
                .is_valid()
        );
        assert!(
            validator
                .validate(&Value::text("bad handle!"), &args())
                .has_rule("validCharacters")
        );
    }

    #[test]
    fn birthday_cannot_be_in_the_future() {
        let validator = PastDateValidator::new("Birthday");
        assert!(validator.validate(&Value::text("2000-01-01"), &args()).is_valid());
        assert!(
            validator
                .validate(&Value::text("9999-12-31"), &args())
                .has_rule("notInFuture")
        );
        assert!(
            validator
                .validate(&Value::text("not-a-date"), &args())
                .has_rule("validDate")
        );
    }

    #[test]
    fn list_of_blank_entries_is_rejected() {
        let validator = NonEmptyListValidator::new("Plushies");
        let blank = Value::List(vec!["  ".to_string(), String::new()]);
        assert!(validator.validate(&blank, &args()).has_rule("notEmpty"));

        let filled = Value::List(vec!["Banjo".to_string()]);
        assert!(validator.validate(&filled, &args()).is_valid());
    }

    #[test]
    fn length_validator_messages_carry_bounds() {
        let validator = LengthValidator::new("Bio", Some(2), Some(4));
        let result = validator.validate(&Value::text("a"), &args());
        assert_eq!(
            result.messages(),
            &["Bio must be at least 2 characters long.".to_string()]
        );
    }
}
