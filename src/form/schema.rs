use super::FormValues;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::{collections::BTreeMap, marker::PhantomData, sync::LazyLock};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL_REGEX: invalid regex pattern")
});

/// Path used for errors that do not belong to any declared field
pub const ROOT_PATH: &str = "";

/// Field path to the first error message reported for that path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `path`, keeping the first message if one is already present
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (path, message) in iter {
            errors.insert(path, message);
        }
        errors
    }
}

/// Parses raw form values into a typed value or reports per-field errors.
pub trait Schema: Send + Sync {
    type Output: Send + 'static;

    fn parse(&self, values: &FormValues) -> Result<Self::Output, ValidationErrors>;
}

/// Schema used when a form has nothing to validate; always succeeds with the raw values
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSchema;

impl Schema for NoSchema {
    type Output = FormValues;

    fn parse(&self, values: &FormValues) -> Result<FormValues, ValidationErrors> {
        Ok(values.clone())
    }
}

/// A single check applied to a string field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
}

impl Rule {
    /// Returns the error message if `value` violates the rule
    pub fn check(&self, value: &str) -> Option<String> {
        match self {
            Rule::Required if value.is_empty() => Some("Required".to_string()),
            Rule::Email if !EMAIL_REGEX.is_match(value) => Some("Invalid email".to_string()),
            Rule::MinLength(min) if value.chars().count() < *min => Some(format!(
                "String must contain at least {} character(s)",
                min
            )),
            Rule::MaxLength(max) if value.chars().count() > *max => Some(format!(
                "String must contain at most {} character(s)",
                max
            )),
            _ => None,
        }
    }
}

/// Rule-based schema over a fixed set of string fields.
///
/// When every rule passes, the declared fields are deserialized into `T`
/// (missing fields are read as empty strings).
pub struct ObjectSchema<T> {
    fields: Vec<(String, Vec<Rule>)>,
    _output: PhantomData<fn() -> T>,
}

impl<T> ObjectSchema<T> {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            _output: PhantomData,
        }
    }

    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push((name.into(), rules.into_iter().collect()));
        self
    }

    /// Run every rule and collect the first failure per field
    pub fn check(&self, values: &FormValues) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for (name, rules) in &self.fields {
            let value = values.get(name).map(String::as_str).unwrap_or("");
            if let Some(message) = rules.iter().find_map(|rule| rule.check(value)) {
                errors.insert(name.clone(), message);
            }
        }
        errors
    }
}

impl<T> Default for ObjectSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Schema for ObjectSchema<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Output = T;

    fn parse(&self, values: &FormValues) -> Result<T, ValidationErrors> {
        let errors = self.check(values);
        if !errors.is_empty() {
            return Err(errors);
        }

        let object = self
            .fields
            .iter()
            .map(|(name, _)| {
                let value = values.get(name).cloned().unwrap_or_default();
                (name.clone(), serde_json::Value::String(value))
            })
            .collect::<serde_json::Map<_, _>>();

        serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| {
            tracing::error!("Schema output does not match its declared fields: {}", e);
            [(ROOT_PATH, e.to_string())].into_iter().collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Account {
        email: String,
        password: String,
    }

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn account_schema() -> ObjectSchema<Account> {
        ObjectSchema::new()
            .field("email", [Rule::Required, Rule::Email])
            .field(
                "password",
                [Rule::Required, Rule::MinLength(10), Rule::MaxLength(100)],
            )
    }

    #[test]
    fn test_rules() {
        assert_eq!(Rule::Required.check(""), Some("Required".to_string()));
        assert_eq!(Rule::Required.check("x"), None);
        assert_eq!(Rule::Email.check("a@b.co"), None);
        assert_eq!(Rule::Email.check("nope"), Some("Invalid email".to_string()));
        assert_eq!(
            Rule::MinLength(3).check("ab"),
            Some("String must contain at least 3 character(s)".to_string())
        );
        assert_eq!(Rule::MinLength(3).check("äöü"), None);
        assert_eq!(
            Rule::MaxLength(2).check("abc"),
            Some("String must contain at most 2 character(s)".to_string())
        );
    }

    #[test]
    fn test_email_with_surrounding_whitespace_is_invalid() {
        let invalid = Some("Invalid email".to_string());
        assert_eq!(Rule::Email.check(" user@example.com"), invalid);
        assert_eq!(Rule::Email.check("user@example.com "), invalid);
        assert_eq!(Rule::Email.check("user@example.com"), None);
    }

    #[test]
    fn test_output_mismatch_reported_at_root() {
        #[derive(Debug, Deserialize)]
        struct Count {
            #[allow(dead_code)]
            n: u32,
        }

        let schema: ObjectSchema<Count> = ObjectSchema::new().field("n", [Rule::Required]);
        let errors = schema.parse(&values(&[("n", "three")])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get(ROOT_PATH).is_some());
    }

    #[test]
    fn test_first_error_per_field() {
        let errors = account_schema()
            .parse(&values(&[("email", ""), ("password", "")]))
            .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("Required"));
        assert_eq!(errors.get("password"), Some("Required"));
    }

    #[test]
    fn test_missing_fields_read_as_empty() {
        let errors = account_schema().parse(&FormValues::new()).unwrap_err();
        assert_eq!(errors.get("email"), Some("Required"));
    }

    #[test]
    fn test_parse_success() {
        let account = account_schema()
            .parse(&values(&[
                ("email", "user@example.com"),
                ("password", "correct horse"),
                ("ignored", "x"),
            ]))
            .unwrap();

        assert_eq!(
            account,
            Account {
                email: "user@example.com".to_string(),
                password: "correct horse".to_string(),
            }
        );
    }

    #[test]
    fn test_repeated_validation_is_stable() {
        let schema = account_schema();
        let input = values(&[("email", "bad"), ("password", "short")]);

        let first = schema.parse(&input).unwrap_err();
        let second = schema.parse(&input).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_schema_passes_values_through() {
        let input = values(&[("anything", "")]);
        assert_eq!(NoSchema.parse(&input).unwrap(), input);
    }

    #[test]
    fn test_insert_keeps_first_message() {
        let mut errors = ValidationErrors::new();
        errors.insert("email", "first");
        errors.insert("email", "second");
        assert_eq!(errors.get("email"), Some("first"));
    }
}
