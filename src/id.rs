//! RFC [5424] structured data identifiers.
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424#section-6.3.2

use crate::error::{check_length, ValidationError};
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use std::fmt;

/// Enterprise number meaning "no enterprise number".
pub const RESERVED: i32 = -1;

/// The IANA-registered `timeQuality` SD-ID.
pub static TIME_QUALITY: Lazy<StructuredDataId> = Lazy::new(|| {
    StructuredDataId::registered("timeQuality", &["tzKnown", "isSynced", "syncAccuracy"])
});

/// The IANA-registered `origin` SD-ID.
pub static ORIGIN: Lazy<StructuredDataId> = Lazy::new(|| {
    StructuredDataId::registered("origin", &["ip", "enterpriseId", "software", "swVersion"])
});

/// The IANA-registered `meta` SD-ID.
pub static META: Lazy<StructuredDataId> = Lazy::new(|| {
    StructuredDataId::registered("meta", &["sequenceId", "sysUpTime", "language"])
});

/// An SD-ID: a name, optionally qualified by an enterprise number, plus the
/// parameter names the id requires and allows.
///
/// Canonical form is `name` when the enterprise number is not positive and
/// `name@number` otherwise; it never exceeds 32 characters. The limit is
/// checked when the id is built, never when it is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuredDataId {
    name: Option<String>,
    enterprise_number: i32,
    required: Vec<String>,
    optional: Vec<String>,
}

impl StructuredDataId {
    /// Build an id qualified by an enterprise number.
    ///
    /// **Errors**
    /// - [`ValidationError::MissingName`] if `name` is empty.
    /// - [`ValidationError::MissingEnterpriseNumber`] if `enterprise_number <= 0`.
    /// - [`ValidationError::IdTooLong`] if `name@enterprise_number` exceeds 32 characters.
    pub fn new(
        name: &str,
        enterprise_number: i32,
        required: &[&str],
        optional: &[&str],
    ) -> Result<Self, ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if enterprise_number <= 0 {
            return Err(ValidationError::MissingEnterpriseNumber);
        }
        let id = format!("{}@{}", name, enterprise_number);
        if !check_length(&id) {
            return Err(ValidationError::IdTooLong(id));
        }
        Ok(StructuredDataId {
            name: Some(name.to_string()),
            enterprise_number,
            required: to_owned(required),
            optional: to_owned(optional),
        })
    }

    /// Build an id from its combined textual form, `name` or `name@number`.
    ///
    /// The string is split on its first `@`. Without one the id carries
    /// [`RESERVED`]. An empty string yields an id without a name.
    ///
    /// **Errors**
    /// - [`ValidationError::IdTooLong`] if `combined` exceeds 32 characters.
    /// - [`ValidationError::BadEnterpriseNumber`] if the suffix is not an integer.
    pub fn parse(
        combined: &str,
        required: &[&str],
        optional: &[&str],
    ) -> Result<Self, ValidationError> {
        if !check_length(combined) {
            return Err(ValidationError::IdTooLong(combined.to_string()));
        }
        let (name, enterprise_number) = match combined.find('@') {
            Some(index) if index > 0 => {
                let number = combined[index + 1..].parse::<i32>().map_err(|source| {
                    ValidationError::BadEnterpriseNumber {
                        id: combined.to_string(),
                        source,
                    }
                })?;
                (&combined[..index], number)
            }
            _ => (combined, RESERVED),
        };
        Ok(StructuredDataId {
            name: (!name.is_empty()).then(|| name.to_string()),
            enterprise_number,
            required: to_owned(required),
            optional: to_owned(optional),
        })
    }

    fn registered(name: &str, optional: &[&str]) -> Self {
        StructuredDataId {
            name: Some(name.to_string()),
            enterprise_number: RESERVED,
            required: Vec::new(),
            optional: to_owned(optional),
        }
    }

    /// Fill in defaults from `default`.
    ///
    /// With no default this id is returned unchanged. An id without a name
    /// takes the default wholesale. Otherwise this id keeps its name and
    /// parameter lists and borrows the default's enterprise number only when
    /// it has none of its own.
    pub fn merge_with(&self, default: Option<&StructuredDataId>) -> StructuredDataId {
        let default = match default {
            Some(default) => default,
            None => return self.clone(),
        };
        if self.name.is_none() {
            return default.clone();
        }
        let mut merged = self.clone();
        if merged.is_reserved() && !default.is_reserved() {
            merged.enterprise_number = default.enterprise_number;
        }
        merged
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn enterprise_number(&self) -> i32 {
        self.enterprise_number
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    /// Does this id lack an enterprise number?
    pub fn is_reserved(&self) -> bool {
        self.enterprise_number <= 0
    }

    /// Canonical textual form.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

/// No name, and [`RESERVED`] as the enterprise number.
impl Default for StructuredDataId {
    fn default() -> Self {
        StructuredDataId {
            name: None,
            enterprise_number: RESERVED,
            required: Vec::new(),
            optional: Vec::new(),
        }
    }
}

fn to_owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

impl fmt::Display for StructuredDataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("");
        if self.is_reserved() {
            f.write_str(name)
        } else {
            write!(f, "{}@{}", name, self.enterprise_number)
        }
    }
}

impl Serialize for StructuredDataId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn renders_with_enterprise_number() {
        let id = StructuredDataId::new("exampleSDID", 32473, &["iut"], &[]).unwrap();
        assert_eq!(id.render(), "exampleSDID@32473");
        assert_eq!(id.required(), &["iut".to_string()]);
        assert!(!id.is_reserved());
    }

    #[test]
    fn rejects_missing_pieces() {
        assert_eq!(
            StructuredDataId::new("", 1, &[], &[]),
            Err(ValidationError::MissingName)
        );
        assert_eq!(
            StructuredDataId::new("login", 0, &[], &[]),
            Err(ValidationError::MissingEnterpriseNumber)
        );
        assert_eq!(
            StructuredDataId::new("login", -5, &[], &[]),
            Err(ValidationError::MissingEnterpriseNumber)
        );
    }

    #[test]
    fn combined_length_is_checked() {
        // 26 + 1 + 5 == 32
        let name = "abcdefghijklmnopqrstuvwxyz";
        assert!(StructuredDataId::new(name, 12345, &[], &[]).is_ok());
        assert!(matches!(
            StructuredDataId::new(name, 123456, &[], &[]),
            Err(ValidationError::IdTooLong(_))
        ));
    }

    #[test]
    fn parses_combined_form() {
        let id = StructuredDataId::parse("origin@18060", &[], &[]).unwrap();
        assert_eq!(id.name(), Some("origin"));
        assert_eq!(id.enterprise_number(), 18060);

        let id = StructuredDataId::parse("login", &[], &[]).unwrap();
        assert_eq!(id.enterprise_number(), RESERVED);
        assert_eq!(id.render(), "login");

        let id = StructuredDataId::parse("a@1@2", &[], &[]);
        assert!(matches!(id, Err(ValidationError::BadEnterpriseNumber { .. })));

        let id = StructuredDataId::parse("login@abc", &[], &[]);
        assert!(matches!(id, Err(ValidationError::BadEnterpriseNumber { .. })));
    }

    #[test]
    fn parse_checks_length_before_splitting() {
        let long = "x".repeat(33);
        assert!(matches!(
            StructuredDataId::parse(&long, &[], &[]),
            Err(ValidationError::IdTooLong(_))
        ));
        assert!(StructuredDataId::parse(&"x".repeat(32), &[], &[]).is_ok());
    }

    #[test]
    fn leading_at_is_part_of_the_name() {
        let id = StructuredDataId::parse("@123", &[], &[]).unwrap();
        assert_eq!(id.name(), Some("@123"));
        assert!(id.is_reserved());
    }

    #[test]
    fn merge_without_default_is_identity() {
        let id = StructuredDataId::parse("login", &["user"], &[]).unwrap();
        assert_eq!(id.merge_with(None), id);
    }

    #[test]
    fn merge_fills_enterprise_number_only() {
        let id = StructuredDataId::parse("login", &["user"], &["ip"]).unwrap();
        let default = StructuredDataId::new("other", 99, &["x"], &[]).unwrap();
        let merged = id.merge_with(Some(&default));
        assert_eq!(merged.name(), Some("login"));
        assert_eq!(merged.enterprise_number(), 99);
        assert_eq!(merged.required(), &["user".to_string()]);
        assert_eq!(merged.optional(), &["ip".to_string()]);

        let own = StructuredDataId::new("login", 7, &[], &[]).unwrap();
        assert_eq!(own.merge_with(Some(&default)).enterprise_number(), 7);
    }

    #[test]
    fn unnamed_id_adopts_default() {
        let unnamed = StructuredDataId::default();
        let default = StructuredDataId::new("other", 99, &["x"], &[]).unwrap();
        assert_eq!(unnamed.merge_with(Some(&default)), default);
    }

    #[test]
    fn default_is_an_empty_parse() {
        let id = StructuredDataId::default();
        assert_eq!(id.enterprise_number(), RESERVED);
        assert_eq!(StructuredDataId::parse("", &[], &[]).unwrap(), id);
    }

    #[test]
    fn well_known_ids() {
        assert_eq!(TIME_QUALITY.render(), "timeQuality");
        assert_eq!(ORIGIN.optional().len(), 4);
        assert_eq!(META.name(), Some("meta"));
        assert!(META.is_reserved());
    }

    proptest! {
        #[test]
        fn canonical_form_matches_parts(name in "[a-zA-Z]{1,20}", number in 1i32..1_000_000) {
            let id = StructuredDataId::new(&name, number, &[], &[]).unwrap();
            prop_assert_eq!(id.render(), format!("{}@{}", name, number));
        }

        #[test]
        fn oversized_names_are_rejected(name in "[a-z]{33,64}") {
            prop_assert!(StructuredDataId::parse(&name, &[], &[]).is_err());
            prop_assert!(StructuredDataId::new(&name, 1, &[], &[]).is_err());
        }
    }
}
