use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    consts::consts::{
        PersonId, AGE_UPPER_BOUND, CONTACT_MESSAGE_MIN_CHARS, LOCATION_FIELD_MAX_CHARS,
        NAME_MAX_CHARS, NAME_MIN_CHARS, PASSWORD_MIN_CHARS,
    },
    model::{
        location::LocationRecord,
        person::{MergedPerson, PersonPublicView, PersonRecord},
    },
    validation::rules::{evaluate, FieldRule, Violation},
};

use super::directory::PersonDirectory;

#[derive(Error, Debug, PartialEq)]
pub enum GatewayError {
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<Violation>),

    #[error("This person doesn't exist")]
    NotFound,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersonQueryEcho {
    pub name: Option<String>,
    pub age: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LoginResult {
    pub username: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContactReceipt {
    pub user_agent: String,
    pub ads_cookie_present: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UploadSummary {
    pub filename: String,
    pub content_type: String,
    pub size_kb: f64,
}

/// Fields accepted by the contact operation. All optional at the type level so
/// that missing fields surface as aggregated violations rather than a
/// deserialization failure.
#[derive(Deserialize, Clone, Debug)]
pub struct ContactForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// The Validation Gateway. Applies per-field constraints to structured input
/// and either rejects with an aggregated error or hands a normalized record
/// back to the caller. Holds no state beyond the injected directory.
#[derive(Clone)]
pub struct ValidationGateway {
    directory: Arc<dyn PersonDirectory>,
}

impl ValidationGateway {
    pub fn new(directory: Arc<dyn PersonDirectory>) -> Self {
        Self { directory }
    }

    /// Applies the person field constraints, on success returns the public
    /// projection (secrets stripped). Every failing field is reported.
    pub fn validate_and_echo_person(
        &self,
        person: &PersonRecord,
    ) -> Result<PersonPublicView, GatewayError> {
        let violations = evaluate(&person_rules(person));

        if !violations.is_empty() {
            return Err(GatewayError::Validation(violations));
        }

        Ok(PersonPublicView::from_record(person))
    }

    /// Succeeds iff the id is known to the directory
    pub fn lookup_person_by_id(&self, id: PersonId) -> Result<(), GatewayError> {
        if self.directory.contains(id) {
            return Ok(());
        }

        Err(GatewayError::NotFound)
    }

    /// Validates both records and merges them field-by-field into the union.
    /// The key sets are disjoint so neither side overrides the other.
    pub fn update_person(
        &self,
        _id: PersonId,
        person: &PersonRecord,
        location: Option<&LocationRecord>,
    ) -> Result<MergedPerson, GatewayError> {
        let mut rules = person_rules(person);

        if let Some(location) = location {
            rules.extend(location_rules(location));
        }

        let violations = evaluate(&rules);

        if !violations.is_empty() {
            return Err(GatewayError::Validation(violations));
        }

        Ok(MergedPerson {
            person: person.clone(),
            location: location.cloned(),
        })
    }

    /// Echo of the query-parameter validation endpoint: name is optional and
    /// bounded, age is required but otherwise unconstrained.
    pub fn person_detail(
        &self,
        name: Option<&str>,
        age: Option<&str>,
    ) -> Result<PersonQueryEcho, GatewayError> {
        let mut rules = vec![FieldRule::Required {
            field: "age",
            value: age,
        }];

        if let Some(name) = name {
            rules.push(FieldRule::Length {
                field: "name",
                value: name,
                min: NAME_MIN_CHARS,
                max: NAME_MAX_CHARS,
            });
        }

        let violations = evaluate(&rules);

        if !violations.is_empty() {
            return Err(GatewayError::Validation(violations));
        }

        Ok(PersonQueryEcho {
            name: name.map(str::to_string),
            age: age.unwrap_or_default().to_string(),
        })
    }

    /// Succeeds iff both fields are present and non-empty. Performs no
    /// credential check against any store.
    pub fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginResult, GatewayError> {
        let violations = evaluate(&[
            FieldRule::Required {
                field: "username",
                value: username,
            },
            FieldRule::Required {
                field: "password",
                value: password,
            },
        ]);

        if !violations.is_empty() {
            return Err(GatewayError::Validation(violations));
        }

        Ok(LoginResult {
            username: username.unwrap_or_default().to_string(),
            message: "Login successful".to_string(),
        })
    }

    /// Contact form validation plus an echo of the request's ambient data
    /// (user agent header, presence of the ads cookie).
    pub fn contact(
        &self,
        form: &ContactForm,
        user_agent: &str,
        ads_cookie: Option<&str>,
    ) -> Result<ContactReceipt, GatewayError> {
        let mut rules = vec![
            FieldRule::Required {
                field: "first_name",
                value: form.first_name.as_deref(),
            },
            FieldRule::Required {
                field: "last_name",
                value: form.last_name.as_deref(),
            },
            FieldRule::Required {
                field: "email",
                value: form.email.as_deref(),
            },
            FieldRule::Required {
                field: "message",
                value: form.message.as_deref(),
            },
        ];

        if let Some(first_name) = form.first_name.as_deref() {
            rules.push(FieldRule::Length {
                field: "first_name",
                value: first_name,
                min: NAME_MIN_CHARS,
                max: NAME_MAX_CHARS,
            });
        }

        if let Some(last_name) = form.last_name.as_deref() {
            rules.push(FieldRule::Length {
                field: "last_name",
                value: last_name,
                min: NAME_MIN_CHARS,
                max: NAME_MAX_CHARS,
            });
        }

        if let Some(email) = form.email.as_deref() {
            rules.push(FieldRule::EmailSyntax {
                field: "email",
                value: email,
            });
        }

        if let Some(message) = form.message.as_deref() {
            rules.push(FieldRule::MinLength {
                field: "message",
                value: message,
                min: CONTACT_MESSAGE_MIN_CHARS,
            });
        }

        let violations = evaluate(&rules);

        if !violations.is_empty() {
            return Err(GatewayError::Validation(violations));
        }

        Ok(ContactReceipt {
            user_agent: user_agent.to_string(),
            ads_cookie_present: ads_cookie.is_some(),
        })
    }

    /// Summarises an uploaded file. Size is the byte length divided by 1024,
    /// rounded to two decimal places; empty input yields 0.0.
    pub fn upload_file(
        &self,
        filename: String,
        content_type: String,
        bytes: &[u8],
    ) -> UploadSummary {
        let size_kb = (bytes.len() as f64 / 1024.0 * 100.0).round() / 100.0;

        UploadSummary {
            filename,
            content_type,
            size_kb,
        }
    }
}

fn person_rules<'a>(person: &'a PersonRecord) -> Vec<FieldRule<'a>> {
    let mut rules = vec![
        FieldRule::Length {
            field: "first_name",
            value: &person.first_name,
            min: NAME_MIN_CHARS,
            max: NAME_MAX_CHARS,
        },
        FieldRule::Length {
            field: "last_name",
            value: &person.last_name,
            min: NAME_MIN_CHARS,
            max: NAME_MAX_CHARS,
        },
        FieldRule::Range {
            field: "age",
            value: person.age,
            gt: 0,
            le: AGE_UPPER_BOUND,
        },
        FieldRule::MinLength {
            field: "password",
            value: &person.password,
            min: PASSWORD_MIN_CHARS,
        },
    ];

    if let Some(email) = person.email.as_deref() {
        rules.push(FieldRule::EmailSyntax {
            field: "email",
            value: email,
        });
    }

    if let Some(url) = person.website_url.as_deref() {
        rules.push(FieldRule::UrlSyntax {
            field: "website_url",
            value: url,
        });
    }

    if let Some(card) = person.payment_card_number.as_deref() {
        rules.push(FieldRule::CardChecksum {
            field: "payment_card_number",
            value: card,
        });
    }

    rules
}

fn location_rules<'a>(location: &'a LocationRecord) -> Vec<FieldRule<'a>> {
    vec![
        FieldRule::Length {
            field: "city",
            value: &location.city,
            min: 1,
            max: LOCATION_FIELD_MAX_CHARS,
        },
        FieldRule::Length {
            field: "state",
            value: &location.state,
            min: 1,
            max: LOCATION_FIELD_MAX_CHARS,
        },
        FieldRule::Length {
            field: "country",
            value: &location.country,
            min: 1,
            max: LOCATION_FIELD_MAX_CHARS,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::directory::FixedPersonDirectory;
    use rstest::rstest;

    fn test_gateway() -> ValidationGateway {
        ValidationGateway::new(Arc::new(FixedPersonDirectory::with_known_ids()))
    }

    fn expect_violations(result: Result<impl std::fmt::Debug, GatewayError>) -> Vec<Violation> {
        match result {
            Err(GatewayError::Validation(violations)) => violations,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    mod echo_person {
        use super::*;

        #[test]
        fn valid_record_returns_projection_without_secrets() {
            // Given a fully valid record
            let person = PersonRecord::new_test();

            // When validated
            let view = test_gateway()
                .validate_and_echo_person(&person)
                .expect("valid record should pass");

            // Then the projection echoes the input minus the secret fields
            assert_eq!(view, PersonPublicView::from_record(&person));
            let json = serde_json::to_value(&view).expect("should serialize");
            assert!(json.get("password").is_none());
            assert!(json.get("payment_card_number").is_none());
        }

        #[rstest]
        #[case::zero(0)]
        #[case::negative(-1)]
        #[case::over_limit(116)]
        fn age_outside_bounds_fails(#[case] age: i64) {
            let person = PersonRecord {
                age,
                ..PersonRecord::new_test()
            };

            let violations = expect_violations(test_gateway().validate_and_echo_person(&person));
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "age");
        }

        #[test]
        fn every_failing_field_is_reported() {
            // Given a record with three independent violations
            let person = PersonRecord {
                first_name: "".to_string(),
                age: 0,
                password: "short".to_string(),
                ..PersonRecord::new_test()
            };

            // When validated
            let violations = expect_violations(test_gateway().validate_and_echo_person(&person));

            // Then all three are reported, not just the first
            let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
            assert_eq!(fields, vec!["first_name", "age", "password"]);
        }

        #[test]
        fn absent_optional_fields_are_not_checked() {
            let person = PersonRecord {
                hair_color: None,
                is_married: None,
                email: None,
                website_url: None,
                payment_card_number: None,
                ..PersonRecord::new_test()
            };

            assert!(test_gateway().validate_and_echo_person(&person).is_ok());
        }

        #[test]
        fn bad_website_url_fails() {
            let person = PersonRecord {
                website_url: Some("twitter.com/home".to_string()),
                ..PersonRecord::new_test()
            };

            let violations = expect_violations(test_gateway().validate_and_echo_person(&person));
            assert_eq!(violations[0].field, "website_url");
            assert_eq!(violations[0].rule, "url_syntax");
        }

        #[test]
        fn bad_card_checksum_fails() {
            let person = PersonRecord {
                payment_card_number: Some("4539148803436468".to_string()),
                ..PersonRecord::new_test()
            };

            let violations = expect_violations(test_gateway().validate_and_echo_person(&person));
            assert_eq!(violations[0].rule, "card_checksum");
        }
    }

    mod lookup {
        use super::*;

        #[test]
        fn member_of_fixed_set_is_found() {
            assert!(test_gateway().lookup_person_by_id(PersonId(3)).is_ok());
        }

        #[test]
        fn unknown_id_is_not_found_with_fixed_message() {
            let err = test_gateway()
                .lookup_person_by_id(PersonId(99))
                .expect_err("99 is not a known id");

            assert_eq!(err, GatewayError::NotFound);
            assert_eq!(err.to_string(), "This person doesn't exist");
        }

        #[test]
        fn directory_is_injectable() {
            let gateway =
                ValidationGateway::new(Arc::new(FixedPersonDirectory::with_ids(&[99])));

            assert!(gateway.lookup_person_by_id(PersonId(99)).is_ok());
            assert!(gateway.lookup_person_by_id(PersonId(1)).is_err());
        }
    }

    mod update {
        use super::*;
        use crate::model::location::LocationRecord;

        #[test]
        fn merge_contains_every_field_from_both_inputs() {
            // Given a valid person and location
            let person = PersonRecord::new_test();
            let location = LocationRecord::new_test();

            // When updated
            let merged = test_gateway()
                .update_person(PersonId(123), &person, Some(&location))
                .expect("valid inputs should merge");

            // Then the serialized union carries every field from both inputs
            // with no collisions, write-side fields included
            let json = serde_json::to_value(&merged).expect("should serialize");
            let keys = json.as_object().expect("should be an object");

            for key in [
                "first_name",
                "last_name",
                "age",
                "hair_color",
                "is_married",
                "email",
                "website_url",
                "password",
                "payment_card_number",
                "city",
                "state",
                "country",
            ] {
                assert!(keys.contains_key(key), "missing key: {}", key);
            }

            assert_eq!(keys.len(), 12);
            assert_eq!(keys.get("city").and_then(|v| v.as_str()), Some("Medellin"));
            assert_eq!(
                keys.get("first_name").and_then(|v| v.as_str()),
                Some("Michelle")
            );
            assert_eq!(
                keys.get("password").and_then(|v| v.as_str()),
                Some("hunter2hunter2")
            );
        }

        #[test]
        fn location_is_optional() {
            let merged = test_gateway()
                .update_person(PersonId(1), &PersonRecord::new_test(), None)
                .expect("person alone should merge");

            assert_eq!(merged.location, None);
        }

        #[test]
        fn violations_from_both_records_aggregate() {
            let person = PersonRecord {
                age: 0,
                ..PersonRecord::new_test()
            };
            let location = LocationRecord {
                city: "".to_string(),
                ..LocationRecord::new_test()
            };

            let violations = expect_violations(test_gateway().update_person(
                PersonId(1),
                &person,
                Some(&location),
            ));

            let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
            assert_eq!(fields, vec!["age", "city"]);
        }
    }

    mod login {
        use super::*;

        #[test]
        fn present_credentials_always_succeed() {
            let result = test_gateway()
                .login(Some("michelle"), Some("whatever"))
                .expect("present credentials should succeed");

            assert_eq!(result.username, "michelle");
            assert_eq!(result.message, "Login successful");
        }

        #[rstest]
        #[case::missing_password(Some("michelle"), None)]
        #[case::empty_password(Some("michelle"), Some(""))]
        #[case::missing_username(None, Some("whatever"))]
        fn absent_or_empty_credentials_fail(
            #[case] username: Option<&str>,
            #[case] password: Option<&str>,
        ) {
            assert!(test_gateway().login(username, password).is_err());
        }
    }

    mod detail {
        use super::*;

        #[test]
        fn age_is_required() {
            let violations = expect_violations(test_gateway().person_detail(None, None));
            assert_eq!(violations[0].field, "age");
        }

        #[test]
        fn name_is_optional_but_bounded() {
            assert!(test_gateway().person_detail(None, Some("27")).is_ok());

            let long_name = "x".repeat(51);
            let violations =
                expect_violations(test_gateway().person_detail(Some(&long_name), Some("27")));
            assert_eq!(violations[0].field, "name");
        }

        #[test]
        fn echoes_both_parameters() {
            let echo = test_gateway()
                .person_detail(Some("Michelle"), Some("27"))
                .expect("valid query should echo");

            assert_eq!(echo.name.as_deref(), Some("Michelle"));
            assert_eq!(echo.age, "27");
        }
    }

    mod contact {
        use super::*;

        fn valid_form() -> ContactForm {
            ContactForm {
                first_name: Some("Michelle".to_string()),
                last_name: Some("Duque".to_string()),
                email: Some("michelle@gmail.com".to_string()),
                message: Some("This message is definitely long enough.".to_string()),
            }
        }

        #[test]
        fn valid_form_echoes_ambient_data() {
            let receipt = test_gateway()
                .contact(&valid_form(), "curl/8.0", Some("tracker=1"))
                .expect("valid form should pass");

            assert_eq!(receipt.user_agent, "curl/8.0");
            assert!(receipt.ads_cookie_present);
        }

        #[test]
        fn short_message_fails() {
            let form = ContactForm {
                message: Some("too short".to_string()),
                ..valid_form()
            };

            let violations =
                expect_violations(test_gateway().contact(&form, "curl/8.0", None));
            assert_eq!(violations[0].field, "message");
            assert_eq!(violations[0].rule, "min_length");
        }

        #[test]
        fn missing_fields_all_reported() {
            let form = ContactForm {
                first_name: None,
                last_name: None,
                email: Some("michelle@gmail.com".to_string()),
                message: Some("This message is definitely long enough.".to_string()),
            };

            let violations =
                expect_violations(test_gateway().contact(&form, "curl/8.0", None));
            assert_eq!(violations.len(), 2);
        }
    }

    mod upload {
        use super::*;

        #[rstest]
        #[case::empty(0, 0.0)]
        #[case::exactly_one_kb(1024, 1.0)]
        #[case::one_and_a_half_kb(1536, 1.5)]
        #[case::rounds_to_two_decimals(1000, 0.98)]
        fn size_kb_is_bytes_over_1024_rounded(#[case] len: usize, #[case] expected: f64) {
            let bytes = vec![0u8; len];

            let summary = test_gateway().upload_file(
                "pic.png".to_string(),
                "image/png".to_string(),
                &bytes,
            );

            assert_eq!(summary.size_kb, expected);
            assert_eq!(summary.filename, "pic.png");
            assert_eq!(summary.content_type, "image/png");
        }
    }
}
