//! Tests for the directory user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn draft() -> UserDraft {
    UserDraft {
        id: "1024".to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        phone_number: Some("09121234567".to_owned()),
        role: "Customer".to_owned(),
    }
}

#[rstest]
fn builds_from_valid_draft(draft: UserDraft) {
    let user = User::try_new(draft).expect("valid user");
    assert_eq!(user.id().as_ref(), "1024");
    assert_eq!(user.full_name(), "Ada Lovelace");
    assert_eq!(user.phone_number(), Some("09121234567"));
    assert_eq!(user.role(), "Customer");
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case(" 1024", UserValidationError::InvalidId)]
#[case("1024\n", UserValidationError::InvalidId)]
fn rejects_invalid_ids(
    mut draft: UserDraft,
    #[case] id: &str,
    #[case] expected: UserValidationError,
) {
    draft.id = id.to_owned();
    assert_eq!(User::try_new(draft), Err(expected));
}

#[rstest]
fn rejects_blank_role(mut draft: UserDraft) {
    draft.role = "  ".to_owned();
    assert_eq!(User::try_new(draft), Err(UserValidationError::EmptyRole));
}

#[rstest]
fn full_name_skips_blank_parts(mut draft: UserDraft) {
    draft.first_name = "   ".to_owned();
    let user = User::try_new(draft).expect("valid user");
    assert_eq!(user.full_name(), "Lovelace");
}

#[rstest]
fn with_phone_number_returns_a_copy(draft: UserDraft) {
    let user = User::try_new(draft).expect("valid user");
    let updated = user.with_phone_number(None);
    assert_eq!(user.phone_number(), Some("09121234567"));
    assert_eq!(updated.phone_number(), None);
    assert_eq!(updated.id(), user.id());
}

#[rstest]
fn trimmed_strips_names_and_role(mut draft: UserDraft) {
    draft.first_name = " Ada ".to_owned();
    draft.last_name = "\tLovelace".to_owned();
    draft.role = " Customer\n".to_owned();
    let user = User::try_new(draft).expect("valid user");

    let trimmed = user.trimmed();
    assert_eq!(trimmed.first_name(), "Ada");
    assert_eq!(trimmed.last_name(), "Lovelace");
    assert_eq!(trimmed.role(), "Customer");
    assert_eq!(trimmed.id(), user.id());
    assert_eq!(trimmed.phone_number(), user.phone_number());
    assert_eq!(trimmed.trimmed(), trimmed);
}

#[test]
fn deserialises_snake_and_camel_case() {
    let camel: User = serde_json::from_value(json!({
        "id": "7",
        "firstName": "Grace",
        "lastName": "Hopper",
        "phoneNumber": "09350000000",
        "role": "Admin"
    }))
    .expect("camelCase user");
    let snake: User = serde_json::from_value(json!({
        "id": "7",
        "first_name": "Grace",
        "last_name": "Hopper",
        "phone_number": "09350000000",
        "role": "Admin"
    }))
    .expect("snake_case user");
    assert_eq!(camel, snake);
}

#[test]
fn deserialisation_rejects_empty_id() {
    let result = serde_json::from_value::<User>(json!({ "id": "", "role": "Admin" }));
    assert!(result.is_err());
}
