use super::*;

#[test]
fn email_rules() {
    assert!(is_valid_email("jane@shop.test"));
    assert!(is_valid_email("  jane.doe+gift@mail.shop.test "));
    assert!(!is_valid_email("jane@shop"));
    assert!(!is_valid_email("jane shop@test.com"));
    assert!(!is_valid_email("@shop.test"));
}

#[test]
fn phone_rules_ignore_whitespace() {
    assert!(is_valid_phone("+1 555 010 9999"));
    assert!(is_valid_phone("4155550100"));
    assert!(!is_valid_phone("0123456"));
    assert!(!is_valid_phone("+1-555-0100"));
    assert!(!is_valid_phone("12345678901234567"));
}

#[test]
fn password_and_search_reject_blank() {
    assert_eq!(validate_password("  hunter2 "), Ok("hunter2"));
    assert_eq!(validate_password("   "), Err(ValidationError::EmptyPassword));
    assert_eq!(validate_search_term(" shirt"), Ok("shirt"));
    let err = validate_search_term("").unwrap_err();
    assert_eq!(err.to_string(), "Please enter a search term");
    assert_eq!(err.error_code(), "E_EMPTY_SEARCH");
}

#[test]
fn recipient_form_skips_validation_while_disabled() {
    let form = RecipientForm::standard();
    assert!(!form.is_enabled());
    assert!(form.validate().is_ok());
    assert!(form.data().is_none());
}

#[test]
fn recipient_form_reports_each_bad_field() {
    let mut form = RecipientForm::standard();
    form.set_enabled(true);
    form.set_value("email", "not-an-email");

    let errors = form.validate().unwrap_err();
    assert_eq!(
        errors,
        vec![
            ("name".to_owned(), ValidationError::Required { field: "name".to_owned() }),
            ("email".to_owned(), ValidationError::InvalidEmail),
        ]
    );
}

#[test]
fn recipient_form_valid_data_and_reset_on_disable() {
    let mut form = RecipientForm::standard();
    form.set_enabled(true);
    assert!(form.set_value("name", " Ada "));
    assert!(form.set_value("email", "ada@shop.test"));
    assert!(!form.set_value("nickname", "x"));
    assert!(form.validate().is_ok());
    assert_eq!(form.data().unwrap().get("name").map(String::as_str), Some("Ada"));

    form.set_enabled(false);
    form.set_enabled(true);
    assert!(form.validate().is_err());
}

#[test]
fn optional_field_still_checks_format() {
    let mut field = Field::new("phone", FieldKind::Tel, false);
    assert!(field.validate().is_ok());
    field.value = "abc".into();
    assert_eq!(field.validate(), Err(ValidationError::InvalidPhone));
}

#[test]
fn quantity_clamps_and_steps() {
    let bounds = QuantityBounds::default();
    assert_eq!(bounds.parse("5"), 5);
    assert_eq!(bounds.parse("0"), 1);
    assert_eq!(bounds.parse("-3"), 1);
    assert_eq!(bounds.parse("abc"), 1);
    assert_eq!(bounds.parse("5000"), 999);
    assert_eq!(bounds.increase(999), 999);
    assert_eq!(bounds.increase(3), 4);
    assert_eq!(bounds.decrease(1), 1);
    assert_eq!(bounds.decrease(4), 3);
}

#[test]
fn quantity_check_rejects_out_of_range() {
    let bounds = QuantityBounds { min: 2, max: 10 };
    assert_eq!(bounds.check(5), Ok(5));
    let err = bounds.check(11).unwrap_err();
    assert_eq!(err, ValidationError::QuantityOutOfRange { value: 11, min: 2, max: 10 });
    assert_eq!(err.to_string(), "Quantity must be between 2 and 10");
}

#[test]
fn price_helpers() {
    assert_eq!(price_per_item(1200, 4), 300);
    assert_eq!(price_per_item(1200, 0), 1200);
    assert_eq!(line_total(1999, 3), 5997);
    assert_eq!(line_total(u64::MAX, 2), u64::MAX);
}
