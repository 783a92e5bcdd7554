use super::*;

fn patient_form() -> PatientForm {
    PatientForm {
        name: "Jan".to_string(),
        surname: "Kowalski".to_string(),
        phone_number: "600-700-800".to_string(),
        state: "Pomorskie".to_string(),
        city: "Gdansk".to_string(),
        avenue: "Dluga 1".to_string(),
    }
}

#[test]
fn test_patient_form_strips_phone_separators() {
    let request = patient_form().validate().unwrap();
    assert_eq!(request.phone_number, 600700800);
    assert_eq!(request.address.city, "Gdansk");
    assert_eq!(request.address.id, None);
}

#[test]
fn test_patient_form_reports_every_missing_field() {
    let errors = PatientForm::default().validate().unwrap_err();

    let fields: Vec<&str> = errors.errors().iter().map(|e| e.field).collect();
    assert_eq!(
        fields,
        vec!["name", "surname", "phoneNumber", "state", "city", "avenue"]
    );
    assert_eq!(errors.field("city"), Some("is required"));
}

#[test]
fn test_phone_rules() {
    assert!(is_valid_phone("600700800"));
    assert!(is_valid_phone("600 700 800"));
    assert!(is_valid_phone("12345678"));
    assert!(!is_valid_phone("1234567"));
    assert!(!is_valid_phone("123456789012345"));
    assert!(!is_valid_phone("+48600700800"));
    assert!(!is_valid_phone("600abc800"));

    let mut form = patient_form();
    form.phone_number = "--------".to_string();
    let errors = form.validate().unwrap_err();
    assert!(errors.field("phoneNumber").is_some());
}

#[test]
fn test_patient_form_from_patient() {
    let patient: Patient = serde_json::from_value(serde_json::json!({
        "_id": "p1",
        "name": "Anna",
        "surname": "Nowak",
        "phoneNumber": 123456789,
        "address": { "state": "Mazowieckie", "city": "Warszawa", "avenue": "Prosta 2" }
    }))
    .unwrap();

    let form = PatientForm::from(&patient);

    assert_eq!(form.phone_number, "123456789");
    assert_eq!(form.validate().unwrap().phone_number, 123456789);
}

#[test]
fn test_email_rules() {
    assert!(is_valid_email("anna@example.com"));
    assert!(is_valid_email(" anna.nowak@mail.example.pl "));
    assert!(!is_valid_email("anna"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("anna@example"));
    assert!(!is_valid_email("anna@@example.com"));
    assert!(!is_valid_email("an na@example.com"));
    assert!(!is_valid_email("anna@example..com"));
    assert!(!is_valid_email(".jan@example.com"));
    assert!(!is_valid_email("jan.@example.com"));
    assert!(!is_valid_email("ja..n@example.com"));
    assert!(!is_valid_email("<jan>@example.com"));
    assert!(!is_valid_email("jan@exa_mple.com"));
    assert!(!is_valid_email("Jan <jan@example.com>"));
}

#[test]
fn test_register_form() {
    let form = RegisterForm {
        name: "Anna".to_string(),
        surname: "Nowak".to_string(),
        email: "anna@example.com".to_string(),
        password: "secret123".to_string(),
        repeated_password: "secret123".to_string(),
        terms: true,
    };
    let request = form.validate().unwrap();
    assert_eq!(request.repeated_password, "secret123");

    let form = RegisterForm {
        name: "A".to_string(),
        password: "short".to_string(),
        repeated_password: "other".to_string(),
        terms: false,
        ..form
    };
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.field("name"), Some("must be at least 2 characters"));
    assert_eq!(errors.field("password"), Some("must be at least 8 characters"));
    assert_eq!(
        errors.field("repeatedPassword"),
        Some("passwords do not match")
    );
    assert_eq!(errors.field("terms"), Some("must be accepted"));
}

#[test]
fn test_login_and_profile_forms() {
    let login = LoginForm {
        email: "anna@example.com".to_string(),
        password: String::new(),
    };
    assert_eq!(
        login.validate().unwrap_err().field("password"),
        Some("is required")
    );

    let profile = ProfileForm {
        name: "Anna".to_string(),
        surname: "Nowak".to_string(),
        email: "not-an-email".to_string(),
    };
    let errors = profile.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.to_string(),
        "email: must be a valid email address"
    );
}

#[test]
fn test_password_form() {
    let ok = PasswordForm {
        password: "longenough".to_string(),
        repeated_password: "longenough".to_string(),
    };
    assert!(ok.validate().is_ok());

    let mismatch = PasswordForm {
        password: "longenough".to_string(),
        repeated_password: "longenougH".to_string(),
    };
    assert!(mismatch.validate().unwrap_err().field("repeatedPassword").is_some());
}

#[test]
fn test_avatar_rules() {
    assert!(validate_avatar(&["image/png"]).is_ok());
    assert!(validate_avatar(&[]).is_err());
    assert!(validate_avatar(&["application/pdf"]).is_err());
    assert!(validate_avatar(&["image/png", "image/jpeg"]).is_err());
}
