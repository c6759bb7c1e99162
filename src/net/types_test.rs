use super::*;
use serde_json::json;

#[test]
fn login_credentials_serialize_as_flat_object() {
    let creds = LoginCredentials { username: "alice".to_owned(), password: "pw".to_owned() };
    assert_eq!(serde_json::to_value(&creds).unwrap(), json!({ "username": "alice", "password": "pw" }));
}

#[test]
fn registration_sends_empty_phone() {
    let reg = Registration {
        username: "alice".to_owned(),
        email: "alice@bank.test".to_owned(),
        password: "pw".to_owned(),
        phone: String::new(),
    };
    assert_eq!(
        serde_json::to_value(&reg).unwrap(),
        json!({ "username": "alice", "email": "alice@bank.test", "password": "pw", "phone": "" })
    );
}

#[test]
fn debug_output_redacts_passwords() {
    let creds = LoginCredentials { username: "alice".to_owned(), password: "hunter2".to_owned() };
    let reg = Registration { password: "hunter2".to_owned(), ..Registration::default() };
    assert!(!format!("{creds:?}").contains("hunter2"));
    assert!(!format!("{reg:?}").contains("hunter2"));
}

#[test]
fn login_response_converts_to_session() {
    let resp: LoginResponse = serde_json::from_str(r#"{"username":"alice","role":"Customer"}"#).unwrap();
    assert_eq!(Session::from(resp), Session::new("alice", Role::Customer));
}

#[test]
fn balance_accepts_number_and_numeric_string() {
    let n: BalanceResponse = serde_json::from_str(r#"{"balance":125000}"#).unwrap();
    let s: BalanceResponse = serde_json::from_str(r#"{"balance":"125000.50"}"#).unwrap();
    assert!((n.balance - 125_000.0).abs() < f64::EPSILON);
    assert!((s.balance - 125_000.5).abs() < f64::EPSILON);
    assert!(serde_json::from_str::<BalanceResponse>(r#"{"balance":"lots"}"#).is_err());
}

#[test]
fn error_body_parses_message_and_fields() {
    let msg = ErrorBody::parse(r#"{"error":"username taken"}"#);
    assert_eq!(msg.message(), Some("username taken"));

    let fields = ErrorBody::parse(r#"{"errors":{"email":"already registered"}}"#);
    assert_eq!(fields.message(), None);
    assert!(matches!(fields.error, Some(ErrorDetail::Fields(ref m)) if m["email"] == "already registered"));
}

#[test]
fn error_body_tolerates_garbage() {
    assert!(ErrorBody::parse("<html>502</html>").error.is_none());
    assert!(ErrorBody::parse("").error.is_none());
    assert_eq!(ErrorBody::parse(r#"{"error":"  "}"#).message(), None);
}

#[test]
fn error_body_prefers_error_when_both_keys_present() {
    let both = ErrorBody::parse(r#"{"error":"username taken","errors":{"email":"bad"}}"#);
    assert_eq!(both.message(), Some("username taken"));

    let null_error = ErrorBody::parse(r#"{"error":null,"errors":{"email":"bad"}}"#);
    assert!(matches!(null_error.error, Some(ErrorDetail::Fields(ref m)) if m["email"] == "bad"));
}
