use super::*;

const ALL_CODES: [ErrorCode; 9] = [
    ErrorCode::EmailFormatInvalid,
    ErrorCode::PasswordFormatInvalid,
    ErrorCode::EmailEmpty,
    ErrorCode::PasswordEmpty,
    ErrorCode::UserUnauthorized,
    ErrorCode::ServerUnavailable,
    ErrorCode::Transport,
    ErrorCode::Internal,
    ErrorCode::Unknown,
];

fn submitting() -> SignInState {
    SignInState {
        email: Some("a@b.com".into()),
        password: Some("pw".into()),
        is_submitting: true,
        ..SignInState::initial()
    }
}

#[test]
fn email_format_error_lands_on_email_field() {
    let next = classify(
        RemoteError::new(ErrorCode::EmailFormatInvalid, "bad format"),
        &submitting(),
    );

    assert_eq!(next.email_error.as_deref(), Some("bad format"));
    assert_eq!(next.password_error, None);
    assert_eq!(next.outcome, None);
    assert!(!next.is_submitting);
    assert_eq!(next.email.as_deref(), Some("a@b.com"));
}

#[test]
fn password_format_error_lands_on_password_field() {
    let prior = SignInState {
        email_error: Some("stale".into()),
        ..submitting()
    };
    let next = classify(
        RemoteError::new(ErrorCode::PasswordFormatInvalid, "too short"),
        &prior,
    );

    assert_eq!(next.password_error.as_deref(), Some("too short"));
    assert_eq!(next.email_error, None);
    assert_eq!(next.outcome, None);
    assert!(!next.is_submitting);
}

#[test]
fn other_codes_become_a_general_failure() {
    let error = RemoteError::new(ErrorCode::ServerUnavailable, "try later");
    let next = classify(error.clone(), &submitting());

    assert_eq!(next.outcome, Some(SignInOutcome::Failure(error)));
    assert_eq!(next.email_error, None);
    assert_eq!(next.password_error, None);
    assert!(!next.is_submitting);
}

#[test]
fn every_code_resolves_to_exactly_one_slot() {
    for code in ALL_CODES {
        let next = classify(RemoteError::new(code, "msg"), &submitting());
        let filled = [
            next.email_error.is_some(),
            next.password_error.is_some(),
            next.outcome.is_some(),
        ]
        .into_iter()
        .filter(|filled| *filled)
        .count();
        assert_eq!(filled, 1, "{code:?}");
        assert!(next.is_consistent(), "{code:?}");
    }
}

#[test]
fn only_format_codes_are_field_scoped() {
    for code in ALL_CODES {
        let expected = match code {
            ErrorCode::EmailFormatInvalid => FieldScope::Email,
            ErrorCode::PasswordFormatInvalid => FieldScope::Password,
            _ => FieldScope::General,
        };
        assert_eq!(scope_of(code), expected, "{code:?}");
    }
}
