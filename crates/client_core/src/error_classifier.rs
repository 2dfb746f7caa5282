//! Maps a remote sign-in failure onto the form state.

use shared::error::{ErrorCode, RemoteError};

use crate::sign_in::{SignInOutcome, SignInState};

/// Where a failure is surfaced in the sign-in form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldScope {
    Email,
    Password,
    /// Not attached to any input; shown as a banner.
    General,
}

pub fn scope_of(code: ErrorCode) -> FieldScope {
    match code {
        ErrorCode::EmailFormatInvalid => FieldScope::Email,
        ErrorCode::PasswordFormatInvalid => FieldScope::Password,
        ErrorCode::EmailEmpty
        | ErrorCode::PasswordEmpty
        | ErrorCode::UserUnauthorized
        | ErrorCode::ServerUnavailable
        | ErrorCode::Transport
        | ErrorCode::Internal
        | ErrorCode::Unknown => FieldScope::General,
    }
}

/// Produces the settled state for a failed sign-in.
///
/// The typed-in credentials are carried over from `prior`; every report slot
/// other than the one selected by the error code is cleared.
pub fn classify(error: RemoteError, prior: &SignInState) -> SignInState {
    let mut next = SignInState {
        email: prior.email.clone(),
        password: prior.password.clone(),
        ..SignInState::initial()
    };
    match scope_of(error.code) {
        FieldScope::Email => next.email_error = Some(error.message),
        FieldScope::Password => next.password_error = Some(error.message),
        FieldScope::General => next.outcome = Some(SignInOutcome::Failure(error)),
    }
    next
}

#[cfg(test)]
#[path = "tests/error_classifier_tests.rs"]
mod tests;
