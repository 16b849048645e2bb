use services::AuthError;

/// Text shown under a sign-in or sign-up form.
#[must_use]
pub fn auth_error_message(err: &AuthError) -> String {
    match err {
        AuthError::Credentials(_)
        | AuthError::Rejected(_)
        | AuthError::ConfirmationRequired
        | AuthError::NoPendingOAuth
        | AuthError::Callback(_) => err.to_string(),
        AuthError::Http(_) | AuthError::HttpStatus(_) => {
            "Could not reach the sign-in service. Check your connection and try again.".into()
        }
        _ => "Something went wrong. Please try again.".into(),
    }
}
