//! Validation helpers for API contract types

use crate::error::ApiContractError;
use crate::types::*;
use validator::{Validate, ValidationError};

/// Validate sign-in credentials before they are sent
pub fn validate_sign_in_request(request: &SignInRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a one-time code submission
pub fn validate_code_auth_request(request: &CodeAuthRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a language switch
pub fn validate_change_language_request(
    request: &ChangeLanguageRequest,
) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Language codes start with a 2 or 3 letter language subtag, optionally
/// followed by `_`-separated alphanumeric subtags (`fr`, `fr_FR`, `es_419`,
/// `zh_Hant_TW`)
pub fn validate_language_code(code: &str) -> Result<(), ValidationError> {
    let mut subtags = code.split('_');
    let language = subtags.next().unwrap_or_default();

    let language_ok =
        (2..=3).contains(&language.len()) && language.chars().all(|c| c.is_ascii_alphabetic());
    let rest_ok = subtags.all(|subtag| {
        !subtag.is_empty() && subtag.chars().all(|c| c.is_ascii_alphanumeric())
    });

    if language_ok && rest_ok {
        Ok(())
    } else {
        Err(ValidationError::new("language_code"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sign_in_request_valid() {
        let request = SignInRequest::new("ops@mindsay.com", "hunter2");
        assert!(validate_sign_in_request(&request).is_ok());
    }

    #[test]
    fn test_validate_sign_in_request_bad_email() {
        let request = SignInRequest::new("not-an-email", "hunter2");
        assert!(matches!(
            validate_sign_in_request(&request),
            Err(ApiContractError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_sign_in_request_empty_password() {
        let request = SignInRequest::new("ops@mindsay.com", "");
        assert!(validate_sign_in_request(&request).is_err());
    }

    #[test]
    fn test_validate_code_auth_request() {
        assert!(validate_code_auth_request(&CodeAuthRequest::new("ops@mindsay.com", "123456")).is_ok());
        assert!(validate_code_auth_request(&CodeAuthRequest::new("ops@mindsay.com", "")).is_err());
    }

    #[test]
    fn test_validate_language_code() {
        for ok in ["fr", "fr_FR", "en_GB", "es_419", "fil", "fra_FR", "zh_Hant_TW"] {
            assert!(validate_language_code(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in ["", "f", "french", "fr-FR", "fr_", "fr__FR", "_FR", "fr FR", "12_FR"] {
            assert!(validate_language_code(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_validate_change_language_request() {
        let request = ChangeLanguageRequest {
            language: "fr_FR".to_string(),
        };
        assert!(validate_change_language_request(&request).is_ok());

        let request = ChangeLanguageRequest {
            language: "french".to_string(),
        };
        assert!(validate_change_language_request(&request).is_err());
    }
}
