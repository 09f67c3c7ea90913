use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::error::ApiError;

/// The generation credential is supplied per request, either as a Bearer
/// header or a `key` query parameter. It is forwarded upstream and never
/// stored or logged.
pub fn extract_api_key(
    auth: Option<Authorization<Bearer>>,
    query_key: Option<&str>,
) -> Result<String, ApiError> {
    let provided = auth
        .map(|a| a.token().to_string())
        .or_else(|| query_key.map(|s| s.to_string()));
    match provided {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ApiError::BadRequest(
            "Missing generation API key".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_api_key_header() {
        let auth = Authorization::bearer("secret-key").unwrap();
        assert_eq!(extract_api_key(Some(auth), None).unwrap(), "secret-key");
    }

    #[test]
    fn test_extract_api_key_query() {
        assert_eq!(extract_api_key(None, Some("qk")).unwrap(), "qk");
    }

    #[test]
    fn test_header_wins_over_query() {
        let auth = Authorization::bearer("header-key").unwrap();
        assert_eq!(
            extract_api_key(Some(auth), Some("query-key")).unwrap(),
            "header-key"
        );
    }

    #[test]
    fn test_missing_or_blank_key_rejected() {
        assert!(extract_api_key(None, None).is_err());
        assert!(extract_api_key(None, Some("   ")).is_err());
    }
}
