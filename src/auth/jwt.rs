//! Session tokens are issued by the external auth provider (HS256, shared
//! secret). This service only verifies them; `generate_token` exists for the
//! CLI and tests.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use super::CryptResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

pub fn generate_token<K: AsRef<[u8]>>(claims: SessionClaims, key: K) -> CryptResult<String> {
    let header = Header::default();
    let key = EncodingKey::from_secret(key.as_ref());

    let token = jsonwebtoken::encode(&header, &claims, &key)?;
    Ok(token)
}

pub fn process_token<K: AsRef<[u8]>>(
    token: &str,
    key: K,
) -> jsonwebtoken::errors::Result<TokenData<SessionClaims>> {
    let mut validation = Validation::default();
    // provider tokens carry an audience we don't care about
    validation.validate_aud = false;
    let key = DecodingKey::from_secret(key.as_ref());

    jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod test {
    use super::*;

    fn claims(exp: i64) -> SessionClaims {
        SessionClaims {
            sub: uuid::Uuid::new_v4().to_string(),
            exp,
            email: Some("admin@example.com".into()),
        }
    }

    #[test]
    fn token_roundtrips_with_same_secret() {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
        let c = claims(exp);
        let token = generate_token(c.clone(), "secret").unwrap();

        let data = process_token(&token, "secret").unwrap();
        assert_eq!(data.claims.sub, c.sub);
        assert_eq!(data.claims.email.as_deref(), Some("admin@example.com"));
    }

    #[test]
    fn token_rejected_with_other_secret() {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
        let token = generate_token(claims(exp), "secret").unwrap();
        assert!(process_token(&token, "another").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let exp = (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp();
        let token = generate_token(claims(exp), "secret").unwrap();
        assert!(process_token(&token, "secret").is_err());
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
