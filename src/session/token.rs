use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct DisplayClaims {
    exp: Option<i64>,
}

/// Expiry of a bearer token, read from its `exp` claim.
///
/// The signature is NOT verified: the client has no key and this is only
/// used to show when the session will lapse. Returns `None` for tokens
/// that are not JWTs or carry no expiry.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let header = decode_header(token).ok()?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<DisplayClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    data.claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
}

pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    matches!(token_expiry(token), Some(exp) if exp <= now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        role: String,
        exp: i64,
    }

    fn issue(exp: i64) -> String {
        let claims = Claims {
            sub: "staff@example.org".into(),
            role: "Staff".into(),
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-only")).unwrap()
    }

    #[test]
    fn reads_expiry_without_the_signing_key() {
        let token = issue(1_900_000_000);
        let exp = token_expiry(&token).unwrap();
        assert_eq!(exp.timestamp(), 1_900_000_000);
    }

    #[test]
    fn expired_tokens_are_detected() {
        let token = issue(1_000_000_000);
        assert!(is_expired(&token, Utc::now()));
        assert!(!is_expired(&issue(4_000_000_000), Utc::now()));
    }

    #[test]
    fn opaque_tokens_have_no_expiry() {
        assert!(token_expiry("not-a-jwt").is_none());
        assert!(!is_expired("not-a-jwt", Utc::now()));
    }
}
