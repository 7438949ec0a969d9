use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::ops::Add;

use crate::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub exp: i64,
}

/// HS256 signing material plus the token lifetime, built once from the
/// configured secret and shared with handlers through an `Extension` layer.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_secs: i64) -> TokenKeys {
        TokenKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issues a signed bearer token asserting `id`/`email` until `now + ttl`.
    pub fn issue(&self, id: i32, email: &str, now: DateTime<Utc>) -> Result<String, Error> {
        let claims = Claims {
            sub: id,
            email: email.to_string(),
            exp: now.add(self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|err| Error::InternalError {
            kind: "TokenError",
            message: err.to_string(),
        })
    }

    /// Verifies signature and expiry against the caller-supplied `now`.
    /// A bad signature or garbage input is indistinguishable from the outside;
    /// only a well-signed but stale token reports expiry.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked below against the injected clock
        validation.validate_exp = false;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| Error::unauthorized("Token inválido"))?;
        if now.timestamp() >= data.claims.exp {
            return Err(Error::unauthorized("Token expirado"));
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn keys() -> TokenKeys {
        TokenKeys::new("test-secret-key-12345", 3600)
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn roundtrip_preserves_identity() {
        let now = issued_at();
        let token = keys().issue(7, "ana@escuela.mx", now).unwrap();
        let claims = keys().validate(&token, now).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "ana@escuela.mx");
        assert_eq!(claims.exp, now.timestamp() + 3600);
    }

    #[test]
    fn valid_just_before_expiry_expired_just_after() {
        let now = issued_at();
        let token = keys().issue(7, "ana@escuela.mx", now).unwrap();

        let at_59min = now + Duration::minutes(59);
        assert!(keys().validate(&token, at_59min).is_ok());

        let at_61min = now + Duration::minutes(61);
        let err = keys().validate(&token, at_61min).unwrap_err();
        assert_eq!(err.message(), "Token expirado");
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let now = issued_at();
        let token = keys().issue(7, "ana@escuela.mx", now).unwrap();
        let at_expiry = now + Duration::seconds(3600);
        assert!(keys().validate(&token, at_expiry).is_err());
    }

    #[test]
    fn tampered_token_is_invalid() {
        let now = issued_at();
        let token = keys().issue(7, "ana@escuela.mx", now).unwrap();
        let mut tampered = token.into_bytes();
        tampered[1] = if tampered[1] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        let err = keys().validate(&tampered, now).unwrap_err();
        assert_eq!(err.message(), "Token inválido");
    }

    #[test]
    fn other_secret_is_invalid() {
        let now = issued_at();
        let token = TokenKeys::new("other-secret", 3600)
            .issue(7, "ana@escuela.mx", now)
            .unwrap();
        assert!(keys().validate(&token, now).is_err());
    }

    #[test]
    fn garbage_is_invalid() {
        let err = keys().validate("no.es.jwt", issued_at()).unwrap_err();
        assert_eq!(err.message(), "Token inválido");
    }
}
