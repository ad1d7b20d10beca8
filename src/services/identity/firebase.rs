use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::Config;
use crate::services::identity::{
    IdentityVerifier, VerifiedIdentity, VerifyError, keys::SigningKeys,
};

/// Firebase ID token claims we read. Everything else lands in `extra`.
#[derive(Debug, Clone, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    auth_time: Option<i64>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// RS256 verifier for Firebase Authentication ID tokens.
///
/// `jsonwebtoken::Validation` covers signature, `exp`, `iss` and `aud`.
/// `iat`/`auth_time` (not in the future) and a non-empty `sub` are checked here.
pub struct FirebaseVerifier {
    project_id: String,
    validation: Validation,
    keys: SigningKeys,
}

impl std::fmt::Debug for FirebaseVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseVerifier")
            .field("project_id", &self.project_id)
            .field("keys", &self.keys)
            .finish()
    }
}

pub fn issuer_for(project_id: &str) -> String {
    format!("https://securetoken.google.com/{}", project_id)
}

impl FirebaseVerifier {
    pub fn new(project_id: impl Into<String>, keys: SigningKeys, leeway_seconds: u64) -> Self {
        let project_id = project_id.into();

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer_for(&project_id)]);
        validation.set_audience(&[&project_id]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = leeway_seconds;

        Self {
            project_id,
            validation,
            keys,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.identity_http_timeout_seconds))
            .build()?;

        let keys = SigningKeys::remote(http, config.firebase_jwks_url.clone());

        Ok(Self::new(
            config.firebase_project_id.clone(),
            keys,
            config.token_leeway_seconds,
        ))
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn check_claims(&self, claims: &FirebaseClaims) -> Result<(), VerifyError> {
        if claims.sub.trim().is_empty() {
            return Err(VerifyError::EmptyClaim("sub"));
        }

        let latest = chrono::Utc::now().timestamp() + self.validation.leeway as i64;
        if claims.iat.is_some_and(|iat| iat > latest) {
            return Err(VerifyError::NotYetValid("iat"));
        }
        if claims.auth_time.is_some_and(|t| t > latest) {
            return Err(VerifyError::NotYetValid("auth_time"));
        }

        Ok(())
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError> {
        let header = jsonwebtoken::decode_header(token).map_err(VerifyError::MalformedHeader)?;
        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::UnsupportedAlg(header.alg));
        }

        let kid = header.kid.ok_or(VerifyError::MissingKeyId)?;
        let jwk = self
            .keys
            .find(&kid)
            .await?
            .ok_or_else(|| VerifyError::UnknownKey(kid.clone()))?;
        let key = DecodingKey::from_jwk(&jwk)?;

        let data = jsonwebtoken::decode::<FirebaseClaims>(token, &key, &self.validation)?;
        let claims = data.claims;
        self.check_claims(&claims)?;

        let mut extra = claims.extra;
        if let Some(iat) = claims.iat {
            extra.insert("iat".into(), iat.into());
        }
        if let Some(auth_time) = claims.auth_time {
            extra.insert("auth_time".into(), auth_time.into());
        }

        Ok(VerifiedIdentity {
            uid: claims.sub,
            email: claims.email,
            email_verified: claims.email_verified,
            claims: extra,
        })
    }
}
