use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared::errors::ServiceError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Checks the `stripe-signature` header: `t=<unix>,v1=<hex>[,v1=<hex>...]`,
/// where each `v1` is `HMAC-SHA256(secret, "<t>.<raw body>")`.
#[derive(Clone)]
pub struct StripeSignatureVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl std::fmt::Debug for StripeSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeSignatureVerifier")
            .field("secret", &"<redacted>")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

impl StripeSignatureVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            tolerance_secs: SIGNATURE_TOLERANCE_SECS,
        }
    }

    pub fn verify(&self, payload: &[u8], header: Option<&str>) -> Result<(), ServiceError> {
        self.verify_at(payload, header, Utc::now().timestamp())
    }

    pub fn verify_at(
        &self,
        payload: &[u8],
        header: Option<&str>,
        now: i64,
    ) -> Result<(), ServiceError> {
        if self.secret.is_empty() {
            return Err(ServiceError::SignatureInvalid(
                "webhook secret is not configured".into(),
            ));
        }

        let header = header
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ServiceError::SignatureInvalid("missing signature header".into()))?;

        let mut timestamp = None;
        let mut candidates = Vec::new();

        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
                Some(("v1", value)) => {
                    if let Ok(bytes) = hex::decode(value) {
                        candidates.push(bytes);
                    }
                }
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| ServiceError::SignatureInvalid("missing or invalid timestamp".into()))?;

        if candidates.is_empty() {
            return Err(ServiceError::SignatureInvalid(
                "no v1 signature in header".into(),
            ));
        }

        if (now - timestamp).abs() > self.tolerance_secs {
            return Err(ServiceError::SignatureInvalid(format!(
                "timestamp {timestamp} outside the {}s tolerance",
                self.tolerance_secs
            )));
        }

        let mac = self.mac_for(payload, timestamp)?;

        if candidates
            .iter()
            .any(|candidate| mac.clone().verify_slice(candidate).is_ok())
        {
            Ok(())
        } else {
            Err(ServiceError::SignatureInvalid(
                "no signature matches the payload".into(),
            ))
        }
    }

    /// Builds a header value in the processor's format; used to sign local
    /// test deliveries.
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> Result<String, ServiceError> {
        let signature = self.mac_for(payload, timestamp)?.finalize().into_bytes();
        Ok(format!("t={timestamp},v1={}", hex::encode(signature)))
    }

    fn mac_for(&self, payload: &[u8], timestamp: i64) -> Result<HmacSha256, ServiceError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| ServiceError::SignatureInvalid(format!("invalid secret: {e}")))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac)
    }
}
