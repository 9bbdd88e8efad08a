mod signature;
mod stripe;

pub use self::signature::{SIGNATURE_TOLERANCE_SECS, StripeSignatureVerifier};
pub use self::stripe::StripeGateway;
