use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::middleware::Next;
use actix_web::web;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;

use crate::utils::{build_error_response, e500};

/// The shared secret the host presents on every `/v1` call.
#[derive(Clone)]
pub struct HostToken(pub Secret<String>);

impl HostToken {
    /// Checks `presented` without leaking through timing how much of it matched.
    ///
    /// Both tokens are MACed under the expected token and the tags are compared
    /// with `verify_slice`, which runs in constant time.
    pub fn verify(&self, presented: &str) -> bool {
        let expected = self.0.expose_secret().as_bytes();
        let Ok(mac) = Hmac::<Sha256>::new_from_slice(expected) else {
            return false;
        };

        let mut expected_mac = mac.clone();
        expected_mac.update(expected);
        let tag = expected_mac.finalize().into_bytes();

        let mut presented_mac = mac;
        presented_mac.update(presented.as_bytes());
        presented_mac.verify_slice(&tag).is_ok()
    }
}

pub async fn reject_unknown_hosts(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let expected = req
        .app_data::<web::Data<HostToken>>()
        .ok_or_else(|| e500("Host token is not configured"))?;

    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if expected.verify(token) => next.call(req).await,
        _ => {
            let msg = "Missing or invalid host token";
            let response = build_error_response(StatusCode::UNAUTHORIZED, msg.to_string());
            Err(InternalError::from_response(anyhow::anyhow!(msg), response).into())
        }
    }
}
