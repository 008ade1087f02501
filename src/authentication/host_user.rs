use std::future::{Ready, ready};

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, dev::Payload};

use crate::domain::HostUser;
use crate::utils::build_error_response;

const USER_ID_HEADER: &str = "X-Host-User-Id";
const CAPABILITIES_HEADER: &str = "X-Host-User-Capabilities";

/// The host account behind an admin request, read from the headers the host
/// forwards alongside its token.
pub struct AuthenticatedHostUser(pub HostUser);

impl AuthenticatedHostUser {
    pub fn into_inner(self) -> HostUser {
        self.0
    }

    fn from_headers(req: &HttpRequest) -> Result<HostUser, String> {
        let id = req
            .headers()
            .get(USER_ID_HEADER)
            .ok_or_else(|| format!("Missing {USER_ID_HEADER} header"))?
            .to_str()
            .map_err(|_| format!("{USER_ID_HEADER} is not valid text"))?
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("{USER_ID_HEADER} is not a number"))?;

        let capabilities = match req.headers().get(CAPABILITIES_HEADER) {
            Some(value) => value
                .to_str()
                .map_err(|_| format!("{CAPABILITIES_HEADER} is not valid text"))?
                .split(',')
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        Ok(HostUser::new(id, capabilities))
    }
}

impl FromRequest for AuthenticatedHostUser {
    type Error = InternalError<String>;
    type Future = Ready<Result<AuthenticatedHostUser, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            Self::from_headers(req)
                .map(AuthenticatedHostUser)
                .map_err(|msg| {
                    let response = build_error_response(StatusCode::UNAUTHORIZED, msg.clone());
                    InternalError::from_response(msg, response)
                }),
        )
    }
}
