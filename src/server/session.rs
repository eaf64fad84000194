use crate::error::ThumbnailError;
use actix_web::{dev::Payload, dev::ServiceRequest, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};

/// Identity attached to a request by whatever authenticates it upstream.
/// Handlers that take a `SessionUser` answer 401 before running when none is
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser(pub String);

impl SessionUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl FromRequest for SessionUser {
    type Error = ThumbnailError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<SessionUser>()
            .filter(|user| !user.0.trim().is_empty())
            .cloned();
        ready(user.ok_or(ThumbnailError::AuthenticationRequired))
    }
}

/// Copies the identity a trusted session proxy put in `header` into the
/// request extensions. Requests without the header stay anonymous.
pub fn attach_from_header(req: &ServiceRequest, header: &str) {
    let user = req
        .headers()
        .get(header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    if let Some(user) = user {
        req.extensions_mut().insert(SessionUser(user));
    }
}
