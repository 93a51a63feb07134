use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::{LoginRequest, MemberProfile, SignupRequest};
use crate::domain::errors::NormalizedError;

// Port for the backend auth endpoints used by the session controller.
// Failures arrive already normalized.
#[async_trait]
pub trait AuthApi: Send + Sync {
    // Lightweight "who am I" probe. Ok means the backend answered 2xx.
    async fn me(&self) -> Result<Option<MemberProfile>, NormalizedError>;
    async fn login(&self, req: &LoginRequest) -> Result<(), NormalizedError>;
    async fn logout(&self) -> Result<(), NormalizedError>;
    async fn signup(&self, req: &SignupRequest) -> Result<(), NormalizedError>;
}

#[async_trait]
impl<T> AuthApi for Arc<T>
where
    T: AuthApi + ?Sized,
{
    async fn me(&self) -> Result<Option<MemberProfile>, NormalizedError> {
        (**self).me().await
    }

    async fn login(&self, req: &LoginRequest) -> Result<(), NormalizedError> {
        (**self).login(req).await
    }

    async fn logout(&self) -> Result<(), NormalizedError> {
        (**self).logout().await
    }

    async fn signup(&self, req: &SignupRequest) -> Result<(), NormalizedError> {
        (**self).signup(req).await
    }
}

// Port for the locally cached session marker (the session cookie).
pub trait SessionMarker: Send + Sync {
    fn clear(&self);
    fn is_present(&self) -> bool;
}

impl<T> SessionMarker for Arc<T>
where
    T: SessionMarker + ?Sized,
{
    fn clear(&self) {
        (**self).clear()
    }

    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

// Receives "authentication expired" notifications from the transport.
pub trait SessionInvalidator: Send + Sync {
    fn invalidate(&self);
}
