use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{
    AuthApi, LoginRequest, MemberProfile, NormalizedError, SessionMarker, SignupRequest,
};

// Scripted auth backend for controller tests. Every call succeeds unless a
// failure has been scripted for it.
pub(crate) struct FakeAuthApi {
    me: Mutex<Result<Option<MemberProfile>, NormalizedError>>,
    login: Mutex<Result<(), NormalizedError>>,
    logout: Mutex<Result<(), NormalizedError>>,
    signup: Mutex<Result<(), NormalizedError>>,
    me_calls: AtomicUsize,
}

impl FakeAuthApi {
    pub(crate) fn new() -> Self {
        Self {
            me: Mutex::new(Ok(Some(MemberProfile::default()))),
            login: Mutex::new(Ok(())),
            logout: Mutex::new(Ok(())),
            signup: Mutex::new(Ok(())),
            me_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn set_me(&self, result: Result<Option<MemberProfile>, NormalizedError>) {
        *self.me.lock().expect("me mutex poisoned") = result;
    }

    pub(crate) fn set_login(&self, result: Result<(), NormalizedError>) {
        *self.login.lock().expect("login mutex poisoned") = result;
    }

    pub(crate) fn set_logout(&self, result: Result<(), NormalizedError>) {
        *self.logout.lock().expect("logout mutex poisoned") = result;
    }

    pub(crate) fn set_signup(&self, result: Result<(), NormalizedError>) {
        *self.signup.lock().expect("signup mutex poisoned") = result;
    }

    pub(crate) fn me_calls(&self) -> usize {
        self.me_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn me(&self) -> Result<Option<MemberProfile>, NormalizedError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        self.me.lock().expect("me mutex poisoned").clone()
    }

    async fn login(&self, _req: &LoginRequest) -> Result<(), NormalizedError> {
        self.login.lock().expect("login mutex poisoned").clone()
    }

    async fn logout(&self) -> Result<(), NormalizedError> {
        self.logout.lock().expect("logout mutex poisoned").clone()
    }

    async fn signup(&self, _req: &SignupRequest) -> Result<(), NormalizedError> {
        self.signup.lock().expect("signup mutex poisoned").clone()
    }
}

// Session marker that only remembers whether it was cleared.
pub(crate) struct RecordingMarker {
    present: AtomicBool,
}

impl RecordingMarker {
    pub(crate) fn present() -> Self {
        Self {
            present: AtomicBool::new(true),
        }
    }
}

impl SessionMarker for RecordingMarker {
    fn clear(&self) {
        self.present.store(false, Ordering::SeqCst);
    }

    fn is_present(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }
}
