//! The request-side view the authenticator needs.

use std::collections::HashMap;

/// Read-only access to the cookies (or headers) carried by an incoming
/// request.
///
/// Parsing raw request bytes is the caller's job; the authenticator only
/// asks for a named value.
pub trait SessionRequest {
    /// Value of the cookie called `name`, if present.
    fn cookie(&self, name: &str) -> Option<String>;
}

impl SessionRequest for HashMap<String, String> {
    fn cookie(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<R: SessionRequest + ?Sized> SessionRequest for &R {
    fn cookie(&self, name: &str) -> Option<String> {
        (**self).cookie(name)
    }
}
