//! Collaborators injected into the checkout tunnel

/// Currently authenticated user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Session provider exposing the current user and a login trigger
pub trait Session: Send + Sync {
    fn user(&self) -> Option<User>;

    /// Start the login flow
    fn login(&self);
}

/// Client-side cache of the user's orders
pub trait OrderCache: Send + Sync {
    /// Mark cached orders stale so they are fetched again
    fn invalidate(&self);
}
