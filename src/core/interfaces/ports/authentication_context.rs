use crate::core::models::AuthCredential;

pub trait AuthenticationContext: Send + Sync {
    fn current_credential(&self) -> Option<AuthCredential>;
}
