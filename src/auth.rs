use crate::models::User;
use crate::storage;

/// Matches the credentials against the user roster and, on success,
/// persists the session so later invocations stay logged in.
///
/// Plaintext comparison against a local file; deliberately not a security
/// mechanism.
pub fn login(username: &str, password: &str) -> Option<User> {
    let user = storage::load_users()
        .into_iter()
        .find(|u| u.username == username && u.password == password)?;
    if let Err(e) = storage::save_session(&user) {
        eprintln!("Warning: could not persist session: {}", e);
    }
    Some(user)
}

/// Clears the persisted session.
pub fn logout() -> std::io::Result<()> {
    storage::clear_session()
}

/// The logged-in user, if any. A corrupt session counts as logged out.
pub fn current_user() -> Option<User> {
    storage::load_session()
}
