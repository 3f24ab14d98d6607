use gloo_storage::{SessionStorage, Storage};
use shared::Session;

const SESSION_KEY: &str = "hahai.session";

pub fn load() -> Session {
    SessionStorage::get(SESSION_KEY).unwrap_or_default()
}

pub fn store(session: &Session) {
    if let Err(e) = SessionStorage::set(SESSION_KEY, session) {
        log::error!("Failed to persist session: {:?}", e);
    }
}

pub fn clear() {
    SessionStorage::delete(SESSION_KEY);
}
