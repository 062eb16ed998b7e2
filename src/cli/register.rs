use crate::{api::Credentials, config::AppConfig, error, success, utils};

pub async fn register(username: String, password: String) {
    let credentials = Credentials { username, password };
    if let Err(e) = credentials.validate_registration() {
        error!("{}", e);
    }

    let app = AppConfig::from_env();
    let store = super::open_store(&app);
    let password_hash = utils::hash_password(&credentials.password);

    match store.create_user(credentials.username.trim(), &password_hash) {
        Ok(user) => success!("User {} registered.", user.username),
        Err(e) => error!("Cannot register {}. Err: {}", credentials.username, e),
    }
}
