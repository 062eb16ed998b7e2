use std::sync::Arc;

use crate::{api::AppState, config::AppConfig, error, server, warning};

pub async fn serve(open: bool) {
    let app = AppConfig::from_env();
    let store = super::open_store(&app);
    let importer = super::build_importer(&app, Arc::clone(&store)).await;

    let state = AppState {
        store,
        importer: Arc::new(importer),
    };

    if open {
        let url = format!("http://{}/", app.server_address);
        if webbrowser::open(&url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                url
            );
        }
    }

    if let Err(e) = server::start_api_server(&app.server_address, state).await {
        error!("Server stopped. Err: {}", e);
    }
}
