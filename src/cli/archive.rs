use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{archive, config::AppConfig, error, success};

pub async fn zip(selections: Vec<String>, output: PathBuf) {
    let app = AppConfig::from_env();
    let selections = match archive::parse_selections(selections.iter().map(String::as_str)) {
        Ok(selections) => selections,
        Err(e) => error!("{}", e),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Bundling {} songs...", selections.len()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let bytes = match archive::build_zip(&app.downloads_dir, &selections).await {
        Ok(bytes) => bytes,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot build archive. Err: {}", e);
        }
    };
    pb.finish_and_clear();

    if let Err(e) = async_fs::write(&output, bytes).await {
        error!("Cannot write {}. Err: {}", output.display(), e);
    }
    success!("Wrote {} songs to {}", selections.len(), output.display());
}
