//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let url = config.repository.url.as_deref().unwrap_or("");

    format!(
        r#"[repository]
; Base URL of the package repository. Archives are fetched from <url>/<name>.tar.gz
; or <url>/<name>.tar. Installs fail until this is set.
url = {}
; HTTP request timeout in seconds (default: 300)
timeout = {}

[store]
; Directory holding installed and uploaded packages (default: ./repository)
root = {}

[server]
; Listen address of the repository service (default: 0.0.0.0:5000)
bind = {}

[logging]
; Directory for the session log file tsukumo.log
directory = {}
"#,
        url,
        config.repository.timeout,
        path_to_string(&config.store.root),
        config.server.bind,
        path_to_string(&config.logging.directory),
    )
}

/// Convert path to string, collapsing the home directory to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
