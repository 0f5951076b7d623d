//! Settings screen: effective client configuration.

use std::fmt::Write;

use crate::config::AppConfig;

#[must_use]
pub fn render(config: &AppConfig) -> String {
    let identity = config
        .identity_timeout
        .map_or_else(|| "disabled".to_owned(), |d| format!("{}s", d.as_secs()));
    let mut out = String::new();
    let _ = writeln!(out, "API base URL:      {}", config.api_base_url);
    let _ = writeln!(out, "State directory:   {}", config.state_dir.display());
    let _ = writeln!(out, "Identity timeout:  {identity}");
    let _ = writeln!(out, "Request timeout:   {}s", config.http.request_secs);
    let _ = writeln!(out, "Connect timeout:   {}s", config.http.connect_secs);
    out
}
