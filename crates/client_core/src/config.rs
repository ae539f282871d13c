use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use shared::{domain::CollectionKind, protocol::DetailShape};
use tracing::warn;
use url::Url;

use crate::aggregator::DetailEndpoint;

pub const SETTINGS_FILE: &str = "search.toml";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSettings {
    pub api_base_url: String,
    /// Zero is not a usable timeout; the default applies instead.
    pub request_timeout_secs: u64,
    /// `None` leaves detail fan-out unbounded.
    pub max_concurrent_details: Option<usize>,
    pub routes_index_path: String,
    pub routes_detail_path: String,
    pub collections_index_path: String,
    pub collections_detail_path: String,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8100".into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_concurrent_details: None,
            routes_index_path: "/api/route/routes".into(),
            routes_detail_path: "/api/route/route/{id}".into(),
            collections_index_path: "/api/collection/collections".into(),
            collections_detail_path: "/api/collection/collection/{id}".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionEndpoints {
    pub index_url: String,
    pub detail: DetailEndpoint,
}

impl ScreenSettings {
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    pub fn endpoints(&self, kind: CollectionKind) -> Result<CollectionEndpoints> {
        let raw_base = self.api_base_url.trim();
        let base = Url::parse(raw_base)
            .with_context(|| format!("invalid api base url '{raw_base}'"))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            bail!("api base url '{raw_base}' must be an http(s) url");
        }
        let base = base.as_str().trim_end_matches('/');

        let (index_path, detail_path) = match kind {
            CollectionKind::Routes => (&self.routes_index_path, &self.routes_detail_path),
            CollectionKind::Collections => {
                (&self.collections_index_path, &self.collections_detail_path)
            }
        };
        if !detail_path.contains("{id}") {
            bail!("detail path '{detail_path}' for {kind} has no {{id}} placeholder");
        }

        Ok(CollectionEndpoints {
            index_url: join_url(base, index_path),
            detail: DetailEndpoint::new(join_url(base, detail_path), DetailShape::for_kind(kind)),
        })
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{base}/{}", path.trim_start_matches('/'))
}

pub fn load_settings() -> ScreenSettings {
    load_settings_from(Path::new(SETTINGS_FILE))
}

/// Defaults, then `path` if it exists, then `APP__*` environment variables.
pub fn load_settings_from(path: &Path) -> ScreenSettings {
    let mut settings = ScreenSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file(&mut settings, &raw, path);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut ScreenSettings, raw: &str, path: &Path) {
    let table = match raw.parse::<toml::Table>() {
        Ok(table) => table,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable settings file");
            return;
        }
    };

    if let Some(v) = table.get("api_base_url").and_then(|v| v.as_str()) {
        settings.api_base_url = v.to_string();
    }
    if let Some(v) = table
        .get("request_timeout_secs")
        .and_then(|v| v.as_integer())
        .and_then(|v| u64::try_from(v).ok())
        .filter(|v| *v > 0)
    {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = table
        .get("max_concurrent_details")
        .and_then(|v| v.as_integer())
        .and_then(|v| usize::try_from(v).ok())
    {
        settings.max_concurrent_details = (v > 0).then_some(v);
    }

    let paths = [
        ("routes_index_path", &mut settings.routes_index_path),
        ("routes_detail_path", &mut settings.routes_detail_path),
        ("collections_index_path", &mut settings.collections_index_path),
        ("collections_detail_path", &mut settings.collections_detail_path),
    ];
    for (key, slot) in paths {
        if let Some(v) = table.get(key).and_then(|v| v.as_str()) {
            *slot = v.to_string();
        }
    }
}

fn apply_env(settings: &mut ScreenSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.request_timeout_secs = parsed,
            _ => warn!(value = %v, "ignoring APP__REQUEST_TIMEOUT_SECS; expected seconds > 0"),
        }
    }
    if let Some(v) = lookup("APP__MAX_CONCURRENT_DETAILS") {
        if let Ok(parsed) = v.trim().parse::<usize>() {
            settings.max_concurrent_details = (parsed > 0).then_some(parsed);
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
