//! View context assembly for console pages.
//!
//! Every rendered page carries a context block: the section label, the
//! action label for the current page, and (on form pages) the form mode.
//! Labels are resolved by a pure function of (key, locale).

use crate::api::PaginationMeta;
use axum::http::HeaderMap;
use serde::Serialize;

/// Locale for label resolution, derived from Accept-Language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(axum::http::header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                let primary = v.split(',').next().unwrap_or("").trim();
                if primary.starts_with("zh") {
                    Locale::Zh
                } else {
                    Locale::En
                }
            })
            .unwrap_or_default()
    }
}

/// Resolve a label key for a locale. Unknown keys fall back to the key
/// itself so missing translations are visible rather than fatal.
pub fn label(key: &str, locale: Locale) -> &str {
    match locale {
        Locale::En => match key {
            "app.assets" => "Assets",
            "action.domain_list" => "Domain list",
            "action.domain_detail" => "Domain detail",
            "action.create_domain" => "Create domain",
            "action.update_domain" => "Update domain",
            "action.delete_domain" => "Delete domain",
            "action.domain_gateway_list" => "Domain gateway list",
            "action.create_gateway" => "Create gateway",
            "action.update_gateway" => "Update gateway",
            "action.audit_log_list" => "Audit log list",
            _ => key,
        },
        Locale::Zh => match key {
            "app.assets" => "资产管理",
            "action.domain_list" => "网域列表",
            "action.domain_detail" => "网域详情",
            "action.create_domain" => "创建网域",
            "action.update_domain" => "更新网域",
            "action.delete_domain" => "删除网域",
            "action.domain_gateway_list" => "网域网关列表",
            "action.create_gateway" => "创建网关",
            "action.update_gateway" => "更新网关",
            "action.audit_log_list" => "审计日志",
            _ => key,
        },
    }
}

/// Form mode flag attached to create/update form contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Update,
}

/// Presentation metadata merged into every page payload
#[derive(Debug, Clone, Serialize)]
pub struct ViewContext {
    pub app: String,
    pub action: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mode: Option<FormMode>,
}

impl ViewContext {
    pub fn page(locale: Locale, action_key: &str) -> Self {
        Self {
            app: label("app.assets", locale).to_string(),
            action: label(action_key, locale).to_string(),
            mode: None,
        }
    }

    pub fn form(locale: Locale, action_key: &str, mode: FormMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::page(locale, action_key)
        }
    }
}

/// Listing page payload
#[derive(Debug, Serialize)]
pub struct ListView<T> {
    pub context: ViewContext,
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Detail (and delete-confirmation) page payload
#[derive(Debug, Serialize)]
pub struct DetailView<T> {
    pub context: ViewContext,
    pub data: T,
}

/// Form page payload. `initial` is an immutable initial-values mapping
/// injected at construction time, never a mutated shared form object.
#[derive(Debug, Serialize)]
pub struct FormView {
    pub context: ViewContext,
    pub initial: serde_json::Map<String, serde_json::Value>,
}

/// Build an initial-values mapping from key/value pairs
pub fn initial_values<I>(entries: I) -> serde_json::Map<String, serde_json::Value>
where
    I: IntoIterator<Item = (&'static str, serde_json::Value)>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
