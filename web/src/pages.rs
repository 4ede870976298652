//! Page rendering.
//!
//! The dispatcher only needs the rendering contract: which data each page
//! receives. [`HtmlPages`] is a minimal default; hosts with their own
//! templates implement [`PageRenderer`].

use exceptional_core::{ErrorId, ErrorRecord};
use std::fmt::Write;

/// Data for the dashboard list page.
#[derive(Debug, Clone, Copy)]
pub struct ListPage<'a> {
    /// Display name of the store.
    pub store_name: &'a str,
    /// Mount path used to build self-links.
    pub base_path: &'a str,
    /// Records to list, newest first.
    pub records: &'a [ErrorRecord],
}

/// Data for the record detail page.
#[derive(Debug, Clone, Copy)]
pub struct DetailPage<'a> {
    /// The record, or `None` when not found or no id was given.
    pub record: Option<&'a ErrorRecord>,
    /// Display name of the store.
    pub store_name: &'a str,
    /// Mount path used to build self-links (request path without `/info`).
    pub base_path: &'a str,
    /// Identifier that was requested (nil when it did not parse).
    pub id: ErrorId,
}

/// Renders dashboard pages to markup.
pub trait PageRenderer: Send + Sync {
    /// Render the list page.
    fn render_list(&self, page: &ListPage<'_>) -> String;

    /// Render the detail page.
    fn render_detail(&self, page: &DetailPage<'_>) -> String;
}

/// Minimal HTML renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPages;

impl PageRenderer for HtmlPages {
    fn render_list(&self, page: &ListPage<'_>) -> String {
        let base = escape(page.base_path);
        let mut body = String::new();

        if page.records.is_empty() {
            body.push_str(r#"<p class="empty">No errors yet.</p>"#);
        } else {
            body.push_str(concat!(
                r#"<p class="actions">"#,
                r##"<a href="#" data-action="protect-list">Protect selected</a>"##,
                r##"<a href="#" data-action="delete-list">Delete selected</a>"##,
                r##"<a href="#" data-action="delete-all">Delete all</a></p>"##,
                r#"<table class="errors"><thead><tr><th></th><th>Type</th><th>Message</th>"#,
                "<th>Url</th><th>Host</th><th>Created</th><th></th></tr></thead><tbody>",
            ));
            for record in page.records {
                let id = record.id.to_string();
                let _ = write!(
                    body,
                    concat!(
                        r#"<tr{}><td><input type="checkbox" class="select-error" value="{id}"></td>"#,
                        r#"<td>{}</td><td><a href="{base}/info?guid={id}">{}</a></td>"#,
                        "<td>{}</td><td>{}</td><td>{}</td>",
                        r##"<td class="actions"><a href="#" data-action="protect" data-guid="{id}">protect</a>"##,
                        r##"<a href="#" data-action="delete" data-guid="{id}">delete</a></td></tr>"##,
                    ),
                    if record.is_protected { r#" class="protected""# } else { "" },
                    escape(&record.type_name),
                    escape(&record.message),
                    escape(record.url.as_deref().unwrap_or_default()),
                    escape(record.host.as_deref().unwrap_or_default()),
                    record.creation_date.format("%Y-%m-%d %H:%M:%S UTC"),
                    id = id,
                    base = base,
                );
            }
            body.push_str("</tbody></table>");
        }

        layout(
            &base,
            &format!("{} - {} errors", escape(page.store_name), page.records.len()),
            &body,
        )
    }

    fn render_detail(&self, page: &DetailPage<'_>) -> String {
        let base = escape(page.base_path);

        let Some(record) = page.record else {
            let body = format!(
                r#"<p class="empty">Error {} was not found in {}.</p><p><a href="{base}">Back to list</a></p>"#,
                page.id,
                escape(page.store_name),
            );
            return layout(&base, "Error not found", &body);
        };

        let mut body = format!(
            r#"<div class="detail"><h2>{}: {}</h2><dl>"#,
            escape(&record.type_name),
            escape(&record.message),
        );
        let fields = [
            ("Id", Some(record.id.to_string())),
            ("Application", Some(record.application_name.clone())),
            ("Machine", Some(record.machine_name.clone())),
            ("Created", Some(record.creation_date.to_rfc3339())),
            ("Source", record.source.clone()),
            ("Method", record.http_method.clone()),
            ("Url", record.url.clone()),
            ("Host", record.host.clone()),
            ("IP Address", record.ip_address.clone()),
            ("Status", record.status_code.map(|code| code.to_string())),
            ("Duplicates", Some(record.duplicate_count.to_string())),
            ("Protected", Some(record.is_protected.to_string())),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                let _ = write!(body, "<dt>{label}</dt><dd>{}</dd>", escape(&value));
            }
        }
        body.push_str("</dl>");
        if let Some(detail) = &record.detail {
            let _ = write!(body, "<pre>{}</pre>", escape(detail));
        }
        let _ = write!(body, r#"<p><a href="{base}">Back to list</a></p></div>"#);

        layout(&base, &escape(&record.type_name), &body)
    }
}

fn layout(base: &str, title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>",
            r#"<html data-base="{base}"><head><meta charset="utf-8"><title>{title}</title>"#,
            r#"<link rel="stylesheet" href="{base}/css"></head>"#,
            r#"<body><header><a href="{base}">Exceptions</a></header><main><h1>{title}</h1>{body}</main>"#,
            r#"<script src="{base}/js"></script></body></html>"#,
        ),
        base = base,
        title = title,
        body = body,
    )
}

/// Escape text for HTML element and attribute content.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
