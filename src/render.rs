//! HTML fragment rendering. Every interpolated field goes through escaping,
//! text and attribute positions separately; raw markup only ever comes from
//! static template strings in this module.

use std::fmt::Write;

use crate::meter::{MeterView, Severity};
use crate::panel::{NavLink, PanelState};

const USAGE_DOCS_URL: &str = "https://wiki.galaxyproject.org/Learn/ManagingDatasets";

fn text(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Renders the whole preferences panel region.
pub fn preferences_page(state: &PanelState) -> String {
    match state {
        PanelState::LoggedIn {
            email,
            links,
            usage,
        } => {
            let mut out = String::new();
            out.push_str("<div class=\"user-preferences\">");
            out.push_str("<h2>User preferences</h2>");
            let _ = write!(
                out,
                "<p>You are currently logged in as {}.</p>",
                text(email)
            );
            out.push_str("<ul class=\"preference-links\">");
            for link in links {
                out.push_str(&nav_link(link));
            }
            out.push_str("</ul>");
            if let Some(line) = usage {
                let _ = write!(
                    out,
                    "<p>You are using <strong>{}</strong> of disk space in this instance. ",
                    text(&line.disk_usage)
                );
                if let Some(quota) = &line.quota {
                    let _ = write!(out, "Your disk quota is: <strong>{}</strong>. ", text(quota));
                }
                let _ = write!(
                    out,
                    "Is your usage more than expected? See the \
                     <a href=\"{USAGE_DOCS_URL}\" target=\"_blank\">documentation</a> \
                     for tips on how to find all of the data in your account.</p>"
                );
            }
            out.push_str("</div>");
            out
        }
        PanelState::LoggedOut { message } => {
            let mut out = String::new();
            out.push_str("<div class=\"user-preferences\">");
            out.push_str("<p>You are currently not logged in.</p>");
            if let Some(message) = message {
                let _ = write!(out, "<p>{}</p>", text(message));
            }
            out.push_str(
                "<ul class=\"login-links\">\
                 <li><a href=\"/login\">Login</a></li>\
                 <li><a href=\"/register\">Register</a></li>\
                 </ul>",
            );
            out.push_str("</div>");
            out
        }
    }
}

fn nav_link(link: &NavLink) -> String {
    let href = link.target.as_deref().unwrap_or("#");
    format!(
        "<li><a href=\"{}\" data-link-kind=\"{}\">{}</a></li>",
        attr(href),
        attr(link.kind.as_str()),
        text(link.title())
    )
}

/// Renders the quota meter fragment: either the plain usage text or the
/// progress bar, depending on the view the meter produced.
pub fn quota_meter(view: &MeterView) -> String {
    match view {
        MeterView::UsageOnly { usage } => {
            let usage = usage.as_deref().unwrap_or("");
            format!(
                "<div class=\"quota-meter\">{}</div>",
                usage_text(usage)
            )
        }
        MeterView::Meter {
            bar_percent,
            severity,
            usage,
            ..
        } => {
            let usage = usage.as_deref().unwrap_or("");
            format!(
                "<div class=\"quota-meter progress\">\
                 <div class=\"progress-bar {}\" style=\"width: {bar_percent}%\">{}</div>\
                 </div>",
                severity_classes(*severity),
                usage_text(usage)
            )
        }
    }
}

// The tooltip behavior itself is attached by the host; the attributes mark
// the node it binds to.
fn usage_text(usage: &str) -> String {
    format!(
        "<span class=\"quota-usage\" data-toggle=\"tooltip\" title=\"Total disk usage\">{}</span>",
        text(usage)
    )
}

fn severity_classes(severity: Severity) -> &'static str {
    match severity {
        Severity::Ok => "progress-bar-success",
        Severity::Approaching => "progress-bar-warning",
        Severity::Over => "progress-bar-danger text-white",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meter::{MeterThresholds, MeterView};
    use crate::panel::{links_for, PanelState, UsageLine};

    fn logged_in_state(email: &str) -> PanelState {
        let summary = serde_json::from_value(serde_json::json!({
            "id": "42",
            "email": email,
            "webapp": "galaxy",
            "remote_user": false,
            "disk_usage": "5.2 GB",
            "quota": "250.0 GB",
            "enable_quotas": true
        }))
        .unwrap();
        PanelState::LoggedIn {
            email: email.to_string(),
            links: links_for(&summary),
            usage: Some(UsageLine {
                disk_usage: "5.2 GB".to_string(),
                quota: Some("250.0 GB".to_string()),
            }),
        }
    }

    #[test]
    fn hostile_email_is_escaped() {
        let html = preferences_page(&logged_in_state("<script>alert(1)</script>@x"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn usage_line_includes_quota_figure() {
        let html = preferences_page(&logged_in_state("jo@example.org"));
        assert!(html.contains("<strong>5.2 GB</strong>"));
        assert!(html.contains("Your disk quota is: <strong>250.0 GB</strong>"));
        assert!(html.contains(USAGE_DOCS_URL));
    }

    #[test]
    fn logged_out_page_always_offers_login_and_register() {
        let html = preferences_page(&PanelState::LoggedOut { message: None });
        assert!(html.contains("You are currently not logged in."));
        assert!(html.contains("/login"));
        assert!(html.contains("/register"));
    }

    #[test]
    fn placeholder_links_render_with_inert_href() {
        let html = preferences_page(&PanelState::LoggedIn {
            email: "jo@example.org".to_string(),
            links: links_for(
                &serde_json::from_value(serde_json::json!({
                    "id": "42",
                    "remote_user": true,
                    "webapp": "other"
                }))
                .unwrap(),
            ),
            usage: None,
        });
        assert!(html.contains("data-link-kind=\"email-alerts\""));
        assert!(html.contains("href=\"#\""));
    }

    #[test]
    fn usage_only_meter_has_no_progress_bar() {
        let html = quota_meter(&MeterView::UsageOnly {
            usage: Some("1.0 KB".to_string()),
        });
        assert!(html.contains("1.0 KB"));
        assert!(!html.contains("progress-bar"));
        assert!(html.contains("data-toggle=\"tooltip\""));
    }

    #[test]
    fn over_quota_meter_gets_danger_styling_and_white_text() {
        let thresholds = MeterThresholds::default();
        let html = quota_meter(&MeterView::Meter {
            percent: 120.0,
            bar_percent: 100.0,
            severity: thresholds.classify(120.0),
            usage: Some("300.0 GB".to_string()),
        });
        assert!(html.contains("progress-bar-danger"));
        assert!(html.contains("text-white"));
        assert!(html.contains("width: 100%"));
    }

    #[test]
    fn warning_meter_uses_warning_styling() {
        let html = quota_meter(&MeterView::Meter {
            percent: 90.0,
            bar_percent: 90.0,
            severity: Severity::Approaching,
            usage: None,
        });
        assert!(html.contains("progress-bar-warning"));
        assert!(html.contains("width: 90%"));
    }
}
