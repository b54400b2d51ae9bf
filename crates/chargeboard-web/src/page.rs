//! Dashboard page
//!
//! A single static HTML document; the client script talks to the JSON API
//! and draws the figure with Plotly.

use chargeboard_core::DashboardConfig;

const INDEX_TEMPLATE: &str = include_str!("../static/index.html");

/// Fill the template with the configured title and date bounds
pub fn render_index(config: &DashboardConfig) -> String {
    let dates = &config.dates;
    INDEX_TEMPLATE
        .replace("{{TITLE}}", &escape_html(&config.title))
        .replace("{{DEFAULT_START}}", &dates.default_start.to_string())
        .replace("{{DEFAULT_END}}", &dates.default_end.to_string())
        .replace("{{MIN_DATE}}", &dates.min_date.to_string())
        .replace("{{MAX_DATE}}", &dates.max_date.to_string())
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_placeholders() {
        let html = render_index(&DashboardConfig::default());
        assert!(html.contains("<title>CityVitae Contract Dashboard</title>"));
        assert!(html.contains(r#"value="2022-12-01""#));
        assert!(html.contains(r#"max="2024-12-31""#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_title_is_escaped() {
        let config = DashboardConfig {
            title: "<Fleet & Co>".to_string(),
            ..DashboardConfig::default()
        };
        let html = render_index(&config);
        assert!(html.contains("&lt;Fleet &amp; Co&gt;"));
    }
}
