//! User-visible messages shown in place of a chart.

use std::fmt;

/// Informational or error message rendered into a chart container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Loading { symbol: String, period: String },
    NoData { symbol: String },
    MissingColumns { missing: Vec<&'static str> },
    Failed { symbol: String, message: String },
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Failed { .. })
    }

    /// HTML fragment for web hosts. Interpolated text is escaped.
    pub fn to_html(&self) -> String {
        match self {
            Notice::Failed { .. } => {
                format!("<p class=\"error-message\">{}</p>", escape_html(&self.to_string()))
            }
            _ => format!("<p>{}</p>", escape_html(&self.to_string())),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Loading { symbol, period } => {
                write!(f, "Loading chart data for {symbol} ({period})...")
            }
            Notice::NoData { symbol } => {
                write!(f, "No chart data available for {symbol} for the selected period.")
            }
            Notice::MissingColumns { .. } => {
                write!(f, "Chart data is missing required OHLC columns. Cannot render chart.")
            }
            Notice::Failed { symbol, message } => {
                write!(f, "Failed to load chart data for {symbol}: {message}")
            }
        }
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
    fn loading_text() {
        let n = Notice::Loading {
            symbol: "AAPL".into(),
            period: "1y".into(),
        };
        assert_eq!(n.to_html(), "<p>Loading chart data for AAPL (1y)...</p>");
        assert!(!n.is_error());
    }

    #[test]
    fn failed_uses_error_class() {
        let n = Notice::Failed {
            symbol: "AAPL".into(),
            message: "No data found for AAPL".into(),
        };
        assert_eq!(
            n.to_html(),
            "<p class=\"error-message\">Failed to load chart data for AAPL: No data found for AAPL</p>"
        );
        assert!(n.is_error());
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let n = Notice::NoData {
            symbol: "<script>".into(),
        };
        let html = n.to_html();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn escape_html_covers_quotes_and_ampersand() {
        assert_eq!(escape_html(r#"a&b "c" 'd'"#), "a&amp;b &quot;c&quot; &#39;d&#39;");
    }
}
