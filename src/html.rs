//! Small HTML builders used by the console pages.

/// Escape `&`, `<`, `>`, `"` and `'`.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

pub fn start(title: &str) -> String {
    let title = escape(title);
    format!(
        "<html><head><title>{title}</title></head>\n<body>\n<h2>{title}</h2>\n"
    )
}

pub fn end() -> &'static str {
    "</body></html>\n"
}

pub fn p(content: &str) -> String {
    format!("<p>{content}</p>\n")
}

pub fn a(href: &str, title: &str, content: &str) -> String {
    if title.is_empty() {
        format!("<a href=\"{}\">{content}</a>", escape(href))
    } else {
        format!(
            "<a href=\"{}\" title=\"{}\">{content}</a>",
            escape(href),
            escape(title)
        )
    }
}

pub fn table() -> &'static str {
    "<table border=1 cellpadding=2 cellspacing=0>\n"
}

pub fn table_end() -> &'static str {
    "</table>\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_anchor() {
        assert_eq!(a("/", "back", "Home"), r#"<a href="/" title="back">Home</a>"#);
        assert_eq!(a("/x?y=1", "", "X"), r#"<a href="/x?y=1">X</a>"#);
    }
}
