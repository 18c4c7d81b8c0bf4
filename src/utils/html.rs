//! HTML 转义工具
//!
//! 监控页渲染的是调用方原样提交的字段（页面标签、User-Agent），
//! 输出前必须转义，防止存储型 XSS。

use std::borrow::Cow;

/// 转义 HTML 特殊字符
///
/// 输入不含特殊字符时返回 `Cow::Borrowed`，零分配。
pub fn escape(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_clean_string_is_borrowed() {
        let input = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
        let escaped = escape(input);
        assert!(matches!(escaped, Cow::Borrowed(_)));
        assert_eq!(escaped, input);
    }

    #[test]
    fn test_escape_script_tag() {
        let escaped = escape("<script>alert('x')</script>");
        assert_eq!(
            escaped,
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_ampersand_first() {
        // & 必须整体转义一次，不能二次转义已生成的实体
        assert_eq!(escape("&lt;"), "&amp;lt;");
        assert_eq!(escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape(r#"he said "hi""#), "he said &quot;hi&quot;");
    }

    #[test]
    fn test_escape_empty() {
        assert_eq!(escape(""), "");
    }
}
