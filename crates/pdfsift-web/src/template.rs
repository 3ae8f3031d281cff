use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../templates/index.html");

/// Render the form page, injecting a banner block (may be empty).
pub fn render_index(banner: &str) -> Html<String> {
    Html(INDEX_HTML.replace("{{ banner }}", banner))
}

/// Info banner shown in the idle/awaiting-upload state.
pub fn info_banner(message: &str) -> String {
    format!(r#"<div class="banner info">{}</div>"#, escape(message))
}

/// Error banner plus the retry suggestion.
pub fn error_banner(message: &str) -> String {
    format!(
        r#"<div class="banner error">Bir hata oluştu: {}</div>
<div class="banner info">Farklı bir yöntem denemeyi veya başka bir PDF dosyası yüklemeyi deneyin.</div>"#,
        escape(message)
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banners_escape_markup() {
        let banner = error_banner("failed <tag> & more");
        assert!(banner.contains("failed &lt;tag&gt; &amp; more"));
        assert!(!banner.contains("<tag>"));
    }

    #[test]
    fn index_injects_banner() {
        let page = render_index(&info_banner("Lütfen bir PDF dosyası yükleyin."));
        assert!(page.0.contains("banner info"));
        assert!(!page.0.contains("{{ banner }}"));
    }
}
