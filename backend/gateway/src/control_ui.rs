//! Upload form served at `/`.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("assets/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_posts_every_field() {
        for field in ["image", "year", "make", "model", "productUrl", "notes"] {
            assert!(INDEX_HTML.contains(&format!("name=\"{field}\"")), "missing {field}");
        }
        assert!(INDEX_HTML.contains("/api/analyse"));
    }
}
