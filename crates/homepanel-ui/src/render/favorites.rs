use std::fmt::Write;

use homepanel_services::Favorite;

use super::html::{escape, notice};

/// Only http(s) links are clickable; anything else is shown as text.
fn is_web_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn render_favorites(favorites: &[Favorite]) -> String {
    let mut out = String::new();

    if favorites.is_empty() {
        out.push_str(&notice("info", "No favorites yet. Add a few below!"));
    } else {
        out.push_str(r#"<ul class="manage">"#);
        for (index, fav) in favorites.iter().enumerate() {
            let label = if is_web_url(&fav.url) {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                    escape(&fav.url),
                    escape(&fav.name)
                )
            } else {
                format!(
                    r#"{} <span class="caption">{}</span>"#,
                    escape(&fav.name),
                    escape(&fav.url)
                )
            };
            let _ = write!(
                out,
                r#"<li>{label}<form method="post" action="/favorites/{index}/delete"><button type="submit">Remove</button></form></li>"#,
                label = label,
                index = index
            );
        }
        out.push_str("</ul>");
    }

    out.push_str(
        r#"<hr><h3>Add a Favorite</h3>
<form method="post" action="/favorites" class="row">
  <label>Display name <input type="text" name="name" placeholder="e.g., GitHub"></label>
  <label>URL <input type="text" name="url" placeholder="https://github.com"></label>
  <button type="submit">Add</button>
</form>"#,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_and_remove_buttons() {
        let html = render_favorites(&[
            Favorite {
                name: "Docs".into(),
                url: "https://docs.rs".into(),
            },
            Favorite {
                name: "Q&A".into(),
                url: "https://example.com/?a=1&b=2".into(),
            },
        ]);

        assert!(html.contains(r#"<a href="https://docs.rs""#));
        assert!(html.contains("Q&amp;A"));
        assert!(html.contains("?a=1&amp;b=2"));
        assert!(html.contains("/favorites/1/delete"));
    }

    #[test]
    fn test_empty_list() {
        assert!(render_favorites(&[]).contains("No favorites yet."));
    }

    #[test]
    fn test_script_urls_are_not_linked() {
        let html = render_favorites(&[Favorite {
            name: "Sneaky".into(),
            url: "javascript:alert(1)".into(),
        }]);

        assert!(!html.contains("href="));
        assert!(html.contains("Sneaky"));
        assert!(html.contains("javascript:alert(1)"));
    }

    #[test]
    fn test_scheme_check_ignores_case() {
        assert!(is_web_url("HTTPS://Example.com"));
        assert!(!is_web_url("data:text/html,hi"));
    }
}
