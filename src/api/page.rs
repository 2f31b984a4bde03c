//! Server-rendered demo page: a user dropdown, a button, and the result.

/// What to show under the form
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// Nothing requested yet
    Idle,
    Recommended {
        user_id: String,
        products: Vec<String>,
    },
    NoRecommendations,
    Failed(String),
}

pub fn render(users: &[String], selected: Option<&str>, outcome: &PageOutcome) -> String {
    let options: String = users
        .iter()
        .map(|user_id| {
            let marker = if Some(user_id.as_str()) == selected {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{id}"{marker}>{id}</option>"#,
                id = escape(user_id),
                marker = marker
            )
        })
        .collect();

    let result = match outcome {
        PageOutcome::Idle => String::new(),
        PageOutcome::Recommended { user_id, products } => {
            let items: String = products
                .iter()
                .map(|p| format!("<li>🔹 Product ID: <code>{}</code></li>", escape(p)))
                .collect();
            format!(
                r#"<div class="success"><p>Top Recommended Products for User {}:</p><ul>{}</ul></div>"#,
                escape(user_id),
                items
            )
        }
        PageOutcome::NoRecommendations => {
            r#"<div class="warning">No recommendations available for this user.</div>"#.to_string()
        }
        PageOutcome::Failed(message) => {
            format!(r#"<div class="error">{}</div>"#, escape(message))
        }
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Product Recommendation Demo</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
.success {{ background: #e6f4ea; padding: 1rem; }}
.warning {{ background: #fff4e5; padding: 1rem; }}
.error {{ background: #fdecea; padding: 1rem; }}
</style>
</head>
<body>
<h1>🛍️ Product Recommendation Demo</h1>
<p>Select a user to get personalized product recommendations based on other similar users.</p>
<form method="get" action="/">
<label for="user_id">Choose a User ID</label>
<select id="user_id" name="user_id">{options}</select>
<button type="submit" name="action" value="recommend">Recommend Products</button>
</form>
{result}
</body>
</html>
"#,
        options = options,
        result = result
    )
}

/// Escapes text for use in HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
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
