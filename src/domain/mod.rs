pub mod models;

pub use models::*;

/// Turn a human-entered name into a URL-safe slug ("Women's Luge" -> "womens-luge").
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;

    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if c.is_whitespace() || c == '-' || c == '_' {
            if !last_dash {
                slug.push('-');
                last_dash = true;
            }
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
