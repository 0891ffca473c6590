//! Display helpers for prices, slugs and contact links.

use reqwest::Url;

/// `2500000` -> `₦2,500,000`
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("₦{grouped}")
}

/// Lower-case, ASCII alphanumerics joined by single hyphens
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn wa_me(number: &str, message: &str) -> String {
    let base = format!("https://wa.me/{number}");
    match Url::parse_with_params(&base, &[("text", message)]) {
        Ok(url) => url.to_string(),
        Err(_) => base,
    }
}

/// Pre-filled WhatsApp message about a specific listing
pub fn whatsapp_link(number: &str, property_title: &str, area: &str) -> String {
    wa_me(
        number,
        &format!("Hello, I'm interested in {property_title} in {area} listed on 360Urban."),
    )
}

pub fn general_whatsapp_link(number: &str) -> String {
    wa_me(
        number,
        "Hello, I found your listing on 360Urban and I'd like to make an inquiry.",
    )
}
