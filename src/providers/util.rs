//! Helpers shared by the fetchers: URL handling, price text and HTML scanning.

use crate::core::FetchError;

pub const USER_AGENT: &str = concat!("pricewatch/", env!("CARGO_PKG_VERSION"));

pub fn http_client() -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| FetchError::Request {
            url: String::new(),
            source,
        })
}

/// Sends a GET and returns the body, mapping non-2xx statuses to `FetchError::Status`.
pub async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })
}

/// Extracts the product id from a product URL.
///
/// Prefers the last all-digit path segment (`.../35035821/buy`), falling back to
/// the last non-empty segment.
pub fn product_id_from_url(url: &str) -> Option<&str> {
    let without_query = url.trim().split(['?', '#']).next()?;
    let path = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);
    let segments: Vec<&str> = path
        .split('/')
        .skip(usize::from(without_query.contains("://")))
        .filter(|s| !s.is_empty())
        .collect();

    segments
        .iter()
        .rev()
        .find(|s| s.chars().all(|c| c.is_ascii_digit()))
        .or_else(|| segments.last())
        .copied()
}

/// Parses a displayed price such as `₹1,099` or `Rs. 999` into whole units.
pub fn parse_price_text(text: &str) -> Option<u64> {
    let text = text.trim();
    let text = text.strip_prefix("Rs.").unwrap_or(text);
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '₹' && *c != ',' && !c.is_whitespace())
        .collect();

    let whole = match cleaned.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => cleaned.as_str(),
    };
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    whole.parse::<u64>().ok().filter(|p| *p > 0)
}

pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&#8377;", "₹")
}

/// First non-blank text node inside the first element whose `class` list contains `class`.
pub fn text_by_class(html: &str, class: &str) -> Option<String> {
    let mut from = 0;
    while let Some(rel) = html[from..].find("class=") {
        let attr_start = from + rel + "class=".len();
        let quote = html[attr_start..].chars().next()?;
        if quote != '"' && quote != '\'' {
            from = attr_start;
            continue;
        }
        let value_start = attr_start + 1;
        let value_end = value_start + html[value_start..].find(quote)?;
        if html[value_start..value_end]
            .split_whitespace()
            .any(|c| c == class)
        {
            let content_start = value_end + html[value_end..].find('>')? + 1;
            return first_text(&html[content_start..]);
        }
        from = value_end + 1;
    }
    None
}

/// Text of the document `<title>` element.
pub fn title_text(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let open = lower.find("<title")?;
    let start = open + lower[open..].find('>')? + 1;
    let end = start + lower[start..].find("</title")?;
    let text = normalize_ws(&normalize_entities(&html[start..end]));
    (!text.is_empty()).then_some(text)
}

/// `content` of the `<meta>` tag carrying `property="<property>"`.
pub fn meta_property(html: &str, property: &str) -> Option<String> {
    let needle = format!("property=\"{property}\"");
    let at = html.find(&needle)?;
    let tag_start = html[..at].rfind('<')?;
    let tag_end = at + html[at..].find('>')?;
    let tag = &html[tag_start..tag_end];

    let content_start = tag.find("content=\"")? + "content=\"".len();
    let content_end = content_start + tag[content_start..].find('"')?;
    let content = tag[content_start..content_end].trim();
    (!content.is_empty()).then(|| content.to_string())
}

fn first_text(s: &str) -> Option<String> {
    let mut rest = s;
    loop {
        let text_end = rest.find('<').unwrap_or(rest.len());
        let text = normalize_ws(&normalize_entities(&rest[..text_end]));
        if !text.is_empty() {
            return Some(text);
        }
        if text_end == rest.len() {
            return None;
        }
        let tag_end = text_end + rest[text_end..].find('>')? + 1;
        rest = &rest[tag_end..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_from_url() {
        assert_eq!(
            product_id_from_url("https://www.myntra.com/35035821"),
            Some("35035821")
        );
        assert_eq!(
            product_id_from_url("https://www.myntra.com/35035821/"),
            Some("35035821")
        );
        assert_eq!(
            product_id_from_url(
                "https://www.myntra.com/tops/roadster/roadster-women-top/35662540/buy?src=x"
            ),
            Some("35662540")
        );
        assert_eq!(product_id_from_url("35035821"), Some("35035821"));
        assert_eq!(product_id_from_url("https://www.myntra.com/"), None);
        assert_eq!(product_id_from_url(""), None);
    }

    #[test]
    fn test_parse_price_text() {
        assert_eq!(parse_price_text("₹1,099"), Some(1099));
        assert_eq!(parse_price_text(" ₹ 999 "), Some(999));
        assert_eq!(parse_price_text("Rs. 2,499"), Some(2499));
        assert_eq!(parse_price_text("1299.00"), Some(1299));
        assert_eq!(parse_price_text("12.50"), None);
        assert_eq!(parse_price_text("₹0"), None);
        assert_eq!(parse_price_text("Sold out"), None);
        assert_eq!(parse_price_text(""), None);
    }

    #[test]
    fn test_text_by_class() {
        let html = r#"<div><p class="pdp-discount-container"><span class="pdp-price"><strong>₹1,099</strong></span><span class="pdp-mrp">MRP <s>₹2,199</s></span></p></div>"#;
        assert_eq!(text_by_class(html, "pdp-price").as_deref(), Some("₹1,099"));
        assert_eq!(text_by_class(html, "pdp-mrp").as_deref(), Some("MRP"));
        assert!(text_by_class(html, "pdp-title").is_none());

        let multi = r#"<h1 class='pdp-name pdp-bold'> Women  Printed&nbsp;Top </h1>"#;
        assert_eq!(
            text_by_class(multi, "pdp-name").as_deref(),
            Some("Women Printed Top")
        );
    }

    #[test]
    fn test_title_and_meta() {
        let html = r#"<html><head><TITLE>Buy Roadster Top | Myntra</TITLE>
<meta property="og:image" content="https://assets.example/top.jpg" /></head></html>"#;
        assert_eq!(
            title_text(html).as_deref(),
            Some("Buy Roadster Top | Myntra")
        );
        assert_eq!(
            meta_property(html, "og:image").as_deref(),
            Some("https://assets.example/top.jpg")
        );
        assert!(meta_property(html, "og:title").is_none());
    }
}
