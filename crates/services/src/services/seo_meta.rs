//! Resolution of social fallbacks and rendering of `<head>` metadata for public pages.

use db::models::seo_data::{SeoData, present};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use ts_rs::TS;

/// Social card values after fallback resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct ResolvedSocialMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_image_alt: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    pub twitter_image_alt: Option<String>,
}

fn owned(value: &Option<String>) -> Option<String> {
    present(value).map(|v| v.trim().to_string())
}

/// Resolve Open Graph and Twitter values.
///
/// Open Graph falls back to the base SEO fields and then to `page_title`. Twitter falls
/// back to Open Graph and then the base fields.
pub fn resolve_social(data: &SeoData, page_title: Option<&str>) -> ResolvedSocialMeta {
    let page_title = page_title
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.trim().to_string());

    let title = owned(&data.seo_title).or(page_title);
    let description = owned(&data.seo_description);

    let og_title = owned(&data.og_title).or_else(|| title.clone());
    let og_description = owned(&data.og_description).or_else(|| description.clone());
    let og_image = owned(&data.og_image);
    let og_image_alt = owned(&data.og_image_alt);

    ResolvedSocialMeta {
        twitter_title: owned(&data.twitter_title).or_else(|| og_title.clone()),
        twitter_description: owned(&data.twitter_description)
            .or_else(|| og_description.clone()),
        twitter_image: owned(&data.twitter_image).or_else(|| og_image.clone()),
        twitter_image_alt: owned(&data.twitter_image_alt)
            .or_else(|| og_image_alt.clone()),
        title,
        description,
        og_title,
        og_description,
        og_image,
        og_image_alt,
    }
}

/// Value of the robots meta tag
pub fn robots_directive(data: &SeoData) -> String {
    let mut parts = vec![
        if data.robots_index { "index" } else { "noindex" },
        if data.robots_follow { "follow" } else { "nofollow" },
    ];
    if data.robots_nosnippet {
        parts.push("nosnippet");
    }
    parts.join(", ")
}

/// Canonical URL, defaulting to the page's own address on `site_url`.
pub fn canonical_url(data: &SeoData, site_url: &str) -> String {
    match present(&data.canonical_url) {
        Some(url) => url.trim().to_string(),
        None => format!("{}{}", site_url.trim_end_matches('/'), data.page_path),
    }
}

/// JSON-LD for the page. Valid custom JSON-LD wins; otherwise a minimal object is built
/// from `structured_data_type`. Returns `None` when neither applies.
pub fn structured_data(data: &SeoData, site_url: &str) -> Option<Value> {
    if let Some(custom) = present(&data.custom_json_ld)
        && let Ok(value) = serde_json::from_str::<Value>(custom)
    {
        return Some(value);
    }

    let schema_type = present(&data.structured_data_type)?.trim();
    let mut value = json!({
        "@context": "https://schema.org",
        "@type": schema_type,
        "url": canonical_url(data, site_url),
    });
    if let Some(title) = present(&data.seo_title) {
        value["name"] = Value::String(title.trim().to_string());
    }
    if let Some(description) = present(&data.seo_description) {
        value["description"] = Value::String(description.trim().to_string());
    }
    if let Some(image) = present(&data.og_image) {
        value["image"] = Value::String(image.trim().to_string());
    }
    Some(value)
}

fn escape_html(text: &str) -> String {
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

fn meta_name(out: &mut Vec<String>, name: &str, content: &Option<String>) {
    if let Some(content) = content {
        out.push(format!(
            r#"<meta name="{}" content="{}">"#,
            name,
            escape_html(content)
        ));
    }
}

fn meta_property(out: &mut Vec<String>, property: &str, content: &Option<String>) {
    if let Some(content) = content {
        out.push(format!(
            r#"<meta property="{}" content="{}">"#,
            property,
            escape_html(content)
        ));
    }
}

/// Render the `<head>` tags for a page, one tag per line.
pub fn render_head_tags(data: &SeoData, site_url: &str) -> String {
    let social = resolve_social(data, None);
    let canonical = canonical_url(data, site_url);
    let mut tags = Vec::new();

    if let Some(title) = &social.title {
        tags.push(format!("<title>{}</title>", escape_html(title)));
    }
    meta_name(&mut tags, "description", &social.description);

    let keywords = data.keywords().collect::<Vec<_>>();
    if !keywords.is_empty() {
        meta_name(&mut tags, "keywords", &Some(keywords.join(", ")));
    }
    meta_name(&mut tags, "robots", &Some(robots_directive(data)));
    tags.push(format!(
        r#"<link rel="canonical" href="{}">"#,
        escape_html(&canonical)
    ));

    meta_property(&mut tags, "og:type", &Some("website".to_string()));
    meta_property(&mut tags, "og:url", &Some(canonical));
    meta_property(&mut tags, "og:title", &social.og_title);
    meta_property(&mut tags, "og:description", &social.og_description);
    meta_property(&mut tags, "og:image", &social.og_image);
    meta_property(&mut tags, "og:image:alt", &social.og_image_alt);

    let card = if social.twitter_image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };
    meta_name(&mut tags, "twitter:card", &Some(card.to_string()));
    meta_name(&mut tags, "twitter:title", &social.twitter_title);
    meta_name(&mut tags, "twitter:description", &social.twitter_description);
    meta_name(&mut tags, "twitter:image", &social.twitter_image);
    meta_name(&mut tags, "twitter:image:alt", &social.twitter_image_alt);

    if let Some(json_ld) = structured_data(data, site_url) {
        // `</` inside a script body would close the tag early
        let body = json_ld.to_string().replace("</", "<\\/");
        tags.push(format!(
            r#"<script type="application/ld+json">{}</script>"#,
            body
        ));
    }

    tags.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://acmespace.example/";

    fn base() -> SeoData {
        let mut data = SeoData::new("/industries/healthcare");
        data.seo_title = Some("Healthcare modular buildings".to_string());
        data.seo_description = Some("Clinics and testing sites delivered fast.".to_string());
        data
    }

    #[test]
    fn og_falls_back_to_seo_fields() {
        let social = resolve_social(&base(), None);
        assert_eq!(social.og_title.as_deref(), Some("Healthcare modular buildings"));
        assert_eq!(
            social.og_description.as_deref(),
            Some("Clinics and testing sites delivered fast.")
        );
    }

    #[test]
    fn twitter_prefers_og_over_seo() {
        let mut data = base();
        data.og_title = Some("OG title".to_string());
        data.og_image = Some("https://cdn.example/og.png".to_string());
        data.twitter_description = Some("Tweet text".to_string());

        let social = resolve_social(&data, None);
        assert_eq!(social.twitter_title.as_deref(), Some("OG title"));
        assert_eq!(social.twitter_description.as_deref(), Some("Tweet text"));
        assert_eq!(social.twitter_image.as_deref(), Some("https://cdn.example/og.png"));
    }

    #[test]
    fn og_never_falls_back_to_twitter() {
        let mut data = SeoData::new("/");
        data.twitter_title = Some("Only on twitter".to_string());
        data.twitter_image = Some("https://cdn.example/tw.png".to_string());

        let social = resolve_social(&data, None);
        assert_eq!(social.og_title, None);
        assert_eq!(social.og_image, None);
        assert_eq!(social.twitter_title.as_deref(), Some("Only on twitter"));
    }

    #[test]
    fn blank_overrides_fall_through() {
        let mut data = base();
        data.og_title = Some("  ".to_string());
        data.twitter_title = Some(String::new());
        let social = resolve_social(&data, None);
        assert_eq!(social.twitter_title.as_deref(), Some("Healthcare modular buildings"));
    }

    #[test]
    fn page_title_is_last_resort() {
        let data = SeoData::new("/case-studies/acme");
        let social = resolve_social(&data, Some("Acme case study"));
        assert_eq!(social.title.as_deref(), Some("Acme case study"));
        assert_eq!(social.twitter_title.as_deref(), Some("Acme case study"));
    }

    #[test]
    fn robots_directive_variants() {
        let mut data = SeoData::new("/");
        assert_eq!(robots_directive(&data), "index, follow");
        data.robots_index = false;
        data.robots_follow = false;
        data.robots_nosnippet = true;
        assert_eq!(robots_directive(&data), "noindex, nofollow, nosnippet");
    }

    #[test]
    fn canonical_defaults_to_site_url_and_path() {
        assert_eq!(
            canonical_url(&base(), SITE),
            "https://acmespace.example/industries/healthcare"
        );
    }

    #[test]
    fn invalid_custom_json_ld_falls_back_to_generated() {
        let mut data = base();
        data.custom_json_ld = Some("{broken".to_string());
        data.structured_data_type = Some("Service".to_string());

        let value = structured_data(&data, SITE).unwrap();
        assert_eq!(value["@type"], "Service");
        assert_eq!(value["name"], "Healthcare modular buildings");

        data.structured_data_type = None;
        assert!(structured_data(&data, SITE).is_none());
    }

    #[test]
    fn custom_json_ld_is_used_verbatim() {
        let mut data = base();
        data.custom_json_ld = Some(r#"{"@type":"LocalBusiness","name":"Acme"}"#.to_string());
        data.structured_data_type = Some("Service".to_string());
        let value = structured_data(&data, SITE).unwrap();
        assert_eq!(value["@type"], "LocalBusiness");
    }

    #[test]
    fn head_tags_are_escaped() {
        let mut data = base();
        data.seo_title = Some("Sheds & \"Offices\" <Rent>".to_string());
        data.seo_keywords = vec!["a".into(), "b".into()];
        data.custom_json_ld = Some(r#"{"name":"</script>"}"#.to_string());

        let html = render_head_tags(&data, SITE);
        assert!(html.contains("<title>Sheds &amp; &quot;Offices&quot; &lt;Rent&gt;</title>"));
        assert!(html.contains(r#"<meta name="keywords" content="a, b">"#));
        assert!(html.contains(r#"<meta name="robots" content="index, follow">"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://acmespace.example/industries/healthcare">"#));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary">"#));
        assert!(html.contains(r#"<\/script>"#));
        assert_eq!(html.matches("</script>").count(), 1);
    }
}
