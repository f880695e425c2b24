//! Search-engine and hosting support files: `sitemap.xml`, `robots.txt`,
//! `vercel.json` rewrites and the SVG logo.

use crate::error::{SiteError, SiteResult};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::json;
use std::io::Cursor;

pub const LOGO_SVG: &str = include_str!("templates/genesi_logo.svg");

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Sitemap with a single `<url>` entry for the page.
pub fn render_sitemap(site_url: &str, date: &str) -> SiteResult<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)]),
        ))
        .map_err(xml)?;
    writer
        .write_event(Event::Start(BytesStart::new("url")))
        .map_err(xml)?;
    for (name, text) in [
        ("loc", site_url),
        ("lastmod", date),
        ("changefreq", "daily"),
        ("priority", "1.0"),
    ] {
        write_text_element(&mut writer, name, text)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("url")))
        .map_err(xml)?;
    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(xml)?;

    let mut out = String::from_utf8(writer.into_inner().into_inner()).map_err(xml)?;
    out.push('\n');
    Ok(out)
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> SiteResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml)?;
    Ok(())
}

fn xml<E: std::fmt::Display>(e: E) -> SiteError {
    SiteError::Xml(e.to_string())
}

pub fn render_robots(sitemap_url: &str) -> String {
    format!("User-agent: *\nAllow: /\nSitemap: {sitemap_url}\n")
}

/// Rewrite rules sending every path that is not an API route or a file to
/// the single page.
pub fn render_rewrites(index_file: &str) -> SiteResult<String> {
    let conf = json!({
        "cleanUrls": true,
        "rewrites": [
            {
                "source": "/((?!api|.*\\..*).*)",
                "destination": format!("/{index_file}"),
            }
        ]
    });
    Ok(serde_json::to_string_pretty(&conf)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_has_single_daily_url() {
        let xml = render_sitemap("https://genesi.vrabo.it", "2025-05-06").unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert_eq!(xml.matches("<url>").count(), 1);
        assert!(xml.contains("<loc>https://genesi.vrabo.it</loc>"));
        assert!(xml.contains("<lastmod>2025-05-06</lastmod>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_sitemap_escapes_url() {
        let xml = render_sitemap("https://example.org/?a=1&b=2", "2025-05-06").unwrap();
        assert!(xml.contains("<loc>https://example.org/?a=1&amp;b=2</loc>"));
    }

    #[test]
    fn test_robots_points_at_sitemap() {
        assert_eq!(
            render_robots("https://genesi.vrabo.it/sitemap.xml"),
            "User-agent: *\nAllow: /\nSitemap: https://genesi.vrabo.it/sitemap.xml\n"
        );
    }

    #[test]
    fn test_rewrites_route_to_index() {
        let raw = render_rewrites("index.html").unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["cleanUrls"], true);
        assert_eq!(value["rewrites"].as_array().unwrap().len(), 1);
        assert_eq!(value["rewrites"][0]["source"], "/((?!api|.*\\..*).*)");
        assert_eq!(value["rewrites"][0]["destination"], "/index.html");
    }

    #[test]
    fn test_logo_is_svg() {
        assert!(LOGO_SVG.starts_with("<svg"));
        assert!(LOGO_SVG.contains("GENESI"));
    }
}
