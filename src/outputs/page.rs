//! The single-page site.
//!
//! The page is a fixed template (`templates/index.html`) with the run's
//! archive embedded as a JavaScript literal. Clicking a language button calls
//! `loadLang(code)`, which swaps the chapter HTML and the map markers; the
//! first configured language is loaded when the page opens.

use crate::config::SiteConfig;
use crate::error::{ConfigError, SiteResult};
use crate::models::ArchiveExport;

const PAGE_TEMPLATE: &str = include_str!("templates/index.html");

/// Render `index.html` for the given archive.
pub fn render_page(archive: &ArchiveExport, config: &SiteConfig, date: &str) -> SiteResult<String> {
    let default_lang = config
        .default_language()
        .ok_or(ConfigError::NoLanguages)?;
    let site_host = config.site_host()?;
    let logo_url = config.page_asset_url(&config.files.logo)?;
    let archive_json = script_safe(&serde_json::to_string(archive)?);

    Ok(PAGE_TEMPLATE
        .replace("{{DEFAULT_LANG}}", &default_lang.code)
        .replace("{{SITE_URL}}", &config.site_url)
        .replace("{{SITE_HOST}}", &site_host)
        .replace("{{LOGO_URL}}", &logo_url)
        .replace("{{LOGO_FILE}}", &config.files.logo)
        .replace("{{DATE}}", date)
        .replace("{{BUTTONS}}", &language_buttons(config))
        .replace("{{ARCHIVE_JSON}}", &archive_json))
}

/// One toggle button per configured language, in configured order.
pub fn language_buttons(config: &SiteConfig) -> String {
    config
        .languages
        .iter()
        .map(|lang| {
            format!(
                "<button class='lang' onclick=\"loadLang('{}')\">{}</button>",
                lang.code, lang.name
            )
        })
        .collect()
}

/// Keep embedded JSON from closing the surrounding `<script>` element or
/// switching the HTML parser into its escaped script states.
/// `<\/` and `<\!--` are the same strings to the JavaScript parser.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}
