use kuchiki::traits::TendrilSink as _;

use crate::config::Config;

/// Checks a rendered page before it is written: nothing auto-loads from another
/// origin, and every element the page script looks up is present.
pub fn assert_page_wired(html: &str, css: &str, config: &Config) -> anyhow::Result<()> {
    assert_css_local(css)?;
    let doc = kuchiki::parse_html().one(html);
    assert_no_remote_autoload(&doc)?;
    assert_elements_present(&doc, config)?;
    Ok(())
}

fn assert_css_local(css: &str) -> anyhow::Result<()> {
    let lowered = css.to_ascii_lowercase();
    if lowered.contains("url(http://")
        || lowered.contains("url(https://")
        || lowered.contains("url(\"http")
        || lowered.contains("url('http")
        || lowered.contains("url(//")
        || lowered.contains("url(\"//")
        || lowered.contains("url('//")
        || lowered.contains("@import")
    {
        anyhow::bail!("page check failed: css references non-local resources");
    }
    Ok(())
}

fn assert_no_remote_autoload(doc: &kuchiki::NodeRef) -> anyhow::Result<()> {
    for selector in ["img[src]", "script[src]", "link[href]", "iframe[src]"] {
        if let Ok(nodes) = doc.select(selector) {
            for node in nodes {
                let attrs = node.attributes.borrow();
                for attr in ["src", "href"] {
                    if let Some(v) = attrs.get(attr) {
                        if is_remote(v) {
                            anyhow::bail!(
                                "page check failed: <{} {}=\"{}\"> is not local",
                                node.name.local.as_ref(),
                                attr,
                                v
                            );
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn assert_elements_present(doc: &kuchiki::NodeRef, config: &Config) -> anyhow::Result<()> {
    let mut required = vec!["input.github-link".to_string(), "#themeToggleBtn".to_string()];
    for target in &config.targets {
        let key = target.key();
        required.push(format!(".command.{}", key));
        required.push(format!("#copy-button-{}", key));
        required.push(format!("#copy-status-message-{}", key));
    }

    for selector in &required {
        if doc.select_first(selector).is_err() {
            anyhow::bail!("page check failed: missing element {}", selector);
        }
    }
    Ok(())
}

fn is_remote(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::page::{PageAssets, build_page};

    #[test]
    fn rendered_page_passes() {
        let config = Config::preset(Preset::Current);
        let html = build_page(&config, &PageAssets::Inline { css: "", js: "" });
        assert_page_wired(&html, crate::builtin::BUILTIN_CSS, &config).unwrap();
    }

    #[test]
    fn missing_target_elements_fail() {
        let legacy = Config::preset(Preset::Legacy);
        let html = build_page(&legacy, &PageAssets::Inline { css: "", js: "" });
        let err = assert_page_wired(&html, "", &Config::preset(Preset::Current)).unwrap_err();
        assert!(err.to_string().contains("fedora"));
    }

    #[test]
    fn remote_script_fails() {
        let config = Config::preset(Preset::Legacy);
        let html = build_page(
            &config,
            &PageAssets::Linked {
                css_href: "assets/css/site.css",
                js_href: "https://cdn.example.com/packhub.js",
            },
        );
        assert!(assert_page_wired(&html, "", &config).is_err());
    }

    #[test]
    fn remote_css_url_fails() {
        assert!(assert_css_local("body { background: url(https://x/y.png) }").is_err());
        assert!(assert_css_local("@import \"theme.css\";").is_err());
        assert!(assert_css_local("body { color: red }").is_ok());
    }
}
