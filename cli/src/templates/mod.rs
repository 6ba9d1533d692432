pub mod export_page;
pub mod live_page;

pub use export_page::EXPORT_PAGE_TEMPLATE;
pub use live_page::LIVE_PAGE_TEMPLATE;

/// Replace `{{KEY}}` placeholders in a template, in the given order
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |page, (key, value)| {
        page.replace(&format!("{{{{{}}}}}", key), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let page = render_template("<a>{{X}}</a><b>{{X}}{{Y}}</b>", &[("X", "1"), ("Y", "2")]);
        assert_eq!(page, "<a>1</a><b>12</b>");
    }

    #[test]
    fn test_live_page_placeholders_are_known() {
        let page = render_template(
            LIVE_PAGE_TEMPLATE,
            &[
                ("TITLE", "t"),
                ("WIDTH", "1200"),
                ("HEIGHT", "800"),
                ("BACKGROUND_URL", "/background"),
                ("EVENTS_URL", "/events"),
            ],
        );
        assert!(!page.contains("{{"));
    }
}
