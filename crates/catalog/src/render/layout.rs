//! Page model and document rendering.

use super::{error_message, text};

/// Named insertion point of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: &'static str,
    pub html: String,
}

/// Everything a page shows: its sections, the loading flag and a page-level error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    pub title: String,
    pub sections: Vec<Section>,
    pub loading: bool,
    pub error: Option<String>,
}

impl PageView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Replace the content of section `id`, adding it if missing
    pub fn set_section(&mut self, id: &'static str, html: impl Into<String>) {
        let html = html.into();
        match self.sections.iter_mut().find(|s| s.id == id) {
            Some(section) => section.html = html,
            None => self.sections.push(Section { id, html }),
        }
    }

    pub fn section(&self, id: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.html.as_str())
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

/// Full HTML document for a page
pub fn render_document(view: &PageView) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        r#"<div id="loadingMessage"{}>Loading...</div>"#,
        if view.loading { "" } else { r#" style="display:none""# }
    ));
    body.push('\n');

    match &view.error {
        Some(message) => body.push_str(&format!(
            r#"<div id="errorMessage">{}</div>"#,
            error_message(message)
        )),
        None => body.push_str(r#"<div id="errorMessage" style="display:none"></div>"#),
    }
    body.push('\n');

    for section in &view.sections {
        body.push_str(&format!(
            "<section id=\"{}\">\n{}\n</section>\n",
            section.id, section.html
        ));
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n",
            "<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n"
        ),
        title = text(&view.title),
        body = body,
    )
}
