//! Table rows with action affordances
//!
//! Rows carry no script. Buttons expose `data-action` / `data-id` for the
//! host page to bind; downloads are plain links.

use super::html::{Html, HtmlBuilder};
use super::labels::Label;

/// Where an affordance points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Button acting on the row's record
    Record(i64),
    /// Link to a server resource
    Link(String),
}

/// One action control on a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affordance {
    /// Stable action key (`edit`, `approve`, `download`, ...)
    pub action: &'static str,
    pub label: String,
    /// Bootstrap button variant (`primary`, `danger`, ...)
    pub style: &'static str,
    pub target: Target,
    pub enabled: bool,
}

impl Affordance {
    pub fn button(action: &'static str, label: &str, style: &'static str, id: i64) -> Self {
        Self {
            action,
            label: label.to_string(),
            style,
            target: Target::Record(id),
            enabled: true,
        }
    }

    pub fn link(action: &'static str, label: &str, style: &'static str, href: String) -> Self {
        Self {
            action,
            label: label.to_string(),
            style,
            target: Target::Link(href),
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn to_html(&self) -> Html {
        let class = format!("btn btn-sm btn-{} me-1", self.style);
        let mut builder = HtmlBuilder::new();
        match &self.target {
            Target::Record(id) => {
                let id = id.to_string();
                let mut attrs = vec![
                    ("type", "button"),
                    ("class", class.as_str()),
                    ("data-action", self.action),
                    ("data-id", id.as_str()),
                ];
                if !self.enabled {
                    attrs.push(("disabled", "disabled"));
                }
                builder.element("button", &attrs, &self.label);
            }
            Target::Link(href) => {
                builder.element(
                    "a",
                    &[
                        ("class", class.as_str()),
                        ("href", href.as_str()),
                        ("data-action", self.action),
                    ],
                    &self.label,
                );
            }
        }
        builder.build()
    }
}

/// Colored badge
pub fn badge(label: &Label) -> Html {
    let class = format!("badge bg-{}", label.color);
    HtmlBuilder::new()
        .element("span", &[("class", class.as_str())], &label.text)
        .build()
}

/// One rendered record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: i64,
    pub class: Option<String>,
    pub cells: Vec<Html>,
    pub actions: Vec<Affordance>,
}

impl Row {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            class: None,
            cells: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Escaped text cell
    pub fn text(mut self, text: &str) -> Self {
        self.cells.push(Html::text(text));
        self
    }

    /// Text cell, `-` when empty
    pub fn text_or_dash(self, text: Option<&str>) -> Self {
        let text = text.map(str::trim).filter(|t| !t.is_empty()).unwrap_or("-");
        self.text(text)
    }

    pub fn cell(mut self, html: Html) -> Self {
        self.cells.push(html);
        self
    }

    pub fn action(mut self, affordance: Affordance) -> Self {
        self.actions.push(affordance);
        self
    }

    /// True when an affordance with this key is present
    pub fn offers(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a.action == action)
    }

    pub fn action_keys(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.action).collect()
    }

    pub fn to_html(&self) -> Html {
        let mut builder = HtmlBuilder::new();
        let id = self.id.to_string();
        match &self.class {
            Some(class) => builder.open("tr", &[("data-id", id.as_str()), ("class", class.as_str())]),
            None => builder.open("tr", &[("data-id", id.as_str())]),
        };
        for cell in &self.cells {
            builder.open("td", &[]).fragment(cell).close();
        }
        if !self.actions.is_empty() {
            builder.open("td", &[("class", "actions")]);
            for action in &self.actions {
                builder.fragment(&action.to_html());
            }
            builder.close();
        }
        builder.build()
    }
}

/// Rendered collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub empty_text: String,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Row>, empty_text: impl Into<String>) -> Self {
        Self {
            headers,
            rows,
            empty_text: empty_text.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: i64) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn ids(&self) -> Vec<i64> {
        self.rows.iter().map(|r| r.id).collect()
    }

    /// `<tbody>` content only, for pages that keep their own header
    pub fn body_html(&self) -> Html {
        if self.rows.is_empty() {
            let colspan = self.headers.len().max(1).to_string();
            return HtmlBuilder::new()
                .open("tr", &[])
                .element(
                    "td",
                    &[("colspan", colspan.as_str()), ("class", "text-center text-muted")],
                    &self.empty_text,
                )
                .build();
        }
        Html::concat(self.rows.iter().map(Row::to_html))
    }

    pub fn to_html(&self) -> Html {
        let mut builder = HtmlBuilder::new();
        builder.open("table", &[("class", "table table-hover")]).open("thead", &[]).open("tr", &[]);
        for header in &self.headers {
            builder.element("th", &[], header);
        }
        builder.close().close().open("tbody", &[]).fragment(&self.body_html());
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_escapes_cells() {
        let row = Row::new(3).text("<img src=x onerror=alert(1)>").text_or_dash(None);
        let html = row.to_html();
        assert_eq!(
            html.as_str(),
            r#"<tr data-id="3"><td>&lt;img src=x onerror=alert(1)&gt;</td><td>-</td></tr>"#
        );
    }

    #[test]
    fn test_affordance_markup() {
        let button = Affordance::button("approve", "Approve", "success", 9).to_html();
        assert_eq!(
            button.as_str(),
            r#"<button type="button" class="btn btn-sm btn-success me-1" data-action="approve" data-id="9">Approve</button>"#
        );
        let disabled = Affordance::button("set-password", "Set", "primary", 1)
            .enabled(false)
            .to_html();
        assert!(disabled.as_str().contains(r#"disabled="disabled""#));
        let link = Affordance::link("download", "PDF", "info", "/api/payroll/9/payslip".into()).to_html();
        assert!(link.as_str().starts_with(r#"<a class="btn btn-sm btn-info me-1" href="/api/payroll/9/payslip""#));
    }

    #[test]
    fn test_empty_table_shows_placeholder() {
        let table = Table::new(vec!["A".into(), "B".into()], vec![], "No data available");
        assert_eq!(
            table.body_html().as_str(),
            r#"<tr><td colspan="2" class="text-center text-muted">No data available</td></tr>"#
        );
        assert!(table.to_html().as_str().starts_with(r#"<table class="table table-hover"><thead><tr><th>A</th><th>B</th></tr></thead><tbody>"#));
    }

    #[test]
    fn test_offers() {
        let row = Row::new(1).action(Affordance::button("edit", "Edit", "warning", 1));
        assert!(row.offers("edit"));
        assert!(!row.offers("delete"));
    }
}
