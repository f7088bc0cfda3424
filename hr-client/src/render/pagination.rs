//! Server-side pagination control

use shared::Lang;

use super::html::{Html, HtmlBuilder};

/// Pages shown on each side of the current one
const WINDOW_RADIUS: u32 = 2;

/// Visible slice of a paginated listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub pages: u32,
    pub total: u32,
}

impl PageWindow {
    pub fn new(current: u32, pages: u32, total: u32) -> Self {
        Self {
            current: current.clamp(1, pages.max(1)),
            pages,
            total,
        }
    }

    /// No control is rendered for a single page
    pub fn is_visible(&self) -> bool {
        self.pages > 1
    }

    /// Page numbers around the current page (at most five)
    pub fn numbers(&self) -> std::ops::RangeInclusive<u32> {
        let start = self.current.saturating_sub(WINDOW_RADIUS).max(1);
        let end = (self.current + WINDOW_RADIUS).min(self.pages.max(1));
        start..=end
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.pages
    }

    pub fn to_html(&self, lang: Lang) -> Html {
        if !self.is_visible() {
            return Html::default();
        }

        let mut builder = HtmlBuilder::new();
        builder.open("nav", &[]).open("ul", &[("class", "pagination justify-content-center")]);

        let previous = self.current.saturating_sub(1).to_string();
        page_item(
            &mut builder,
            lang.pick("السابق", "Previous"),
            &previous,
            if self.has_previous() { "page-item" } else { "page-item disabled" },
        );

        for number in self.numbers() {
            let label = number.to_string();
            let class = if number == self.current { "page-item active" } else { "page-item" };
            page_item(&mut builder, &label, &label, class);
        }

        let next = (self.current + 1).to_string();
        page_item(
            &mut builder,
            lang.pick("التالي", "Next"),
            &next,
            if self.has_next() { "page-item" } else { "page-item disabled" },
        );

        builder.close().close();
        let summary = format!(
            "{}: {} {}",
            lang.pick("إجمالي", "Total"),
            self.total,
            lang.pick("مستخدم", "users")
        );
        builder.element("div", &[("class", "text-center text-muted small mt-2")], &summary);
        builder.build()
    }
}

fn page_item(builder: &mut HtmlBuilder, label: &str, page: &str, class: &'static str) {
    builder
        .open("li", &[("class", class)])
        .element(
            "a",
            &[("class", "page-link"), ("href", "#"), ("data-page", page)],
            label,
        )
        .close();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_in_the_middle() {
        let w = PageWindow::new(5, 10, 480);
        assert_eq!(w.numbers().collect::<Vec<_>>(), vec![3, 4, 5, 6, 7]);
        assert!(w.has_previous() && w.has_next());
    }

    #[test]
    fn test_window_at_edges() {
        let first = PageWindow::new(1, 10, 480);
        assert_eq!(first.numbers().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(!first.has_previous());

        let last = PageWindow::new(10, 10, 480);
        assert_eq!(last.numbers().collect::<Vec<_>>(), vec![8, 9, 10]);
        assert!(!last.has_next());
    }

    #[test]
    fn test_single_page_hidden() {
        let w = PageWindow::new(1, 1, 12);
        assert!(!w.is_visible());
        assert!(w.to_html(Lang::En).is_empty());
    }

    #[test]
    fn test_markup_marks_disabled_and_active() {
        let html = PageWindow::new(1, 3, 120).to_html(Lang::En).into_string();
        assert!(html.contains(r##"<li class="page-item disabled"><a class="page-link" href="#" data-page="0">Previous</a></li>"##));
        assert!(html.contains(r##"<li class="page-item active"><a class="page-link" href="#" data-page="1">1</a></li>"##));
        assert!(html.contains("Total: 120 users"));
    }
}
