//! HTML rendering
//!
//! Page controllers turn records into [`Table`]s; everything user-supplied
//! is escaped on the way in.

pub mod format;
pub mod html;
pub mod labels;
pub mod pagination;
pub mod table;

pub use html::{Html, HtmlBuilder, escape, safe_url};
pub use labels::Label;
pub use pagination::PageWindow;
pub use table::{Affordance, Row, Table, Target, badge};
