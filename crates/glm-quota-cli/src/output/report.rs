//! Report presenters
//!
//! The terminal report is rendered through [`ReportPresenter`]. Builds with
//! the `styled` feature render tables; builds without it print a notice
//! telling the operator how to get them.

use glm_quota_core::ReportBundle;

/// Renders a collected report to text
pub trait ReportPresenter {
    fn render(&self, bundle: &ReportBundle) -> String;
}

/// Fallback used when table rendering is not compiled in
#[cfg_attr(feature = "styled", allow(dead_code))]
pub struct PlainPresenter;

/// Notice printed instead of tables
#[cfg_attr(feature = "styled", allow(dead_code))]
pub const STYLING_UNAVAILABLE_NOTICE: &str =
    "请安装带表格渲染的版本以获得更好的显示效果: cargo install glm-quota-cli --features styled";

impl ReportPresenter for PlainPresenter {
    fn render(&self, _bundle: &ReportBundle) -> String {
        format!("{}\n", STYLING_UNAVAILABLE_NOTICE)
    }
}

/// Presenter for this build
#[cfg(feature = "styled")]
pub fn presenter() -> Box<dyn ReportPresenter> {
    Box::new(super::styled::StyledPresenter::new(terminal_width()))
}

/// Presenter for this build
#[cfg(not(feature = "styled"))]
pub fn presenter() -> Box<dyn ReportPresenter> {
    Box::new(PlainPresenter)
}

/// Width assumed when neither `COLUMNS` nor the terminal reports one
#[cfg(feature = "styled")]
const FALLBACK_WIDTH: usize = 80;

/// Terminal width: `COLUMNS` when set, else the size of the attached terminal
#[cfg(feature = "styled")]
pub fn terminal_width() -> usize {
    let detected = crossterm::terminal::size().ok().map(|(cols, _)| cols);
    resolve_width(std::env::var("COLUMNS").ok(), detected)
}

#[cfg(feature = "styled")]
fn resolve_width(columns: Option<String>, detected: Option<u16>) -> usize {
    columns
        .and_then(|c| c.trim().parse::<usize>().ok())
        .filter(|w| *w > 0)
        .or_else(|| detected.map(usize::from).filter(|w| *w > 0))
        .unwrap_or(FALLBACK_WIDTH)
}
