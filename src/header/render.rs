use crate::config::{ConfigStore, Rgb};
use crate::header::Header;
use crate::ui::span::{Span, SpanLine, line_width};
use crate::ui::style::{Color, Style};
use crate::ui::{CursorPos, RenderFrame};
use std::ops::Range;
use unicode_width::UnicodeWidthStr;

pub const MAX_VISIBLE_RESULTS: usize = 8;
const MIN_SELECTOR_WIDTH: usize = 24;
const EMPTY_SELECTION: &str = "Select dataset";

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub accent: Color,
    pub scale: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            scale: Vec::new(),
        }
    }
}

impl Palette {
    /// Accent is the first parseable color-pool entry; the colorscale tints
    /// result bullets.
    pub fn from_store(store: &ConfigStore) -> Self {
        let accent = store
            .color_pool()
            .iter()
            .find_map(|color| color.parse::<Rgb>().ok())
            .map(Color::from)
            .unwrap_or(Color::Cyan);
        let scale = store.colorscale().iter().copied().map(Color::from).collect();
        Self { accent, scale }
    }

    fn scale_at(&self, index: usize, count: usize) -> Color {
        if self.scale.is_empty() {
            return Color::DarkGrey;
        }
        let last = self.scale.len() - 1;
        let span = count.saturating_sub(1).max(1);
        self.scale[(index.min(span) * last) / span]
    }
}

/// Where things landed on screen, for pointer hit-testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderLayout {
    pub logo: Range<u16>,
    pub selector: Range<u16>,
    pub results_row: u16,
    /// Result index shown on each row starting at `results_row`.
    pub result_rows: Vec<usize>,
}

impl HeaderLayout {
    pub fn hits_logo(&self, col: u16, row: u16) -> bool {
        row == 0 && self.logo.contains(&col)
    }

    pub fn hits_selector(&self, col: u16, row: u16) -> bool {
        row == 0 && self.selector.contains(&col)
    }

    pub fn result_at(&self, row: u16) -> Option<usize> {
        let offset = row.checked_sub(self.results_row)?;
        self.result_rows.get(offset as usize).copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeaderView {
    pub frame: RenderFrame,
    pub layout: HeaderLayout,
}

pub fn render(header: &Header, palette: &Palette) -> HeaderView {
    let selector = header.selector();
    let mut view = HeaderView::default();
    let mut top: SpanLine = Vec::new();

    let mark = if header.is_refreshing() { "↻ " } else { "◆ " };
    top.push(Span::styled(mark, Style::new().color(palette.accent).bold()));
    top.push(Span::styled(header.title(), Style::new().bold()));
    view.layout.logo = 0..cols(line_width(&top));

    top.push(Span::styled(" │ ", Style::new().dim()));
    top.push(Span::styled("dataset ", Style::new().dim()));
    let selector_start = line_width(&top);

    if selector.is_editing() {
        top.push(Span::new(selector.value()));
        if !selector.value().is_empty()
            && let Some(best) = selector.best_match()
        {
            top.push(Span::styled(best.placeholder.clone(), Style::new().dim()));
        }
        if selector.state().is_input_focused() {
            let col = selector_start + UnicodeWidthStr::width(selector.value());
            view.frame.cursor = Some(CursorPos {
                col: cols(col),
                row: 0,
            });
        }
    } else if selector.committed().is_empty() {
        top.push(Span::styled(EMPTY_SELECTION, Style::new().dim()));
    } else {
        top.push(Span::styled(
            selector.committed(),
            Style::new().color(palette.accent),
        ));
    }

    let used = line_width(&top) - selector_start;
    if used < MIN_SELECTOR_WIDTH {
        top.push(Span::new(" ".repeat(MIN_SELECTOR_WIDTH - used)));
    }
    view.layout.selector = cols(selector_start)..cols(line_width(&top));

    if !header.links().is_empty() {
        top.push(Span::styled(" │ ", Style::new().dim()));
        for (i, link) in header.links().iter().enumerate() {
            if i > 0 {
                top.push(Span::new("  "));
            }
            top.push(Span::styled(link.title.clone(), Style::new().underline()));
        }
    }
    view.frame.lines.push(top);

    if selector.is_editing() {
        view.layout.results_row = 1;
        render_results(header, palette, selector_start, &mut view);
    }

    if let Some(error) = header.visible_error() {
        view.frame.lines.push(vec![Span::styled(
            format!("{}! {}", " ".repeat(selector_start), error),
            Style::new().color(Color::Red),
        )]);
    }

    view
}

fn render_results(header: &Header, palette: &Palette, indent: usize, view: &mut HeaderView) {
    let selector = header.selector();
    let results = selector.results();
    let pad = " ".repeat(indent);

    if results.is_empty() {
        view.frame.lines.push(vec![
            Span::new(pad),
            Span::styled("no matching datasets", Style::new().dim()),
        ]);
        return;
    }

    let start = selector
        .current_result()
        .map(|current| current.saturating_sub(MAX_VISIBLE_RESULTS - 1))
        .unwrap_or(0);
    let end = (start + MAX_VISIBLE_RESULTS).min(results.len());

    if start > 0 {
        view.frame.lines.push(vec![
            Span::new(pad.clone()),
            Span::styled(format!("  ↑ {start} more"), Style::new().dim()),
        ]);
        view.layout.results_row += 1;
    }

    for (index, name) in results.iter().enumerate().take(end).skip(start) {
        let highlighted = selector.current_result() == Some(index);
        let (marker, name_style) = if highlighted {
            ("› ", Style::new().color(palette.accent).bold())
        } else {
            ("  ", Style::new())
        };
        view.frame.lines.push(vec![
            Span::new(pad.clone()),
            Span::styled(marker, name_style),
            Span::styled(
                "● ",
                Style::new().color(palette.scale_at(index, results.len())),
            ),
            Span::styled(name.clone(), name_style),
        ]);
        view.layout.result_rows.push(index);
    }

    let hidden = results.len() - end;
    if hidden > 0 {
        view.frame.lines.push(vec![
            Span::new(pad),
            Span::styled(format!("  … {hidden} more"), Style::new().dim()),
        ]);
    }
}

fn cols(width: usize) -> u16 {
    u16::try_from(width).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LogBackend;
    use crate::config::{AppConfig, QueryResult};
    use crate::header::{HeaderLink, HeaderOptions};
    use crate::selector::SelectorEvent;
    use crate::ui::span::line_text;
    use std::sync::Arc;

    fn header(active: &str, datasets: &[String]) -> Header {
        Header::new(
            HeaderOptions {
                title: "FiftyOne".into(),
                links: vec![HeaderLink::new("Docs", "https://example.com")],
            },
            active,
            datasets.to_vec(),
            Arc::new(LogBackend),
        )
    }

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("dataset-{i:02}")).collect()
    }

    #[test]
    fn reading_shows_committed_dataset_and_links() {
        let header = header("dataset-01", &names(3));
        let view = render(&header, &Palette::default());
        assert_eq!(view.frame.lines.len(), 1);
        let text = line_text(&view.frame.lines[0]);
        assert!(text.starts_with("◆ FiftyOne │ dataset dataset-01"));
        assert!(text.ends_with("│ Docs"));
        assert!(view.frame.cursor.is_none());
        assert!(view.layout.hits_logo(0, 0));
        assert!(!view.layout.hits_logo(0, 1));
    }

    #[test]
    fn empty_selection_shows_prompt() {
        let header = header("", &names(2));
        let view = render(&header, &Palette::default());
        assert!(line_text(&view.frame.lines[0]).contains(EMPTY_SELECTION));
    }

    #[test]
    fn editing_lists_results_and_places_cursor() {
        let mut header = header("", &names(3));
        header.dispatch(SelectorEvent::Edit);
        header.dispatch(SelectorEvent::Change("dataset-0".into()));
        let view = render(&header, &Palette::default());

        let top = line_text(&view.frame.lines[0]);
        assert!(top.contains("dataset-00"), "best match placeholder rendered");
        assert_eq!(view.frame.lines.len(), 4);
        assert_eq!(view.layout.result_rows, vec![0, 1, 2]);
        assert_eq!(view.layout.result_at(2), Some(1));
        assert_eq!(view.layout.result_at(0), None);

        let cursor = view.frame.cursor.expect("cursor while focused");
        assert_eq!(cursor.row, 0);
        assert_eq!(
            cursor.col,
            view.layout.selector.start + "dataset-0".len() as u16
        );
    }

    #[test]
    fn long_result_lists_scroll_to_highlight() {
        let mut header = header("", &names(12));
        header.dispatch(SelectorEvent::Edit);
        for _ in 0..10 {
            header.dispatch(SelectorEvent::NextResult);
        }
        let view = render(&header, &Palette::default());
        assert_eq!(header.selector().current_result(), Some(9));
        assert_eq!(view.layout.result_rows.first(), Some(&2));
        assert_eq!(view.layout.result_rows.last(), Some(&9));

        let above = line_text(&view.frame.lines[1]);
        assert!(above.ends_with("↑ 2 more"));
        assert_eq!(view.layout.results_row, 2);
        assert_eq!(view.layout.result_at(2), Some(2));
        assert_eq!(view.layout.result_at(9), Some(9));

        let below = line_text(view.frame.lines.last().expect("footer"));
        assert!(below.ends_with("… 2 more"));
    }

    #[test]
    fn unscrolled_list_only_counts_rows_below() {
        let mut header = header("", &names(10));
        header.dispatch(SelectorEvent::Edit);
        let view = render(&header, &Palette::default());
        assert_eq!(view.layout.results_row, 1);
        assert_eq!(view.layout.result_rows, (0..8).collect::<Vec<_>>());
        assert_eq!(view.frame.lines.len(), 1 + 8 + 1);
        let below = line_text(view.frame.lines.last().expect("footer"));
        assert!(below.ends_with("… 2 more"));
    }

    #[test]
    fn visible_error_is_rendered_in_red() {
        let mut header = header("", &names(1));
        header.dispatch(SelectorEvent::Edit);
        header.dispatch(SelectorEvent::Commit("missing".into()));
        let view = render(&header, &Palette::default());
        let last = view.frame.lines.last().expect("error line");
        assert!(line_text(last).ends_with("! missing does not exist"));
        assert_eq!(last[0].style.color, Some(Color::Red));
    }

    #[test]
    fn palette_comes_from_config_projections() {
        let store = ConfigStore::from_result(QueryResult {
            colorscale: vec![Rgb(0, 0, 0), Rgb(255, 0, 0)],
            config: AppConfig {
                color_pool: vec!["bogus".into(), "#00ff00".into()],
                ..AppConfig::default()
            },
        });
        let palette = Palette::from_store(&store);
        assert_eq!(palette.accent, Color::Rgb(0, 255, 0));
        assert_eq!(palette.scale_at(0, 5), Color::Rgb(0, 0, 0));
        assert_eq!(palette.scale_at(4, 5), Color::Rgb(255, 0, 0));
        assert_eq!(Palette::default().scale_at(3, 5), Color::DarkGrey);
    }
}
