//! Tables of text and paragraph cells, styled with [TableStyle] commands.

use crate::canvas::Canvas;
use crate::colour::{colours, Colour};
use crate::font::{FontBook, FontSpec};
use crate::paragraph::Paragraph;
use crate::style::{Alignment, CellStyle, TableStyle, VAlign};
use crate::units::Pt;
use std::ops::Range;
use std::rc::Rc;

/// The content of one table cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Unwrapped text; newlines start new lines
    Text(String),
    /// Text wrapped to the column width
    Paragraph(Paragraph),
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<Paragraph> for Cell {
    fn from(paragraph: Paragraph) -> Self {
        Cell::Paragraph(paragraph)
    }
}

/// Resolved styling of a single cell
#[derive(Debug, Clone)]
struct CellProps {
    font: FontSpec,
    size: Pt,
    leading: Pt,
    colour: Colour,
    background: Option<Colour>,
    align: Alignment,
    valign: VAlign,
    top: Pt,
    right: Pt,
    bottom: Pt,
    left: Pt,
}

impl Default for CellProps {
    fn default() -> Self {
        CellProps {
            font: FontSpec::new("Helvetica"),
            size: Pt(10.0),
            leading: Pt(12.0),
            colour: colours::BLACK,
            background: None,
            align: Alignment::Left,
            valign: VAlign::Bottom,
            top: Pt(3.0),
            right: Pt(6.0),
            bottom: Pt(3.0),
            left: Pt(6.0),
        }
    }
}

/// Column widths and row heights of a table set into a given width. Row heights cover
/// every row of the original table, not just the visible ones.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub col_widths: Vec<Pt>,
    pub row_heights: Vec<Pt>,
}

impl TableLayout {
    pub fn width(&self) -> Pt {
        self.col_widths.iter().copied().sum()
    }
}

/// A grid of cells. Tables split between rows when they don't fit a frame; the parts
/// share their rows and keep resolving style commands against the whole table, so
/// `(0, 0)..(-1, 0)` still means the first row of the original.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Rc<Vec<Vec<Cell>>>,
    columns: Option<Vec<Pt>>,
    pub style: TableStyle,
    visible: Range<usize>,
}

impl Table {
    /// A table with fixed column widths
    pub fn new(rows: Vec<Vec<Cell>>, columns: &[Pt], style: TableStyle) -> Table {
        let visible = 0..rows.len();
        Table {
            rows: Rc::new(rows),
            columns: Some(columns.to_vec()),
            style,
            visible,
        }
    }

    /// A table whose columns are sized from their content; columns holding only
    /// paragraphs share whatever room is left
    pub fn auto(rows: Vec<Vec<Cell>>, style: TableStyle) -> Table {
        let visible = 0..rows.len();
        Table {
            rows: Rc::new(rows),
            columns: None,
            style,
            visible,
        }
    }

    /// Number of rows shown by this (possibly split) table
    pub fn num_rows(&self) -> usize {
        self.visible.len()
    }

    pub fn num_cols(&self) -> usize {
        let widest = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        match &self.columns {
            Some(columns) => columns.len().max(widest),
            None => widest,
        }
    }

    /// The rows of the original table this part shows
    pub fn visible_rows(&self) -> Range<usize> {
        self.visible.clone()
    }

    fn cell(&self, col: usize, row: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }

    fn props(&self, col: usize, row: usize) -> CellProps {
        let (cols, rows) = (self.num_cols(), self.rows.len());
        let mut props = CellProps::default();
        for style in self.style.for_cell(col, row, cols, rows) {
            match style {
                CellStyle::Font(font, size) => {
                    props.font = font.clone();
                    props.size = *size;
                    props.leading = *size * 1.2;
                }
                CellStyle::TextColour(colour) => props.colour = *colour,
                CellStyle::Background(colour) => props.background = Some(*colour),
                CellStyle::Align(align) => props.align = *align,
                CellStyle::VAlign(valign) => props.valign = *valign,
                CellStyle::TopPadding(p) => props.top = *p,
                CellStyle::BottomPadding(p) => props.bottom = *p,
                CellStyle::LeftPadding(p) => props.left = *p,
                CellStyle::RightPadding(p) => props.right = *p,
                CellStyle::LineAbove(..)
                | CellStyle::LineBelow(..)
                | CellStyle::Grid(..)
                | CellStyle::Box(..) => {}
            }
        }
        props
    }

    fn text_width(fonts: &FontBook, props: &CellProps, text: &str) -> Pt {
        let face = fonts.face(fonts.resolve(&props.font));
        text.split('\n')
            .map(|line| face.width_of_text(line, props.size))
            .fold(Pt(0.0), Pt::max)
    }

    fn column_widths(&self, fonts: &FontBook, width: Pt) -> Vec<Pt> {
        let cols = self.num_cols();
        if let Some(columns) = &self.columns {
            let mut widths = columns.clone();
            widths.resize(cols, Pt(0.0));
            return widths;
        }

        let mut natural: Vec<Option<Pt>> = vec![None; cols];
        for (row, cells) in self.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Cell::Text(text) = cell {
                    let props = self.props(col, row);
                    let w = Self::text_width(fonts, &props, text) + props.left + props.right;
                    natural[col] = Some(natural[col].map_or(w, |n: Pt| n.max(w)));
                }
            }
        }

        let fixed: Pt = natural.iter().flatten().copied().sum();
        let flexible = natural.iter().filter(|n| n.is_none()).count();
        let share = if flexible > 0 {
            (width - fixed).max(Pt(0.0)) / flexible as f32
        } else {
            Pt(0.0)
        };
        natural.into_iter().map(|n| n.unwrap_or(share)).collect()
    }

    fn cell_height(&self, fonts: &FontBook, col: usize, row: usize, col_width: Pt) -> Pt {
        let props = self.props(col, row);
        let content = match self.cell(col, row) {
            Cell::Empty => Pt(0.0),
            Cell::Text(text) => props.leading * text.split('\n').count() as f32,
            Cell::Paragraph(p) => p.height(fonts, col_width - props.left - props.right),
        };
        content + props.top + props.bottom
    }

    /// Measure the table for a frame `width` wide
    pub fn layout(&self, fonts: &FontBook, width: Pt) -> TableLayout {
        let col_widths = self.column_widths(fonts, width);
        let row_heights = (0..self.rows.len())
            .map(|row| {
                col_widths
                    .iter()
                    .enumerate()
                    .map(|(col, w)| self.cell_height(fonts, col, row, *w))
                    .fold(Pt(0.0), Pt::max)
            })
            .collect();
        TableLayout {
            col_widths,
            row_heights,
        }
    }

    pub fn height(&self, fonts: &FontBook, width: Pt) -> Pt {
        let layout = self.layout(fonts, width);
        layout.row_heights[self.visible.clone()].iter().copied().sum()
    }

    /// Split between rows so that the first part fits into `height`. Returns [None] if
    /// not even the first row fits, or if everything does.
    pub fn split(&self, fonts: &FontBook, width: Pt, height: Pt) -> Option<(Table, Table)> {
        let layout = self.layout(fonts, width);
        let mut used = Pt(0.0);
        let mut fit = 0;
        for row in self.visible.clone() {
            used += layout.row_heights[row];
            if used > height + Pt(0.001) {
                break;
            }
            fit += 1;
        }
        if fit == 0 || fit >= self.visible.len() {
            return None;
        }

        let middle = self.visible.start + fit;
        let first = Table {
            visible: self.visible.start..middle,
            ..self.clone()
        };
        let rest = Table {
            visible: middle..self.visible.end,
            ..self.clone()
        };
        Some((first, rest))
    }

    /// Draw the table centred in a frame `width` wide, its top edge at `y_top`
    pub fn draw(&self, canvas: &mut Canvas, x: Pt, y_top: Pt, width: Pt) {
        let layout = self.layout(canvas.fonts(), width);
        let left = x + ((width - layout.width()) / 2.0).max(Pt(0.0));

        let mut col_x = Vec::with_capacity(layout.col_widths.len());
        let mut at = left;
        for w in layout.col_widths.iter() {
            col_x.push(at);
            at += *w;
        }

        let mut row_top = y_top;
        let mut tops = Vec::with_capacity(self.visible.len());
        for row in self.visible.clone() {
            tops.push(row_top);
            let row_height = layout.row_heights[row];
            for (col, (&cx, &cw)) in col_x.iter().zip(layout.col_widths.iter()).enumerate() {
                self.draw_cell(canvas, col, row, cx, row_top, cw, row_height);
            }
            row_top -= row_height;
        }

        self.draw_lines(canvas, &layout, &col_x, &tops);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_cell(
        &self,
        canvas: &mut Canvas,
        col: usize,
        row: usize,
        x: Pt,
        top: Pt,
        width: Pt,
        height: Pt,
    ) {
        let props = self.props(col, row);
        let bottom = top - height;

        if let Some(background) = props.background {
            canvas.save_state();
            canvas.set_fill_colour(background);
            canvas.rect(
                crate::rect::Rect::from_xywh(x, bottom, width, height),
                true,
                false,
            );
            canvas.restore_state();
        }

        match self.cell(col, row) {
            Cell::Empty => {}
            Cell::Text(text) => {
                let lines: Vec<&str> = text.split('\n').collect();
                let n = lines.len() as f32;
                let mut baseline = match props.valign {
                    VAlign::Bottom => bottom + props.bottom + props.leading * n - props.size,
                    VAlign::Top => top - props.top - props.size,
                    VAlign::Middle => {
                        bottom + (props.bottom + height - props.top + props.leading * n) / 2.0
                            - props.size
                    }
                };

                canvas.save_state();
                canvas.set_fill_colour(props.colour);
                canvas.set_font_spec(&props.font, props.size);
                for line in lines {
                    match props.align {
                        Alignment::Left | Alignment::Justify => {
                            canvas.draw_string(x + props.left, baseline, line)
                        }
                        Alignment::Right => {
                            canvas.draw_right_string(x + width - props.right, baseline, line)
                        }
                        Alignment::Centre => canvas.draw_centred_string(
                            x + (width + props.left - props.right) / 2.0,
                            baseline,
                            line,
                        ),
                    }
                    baseline -= props.leading;
                }
                canvas.restore_state();
            }
            Cell::Paragraph(paragraph) => {
                let inner = width - props.left - props.right;
                let content = paragraph.height(canvas.fonts(), inner);
                let y = match props.valign {
                    VAlign::Top => top - props.top,
                    VAlign::Bottom => bottom + props.bottom + content,
                    VAlign::Middle => bottom + (props.bottom + height - props.top + content) / 2.0,
                };
                paragraph.draw(canvas, x + props.left, y, inner);
            }
        }
    }

    fn draw_lines(&self, canvas: &mut Canvas, layout: &TableLayout, col_x: &[Pt], tops: &[Pt]) {
        let (cols, rows) = (self.num_cols(), self.rows.len());
        let visible = self.visible.clone();

        for command in self.style.commands.iter() {
            let (weight, colour) = match &command.style {
                CellStyle::LineAbove(w, c)
                | CellStyle::LineBelow(w, c)
                | CellStyle::Grid(w, c)
                | CellStyle::Box(w, c) => (*w, *c),
                _ => continue,
            };
            let range = command.range;
            let inside = |col: usize, row: usize| -> bool {
                col < cols && visible.contains(&row) && range.contains(col, row, cols, rows)
            };

            canvas.save_state();
            canvas.set_stroke_colour(colour);
            canvas.set_line_width(weight);

            for (i, row) in visible.clone().enumerate() {
                let top = tops[i];
                let bottom = top - layout.row_heights[row];
                for col in 0..cols {
                    if !inside(col, row) {
                        continue;
                    }
                    let left = col_x[col];
                    let right = left + layout.col_widths[col];

                    let (above, below, before, after) = match command.style {
                        CellStyle::LineAbove(..) => (true, false, false, false),
                        CellStyle::LineBelow(..) => (false, true, false, false),
                        CellStyle::Grid(..) => (true, true, true, true),
                        _ => (
                            row == 0 || !inside(col, row - 1),
                            !inside(col, row + 1),
                            col == 0 || !inside(col - 1, row),
                            !inside(col + 1, row),
                        ),
                    };

                    if above {
                        canvas.line((left, top), (right, top));
                    }
                    if below {
                        canvas.line((left, bottom), (right, bottom));
                    }
                    if before {
                        canvas.line((left, bottom), (left, top));
                    }
                    if after {
                        canvas.line((right, bottom), (right, top));
                    }
                }
            }

            canvas.restore_state();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::canvas::CanvasOp;
    use crate::style::{CellRange, StyleSheet};
    use crate::units::cm;
    use id_arena::Arena;

    fn rows(n: usize) -> Vec<Vec<Cell>> {
        (0..n)
            .map(|i| vec![Cell::from(format!("Item {i}")), Cell::from("12.50")])
            .collect()
    }

    #[test]
    fn rows_are_as_tall_as_their_text() {
        let fonts = FontBook::new();
        let styles = StyleSheet::default();
        let table = Table::new(rows(3), &[cm(8.0), cm(4.0)], styles.table.clone());
        // tableBase: 9pt text, no top padding, 1pt bottom padding
        let row = Pt(9.0 * 1.2 + 1.0);
        let height = table.height(&fonts, cm(16.4));
        assert!((height.0 - row.0 * 3.0).abs() < 1e-3);
    }

    #[test]
    fn multiline_cells_grow_the_row() {
        let fonts = FontBook::new();
        let table = Table::new(
            vec![vec![Cell::from("one\ntwo"), Cell::from("x")]],
            &[Pt(100.0), Pt(100.0)],
            TableStyle::new(),
        );
        let layout = table.layout(&fonts, Pt(200.0));
        assert_eq!(layout.row_heights, vec![Pt(12.0 * 2.0 + 6.0)]);
    }

    #[test]
    fn splits_between_rows() {
        let fonts = FontBook::new();
        let styles = StyleSheet::default();
        let table = Table::new(rows(10), &[cm(8.0), cm(4.0)], styles.table.clone());
        let row = 9.0 * 1.2 + 1.0;

        let (first, rest) = table
            .split(&fonts, cm(16.4), Pt(row * 4.5))
            .expect("table splits");
        assert_eq!(first.visible_rows(), 0..4);
        assert_eq!(rest.visible_rows(), 4..10);

        let (second, third) = rest
            .split(&fonts, cm(16.4), Pt(row * 3.0))
            .expect("the rest splits too");
        assert_eq!(second.visible_rows(), 4..7);
        assert_eq!(third.num_rows(), 3);
    }

    #[test]
    fn does_not_split_when_nothing_fits() {
        let fonts = FontBook::new();
        let table = Table::new(rows(3), &[cm(8.0), cm(4.0)], TableStyle::new());
        assert!(table.split(&fonts, cm(16.4), Pt(1.0)).is_none());
        assert!(table.split(&fonts, cm(16.4), cm(20.0)).is_none());
    }

    #[test]
    fn header_styles_stay_with_the_first_row() {
        let fonts = FontBook::new();
        let styles = StyleSheet::default();
        let table = Table::new(rows(4), &[cm(8.0), cm(4.0)], styles.table_head.clone());
        let (_, rest) = table
            .split(&fonts, cm(16.4), Pt(30.0))
            .expect("table splits");

        // the header rules belong to row 0, which the second part doesn't show
        let images = Arena::new();
        let mut canvas = Canvas::new(&fonts, &images, (cm(21.0), cm(29.7)));
        rest.draw(&mut canvas, cm(2.6), cm(27.0), cm(16.4));
        assert!(!canvas.ops().iter().any(|op| matches!(op, CanvasOp::Line { .. })));
    }

    #[test]
    fn right_aligned_columns_end_at_the_padding() {
        let fonts = FontBook::new();
        let images = Arena::new();
        let style = TableStyle::new()
            .with(CellRange::all(), CellStyle::RightPadding(Pt(0.0)))
            .with(CellRange::new((1, 0), (-1, -1)), CellStyle::Align(Alignment::Right));
        let table = Table::new(
            vec![vec![Cell::from("a"), Cell::from("b")]],
            &[Pt(100.0), Pt(100.0)],
            style,
        );
        let mut canvas = Canvas::new(&fonts, &images, (Pt(300.0), Pt(300.0)));
        table.draw(&mut canvas, Pt(0.0), Pt(200.0), Pt(200.0));

        let b = canvas.ops().iter().find_map(|op| match op {
            CanvasOp::Text { text, x, size, .. } if text == "b" => Some((*x, *size)),
            _ => None,
        });
        let (x, size) = b.expect("b was drawn");
        let width = fonts
            .face(fonts.resolve(&FontSpec::new("Helvetica")))
            .width_of_text("b", size);
        assert!(((x + width).0 - 200.0).abs() < 1e-3);
    }

    #[test]
    fn auto_columns_share_the_leftover_room() {
        let fonts = FontBook::new();
        let styles = StyleSheet::default();
        let para = Paragraph::from_text("wrapped", styles.normal.clone());
        let table = Table::auto(
            vec![vec![Cell::from("label"), Cell::from(para)]],
            TableStyle::new(),
        );
        let layout = table.layout(&fonts, Pt(300.0));
        let label = fonts
            .face(fonts.resolve(&FontSpec::new("Helvetica")))
            .width_of_text("label", Pt(10.0))
            + Pt(12.0);
        assert!((layout.col_widths[0].0 - label.0).abs() < 1e-3);
        assert!((layout.width().0 - 300.0).abs() < 1e-3);
    }
}
