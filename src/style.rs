use crate::{colours, Colour, FontSpec, Pt};
use crate::units::cm;

/// Horizontal alignment of paragraph lines and table cells
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Centre,
    /// Stretch every line but the last to the full width
    Justify,
}

/// Vertical alignment of table cells
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// How a paragraph is set: its face, size, spacing, and indentation
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    pub name: String,
    pub font: FontSpec,
    pub font_size: Pt,
    /// Distance between consecutive baselines
    pub leading: Pt,
    pub colour: Colour,
    pub alignment: Alignment,
    pub left_indent: Pt,
    pub right_indent: Pt,
    pub first_line_indent: Pt,
    pub space_before: Pt,
    pub space_after: Pt,
    /// Where the bullet of a list item starts, relative to the frame
    pub bullet_indent: Pt,
    pub bullet_font_size: Pt,
}

impl ParagraphStyle {
    /// A plain left-aligned style, with a leading of 12pt or 1.2× the size, whichever
    /// is larger
    pub fn new<S: ToString>(name: S, font: FontSpec, font_size: Pt) -> ParagraphStyle {
        ParagraphStyle {
            name: name.to_string(),
            font,
            font_size,
            leading: Pt(12.0).max(font_size * 1.2),
            colour: colours::BLACK,
            alignment: Alignment::Left,
            left_indent: Pt(0.0),
            right_indent: Pt(0.0),
            first_line_indent: Pt(0.0),
            space_before: Pt(0.0),
            space_after: Pt(0.0),
            bullet_indent: Pt(0.0),
            bullet_font_size: font_size,
        }
    }

    /// Copy this style under a new name, for further tweaking
    pub fn derive<S: ToString>(&self, name: S) -> ParagraphStyle {
        ParagraphStyle {
            name: name.to_string(),
            ..self.clone()
        }
    }
}

/// A rectangular block of table cells. Negative indices count from the end, so
/// `(0, 0)..(-1, -1)` is the whole table, in the manner of ReportLab table styles.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CellRange {
    /// (column, row) of the first cell
    pub from: (i32, i32),
    /// (column, row) of the last cell, inclusive
    pub to: (i32, i32),
}

impl CellRange {
    pub fn new(from: (i32, i32), to: (i32, i32)) -> CellRange {
        CellRange { from, to }
    }

    pub fn all() -> CellRange {
        CellRange::new((0, 0), (-1, -1))
    }

    /// The first row, every column
    pub fn head() -> CellRange {
        CellRange::new((0, 0), (-1, 0))
    }

    fn resolve(index: i32, len: usize) -> i64 {
        if index < 0 {
            len as i64 + index as i64
        } else {
            index as i64
        }
    }

    pub fn contains(&self, col: usize, row: usize, cols: usize, rows: usize) -> bool {
        let (c0, r0) = (
            Self::resolve(self.from.0, cols),
            Self::resolve(self.from.1, rows),
        );
        let (c1, r1) = (Self::resolve(self.to.0, cols), Self::resolve(self.to.1, rows));
        let (col, row) = (col as i64, row as i64);
        col >= c0.min(c1) && col <= c0.max(c1) && row >= r0.min(r1) && row <= r0.max(r1)
    }
}

/// One table style instruction
#[derive(Debug, Clone, PartialEq)]
pub enum CellStyle {
    Font(FontSpec, Pt),
    TextColour(Colour),
    Background(Colour),
    Align(Alignment),
    VAlign(VAlign),
    TopPadding(Pt),
    BottomPadding(Pt),
    LeftPadding(Pt),
    RightPadding(Pt),
    /// A rule along the top edge of every cell in the range
    LineAbove(Pt, Colour),
    /// A rule along the bottom edge of every cell in the range
    LineBelow(Pt, Colour),
    /// Rules around every cell in the range
    Grid(Pt, Colour),
    /// A rule around the outside of the range
    Box(Pt, Colour),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCommand {
    pub range: CellRange,
    pub style: CellStyle,
}

/// An ordered list of commands; later commands override earlier ones
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableStyle {
    pub commands: Vec<TableCommand>,
}

impl TableStyle {
    pub fn new() -> TableStyle {
        TableStyle::default()
    }

    pub fn with(mut self, range: CellRange, style: CellStyle) -> TableStyle {
        self.commands.push(TableCommand { range, style });
        self
    }

    /// Append all of `other`'s commands after this style's
    pub fn extend(mut self, other: &TableStyle) -> TableStyle {
        self.commands.extend(other.commands.iter().cloned());
        self
    }

    /// The commands touching one cell, in order
    pub fn for_cell(
        &self,
        col: usize,
        row: usize,
        cols: usize,
        rows: usize,
    ) -> impl Iterator<Item = &CellStyle> {
        self.commands
            .iter()
            .filter(move |c| c.range.contains(col, row, cols, rows))
            .map(|c| &c.style)
    }
}

/// The stock styles every document starts with, all derived from one base face and size
#[derive(Debug, Clone)]
pub struct StyleSheet {
    pub font_name: String,
    pub font_size: Pt,
    pub normal: ParagraphStyle,
    pub heading1: ParagraphStyle,
    pub heading2: ParagraphStyle,
    pub heading3: ParagraphStyle,
    pub small: ParagraphStyle,
    pub smaller: ParagraphStyle,
    pub bold: ParagraphStyle,
    /// Bold, right-aligned
    pub boldr: ParagraphStyle,
    pub right: ParagraphStyle,
    pub indented: ParagraphStyle,
    pub tablenotes: ParagraphStyle,
    pub paragraph: ParagraphStyle,
    pub bullet: ParagraphStyle,
    pub numberbullet: ParagraphStyle,
    pub table_base: TableStyle,
    /// Every column but the first right-aligned
    pub table: TableStyle,
    /// The first two columns left-aligned, the header row aligned to the bottom
    pub table_llr: TableStyle,
    /// A bold header row between two rules
    pub table_head: TableStyle,
    /// An italic header row with generous padding
    pub table_optional: TableStyle,
}

impl StyleSheet {
    pub fn new(font_name: &str, font_size: f32) -> StyleSheet {
        let size = Pt(font_size);
        let family = FontSpec::from_name(font_name).family;
        let regular = FontSpec::new(&family);
        let bold_face = regular.clone().bold(true);
        let italic_face = regular.clone().italic(true);

        let normal = ParagraphStyle::new("normal", regular.clone(), size);

        let mut heading1 = normal.derive("heading1");
        heading1.font_size = size * 1.5;
        heading1.leading = size * 2.0;

        let mut heading2 = normal.derive("heading2");
        heading2.font = bold_face.clone();
        heading2.font_size = size * 1.25;
        heading2.leading = size * 1.75;

        let mut heading3 = normal.derive("heading3");
        heading3.font = bold_face.clone();
        heading3.font_size = size * 1.1;
        heading3.leading = size * 1.5;
        heading3.colour = Colour::new_rgb_bytes(0x66, 0x66, 0x66);

        let mut small = normal.derive("small");
        small.font_size = size - Pt(0.9);

        let mut smaller = normal.derive("smaller");
        smaller.font_size = size * 0.75;

        let mut bold = normal.derive("bold");
        bold.font = bold_face.clone();

        let mut boldr = bold.derive("boldr");
        boldr.alignment = Alignment::Right;

        let mut right = normal.derive("right");
        right.alignment = Alignment::Right;

        let mut indented = normal.derive("indented");
        indented.left_indent = cm(0.5);

        let mut tablenotes = indented.derive("tablenotes");
        tablenotes.font = italic_face.clone();

        let mut paragraph = normal.derive("paragraph");
        paragraph.space_before = Pt(1.0);
        paragraph.space_after = Pt(1.0);

        let mut bullet = normal.derive("bullet");
        bullet.bullet_font_size = Pt(7.0);
        bullet.bullet_indent = Pt(6.0);
        bullet.left_indent = Pt(15.0);

        let mut numberbullet = normal.derive("numberbullet");
        numberbullet.bullet_font_size = paragraph.font_size;
        numberbullet.bullet_indent = Pt(0.0);
        numberbullet.left_indent = Pt(15.0);

        let all = CellRange::all();
        let table_base = TableStyle::new()
            .with(all, CellStyle::Font(regular.clone(), size))
            .with(all, CellStyle::TopPadding(Pt(0.0)))
            .with(all, CellStyle::BottomPadding(Pt(1.0)))
            .with(all, CellStyle::LeftPadding(Pt(0.0)))
            .with(all, CellStyle::RightPadding(Pt(0.0)))
            .with(all, CellStyle::VAlign(VAlign::Top));

        let table = table_base.clone().with(
            CellRange::new((1, 0), (-1, -1)),
            CellStyle::Align(Alignment::Right),
        );

        let table_llr = table_base
            .clone()
            .with(
                CellRange::new((2, 0), (-1, -1)),
                CellStyle::Align(Alignment::Right),
            )
            .with(CellRange::head(), CellStyle::VAlign(VAlign::Bottom));

        let table_head = table_base
            .clone()
            .with(CellRange::head(), CellStyle::Font(bold_face, size))
            .with(
                CellRange::new((1, 0), (-1, -1)),
                CellStyle::Align(Alignment::Right),
            )
            .with(all, CellStyle::TopPadding(Pt(1.0)))
            .with(all, CellStyle::BottomPadding(Pt(2.0)))
            .with(CellRange::head(), CellStyle::LineAbove(Pt(0.2), colours::BLACK))
            .with(CellRange::head(), CellStyle::LineBelow(Pt(0.2), colours::BLACK));

        let table_optional = table_base
            .clone()
            .with(CellRange::head(), CellStyle::Font(italic_face, size))
            .with(
                CellRange::new((1, 0), (-1, -1)),
                CellStyle::Align(Alignment::Right),
            )
            .with(all, CellStyle::BottomPadding(Pt(5.0)))
            .with(
                CellRange::new((1, 0), (-1, -1)),
                CellStyle::RightPadding(cm(2.0)),
            );

        StyleSheet {
            font_name: family,
            font_size: size,
            normal,
            heading1,
            heading2,
            heading3,
            small,
            smaller,
            bold,
            boldr,
            right,
            indented,
            tablenotes,
            paragraph,
            bullet,
            numberbullet,
            table_base,
            table,
            table_llr,
            table_head,
            table_optional,
        }
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        StyleSheet::new("Helvetica", 9.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn negative_indices_count_from_the_end() {
        let range = CellRange::new((1, 0), (-1, -1));
        assert!(!range.contains(0, 0, 3, 4));
        assert!(range.contains(1, 0, 3, 4));
        assert!(range.contains(2, 3, 3, 4));
        assert!(!CellRange::head().contains(0, 1, 3, 4));
    }

    #[test]
    fn stock_styles_scale_with_the_base_size() {
        let sheet = StyleSheet::new("Helvetica", 10.0);
        assert_eq!(sheet.heading1.font_size, Pt(15.0));
        assert_eq!(sheet.heading1.leading, Pt(20.0));
        assert!(sheet.heading2.font.bold);
        assert_eq!(sheet.smaller.font_size, Pt(7.5));
        assert_eq!(sheet.boldr.alignment, Alignment::Right);
        assert!(sheet.boldr.font.bold);
        assert!(sheet.tablenotes.font.italic);
        assert_eq!(sheet.tablenotes.left_indent, cm(0.5));
    }

    #[test]
    fn style_names_with_suffixes_use_the_family() {
        let sheet = StyleSheet::new("Helvetica-Bold", 9.0);
        assert_eq!(sheet.font_name, "Helvetica");
        assert!(!sheet.normal.font.bold);
    }

    #[test]
    fn later_commands_are_listed_last() {
        let sheet = StyleSheet::default();
        let paddings: Vec<_> = sheet
            .table_head
            .for_cell(0, 0, 2, 2)
            .filter_map(|s| match s {
                CellStyle::BottomPadding(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(paddings, vec![Pt(1.0), Pt(2.0)]);
    }
}
