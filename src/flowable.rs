//! The blocks a story is made of.

use crate::canvas::Canvas;
use crate::colour::Colour;
use crate::font::FontBook;
use crate::paragraph::Paragraph;
use crate::table::Table;
use crate::units::Pt;

/// One element of a story. Content blocks take up room in a frame; the rest are
/// instructions to the layout engine that take effect where they appear.
#[derive(Debug, Clone)]
pub enum Block {
    Paragraph(Paragraph),
    /// Vertical space
    Spacer(Pt),
    Table(Table),
    /// A horizontal rule across the frame
    Rule { thickness: Pt, colour: Colour },
    PageBreak,
    /// Move on to the next frame unless at least this much room is left in this one
    CondPageBreak(Pt),
    /// A page break that also starts a new segment with its own page numbering
    RestartPageBreak,
    /// Use the named page template for the next page
    NextTemplate(String),
    /// Fills the frame down to where the following bottom table has to start
    BottomSpacer,
    /// A table pushed to the bottom of its frame by the bottom spacer in front of it
    BottomTable(Table),
    /// Blocks that should end up in the same frame if at all possible
    KeepTogether(Vec<Block>),
    /// An outline entry pointing at the page this lands on
    Bookmark {
        title: String,
        key: String,
        level: usize,
    },
}

impl Block {
    pub fn space_before(&self) -> Pt {
        match self {
            Block::Paragraph(p) => p.style.space_before,
            Block::Rule { .. } => Pt(1.0),
            Block::KeepTogether(blocks) => blocks.first().map_or(Pt(0.0), Block::space_before),
            _ => Pt(0.0),
        }
    }

    pub fn space_after(&self) -> Pt {
        match self {
            Block::Paragraph(p) => p.style.space_after,
            Block::Rule { .. } => Pt(1.0),
            Block::KeepTogether(blocks) => blocks.last().map_or(Pt(0.0), Block::space_after),
            _ => Pt(0.0),
        }
    }

    /// The height of the block in a frame `width` wide, not counting the space around it
    pub fn height(&self, fonts: &FontBook, width: Pt) -> Pt {
        match self {
            Block::Paragraph(p) => p.height(fonts, width),
            Block::Spacer(height) => *height,
            Block::Table(t) | Block::BottomTable(t) => t.height(fonts, width),
            Block::Rule { thickness, .. } => *thickness,
            Block::KeepTogether(blocks) => stacked_height(blocks, fonts, width),
            _ => Pt(0.0),
        }
    }

    /// Split the block so that the first part fits into `height`, if the block can be
    /// split at all
    pub fn split(&self, fonts: &FontBook, width: Pt, height: Pt) -> Option<(Block, Block)> {
        match self {
            Block::Paragraph(p) => p
                .split(fonts, width, height)
                .map(|(a, b)| (Block::Paragraph(a), Block::Paragraph(b))),
            Block::Table(t) => t
                .split(fonts, width, height)
                .map(|(a, b)| (Block::Table(a), Block::Table(b))),
            Block::BottomTable(t) => t
                .split(fonts, width, height)
                .map(|(a, b)| (Block::BottomTable(a), Block::BottomTable(b))),
            _ => None,
        }
    }

    /// Draw a content block with its top edge at `y_top`
    pub fn draw(&self, canvas: &mut Canvas, x: Pt, y_top: Pt, width: Pt) {
        match self {
            Block::Paragraph(p) => p.draw(canvas, x, y_top, width),
            Block::Table(t) | Block::BottomTable(t) => t.draw(canvas, x, y_top, width),
            Block::Rule { thickness, colour } => {
                let y = y_top - *thickness / 2.0;
                canvas.save_state();
                canvas.set_stroke_colour(*colour);
                canvas.set_line_width(*thickness);
                canvas.line((x, y), (x + width, y));
                canvas.restore_state();
            }
            Block::KeepTogether(blocks) => {
                let fonts = canvas.fonts();
                let mut positions = Vec::with_capacity(blocks.len());
                let mut y = y_top;
                for (i, block) in blocks.iter().enumerate() {
                    if i > 0 {
                        y -= block.space_before();
                    }
                    positions.push(y);
                    y -= block.height(fonts, width) + block.space_after();
                }
                for (block, y) in blocks.iter().zip(positions) {
                    block.draw(canvas, x, y, width);
                }
            }
            _ => {}
        }
    }
}

/// The height of blocks stacked on top of each other, counting the space between them
/// but not before the first or after the last
pub fn stacked_height(blocks: &[Block], fonts: &FontBook, width: Pt) -> Pt {
    let mut total = Pt(0.0);
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            total += block.space_before();
        }
        total += block.height(fonts, width);
        if i + 1 < blocks.len() {
            total += block.space_after();
        }
    }
    total
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::colours;
    use crate::style::StyleSheet;

    #[test]
    fn keep_together_measures_its_children() {
        let fonts = FontBook::new();
        let styles = StyleSheet::default();
        let group = Block::KeepTogether(vec![
            Block::Paragraph(Paragraph::from_text("a", styles.paragraph.clone())),
            Block::Spacer(Pt(10.0)),
            Block::Paragraph(Paragraph::from_text("b", styles.paragraph.clone())),
        ]);
        // two lines, the spacer, and the 1pt gaps inside the group
        let expected = styles.paragraph.leading * 2.0 + Pt(10.0) + Pt(2.0);
        assert_eq!(group.height(&fonts, Pt(400.0)), expected);
        assert_eq!(group.space_before(), Pt(1.0));
    }

    #[test]
    fn only_paragraphs_and_tables_split() {
        let fonts = FontBook::new();
        assert!(Block::Spacer(Pt(100.0))
            .split(&fonts, Pt(100.0), Pt(50.0))
            .is_none());
        let rule = Block::Rule {
            thickness: Pt(0.2),
            colour: colours::BLACK,
        };
        assert!(rule.split(&fonts, Pt(100.0), Pt(0.1)).is_none());
    }
}
