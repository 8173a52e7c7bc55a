use pdf_writer::{Finish, Pdf, Ref, TextStr};

use crate::refs::{ObjectReferences, RefType};

/// The bookmarks of a document, in story order. Levels nest: an entry is the child of
/// the closest earlier entry with a lower level.
#[derive(Default, Debug, Clone)]
pub struct Outline {
    pub entries: Vec<OutlineEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    pub title: String,
    /// Nesting depth, 0 for top-level entries
    pub level: usize,
    /// 0-based index of the page the entry points to
    pub page_index: usize,
}

impl Outline {
    pub fn new(entries: Vec<OutlineEntry>) -> Outline {
        Outline { entries }
    }

    pub fn add_bookmark<S: ToString>(&mut self, title: S, level: usize, page_index: usize) {
        self.entries.push(OutlineEntry {
            title: title.to_string(),
            level,
            page_index,
        });
    }

    /// The parent of every entry, or [None] for top-level entries
    fn parents(&self) -> Vec<Option<usize>> {
        let mut parents = Vec::with_capacity(self.entries.len());
        let mut open: Vec<usize> = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            while let Some(&last) = open.last() {
                if self.entries[last].level >= entry.level {
                    open.pop();
                } else {
                    break;
                }
            }
            parents.push(open.last().copied());
            open.push(i);
        }
        parents
    }

    /// Write the outline, pointing entries at `page_refs`. Returns the id of the outline
    /// root, if there are any entries at all.
    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_refs: &[Ref],
        writer: &mut Pdf,
    ) -> Option<Ref> {
        if self.entries.is_empty() {
            return None;
        }

        let outlines_id = refs.gen(RefType::Outlines);
        let ids: Vec<Ref> = (0..self.entries.len())
            .map(|i| refs.gen(RefType::OutlineEntry(i)))
            .collect();

        let parents = self.parents();
        let children = |parent: Option<usize>| -> Vec<usize> {
            (0..self.entries.len())
                .filter(|&i| parents[i] == parent)
                .collect()
        };

        let top = children(None);
        let mut outline = writer.outline(outlines_id);
        if let (Some(&first), Some(&last)) = (top.first(), top.last()) {
            outline.first(ids[first]);
            outline.last(ids[last]);
        }
        outline.count(self.entries.len() as i32);
        outline.finish();

        for (i, entry) in self.entries.iter().enumerate() {
            let siblings = children(parents[i]);
            let position = siblings.iter().position(|&s| s == i).unwrap_or(0);
            let kids = children(Some(i));

            let mut item = writer.outline_item(ids[i]);
            item.parent(parents[i].map_or(outlines_id, |p| ids[p]));
            item.title(TextStr(entry.title.as_str()));
            if position > 0 {
                item.prev(ids[siblings[position - 1]]);
            }
            if let Some(&next) = siblings.get(position + 1) {
                item.next(ids[next]);
            }
            if let (Some(&first), Some(&last)) = (kids.first(), kids.last()) {
                item.first(ids[first]);
                item.last(ids[last]);
                item.count(kids.len() as i32);
            }
            if let Some(&page) = page_refs.get(entry.page_index) {
                item.dest().page(page).fit();
            }
        }

        Some(outlines_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn levels_nest_under_earlier_entries() {
        let mut outline = Outline::default();
        outline.add_bookmark("Intro", 0, 0);
        outline.add_bookmark("Background", 1, 0);
        outline.add_bookmark("Details", 2, 1);
        outline.add_bookmark("Method", 1, 2);
        outline.add_bookmark("Results", 0, 3);
        assert_eq!(
            outline.parents(),
            vec![None, Some(0), Some(1), Some(0), None]
        );
    }

    #[test]
    fn empty_outlines_write_nothing() {
        let mut refs = ObjectReferences::new();
        let mut pdf = Pdf::new();
        assert!(Outline::default().write(&mut refs, &[], &mut pdf).is_none());
        assert_eq!(refs.get(RefType::Outlines), None);
    }
}
