//! Page counting across layout passes.
//!
//! A footer that reads "Page 3 of 7" cannot be drawn until the whole story has been laid
//! out once, so the story is laid out repeatedly. [PaginationState] carries what one pass
//! learnt into the next: the highest page number seen, the pages at which logical
//! sub-documents restart their numbering, the bookmark anchors, and the measured height
//! of any bottom-anchored table. A pass whose results match what it started with is
//! stable, and its output is the one that gets written.

use crate::units::Pt;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct PaginationState {
    /// The highest page number seen so far, across all passes. Never decreases.
    pub num_pages: usize,
    /// `num_pages` as it was when the current pass started
    pub last_num_pages: usize,
    /// How many passes have been started
    pub passes: usize,
    /// Index of the segment (logical sub-document) the pass is currently in
    pub segment: usize,
    /// Segment boundaries learnt by the previous pass
    known_boundaries: Vec<usize>,
    /// Segment boundaries recorded so far in this pass
    recorded_boundaries: Vec<usize>,
    /// Height of the last bottom-anchored table; carried between passes so the spacer
    /// in front of the table knows how much room to leave
    pub bottom_table_height: Pt,
    bottom_table_height_at_start: Pt,
    /// Whether the most recently processed block of this pass was a bottom table
    pub bottom_table_is_last: bool,
    known_anchors: HashMap<String, usize>,
    recorded_anchors: HashMap<String, usize>,
}

/// What kind of block was just processed, as far as page counting cares
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Processed {
    Other,
    /// A bottom-anchored table of the given height
    BottomTable(Pt),
    /// A restart marker, processed while on the given physical page
    Restart(usize),
}

impl PaginationState {
    pub fn new() -> PaginationState {
        PaginationState::default()
    }

    /// Reset the per-pass counters at the start of a new pass
    pub fn begin_pass(&mut self) {
        self.passes += 1;
        self.last_num_pages = self.num_pages;
        self.segment = 0;
        self.recorded_boundaries.clear();
        self.recorded_anchors.clear();
        self.bottom_table_is_last = false;
        self.bottom_table_height_at_start = self.bottom_table_height;
    }

    /// Record that the given physical page has been reached
    pub fn note_page(&mut self, page: usize) {
        self.num_pages = self.num_pages.max(page);
    }

    /// Update the state after a block has been processed on `page`
    pub fn after_block(&mut self, page: usize, processed: Processed) {
        self.note_page(page);
        self.bottom_table_is_last = false;

        match processed {
            Processed::Other => {}
            Processed::BottomTable(height) => {
                self.bottom_table_height = height;
                self.bottom_table_is_last = true;
            }
            Processed::Restart(at) => {
                self.segment += 1;
                self.recorded_boundaries.push(at);
            }
        }
    }

    /// Remember the page a bookmark anchor landed on in this pass
    pub fn record_anchor(&mut self, key: &str, page: usize) {
        self.recorded_anchors.insert(key.to_string(), page);
    }

    /// The page an anchor landed on in the previous pass
    pub fn anchor_page(&self, key: &str) -> Option<usize> {
        self.known_anchors.get(key).copied()
    }

    pub fn known_anchors(&self) -> &HashMap<String, usize> {
        &self.known_anchors
    }

    /// The boundary list as best known right now: what this pass has recorded, followed
    /// by whatever the previous pass found further ahead
    pub fn boundaries(&self) -> Vec<usize> {
        let mut boundaries = self.recorded_boundaries.clone();
        if self.known_boundaries.len() > boundaries.len() {
            boundaries.extend_from_slice(&self.known_boundaries[self.recorded_boundaries.len()..]);
        }
        boundaries
    }

    /// Finish the pass, returning whether it was stable: the page count didn't grow and
    /// every reference resolved to what the previous pass predicted
    pub fn end_pass(&mut self) -> bool {
        let resolved = self.recorded_boundaries == self.known_boundaries
            && self.recorded_anchors == self.known_anchors
            && self.bottom_table_height == self.bottom_table_height_at_start;
        let stable = self.last_num_pages >= self.num_pages && resolved;

        self.known_boundaries = std::mem::take(&mut self.recorded_boundaries);
        self.known_anchors = std::mem::take(&mut self.recorded_anchors);
        stable
    }

    /// The (current, total) page pair for the given physical page
    pub fn page_index(&self, page: usize) -> (usize, usize) {
        resolve_page_index(
            page,
            self.num_pages,
            self.segment,
            &self.boundaries(),
            self.bottom_table_height > Pt(0.0),
            self.bottom_table_is_last,
        )
    }
}

/// Compute the (current, total) page pair shown to the reader.
///
/// * `page`: the physical page number
/// * `num_pages`: the highest page number known
/// * `segment`: which logical sub-document is being rendered, 0 for the first
/// * `boundaries`: the physical pages on which each restart happened
/// * `bottom_table`: whether the story has a bottom-anchored table, which always
///   costs one phantom page in the count
/// * `bottom_table_is_last`: whether that table was the last block processed
///
/// Inside a later segment both numbers are relative to the page its restart happened
/// on; the segment runs to the next boundary, or to the end of the document when it is
/// the last one. The first segment runs to the first boundary. Totals are never less
/// than 1.
pub fn resolve_page_index(
    page: usize,
    num_pages: usize,
    segment: usize,
    boundaries: &[usize],
    bottom_table: bool,
    bottom_table_is_last: bool,
) -> (usize, usize) {
    let page = page as i64;
    let mut current = page;
    let mut total = num_pages as i64;

    if segment > 0 {
        if let Some(&start) = boundaries.get(segment - 1) {
            let start = start as i64;
            let end = boundaries
                .get(segment)
                .map(|&b| b as i64)
                .unwrap_or(num_pages as i64);
            current = page - start + 1;
            total = end - start + 1;
        }
    } else if let Some(&first) = boundaries.first() {
        total = first as i64;
    }

    if bottom_table {
        total -= 1;
        if bottom_table_is_last && current == 1 {
            total -= 1;
        }
    }

    (current.max(1) as usize, total.max(1) as usize)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn without_restarts_pages_are_absolute() {
        for p in 1..=8 {
            assert_eq!(resolve_page_index(p, 8, 0, &[], false, false), (p, 8));
        }
    }

    #[test]
    fn first_segment_ends_at_the_first_boundary() {
        assert_eq!(resolve_page_index(3, 8, 0, &[5], false, false), (3, 5));
    }

    #[test]
    fn later_segments_count_from_their_boundary() {
        assert_eq!(resolve_page_index(7, 8, 1, &[5], false, false), (3, 4));
        assert_eq!(resolve_page_index(5, 8, 1, &[5], false, false), (1, 4));
    }

    #[test]
    fn closed_segments_end_at_the_next_boundary() {
        assert_eq!(resolve_page_index(4, 9, 1, &[2, 6], false, false), (3, 5));
        assert_eq!(resolve_page_index(7, 9, 2, &[2, 6], false, false), (2, 4));
    }

    #[test]
    fn bottom_tables_cost_a_phantom_page() {
        assert_eq!(resolve_page_index(1, 3, 0, &[], true, false), (1, 2));
        assert_eq!(resolve_page_index(1, 3, 0, &[], true, true), (1, 1));
        assert_eq!(resolve_page_index(2, 3, 0, &[], true, true), (2, 2));
    }

    #[test]
    fn totals_are_never_zero() {
        assert_eq!(resolve_page_index(1, 0, 0, &[], false, false), (1, 1));
        assert_eq!(resolve_page_index(1, 1, 0, &[], true, true), (1, 1));
    }

    #[test]
    fn a_pass_is_unstable_while_pages_are_added() {
        let mut state = PaginationState::new();
        state.begin_pass();
        state.note_page(1);
        state.note_page(2);
        assert!(!state.end_pass());

        state.begin_pass();
        state.note_page(1);
        state.note_page(2);
        assert!(state.end_pass());
        assert_eq!(state.num_pages, 2);
    }

    #[test]
    fn segment_counting_resets_but_boundaries_look_ahead() {
        let mut state = PaginationState::new();
        state.begin_pass();
        state.after_block(5, Processed::Restart(5));
        state.note_page(8);
        assert!(!state.end_pass());

        state.begin_pass();
        assert_eq!(state.segment, 0);
        // the boundary found last pass is already known on page 3
        assert_eq!(state.page_index(3), (3, 5));
        state.after_block(5, Processed::Restart(5));
        assert_eq!(state.page_index(7), (3, 4));
        state.note_page(8);
        assert!(state.end_pass());
    }

    #[test]
    fn moved_anchors_force_another_pass() {
        let mut state = PaginationState::new();
        state.begin_pass();
        state.note_page(2);
        state.record_anchor("intro", 1);
        assert!(!state.end_pass());

        state.begin_pass();
        assert_eq!(state.anchor_page("intro"), Some(1));
        state.note_page(2);
        state.record_anchor("intro", 2);
        assert!(!state.end_pass());

        state.begin_pass();
        state.note_page(2);
        state.record_anchor("intro", 2);
        assert!(state.end_pass());
    }

    #[test]
    fn bottom_table_flag_only_follows_the_latest_block() {
        let mut state = PaginationState::new();
        state.begin_pass();
        state.after_block(1, Processed::BottomTable(Pt(30.0)));
        assert!(state.bottom_table_is_last);
        state.after_block(1, Processed::Other);
        assert!(!state.bottom_table_is_last);
        assert_eq!(state.bottom_table_height, Pt(30.0));
    }
}
