//! Sheet layout for a campaign export.
//!
//! Pure data: which value goes in which cell and which cells merge.
//! Row 0 is the header; group rows start at row 1.

use crate::constants::export::HEADERS;
use crate::types::{AdGroup, Campaign};

pub const COL_GROUP: u16 = 0;
pub const COL_KEYWORDS: u16 = 1;
pub const COL_HEADLINE: u16 = 2;
pub const COL_HEADLINE_LEN: u16 = 3;
pub const COL_DESCRIPTION: u16 = 4;
pub const COL_DESCRIPTION_LEN: u16 = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Count(usize),
    #[default]
    Empty,
}

/// Vertical merge of one column across a group's rows (inclusive, sheet rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRange {
    pub col: u16,
    pub first_row: u32,
    pub last_row: u32,
}

impl MergeRange {
    fn contains(&self, row: u32, col: u16) -> bool {
        self.col == col && (self.first_row..=self.last_row).contains(&row)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SheetLayout {
    /// Data rows, excluding the header
    pub rows: Vec<[Cell; 6]>,
    pub merges: Vec<MergeRange>,
}

impl SheetLayout {
    pub fn build(campaign: &Campaign) -> Self {
        let mut layout = Self::default();
        for group in campaign.groups() {
            layout.push_group(group);
        }
        layout
    }

    pub fn headers() -> &'static [&'static str; 6] {
        &HEADERS
    }

    /// Sheet row of `rows[index]`
    pub fn sheet_row(index: usize) -> u32 {
        index as u32 + 1
    }

    /// Merge covering a sheet cell, if any
    pub fn merge_at(&self, row: u32, col: u16) -> Option<&MergeRange> {
        self.merges.iter().find(|m| m.contains(row, col))
    }

    fn push_group(&mut self, group: &AdGroup) {
        // An empty group still gets a row so it is visible in the sheet
        let span = group.row_count().max(1);
        let first_row = Self::sheet_row(self.rows.len());

        if span > 1 {
            let last_row = first_row + span as u32 - 1;
            for col in [COL_GROUP, COL_KEYWORDS] {
                self.merges.push(MergeRange {
                    col,
                    first_row,
                    last_row,
                });
            }
        }

        for i in 0..span {
            let mut row: [Cell; 6] = Default::default();
            if i == 0 {
                row[COL_GROUP as usize] = Cell::Text(group.name.clone());
                row[COL_KEYWORDS as usize] = Cell::Text(group.keywords.join("\n"));
            }

            let headline = group.headlines.get(i);
            let description = group.descriptions.get(i);

            row[COL_HEADLINE as usize] =
                Cell::Text(headline.map(|h| h.text.clone()).unwrap_or_default());
            row[COL_HEADLINE_LEN as usize] =
                headline.map_or(Cell::Empty, |h| Cell::Count(h.char_count()));
            row[COL_DESCRIPTION as usize] =
                Cell::Text(description.map(|d| d.text.clone()).unwrap_or_default());
            row[COL_DESCRIPTION_LEN as usize] =
                description.map_or(Cell::Empty, |d| Cell::Count(d.char_count()));

            self.rows.push(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Description, Headline};

    fn group(name: &str, index: usize, headlines: usize, descriptions: usize) -> AdGroup {
        AdGroup {
            id: AdGroup::derive_id(name, index),
            name: name.to_string(),
            keywords: vec!["alpha".to_string(), "beta".to_string()],
            headlines: (0..headlines)
                .map(|i| Headline::new(format!("Headline {}", i)))
                .collect(),
            descriptions: (0..descriptions)
                .map(|i| Description::new(format!("Description {}", i)))
                .collect(),
        }
    }

    #[test]
    fn test_eight_by_three_group() {
        let layout = SheetLayout::build(&Campaign::new(vec![group("Tees", 0, 8, 3)]));

        assert_eq!(layout.rows.len(), 8);
        assert_eq!(
            layout.merges,
            vec![
                MergeRange { col: COL_GROUP, first_row: 1, last_row: 8 },
                MergeRange { col: COL_KEYWORDS, first_row: 1, last_row: 8 },
            ]
        );

        let first = &layout.rows[0];
        assert_eq!(first[0], Cell::Text("Tees".to_string()));
        assert_eq!(first[1], Cell::Text("alpha\nbeta".to_string()));
        assert_eq!(first[3], Cell::Count("Headline 0".len()));

        // Rows 3..8 carry a headline and an empty description
        for row in &layout.rows[3..] {
            assert_eq!(row[0], Cell::Empty);
            assert_eq!(row[4], Cell::Text(String::new()));
            assert_eq!(row[5], Cell::Empty);
        }
        assert_eq!(layout.rows[7][2], Cell::Text("Headline 7".to_string()));
    }

    #[test]
    fn test_single_row_group_has_no_merge() {
        let layout = SheetLayout::build(&Campaign::new(vec![group("One", 0, 1, 1)]));
        assert_eq!(layout.rows.len(), 1);
        assert!(layout.merges.is_empty());
    }

    #[test]
    fn test_empty_group_emits_one_row() {
        let layout = SheetLayout::build(&Campaign::new(vec![group("Bare", 0, 0, 0)]));
        assert_eq!(layout.rows.len(), 1);
        assert_eq!(layout.rows[0][0], Cell::Text("Bare".to_string()));
        assert_eq!(layout.rows[0][3], Cell::Empty);
        assert!(layout.merges.is_empty());
    }

    #[test]
    fn test_groups_stack_below_each_other() {
        let layout = SheetLayout::build(&Campaign::new(vec![
            group("A", 0, 2, 2),
            group("B", 1, 3, 1),
        ]));

        assert_eq!(layout.rows.len(), 5);
        assert_eq!(layout.rows[2][0], Cell::Text("B".to_string()));
        assert_eq!(layout.merge_at(4, COL_KEYWORDS).map(|m| m.first_row), Some(3));
        assert_eq!(layout.merge_at(2, COL_GROUP).map(|m| m.last_row), Some(2));
        assert!(layout.merge_at(4, COL_HEADLINE).is_none());
    }

    #[test]
    fn test_length_counts_characters() {
        let mut g = group("Unicode", 0, 0, 0);
        g.headlines.push(Headline::new("Café crème"));
        let layout = SheetLayout::build(&Campaign::new(vec![g]));
        assert_eq!(layout.rows[0][3], Cell::Count(10));
    }
}
