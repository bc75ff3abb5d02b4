//! XLSX writer for [`SheetLayout`].

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};
use tracing::info;

use super::layout::{COL_DESCRIPTION_LEN, COL_HEADLINE_LEN, Cell, SheetLayout};
use crate::constants::export::{COLUMN_WIDTHS, SHEET_NAME};
use crate::types::{Campaign, Result};

struct Formats {
    text: Format,
    count: Format,
}

impl Formats {
    fn new() -> Self {
        let base = Format::new().set_text_wrap().set_align(FormatAlign::Top);
        Self {
            text: base.clone().set_align(FormatAlign::Left),
            count: base.set_align(FormatAlign::Center),
        }
    }

    fn for_col(&self, col: u16) -> &Format {
        if col == COL_HEADLINE_LEN || col == COL_DESCRIPTION_LEN {
            &self.count
        } else {
            &self.text
        }
    }
}

/// Write the campaign as a single-sheet workbook at `path`.
pub fn write_xlsx(campaign: &Campaign, path: &Path) -> Result<()> {
    let layout = SheetLayout::build(campaign);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    fill_worksheet(worksheet, &layout)?;

    workbook.save(path)?;
    info!(
        path = %path.display(),
        groups = campaign.len(),
        rows = layout.rows.len(),
        "Exported campaign"
    );
    Ok(())
}

fn fill_worksheet(worksheet: &mut Worksheet, layout: &SheetLayout) -> Result<()> {
    let formats = Formats::new();

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (col, header) in SheetLayout::headers().iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *header, formats.for_col(col))?;
    }

    // merge_range writes the origin value; covered cells are skipped below
    for merge in &layout.merges {
        let index = (merge.first_row - 1) as usize;
        let value = match &layout.rows[index][merge.col as usize] {
            Cell::Text(text) => text.as_str(),
            _ => "",
        };
        worksheet.merge_range(
            merge.first_row,
            merge.col,
            merge.last_row,
            merge.col,
            value,
            formats.for_col(merge.col),
        )?;
    }

    for (index, cells) in layout.rows.iter().enumerate() {
        let row = SheetLayout::sheet_row(index);
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            if layout.merge_at(row, col).is_some() {
                continue;
            }

            let format = formats.for_col(col);
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string_with_format(row, col, text.as_str(), format)?;
                }
                Cell::Count(count) => {
                    worksheet.write_number_with_format(row, col, *count as f64, format)?;
                }
                Cell::Empty => {
                    worksheet.write_blank(row, col, format)?;
                }
            }
        }
    }

    Ok(())
}
