use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{core::usage::UsageRecord, quantity::rate::PencePerKilowattHour};

pub fn build_usage_table(records: &[UsageRecord]) -> Table {
    #[expect(clippy::cast_precision_loss)]
    let average_price = if records.is_empty() {
        PencePerKilowattHour::ZERO
    } else {
        PencePerKilowattHour::from(
            records.iter().map(|record| record.price.0).sum::<f64>() / records.len() as f64,
        )
    };

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Start", "Consumed", "Rate", "Cost", "Overnight"]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.start),
            Cell::new(record.consumed).set_alignment(CellAlignment::Right),
            Cell::new(record.price)
                .set_alignment(CellAlignment::Right)
                .fg(if record.price >= average_price { Color::Red } else { Color::Green }),
            Cell::new(record.cost()).set_alignment(CellAlignment::Right),
            if record.is_overnight() {
                Cell::new("yes").fg(Color::Blue)
            } else {
                Cell::new("no").add_attribute(Attribute::Dim)
            },
        ]);
    }
    table
}
