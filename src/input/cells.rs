//! Cell coercion helpers over `calamine` worksheet rows.

use std::collections::HashMap;

use calamine::Data;

pub fn cell_str(cell: Option<&Data>) -> &str {
    match cell {
        Some(Data::String(s)) => s.trim(),
        _ => "",
    }
}

/// Identifier rendering: strings trimmed, whole numbers without a decimal
/// point (case ids and catalog keys are often typed as numbers).
pub fn cell_display(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Some(Data::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

pub fn cell_f64(cell: Option<&Data>) -> Option<f64> {
    match cell {
        Some(Data::Float(f)) => Some(*f),
        Some(Data::Int(i)) => Some(*i as f64),
        Some(Data::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn cell_usize(cell: Option<&Data>) -> Option<usize> {
    let value = cell_f64(cell)?;
    if value >= 0.0 && value.fract() == 0.0 {
        Some(value as usize)
    } else {
        None
    }
}

pub fn cell_bool(cell: Option<&Data>) -> Option<bool> {
    match cell {
        Some(Data::Bool(b)) => Some(*b),
        Some(Data::Int(i)) => Some(*i != 0),
        Some(Data::Float(f)) => Some(*f != 0.0),
        Some(Data::String(s)) => match s.trim().to_uppercase().as_str() {
            "TRUE" | "YES" | "Y" | "1" => Some(true),
            "FALSE" | "NO" | "N" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn cell_is_empty(cell: Option<&Data>) -> bool {
    match cell {
        None | Some(Data::Empty) => true,
        Some(Data::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

/// Column name -> index for a header row.
pub fn header_map(row: &[Data]) -> HashMap<String, usize> {
    row.iter()
        .enumerate()
        .filter_map(|(index, cell)| match cell {
            Data::String(s) if !s.trim().is_empty() => Some((s.trim().to_string(), index)),
            _ => None,
        })
        .collect()
}

/// Locate the header row by the presence of a known column label. Sheets
/// carry title/annotation rows above the header, so the position is not
/// fixed.
pub fn find_header_row(
    rows: &[Vec<Data>],
    anchor: &str,
) -> Option<(usize, HashMap<String, usize>)> {
    rows.iter().enumerate().find_map(|(index, row)| {
        let map = header_map(row);
        if map.contains_key(anchor) {
            Some((index, map))
        } else {
            None
        }
    })
}
