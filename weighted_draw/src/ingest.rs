use log::{debug, info};

use std::collections::HashMap;

use uuid::Uuid;

use crate::config::*;

/// The weight given to a participant whose weight cell is left blank.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// The file suffixes accepted as spreadsheets.
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

/// Checks that the name of a file looks like a spreadsheet.
///
/// Only the suffix is looked at, the content is not sniffed.
pub fn check_extension(file_name: &str) -> Result<(), IngestError> {
    if SPREADSHEET_EXTENSIONS
        .iter()
        .any(|ext| file_name.ends_with(ext))
    {
        Ok(())
    } else {
        Err(IngestError::BadExtension {
            file_name: file_name.to_string(),
        })
    }
}

/// Turns the rows of a table into a list of participants.
///
/// The first row is always treated as a header and skipped. In each following row,
/// column A is the code, column B the name and column C the weight.
/// Rows without a code, without a name or with a weight that is not strictly positive
/// are dropped.
///
/// ```
/// use weighted_draw::{ingest, Cell};
///
/// let rows = vec![
///     vec![Cell::from("Code"), Cell::from("Name"), Cell::from("Weight")],
///     vec![Cell::from("C1"), Cell::from("Alice"), Cell::Float(3.0)],
///     vec![Cell::from("C2"), Cell::from("Bob"), Cell::Empty],
/// ];
/// let participants = ingest(&rows)?;
/// assert_eq!(participants.len(), 2);
/// assert_eq!(participants[1].weight, 1.0);
/// # Ok::<(), weighted_draw::IngestError>(())
/// ```
pub fn ingest(rows: &[Vec<Cell>]) -> Result<Vec<Participant>, IngestError> {
    let mut participants: Vec<Participant> = Vec::new();
    for (idx, row) in rows.iter().enumerate().skip(1) {
        let code = read_text(row.get(0));
        let name = read_text(row.get(1));
        let weight = read_weight(row.get(2));
        if code.is_empty() || name.is_empty() || weight <= 0.0 {
            debug!(
                "ingest: dropping row {}: code {:?} name {:?} weight {:?}",
                idx, code, name, weight
            );
            continue;
        }
        participants.push(Participant {
            id: Uuid::new_v4(),
            code,
            name,
            weight,
            win_chance: 0.0,
        });
    }

    if participants.is_empty() {
        return Err(IngestError::NoValidRows);
    }

    let chances = compute_win_chance(&participants);
    for p in participants.iter_mut() {
        p.win_chance = chances.get(&p.id).cloned().unwrap_or(0.0);
    }
    info!(
        "ingest: {} participants retained out of {} rows, largest weight {}",
        participants.len(),
        rows.len().saturating_sub(1),
        weight_scale(&participants)
    );
    Ok(participants)
}

/// The chance of winning of each participant, in percent, relative to the given list only.
///
/// Call it with the participants that can still be drawn to get meaningful numbers
/// after the first draw.
pub fn compute_win_chance(participants: &[Participant]) -> HashMap<Uuid, f64> {
    let scale = weight_scale(participants);
    let total = scaled_total_weight(participants, scale);
    participants
        .iter()
        .map(|p| {
            let chance = if total > 0.0 {
                p.weight / scale / total * 100.0
            } else {
                0.0
            };
            (p.id, chance)
        })
        .collect()
}

/// The largest weight of the list, or 1 for an empty list.
///
/// Weights are divided by it before being summed: the sum of very large weights
/// would otherwise overflow to infinity.
pub(crate) fn weight_scale(participants: &[Participant]) -> f64 {
    let max = participants.iter().map(|p| p.weight).fold(0.0, f64::max);
    if max.is_finite() && max > 0.0 {
        max
    } else {
        1.0
    }
}

/// The sum of the weights divided by `scale`. At most the number of participants
/// when `scale` comes from `weight_scale`.
pub(crate) fn scaled_total_weight(participants: &[Participant], scale: f64) -> f64 {
    participants.iter().map(|p| p.weight / scale).sum()
}

fn read_text(cell: Option<&Cell>) -> String {
    cell.map(|c| c.as_text().trim().to_string())
        .unwrap_or_default()
}

// Blank weights count as the default weight, anything not understood counts as zero.
fn read_weight(cell: Option<&Cell>) -> f64 {
    let w = match cell {
        None | Some(Cell::Empty) => DEFAULT_WEIGHT,
        Some(Cell::String(s)) if s.trim().is_empty() => DEFAULT_WEIGHT,
        Some(Cell::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Cell::Float(f)) => *f,
        Some(Cell::Int(i)) => *i as f64,
        Some(Cell::Bool(_)) | Some(Cell::Other(_)) => 0.0,
    };
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn header() -> Vec<Cell> {
        vec!["Code".into(), "Name".into(), "Weight".into()]
    }

    #[test]
    fn alice_and_bob() {
        init();
        let rows = vec![
            header(),
            vec!["C1".into(), "Alice".into(), Cell::Float(10.0)],
            vec!["C2".into(), "Bob".into(), "".into()],
            vec!["C3".into(), "".into(), Cell::Float(5.0)],
        ];
        let ps = ingest(&rows).unwrap();
        assert_eq!(ps.len(), 2);
        assert_eq!(ps[0].code, "C1");
        assert_eq!(ps[0].name, "Alice");
        assert_eq!(ps[0].weight, 10.0);
        assert!((ps[0].win_chance - 100.0 * 10.0 / 11.0).abs() < 1e-9);
        assert_eq!(ps[1].code, "C2");
        assert_eq!(ps[1].name, "Bob");
        assert_eq!(ps[1].weight, 1.0);
        assert!((ps[1].win_chance - 100.0 / 11.0).abs() < 1e-9);
        assert_ne!(ps[0].id, ps[1].id);
    }

    #[test]
    fn header_is_always_skipped() {
        // Even when it looks like a valid participant.
        let rows = vec![
            vec!["H1".into(), "Header".into(), Cell::Float(4.0)],
            vec!["C1".into(), "Alice".into(), Cell::Float(1.0)],
        ];
        let ps = ingest(&rows).unwrap();
        assert_eq!(ps.len(), 1);
        assert_eq!(ps[0].code, "C1");
    }

    #[test]
    fn invalid_rows_are_dropped() {
        let rows = vec![
            header(),
            vec!["  ".into(), "Nobody".into(), Cell::Float(2.0)],
            vec!["C2".into(), "   ".into(), Cell::Float(2.0)],
            vec!["C3".into(), "Zero".into(), Cell::Float(0.0)],
            vec!["C4".into(), "Negative".into(), Cell::Int(-3)],
            vec!["C5".into(), "Garbage".into(), "abc".into()],
            vec!["C6".into(), "Not a number".into(), "NaN".into()],
            vec!["C7".into(), "Boolean".into(), Cell::Bool(true)],
            vec!["C8".into()],
            vec![],
            vec![" C9 ".into(), " Carol ".into(), " 2.5 ".into()],
        ];
        let ps = ingest(&rows).unwrap();
        assert_eq!(ps.len(), 1);
        assert_eq!(ps[0].code, "C9");
        assert_eq!(ps[0].name, "Carol");
        assert_eq!(ps[0].weight, 2.5);
        assert!(ps.iter().all(|p| p.weight > 0.0));
    }

    #[test]
    fn missing_weight_column_defaults_to_one() {
        let rows = vec![
            header(),
            vec!["C1".into(), "Alice".into()],
            vec!["C2".into(), "Bob".into(), Cell::Empty],
        ];
        let ps = ingest(&rows).unwrap();
        assert_eq!(ps.len(), 2);
        assert!(ps.iter().all(|p| p.weight == DEFAULT_WEIGHT));
        assert!(ps.iter().all(|p| (p.win_chance - 50.0).abs() < 1e-9));
    }

    #[test]
    fn numeric_codes_are_rendered_as_text() {
        let rows = vec![
            header(),
            vec![Cell::Float(1234.0), "Alice".into(), Cell::Int(2)],
            vec![Cell::Int(77), "Bob".into(), Cell::Float(1.5)],
        ];
        let ps = ingest(&rows).unwrap();
        assert_eq!(ps[0].code, "1234");
        assert_eq!(ps[0].weight, 2.0);
        assert_eq!(ps[1].code, "77");
    }

    #[test]
    fn win_chances_sum_to_100() {
        let mut rows = vec![header()];
        for i in 1..=37 {
            rows.push(vec![
                format!("C{}", i).as_str().into(),
                format!("Name {}", i).as_str().into(),
                (i as f64 * 0.37).into(),
            ]);
        }
        let ps = ingest(&rows).unwrap();
        let total: f64 = ps.iter().map(|p| p.win_chance).sum();
        assert!((total - 100.0).abs() < 1e-9, "total: {}", total);
    }

    #[test]
    fn huge_weights_keep_their_chances() {
        let rows = vec![
            header(),
            vec!["A".into(), "Alice".into(), Cell::Float(1e308)],
            vec!["B".into(), "Bob".into(), Cell::Float(1e308)],
            vec!["C".into(), "Carol".into(), Cell::Float(1.0)],
        ];
        let ps = ingest(&rows).unwrap();
        let total: f64 = ps.iter().map(|p| p.win_chance).sum();
        assert!((total - 100.0).abs() < 1e-9, "total: {}", total);
        assert!((ps[0].win_chance - 50.0).abs() < 1e-9);
        assert!((ps[1].win_chance - 50.0).abs() < 1e-9);
        assert!(ps[2].win_chance >= 0.0 && ps[2].win_chance < 1e-9);
    }

    #[test]
    fn no_valid_rows() {
        let rows = vec![header(), vec!["C1".into(), "".into(), Cell::Float(1.0)]];
        assert_eq!(ingest(&rows), Err(IngestError::NoValidRows));
        assert_eq!(ingest(&[header()]), Err(IngestError::NoValidRows));
        assert_eq!(ingest(&[]), Err(IngestError::NoValidRows));
        let msg = IngestError::NoValidRows.to_string();
        assert!(msg.contains("A (code)"));
        assert!(msg.contains("B (name)"));
        assert!(msg.contains("C (weight)"));
    }

    #[test]
    fn extensions() {
        assert!(check_extension("participants.xlsx").is_ok());
        assert!(check_extension("old format.xls").is_ok());
        assert_eq!(
            check_extension("participants.csv"),
            Err(IngestError::BadExtension {
                file_name: "participants.csv".to_string()
            })
        );
        assert!(check_extension("xlsx").is_err());
    }

    #[test]
    fn win_chance_over_a_subset() {
        let rows = vec![
            header(),
            vec!["C1".into(), "Alice".into(), Cell::Float(1.0)],
            vec!["C2".into(), "Bob".into(), Cell::Float(1.0)],
            vec!["C3".into(), "Carol".into(), Cell::Float(2.0)],
        ];
        let ps = ingest(&rows).unwrap();
        let chances = compute_win_chance(&ps[1..]);
        assert_eq!(chances.len(), 2);
        assert!((chances[&ps[1].id] - 100.0 / 3.0).abs() < 1e-9);
        assert!((chances[&ps[2].id] - 200.0 / 3.0).abs() < 1e-9);
        assert!(compute_win_chance(&[]).is_empty());
    }
}
