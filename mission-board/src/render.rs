use chrono::{DateTime, Utc};
use mission_libs::{Board, CountdownStatus, GridRow};

const HOUR_HEADER: &str = "Hour (UTC)";

/// Text table of the next 24 hours, one column per participant.
pub fn grid<'a>(rows: impl Iterator<Item = GridRow<'a>>, names: &[&str]) -> String {
    let widths: Vec<usize> = names
        .iter()
        .map(|name| name.chars().count().max(1))
        .collect();

    let mut out = line(HOUR_HEADER, names.iter().copied(), &widths);
    for row in rows {
        let marks = row
            .cells
            .iter()
            .map(|cell| if cell.available { "✓" } else { "-" });
        out.push_str(&line(&row.label(), marks, &widths));
    }
    out
}

fn line<'a>(label: &str, cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut out = format!("{:<10}", label);
    for (cell, &width) in cells.zip(widths) {
        out.push_str(&format!(" | {:^width$}", cell, width = width));
    }
    out.push('\n');
    out
}

pub fn countdown(status: Option<CountdownStatus>) -> String {
    match status {
        Some(status) => status.to_string(),
        None => "No mission scheduled yet".to_string(),
    }
}

/// Everything the board shows, as of `now`
pub fn board(board: &Board, status: Option<CountdownStatus>, now: DateTime<Utc>) -> String {
    let names: Vec<&str> = board.roster.names().collect();
    let mut out = grid(board.grid(now), &names);
    out.push('\n');
    out.push_str(&countdown(status));
    out.push('\n');
    out.push_str(&board.confirmed.summary());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mission_libs::SubmitForm;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, hour, 0, 0).unwrap()
    }

    #[test]
    fn marks_available_hours() {
        let mut board = Board::new();
        board
            .submit(&SubmitForm::new("ana", "UTC+00:00", "09:00", "10:00"), at(8))
            .unwrap();
        board
            .submit(&SubmitForm::new("bo", "UTC+01:00", "09:00", "11:00"), at(8))
            .unwrap();

        let names: Vec<&str> = board.roster.names().collect();
        let text = grid(board.grid(at(8)), &names);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 25);
        assert_eq!(lines[0], "Hour (UTC) | ana | bo");
        assert_eq!(lines[1], "08:00      |  -  | ✓ ");
        assert_eq!(lines[2], "09:00      |  ✓  | ✓ ");
        assert_eq!(lines[3], "10:00      |  -  | - ");
    }

    #[test]
    fn empty_board_still_lists_hours() {
        let board = Board::new();
        let text = super::board(&board, None, at(0));

        assert!(text.starts_with("Hour (UTC)\n00:00"));
        assert!(text.contains("No mission scheduled yet"));
        assert!(text.ends_with("Confirmed users: None\n"));
    }
}
