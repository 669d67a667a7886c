//! Line-oriented encoding of the attendance ledger.
//!
//! One record per line, five `|`-separated fields:
//!
//! ```text
//! TR0001|E-001|2024-03-04 09:00:00|2024-03-04 17:30:00|front desk
//! TR0002|E-002|2024-03-04 10:15:00|NULL|
//! ```
//!
//! An open record has the literal `NULL` as its clock-out. Notes are the
//! remainder of the line and may themselves contain `|`.

use chrono::NaiveDateTime;

use super::durable::RecordCodec;
use crate::attendance::check_single_active;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{TimeRecord, check_line_field};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const OPEN_MARKER: &str = "NULL";

/// Reads and writes time records as pipe-delimited text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeRecordLineCodec;

fn encode_line(record: &TimeRecord) -> String {
    let clock_out = record
        .clock_out()
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| OPEN_MARKER.to_string());

    format!(
        "{}|{}|{}|{}|{}",
        record.record_id(),
        record.employee_id(),
        record.clock_in().format(TIMESTAMP_FORMAT),
        clock_out,
        record.notes()
    )
}

fn decode_line(line: &str) -> Result<TimeRecord, String> {
    let mut fields = line.splitn(5, '|');
    let mut next = |name: &str| {
        fields
            .next()
            .ok_or_else(|| format!("missing {} field", name))
    };

    let record_id = next("record id")?.trim();
    let employee_id = next("employee id")?.trim();
    let clock_in = next("clock-in")?.trim();
    let clock_out = next("clock-out")?.trim();
    let notes = fields.next().unwrap_or("");

    if record_id.is_empty() {
        return Err("empty record id".to_string());
    }
    if employee_id.is_empty() {
        return Err("empty employee id".to_string());
    }

    let clock_in = NaiveDateTime::parse_from_str(clock_in, TIMESTAMP_FORMAT)
        .map_err(|e| format!("invalid clock-in '{}': {}", clock_in, e))?;
    let clock_out = if clock_out == OPEN_MARKER {
        None
    } else {
        Some(
            NaiveDateTime::parse_from_str(clock_out, TIMESTAMP_FORMAT)
                .map_err(|e| format!("invalid clock-out '{}': {}", clock_out, e))?,
        )
    };

    Ok(TimeRecord::restore(
        record_id,
        employee_id,
        clock_in,
        clock_out,
        notes,
    ))
}

impl RecordCodec for TimeRecordLineCodec {
    type Item = TimeRecord;

    fn encode(&self, items: &[TimeRecord]) -> PayrollResult<String> {
        let mut content = String::new();
        for record in items {
            check_line_field("record_id", record.record_id())?;
            check_line_field("employee_id", record.employee_id())?;
            content.push_str(&encode_line(record));
            content.push('\n');
        }
        Ok(content)
    }

    fn decode(&self, source: &str, content: &str) -> PayrollResult<Vec<TimeRecord>> {
        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let record = decode_line(line).map_err(|message| PayrollError::Corruption {
                path: source.to_string(),
                message: format!("line {}: {}", index + 1, message),
            })?;
            records.push(record);
        }

        check_single_active(&records)?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    fn decode(content: &str) -> PayrollResult<Vec<TimeRecord>> {
        TimeRecordLineCodec.decode("time_records.txt", content)
    }

    #[test]
    fn test_encode_format() {
        let records = vec![
            TimeRecord::restore(
                "TR0001",
                "E-001",
                at("2024-03-04 09:00:00"),
                Some(at("2024-03-04 17:30:00")),
                "front desk",
            ),
            TimeRecord::restore("TR0002", "E-002", at("2024-03-04 10:15:00"), None, ""),
        ];

        assert_eq!(
            TimeRecordLineCodec.encode(&records).unwrap(),
            "TR0001|E-001|2024-03-04 09:00:00|2024-03-04 17:30:00|front desk\n\
             TR0002|E-002|2024-03-04 10:15:00|NULL|\n"
        );
    }

    #[test]
    fn test_round_trip_with_pipes_in_notes() {
        let records = vec![
            TimeRecord::restore(
                "TR0001",
                "E-001",
                at("2024-03-04 09:00:00"),
                Some(at("2024-03-04 17:30:00")),
                "a|b|c",
            ),
            TimeRecord::restore("TR0002", "E-001", at("2024-03-05 09:00:00"), None, "open"),
        ];

        let text = TimeRecordLineCodec.encode(&records).unwrap();
        assert_eq!(decode(&text).unwrap(), records);
    }

    #[test]
    fn test_encode_refuses_ids_that_break_the_line_format() {
        let records = vec![
            TimeRecord::restore("TR0001", "E-001", at("2024-03-04 09:00:00"), None, ""),
            TimeRecord::restore("TR0002", "A|B", at("2024-03-04 10:00:00"), None, ""),
        ];
        let err = TimeRecordLineCodec.encode(&records).unwrap_err();
        assert!(matches!(err, PayrollError::Validation { ref field, .. } if field == "employee_id"));

        let records = vec![TimeRecord::restore(
            "TR\n3",
            "E-001",
            at("2024-03-04 09:00:00"),
            None,
            "",
        )];
        let err = TimeRecordLineCodec.encode(&records).unwrap_err();
        assert!(matches!(err, PayrollError::Validation { ref field, .. } if field == "record_id"));
    }

    #[test]
    fn test_blank_lines_and_missing_notes_accepted() {
        let text = "\nTR0001|E-001|2024-03-04 09:00:00|NULL\r\n\n";
        let records = decode(text).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_active());
        assert_eq!(records[0].notes(), "");
    }

    #[test]
    fn test_malformed_lines_are_corrupt() {
        for text in [
            "TR0001|E-001",
            "TR0001|E-001|2024-03-0",
            "TR0001|E-001|2024-03-04 09:00:00|yesterday|",
            "|E-001|2024-03-04 09:00:00|NULL|",
        ] {
            let err = decode(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Corruption, "{}", text);
        }
    }

    #[test]
    fn test_two_open_records_for_one_employee_are_corrupt() {
        let text = "TR0001|E-001|2024-03-04 09:00:00|NULL|\n\
                    TR0002|e-001|2024-03-05 09:00:00|NULL|\n";
        assert!(matches!(decode(text), Err(PayrollError::Corruption { .. })));
    }

    #[test]
    fn test_error_names_line() {
        let text = "TR0001|E-001|2024-03-04 09:00:00|NULL|\nbroken\n";
        match decode(text) {
            Err(PayrollError::Corruption { message, .. }) => assert!(message.starts_with("line 2")),
            other => panic!("expected corruption, got {:?}", other),
        }
    }
}
