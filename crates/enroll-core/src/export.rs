//! CSV export
//!
//! Comma-delimited UTF-8 with the worksheet's columns. Fields containing a
//! delimiter, quote or line break are quoted, inner quotes doubled.

use enroll_store::Row;

const DELIMITER: char = ',';

fn needs_quotes(field: &str) -> bool {
    field.contains(&[DELIMITER, '"', '\n', '\r'][..])
}

fn push_field(out: &mut String, field: &str) {
    if needs_quotes(field) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

fn push_record(out: &mut String, cells: &[String], width: usize) {
    for index in 0..width {
        if index > 0 {
            out.push(DELIMITER);
        }
        push_field(out, cells.get(index).map_or("", String::as_str));
    }
    out.push('\n');
}

/// Render `header` followed by `rows` as CSV bytes
///
/// Every record has exactly `header.len()` fields: short rows are padded,
/// extra cells dropped. Rows with no content are skipped.
#[must_use]
pub fn to_csv(header: &[String], rows: &[Row]) -> Vec<u8> {
    let width = header.len();
    let mut out = String::new();
    push_record(&mut out, header, width);
    for row in rows.iter().filter(|r| r.iter().any(|c| !c.trim().is_empty())) {
        push_record(&mut out, row, width);
    }
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::header_row;
    use pretty_assertions::assert_eq;

    fn cells(values: &[&str]) -> Row {
        values.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn header_only_for_empty_store() {
        let csv = String::from_utf8(to_csv(&header_row(), &[])).unwrap();
        assert_eq!(csv, "Empresa,Nome,Matrícula,Equipe/Gerência,Treinamento,Data,Horário,Turno\n");
    }

    #[test]
    fn quotes_only_when_needed() {
        let header = cells(&["a", "b", "c"]);
        let rows = vec![cells(&["plain", "with, comma", "say \"hi\""])];
        let csv = String::from_utf8(to_csv(&header, &rows)).unwrap();
        assert_eq!(csv, "a,b,c\nplain,\"with, comma\",\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn rows_are_fitted_to_header_width() {
        let header = cells(&["a", "b", "c"]);
        let rows = vec![cells(&["1"]), cells(&["1", "2", "3", "4"])];
        let csv = String::from_utf8(to_csv(&header, &rows)).unwrap();
        assert_eq!(csv, "a,b,c\n1,,\n1,2,3\n");
    }

    #[test]
    fn blank_rows_are_dropped() {
        let header = cells(&["a", "b"]);
        let rows = vec![cells(&["", " "]), Vec::new(), cells(&["x", "y"])];
        let csv = String::from_utf8(to_csv(&header, &rows)).unwrap();
        assert_eq!(csv, "a,b\nx,y\n");
    }

    #[test]
    fn output_is_utf8() {
        let header = cells(&["Nome"]);
        let rows = vec![cells(&["João Pádua"])];
        let bytes = to_csv(&header, &rows);
        assert!(String::from_utf8(bytes).unwrap().contains("João Pádua"));
    }
}
