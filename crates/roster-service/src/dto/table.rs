//! Roster table parser for the text import
//!
//! The first non-blank line is the header. Cells are separated by tabs, or by
//! commas when the header contains no tab. Columns are matched by name in any
//! order; `name`, `discord_id`, `department` and `role` are required, `email`
//! is optional and unknown columns are ignored.

use crate::services::error::{ServiceError, ServiceResult};

use super::requests::UpsertMemberRequest;

const REQUIRED_COLUMNS: [&str; 4] = ["name", "discord_id", "department", "role"];

/// One data line of the table together with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub line: usize,
    pub request: UpsertMemberRequest,
}

#[derive(Debug, Default)]
struct Columns {
    name: Option<usize>,
    discord_id: Option<usize>,
    email: Option<usize>,
    department: Option<usize>,
    role: Option<usize>,
}

impl Columns {
    fn from_header(cells: &[&str]) -> ServiceResult<Self> {
        let mut columns = Self::default();
        for (index, cell) in cells.iter().enumerate() {
            let slot = match header_key(cell).as_str() {
                "name" => &mut columns.name,
                "discord_id" | "discordid" => &mut columns.discord_id,
                "email" => &mut columns.email,
                "department" => &mut columns.department,
                "role" => &mut columns.role,
                _ => continue,
            };
            if slot.is_some() {
                return Err(ServiceError::validation(format!(
                    "header: duplicate column '{}'",
                    cell.trim()
                )));
            }
            *slot = Some(index);
        }

        let present = [
            columns.name,
            columns.discord_id,
            columns.department,
            columns.role,
        ];
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .zip(present)
            .filter(|(_, index)| index.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ServiceError::validation(format!(
                "header: missing column(s) {}; expected {}",
                missing.join(", "),
                REQUIRED_COLUMNS.join(", ")
            )));
        }

        Ok(columns)
    }

    fn row(&self, cells: &[&str]) -> UpsertMemberRequest {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| cells.get(i))
                .map(|c| unquote(c).to_string())
                .unwrap_or_default()
        };

        UpsertMemberRequest {
            name: cell(self.name),
            discord_id: cell(self.discord_id),
            email: self.email.map(|i| cell(Some(i))),
            department: cell(self.department),
            role: cell(self.role),
        }
        .normalized()
    }
}

fn header_key(cell: &str) -> String {
    unquote(cell).to_ascii_lowercase().replace([' ', '-'], "_")
}

fn unquote(cell: &str) -> &str {
    let trimmed = cell.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim()
}

/// Parse a roster table into member rows
///
/// Only the table shape is checked here; row contents are validated by the
/// member import together with the rest of the batch.
///
/// # Errors
/// Returns `ServiceError::Validation` when the header is missing a required
/// column or the table has no data rows
pub fn parse_roster_table(text: &str) -> ServiceResult<Vec<TableRow>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| ServiceError::validation("roster table is empty"))?;
    let delimiter = if header.contains('\t') { '\t' } else { ',' };
    let header_cells: Vec<&str> = header.split(delimiter).collect();
    let columns = Columns::from_header(&header_cells)?;

    let rows: Vec<TableRow> = lines
        .map(|(line, text)| {
            let cells: Vec<&str> = text.split(delimiter).collect();
            TableRow {
                line,
                request: columns.row(&cells),
            }
        })
        .collect();

    if rows.is_empty() {
        return Err(ServiceError::validation("roster table has no member rows"));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tab_separated() {
        let text = "name\tdiscord_id\temail\tdepartment\trole\n\
                    Ada\t101\tada@example.com\tTechnical\tCore Member\n\
                    \n\
                    Grace\t102\t\tdesign\tMEMBER\n";
        let rows = parse_roster_table(text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].request.email.as_deref(), Some("ada@example.com"));
        assert_eq!(rows[0].request.role, "Core Member");
        assert_eq!(rows[1].line, 4);
        assert_eq!(rows[1].request.email, None);
        assert_eq!(rows[1].request.department, "design");
    }

    #[test]
    fn test_parse_comma_separated_any_column_order() {
        let text = "Role,Department,Discord ID,Name,Notes\r\n\
                    MEMBER,MARKETING,\"103\",Linus,ignored\r\n";
        let rows = parse_roster_table(text).unwrap();

        assert_eq!(rows.len(), 1);
        let req = &rows[0].request;
        assert_eq!(req.name, "Linus");
        assert_eq!(req.discord_id, "103");
        assert_eq!(req.department, "MARKETING");
        assert_eq!(req.email, None);
    }

    #[test]
    fn test_missing_required_column() {
        let err = parse_roster_table("name\temail\tdepartment\nAda\ta@b.c\tDESIGN").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("discord_id"));
        assert!(msg.contains("role"));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_short_row_yields_empty_cells() {
        let rows = parse_roster_table("name\tdiscord_id\tdepartment\trole\nAda\t101").unwrap();
        assert_eq!(rows[0].request.department, "");
        assert_eq!(rows[0].request.role, "");
    }

    #[test]
    fn test_empty_table() {
        assert!(parse_roster_table("  \n\n").is_err());
        assert!(parse_roster_table("name\tdiscord_id\tdepartment\trole\n").is_err());
    }

    #[test]
    fn test_duplicate_column() {
        let text = "name\tname\tdiscord_id\tdepartment\trole\nA\tB\t1\tDESIGN\tMEMBER";
        let err = parse_roster_table(text).unwrap_err();
        assert!(err.to_string().contains("duplicate column"));
    }
}
