use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the teams spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_code: String,
    pub judul: String,
    pub description: String,
    pub logo: String,
}

/// Google Sheets `ValueRange` response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TeamColumn {
    TeamCode,
    Judul,
    Description,
    Logo,
}

impl TeamColumn {
    fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_ascii_lowercase().as_str() {
            "team code" => Some(Self::TeamCode),
            "judul" => Some(Self::Judul),
            "description" => Some(Self::Description),
            "logo" => Some(Self::Logo),
            _ => None,
        }
    }
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Maps sheet rows to teams. The first row holds the headers
/// (`Team Code`, `Judul`, `Description`, `Logo`, case-insensitive); cells
/// missing from a row read as empty text and fully blank rows are dropped.
pub fn teams_from_rows(rows: &[Vec<Value>]) -> Vec<Team> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    let columns: Vec<Option<TeamColumn>> = header
        .iter()
        .map(|h| TeamColumn::from_header(&cell_text(h)))
        .collect();

    body.iter()
        .filter(|row| row.iter().any(|c| !cell_text(c).trim().is_empty()))
        .map(|row| {
            let mut team = Team::default();
            for (cell, column) in row.iter().zip(&columns) {
                let Some(column) = column else {
                    continue;
                };
                let slot = match column {
                    TeamColumn::TeamCode => &mut team.team_code,
                    TeamColumn::Judul => &mut team.judul,
                    TeamColumn::Description => &mut team.description,
                    TeamColumn::Logo => &mut team.logo,
                };
                *slot = cell_text(cell);
            }
            team
        })
        .collect()
}

impl ValueRange {
    pub fn teams(&self) -> Vec<Team> {
        teams_from_rows(&self.values)
    }
}
