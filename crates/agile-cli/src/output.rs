use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Left-aligned columns separated by two spaces. The last column is never
/// padded, so long descriptions do not leave trailing whitespace.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    for line in render_table(headers, &rows) {
        println!("{line}");
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    let mut lines = vec![render_row(headers, &widths), render_row(&separator, &widths)];
    lines.extend(rows.iter().map(|row| render_row(row, &widths)));
    lines
}

fn render_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            if i == last {
                cell.as_ref().to_string()
            } else {
                format!("{:width$}", cell.as_ref())
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_and_last_is_unpadded() {
        let rows = vec![
            vec!["Kanban".to_string(), "80".to_string()],
            vec!["XP".to_string(), "5".to_string()],
        ];
        let lines = render_table(&["METHODOLOGY", "SCORE"], &rows);
        assert_eq!(
            lines,
            vec![
                "METHODOLOGY  SCORE",
                "-----------  -----",
                "Kanban       80",
                "XP           5",
            ]
        );
    }
}
