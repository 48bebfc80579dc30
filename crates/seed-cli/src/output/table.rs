#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_WIDTH: usize = 4;

/// Render an aligned table. Numeric cells are right-aligned.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .max(MIN_WIDTH)
        })
        .collect();
    shrink_to(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join("  ");
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = truncate(row.get(index).map_or("-", String::as_str), *width);
                let padded = pad(&cell, *width, is_numeric(&cell));
                if options.color {
                    colorize(&cell, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// Narrow the widest columns one character at a time until the table fits.
fn shrink_to(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let separators = widths.len().saturating_sub(1) * 2;
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > headers[*index].chars().count().max(MIN_WIDTH))
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        let Some(index) = widest else {
            break;
        };
        widths[index] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

/// Wrap a padded cell in an ANSI color chosen by its plain text.
fn colorize(cell: &str, padded: String) -> String {
    let code = match cell {
        "completed" | "created" | "true" => "32",
        "updated" | "no_data" | "skipped" | "optional" => "33",
        "failed" | "false" | "required" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn columns_are_aligned() {
        let rows = vec![
            vec!["sites".to_string(), "2".to_string()],
            vec!["device_types".to_string(), "15".to_string()],
        ];
        let out = render_table(&["loader", "created"], &rows, PLAIN);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "loader        created");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "sites               2");
        assert_eq!(lines[3], "device_types       15");
    }

    #[test]
    fn wide_columns_are_truncated() {
        let rows = vec![vec!["a-very-long-cell-value".to_string()]];
        let options = TableOptions {
            max_width: Some(10),
            color: false,
        };
        let out = render_table(&["name"], &rows, options);
        assert!(out.lines().nth(2).is_some_and(|l| l.ends_with('…')));
        assert!(out.lines().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn color_wraps_known_statuses() {
        let rows = vec![vec!["failed".to_string()]];
        let options = TableOptions {
            max_width: None,
            color: true,
        };
        let out = render_table(&["status"], &rows, options);
        assert!(out.contains("\u{1b}[31m"));
    }
}
