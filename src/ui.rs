use ratatui::{prelude::*, widgets::*};
use serde_json::Value;

use crate::messages::render::FieldView;

/// Renders the screen tab bar
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Pretty-print a JSON document for display
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Simple JSON syntax highlighting for pretty-printed text
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    text.lines().map(highlight_line).collect()
}

fn highlight_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut chars = line.char_indices().peekable();

    let flush = |current: &mut String, spans: &mut Vec<Span<'static>>| {
        if current.is_empty() {
            return;
        }
        let text = std::mem::take(current);
        let color = match text.trim() {
            "true" | "false" | "null" => Some(Color::Magenta),
            t if !t.is_empty() && t.chars().all(|c| c.is_ascii_digit() || "-.eE+".contains(c)) => {
                Some(Color::Yellow)
            }
            _ => None,
        };
        spans.push(match color {
            Some(color) => Span::styled(text, Style::default().fg(color)),
            None => Span::raw(text),
        });
    };

    while let Some((start, c)) = chars.next() {
        match c {
            '"' => {
                flush(&mut current, &mut spans);
                let mut end = line.len();
                let mut escaped = false;
                for (i, sc) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if sc == '\\' {
                        escaped = true;
                    } else if sc == '"' {
                        end = i + 1;
                        break;
                    }
                }
                let literal = &line[start..end];
                let is_key = line[end..].trim_start().starts_with(':');
                let color = if is_key { Color::Cyan } else { Color::Green };
                spans.push(Span::styled(literal.to_string(), Style::default().fg(color)));
            }
            '{' | '}' | '[' | ']' => {
                flush(&mut current, &mut spans);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::Yellow)));
            }
            ':' | ',' => {
                flush(&mut current, &mut spans);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::White)));
            }
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut spans);

    Line::from(spans)
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Cell color for boolean columns such as Enabled or Success
pub fn flag_color(text: &str) -> Option<Color> {
    match text {
        "true" => Some(Color::Green),
        "false" => Some(Color::Red),
        _ => None,
    }
}

/// Lines for a vertical form: label, input, then error or help text
pub fn form_lines(fields: &[FieldView]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for field in fields {
        let label_style = if field.focused {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut label = vec![Span::styled(field.label.clone(), label_style)];
        if field.required {
            label.push(Span::styled(" *", Style::default().fg(Color::Red)));
        }
        if field.is_select {
            label.push(Span::styled(" (←/→)", Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(label));

        let input = if field.value.is_empty() {
            Span::styled(
                field.placeholder.clone().unwrap_or_default(),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw(field.value.clone())
        };
        let cursor = if field.focused && !field.is_select { "▏" } else { "" };
        lines.push(Line::from(vec![
            Span::styled("> ", label_style),
            input,
            Span::styled(cursor, Style::default().fg(Color::Yellow)),
        ]));

        match (&field.error, &field.tooltip) {
            (Some(error), _) => {
                for text in error.lines() {
                    lines.push(Line::styled(format!("  {}", text), Style::default().fg(Color::Red)));
                }
            }
            (None, Some(tooltip)) if field.focused => {
                lines.push(Line::styled(format!("  {}", tooltip), Style::default().fg(Color::DarkGray)));
            }
            _ => {}
        }
    }

    lines
}

/// Rectangle centered in `r` taking the given percentages
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colored(line: &Line, color: Color) -> Vec<String> {
        line.spans
            .iter()
            .filter(|s| s.style.fg == Some(color))
            .map(|s| s.content.to_string())
            .collect()
    }

    #[test]
    fn test_keys_and_values_colored_differently() {
        let lines = highlight_json(r#"  "status": "ok: fine","#);
        assert_eq!(colored(&lines[0], Color::Cyan), vec![r#""status""#]);
        assert_eq!(colored(&lines[0], Color::Green), vec![r#""ok: fine""#]);
    }

    #[test]
    fn test_literals_and_numbers() {
        let lines = highlight_json(r#"  "count": 12, "ok": true"#);
        assert!(colored(&lines[0], Color::Yellow).iter().any(|s| s.trim() == "12"));
        assert!(colored(&lines[0], Color::Magenta).iter().any(|s| s.trim() == "true"));
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        let lines = highlight_json(r#""a \"quoted\" word""#);
        assert_eq!(colored(&lines[0], Color::Green), vec![r#""a \"quoted\" word""#]);
    }
}
