/// Break `text` into lines of at most `width` characters.
///
/// Lines break at the last space that fits. A `\r` or `\n` inside the window
/// forces a break there, and is the only way to produce an empty line. Words
/// longer than `width` are split mid-word. Tabs are non-breaking spaces.
pub fn reflow(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rest: Vec<char> = text.chars().collect();
    rest.push(' ');

    let mut lines = Vec::new();
    let mut start = 0;
    while start < rest.len() {
        let window = &rest[start..rest.len().min(start + width + 1)];
        let forced = window
            .iter()
            .position(|&c| c == '\r')
            .or_else(|| window.iter().position(|&c| c == '\n'));
        let split = forced.or_else(|| window.iter().rposition(|&c| c == ' '));

        let line_len = split.unwrap_or(width).min(rest.len() - start);
        let line: String = rest[start..start + line_len]
            .iter()
            .map(|&c| if c == '\t' { ' ' } else { c })
            .collect();
        let line = line.trim().to_string();
        if !line.is_empty() || forced.is_some() {
            lines.push(line);
        }

        start += match split {
            Some(_) => line_len + 1,
            None => line_len,
        };
    }
    lines
}
