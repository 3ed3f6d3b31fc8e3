// Quote characters toggle the in-quotes state and are never emitted; a doubled
// quote is two toggles, not an escaped literal. An unclosed quote runs to the
// end of the line. Fields are not trimmed here; callers trim where they need to.

pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

pub fn has_unbalanced_quotes(line: &str) -> bool {
    line.chars().filter(|ch| *ch == '"').count() % 2 == 1
}
