use similar::TextDiff;

pub fn unified_diff(label: &str, before: &str, after: &str) -> String {
    let diff = TextDiff::from_lines(before, after);
    diff.unified_diff()
        .context_radius(3)
        .header(&format!("{label} (before)"), &format!("{label} (after)"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::unified_diff;

    #[test]
    fn shows_changed_class_line() {
        let before = "<div>\n  <button className=\"bg-gray-800 hover:bg-gray-900\" />\n</div>\n";
        let after = "<div>\n  <button className=\"bg-black hover:bg-gray-700\" />\n</div>\n";
        let diff = unified_diff("admin", before, after);
        assert!(diff.starts_with("--- admin (before)\n+++ admin (after)\n"));
        assert!(diff.contains("-  <button className=\"bg-gray-800 hover:bg-gray-900\" />"));
        assert!(diff.contains("+  <button className=\"bg-black hover:bg-gray-700\" />"));
    }

    #[test]
    fn identical_text_has_no_hunks() {
        let diff = unified_diff("admin", "same\n", "same\n");
        assert!(!diff.contains("@@"));
    }
}
