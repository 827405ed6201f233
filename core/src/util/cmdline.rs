//! Splitting a rendered command line back into argv entries.
//!
//! Follows the Windows convention the build tool expects: whitespace
//! separates arguments, double quotes group and are removed, backslashes are
//! literal. POSIX shell splitting would eat the backslashes in
//! `c:\artifacts`.

pub fn split(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args
}
