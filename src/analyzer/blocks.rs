// Function body extraction used for recursion detection

use once_cell::sync::Lazy;
use regex::Regex;

static PYTHON_DEF_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([ \t]*)(?:async\s+)?def\s+(\w+)\s*\(").expect("valid regex")
});

/// A named function and the text of its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBody {
    pub name: String,
    pub body: String,
}

impl FunctionBody {
    /// The body textually calls the function's own name
    pub fn is_recursive(&self) -> bool {
        self.body.contains(&format!("{}(", self.name))
    }
}

/// Text between the brace opened just before `start` and its matching close.
/// An unbalanced block runs to the end of the source.
pub fn braced_block(code: &str, start: usize) -> &str {
    let mut depth = 1usize;
    for (offset, byte) in code.as_bytes()[start..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return &code[start..start + offset];
                }
            }
            _ => {}
        }
    }
    &code[start..]
}

/// Bodies of brace-delimited functions whose header `pattern` ends at the
/// opening brace and captures the name in group `name_group`
pub fn braced_functions(code: &str, pattern: &Regex, name_group: usize) -> Vec<FunctionBody> {
    pattern
        .captures_iter(code)
        .filter_map(|caps| {
            let header = caps.get(0)?;
            let name = caps.get(name_group)?.as_str().to_string();
            let body = braced_block(code, header.end()).to_string();
            Some(FunctionBody { name, body })
        })
        .collect()
}

/// Bodies of Python `def`s, delimited by indentation
pub fn python_functions(code: &str) -> Vec<FunctionBody> {
    let lines: Vec<&str> = code.lines().collect();
    let mut functions = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = PYTHON_DEF_LINE.captures(line) else {
            continue;
        };
        let def_indent = indent_width(&caps[1]);
        let name = caps[2].to_string();
        let params_start = caps.get(0).map_or(line.len(), |m| m.end());

        let mut body = String::new();
        // One-line bodies: `def f(n): return f(n - 1)`
        if let Some(tail) = header_tail(line, params_start) {
            body.push_str(tail);
            body.push('\n');
        }
        for next in &lines[i + 1..] {
            if next.trim().is_empty() {
                continue;
            }
            let indent = next.len() - next.trim_start().len();
            if indent_width(&next[..indent]) <= def_indent {
                break;
            }
            body.push_str(next);
            body.push('\n');
        }

        functions.push(FunctionBody { name, body });
    }

    functions
}

/// Code after the colon that closes a `def` header on the same line;
/// `params_start` is just past the opening parenthesis
fn header_tail(line: &str, params_start: usize) -> Option<&str> {
    let mut depth = 1usize;
    let mut close = None;
    for (offset, byte) in line.as_bytes()[params_start..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(params_start + offset);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;
    let colon = line[close..].find(':')? + close;
    let tail = line[colon + 1..].trim();
    (!tail.is_empty() && !tail.starts_with('#')).then_some(tail)
}

/// Tabs advance to the next multiple of 8, as in the Python tokenizer
fn indent_width(indent: &str) -> usize {
    indent.chars().fold(0, |width, c| match c {
        '\t' => (width / 8 + 1) * 8,
        _ => width + 1,
    })
}
