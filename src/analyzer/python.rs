// Python construct counters

use crate::analyzer::blocks::python_functions;
use crate::analyzer::types::Structure;
use once_cell::sync::Lazy;
use regex::Regex;

struct Patterns {
    for_loop: Regex,
    while_loop: Regex,
    if_statement: Regex,
    function: Regex,
    class: Regex,
    list_literal: Regex,
    list_call: Regex,
    dictionary: Regex,
    try_except: Regex,
    with_statement: Regex,
}

static PATTERNS: Lazy<Patterns> = Lazy::new(|| Patterns {
    for_loop: Regex::new(r"\bfor\s+\w+\s+in\s+").expect("valid regex"),
    while_loop: Regex::new(r"\bwhile\s+.+:").expect("valid regex"),
    if_statement: Regex::new(r"\bif\s+.+:").expect("valid regex"),
    function: Regex::new(r"\bdef\s+(\w+)\s*\(").expect("valid regex"),
    class: Regex::new(r"\bclass\s+\w+").expect("valid regex"),
    list_literal: Regex::new(r"\[.*?\]").expect("valid regex"),
    list_call: Regex::new(r"\.append\(|\.extend\(|list\(").expect("valid regex"),
    dictionary: Regex::new(r"\{.*?:.*?\}").expect("valid regex"),
    try_except: Regex::new(r"\btry\s*:").expect("valid regex"),
    with_statement: Regex::new(r"\bwith\s+.+:").expect("valid regex"),
});

fn count(re: &Regex, code: &str) -> usize {
    re.find_iter(code).count()
}

pub fn analyze(code: &str) -> Structure {
    let p = &*PATTERNS;
    let mut s = Structure::default();

    let for_loops = count(&p.for_loop, code);
    let while_loops = count(&p.while_loop, code);
    s.set("for loop", for_loops);
    s.set("while loop", while_loops);
    s.set("loop", for_loops + while_loops);
    s.set("if statement", count(&p.if_statement, code));
    s.set("function", count(&p.function, code));
    s.set("class", count(&p.class, code));
    s.set(
        "list",
        count(&p.list_literal, code) + count(&p.list_call, code),
    );
    s.set("dictionary", count(&p.dictionary, code));
    s.set("try-except", count(&p.try_except, code));
    s.set("with statement", count(&p.with_statement, code));

    let recursive = python_functions(code)
        .iter()
        .filter(|f| f.is_recursive())
        .count();
    s.set("recursion", recursive);

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUM_OF_EVENS: &str = "def sum_of_evens(numbers):
    total = 0
    for num in numbers:
        if num % 2 == 0:
            total = total + num
    return total

data = input().split()
nums = []

for val in data:
    nums.append(int(val))

print(sum_of_evens(nums))";

    #[test]
    fn test_sum_of_evens_structure() {
        let s = analyze(SUM_OF_EVENS);
        assert_eq!(s.count("for loop"), 2);
        assert_eq!(s.count("while loop"), 0);
        assert_eq!(s.count("loop"), 2);
        assert_eq!(s.count("if statement"), 1);
        assert_eq!(s.count("function"), 1);
        assert_eq!(s.count("list"), 2);
        assert_eq!(s.count("recursion"), 0);
        assert_eq!(s.count("class"), 0);
    }

    #[test]
    fn test_recursion_and_exceptions() {
        let code = "def fib(n):\n    if n < 2:\n        return n\n    return fib(n - 1) + fib(n - 2)\n\ntry:\n    with open('f') as fh:\n        pass\nexcept OSError:\n    pass\n";
        let s = analyze(code);
        assert_eq!(s.count("recursion"), 1);
        assert_eq!(s.count("try-except"), 1);
        assert_eq!(s.count("with statement"), 1);
    }

    #[test]
    fn test_while_and_dictionary() {
        let code = "counts = {'a': 1}\nwhile True:\n    break\n";
        let s = analyze(code);
        assert_eq!(s.count("while loop"), 1);
        assert_eq!(s.count("dictionary"), 1);
        assert_eq!(s.count("loop"), 1);
    }

    #[test]
    fn test_call_does_not_count_as_definition() {
        let s = analyze("print(len([1, 2]))\n");
        assert_eq!(s.count("function"), 0);
        assert_eq!(s.count("recursion"), 0);
    }
}
