// C++ construct counters

use crate::analyzer::blocks::braced_functions;
use crate::analyzer::types::Structure;
use once_cell::sync::Lazy;
use regex::Regex;

struct Patterns {
    for_loop: Regex,
    while_loop: Regex,
    do_while: Regex,
    if_statement: Regex,
    function: Regex,
    class: Regex,
    structure: Regex,
    c_array: Regex,
    vector: Regex,
    map: Regex,
    pointer: Regex,
    try_catch: Regex,
}

static PATTERNS: Lazy<Patterns> = Lazy::new(|| Patterns {
    for_loop: Regex::new(r"\bfor\s*\(").expect("valid regex"),
    while_loop: Regex::new(r"\bwhile\s*\(").expect("valid regex"),
    do_while: Regex::new(r"\bdo\s*\{").expect("valid regex"),
    if_statement: Regex::new(r"\bif\s*\(").expect("valid regex"),
    // Name is group 1
    function: Regex::new(r"\b\w+\s+(\w+)\s*\([^)]*\)\s*\{").expect("valid regex"),
    class: Regex::new(r"\bclass\s+\w+").expect("valid regex"),
    structure: Regex::new(r"\bstruct\s+\w+").expect("valid regex"),
    c_array: Regex::new(r"\w+\s+\w+\[\s*\d*\s*\]").expect("valid regex"),
    vector: Regex::new(r"vector<").expect("valid regex"),
    map: Regex::new(r"\bmap<").expect("valid regex"),
    pointer: Regex::new(r"\*\s*\w+").expect("valid regex"),
    try_catch: Regex::new(r"\btry\s*\{").expect("valid regex"),
});

fn count(re: &Regex, code: &str) -> usize {
    re.find_iter(code).count()
}

pub fn analyze(code: &str) -> Structure {
    let p = &*PATTERNS;
    let mut s = Structure::default();

    let for_loops = count(&p.for_loop, code);
    let while_loops = count(&p.while_loop, code);
    let do_whiles = count(&p.do_while, code);
    s.set("for loop", for_loops);
    s.set("while loop", while_loops);
    s.set("do-while loop", do_whiles);
    s.set("loop", for_loops + while_loops + do_whiles);
    s.set("if statement", count(&p.if_statement, code));
    s.set("function", count(&p.function, code));
    s.set("class", count(&p.class, code));
    s.set("struct", count(&p.structure, code));

    // "array" covers C-style arrays and vectors
    let vectors = count(&p.vector, code);
    s.set("vector", vectors);
    s.set("array", count(&p.c_array, code) + vectors);
    s.set("map", count(&p.map, code));
    // Multiplication matches too; the count is a heuristic
    s.set("pointer", count(&p.pointer, code));
    s.set("try-catch", count(&p.try_catch, code));

    let recursive = braced_functions(code, &p.function, 1)
        .iter()
        .filter(|f| f.is_recursive())
        .count();
    s.set("recursion", recursive);

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const GCD: &str = r#"#include <iostream>
#include <vector>
using namespace std;

int gcd(int a, int b) {
    if (b == 0) {
        return a;
    }
    return gcd(b, a % b);
}

int main() {
    vector<int> nums(2);
    int arr[10];
    for (int i = 0; i < 2; i++) {
        cin >> nums[i];
    }
    cout << gcd(nums[0], nums[1]) << endl;
    return 0;
}"#;

    #[test]
    fn test_gcd_structure() {
        let s = analyze(GCD);
        assert_eq!(s.count("function"), 2);
        assert_eq!(s.count("recursion"), 1);
        assert_eq!(s.count("for loop"), 1);
        assert_eq!(s.count("loop"), 1);
        assert_eq!(s.count("if statement"), 1);
        assert_eq!(s.count("vector"), 1);
        assert_eq!(s.count("array"), 2);
        assert_eq!(s.count("pointer"), 0);
        assert_eq!(s.count("class"), 0);
    }

    #[test]
    fn test_pointer_struct_and_map() {
        let code = "struct Node { int v; Node* next; };\nmap<int, int> m;\nint *p = nullptr;\n";
        let s = analyze(code);
        assert_eq!(s.count("struct"), 1);
        assert_eq!(s.count("map"), 1);
        assert_eq!(s.count("pointer"), 2);
    }
}
