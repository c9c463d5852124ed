// Java construct counters

use crate::analyzer::blocks::braced_functions;
use crate::analyzer::types::Structure;
use once_cell::sync::Lazy;
use regex::Regex;

struct Patterns {
    for_loop: Regex,
    while_loop: Regex,
    do_while: Regex,
    if_statement: Regex,
    method: Regex,
    class: Regex,
    array_type: Regex,
    array_new: Regex,
    array_list: Regex,
    hash_map: Regex,
    try_catch: Regex,
}

static PATTERNS: Lazy<Patterns> = Lazy::new(|| Patterns {
    for_loop: Regex::new(r"\bfor\s*\(").expect("valid regex"),
    while_loop: Regex::new(r"\bwhile\s*\(").expect("valid regex"),
    do_while: Regex::new(r"\bdo\s*\{").expect("valid regex"),
    if_statement: Regex::new(r"\bif\s*\(").expect("valid regex"),
    // Name is group 2
    method: Regex::new(
        r"\b(public|private|protected|static|\s)+[\w<>\[\]]+\s+(\w+)\s*\([^)]*\)\s*\{",
    )
    .expect("valid regex"),
    class: Regex::new(r"\bclass\s+\w+").expect("valid regex"),
    array_type: Regex::new(r"\w+\[\s*\]").expect("valid regex"),
    array_new: Regex::new(r"new\s+\w+\[").expect("valid regex"),
    array_list: Regex::new(r"ArrayList<").expect("valid regex"),
    hash_map: Regex::new(r"HashMap<").expect("valid regex"),
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
    s.set("method", count(&p.method, code));
    s.set("class", count(&p.class, code));

    // "array" covers primitive arrays and ArrayList
    let array_lists = count(&p.array_list, code);
    let primitive_arrays = count(&p.array_type, code) + count(&p.array_new, code);
    s.set("ArrayList", array_lists);
    s.set("array", primitive_arrays + array_lists);
    s.set("HashMap", count(&p.hash_map, code));
    s.set("try-catch", count(&p.try_catch, code));

    let recursive = braced_functions(code, &p.method, 2)
        .iter()
        .filter(|m| m.is_recursive())
        .count();
    s.set("recursion", recursive);

    s
}
