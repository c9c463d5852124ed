// Per-language execution plans
//
// A plan turns (language, source, stdin) into the files that get mounted into
// the container and the shell command that compiles and runs it. Adding a
// language means adding a variant here.

use crate::language::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Directory inside the container where the source is mounted read-only
pub const APP_DIR: &str = "/app";

/// Flags for C++ builds
pub const CPP_FLAGS: &[&str] = &[
    "-std=c++17",
    "-O2",
    "-pipe",
    "-Wall",
    "-fstack-protector-strong",
    "-D_FORTIFY_SOURCE=2",
    "-fPIE",
    "-pie",
];

/// Stdin is mounted next to the source under this name
pub const INPUT_FILE: &str = "input.txt";

static JAVA_PUBLIC_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"public\s+class\s+(\w+)").expect("valid regex"));

/// How a language is compiled and run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionPlan {
    Python,
    Java { class_name: String },
    Cpp,
}

/// A file written to the scratch directory and bind-mounted under `APP_DIR`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedFile {
    pub name: String,
    pub contents: String,
}

/// Normalized output of a plan: what to run and what to mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRun {
    pub command: Vec<String>,
    pub files: Vec<MountedFile>,
}

impl ExecutionPlan {
    pub fn select(language: Language, source: &str) -> Self {
        match language {
            Language::Python => ExecutionPlan::Python,
            Language::Java => ExecutionPlan::Java {
                class_name: java_class_name(source),
            },
            Language::Cpp => ExecutionPlan::Cpp,
        }
    }

    /// Name of the source file inside `APP_DIR`
    pub fn file_name(&self) -> String {
        match self {
            ExecutionPlan::Python => "main.py".to_string(),
            ExecutionPlan::Java { class_name } => format!("{class_name}.java"),
            ExecutionPlan::Cpp => "main.cpp".to_string(),
        }
    }

    /// Shell script run by `/bin/sh -c`; stdin is only redirected into the final program
    pub fn script(&self, stdin: &str) -> String {
        let redirect = if stdin.is_empty() {
            String::new()
        } else {
            format!(" < {APP_DIR}/{INPUT_FILE}")
        };
        match self {
            ExecutionPlan::Python => format!("python3 {APP_DIR}/main.py{redirect}"),
            ExecutionPlan::Java { class_name } => format!(
                "cp {APP_DIR}/{class_name}.java /tmp/ && cd /tmp && javac {class_name}.java && java -cp /tmp {class_name}{redirect}"
            ),
            ExecutionPlan::Cpp => format!(
                "g++ {} -o /tmp/main {APP_DIR}/main.cpp && /tmp/main{redirect}",
                CPP_FLAGS.join(" ")
            ),
        }
    }

    pub fn prepare(&self, source: &str, stdin: &str) -> PreparedRun {
        let mut files = vec![MountedFile {
            name: self.file_name(),
            contents: source.to_string(),
        }];
        if !stdin.is_empty() {
            files.push(MountedFile {
                name: INPUT_FILE.to_string(),
                contents: stdin_contents(stdin),
            });
        }
        PreparedRun {
            command: vec!["/bin/sh".to_string(), "-c".to_string(), self.script(stdin)],
            files,
        }
    }
}

/// Name of the first `public class`, `Main` when there is none
pub fn java_class_name(source: &str) -> String {
    JAVA_PUBLIC_CLASS
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Main".to_string())
}

/// Input file contents: stdin verbatim, terminated by exactly one newline
fn stdin_contents(stdin: &str) -> String {
    if stdin.ends_with('\n') {
        stdin.to_string()
    } else {
        format!("{stdin}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_class_name_extraction() {
        let source = "import java.util.*;\npublic class Solution {\n public static void main(String[] a) {}\n}";
        assert_eq!(java_class_name(source), "Solution");
        assert_eq!(java_class_name("class Hidden {}"), "Main");
    }

    #[test]
    fn test_java_plan_uses_class_file_name() {
        let plan = ExecutionPlan::select(Language::Java, "public   class Foo {}");
        assert_eq!(
            plan,
            ExecutionPlan::Java {
                class_name: "Foo".to_string()
            }
        );
        assert_eq!(plan.file_name(), "Foo.java");
        let script = plan.script("");
        assert!(script.contains("javac Foo.java"));
        assert!(script.ends_with("java -cp /tmp Foo"));
    }

    #[test]
    fn test_python_plan_without_stdin() {
        let prepared = ExecutionPlan::Python.prepare("print(1)", "");
        assert_eq!(
            prepared.command,
            vec!["/bin/sh", "-c", "python3 /app/main.py"]
        );
        assert_eq!(prepared.files[0].name, "main.py");
        assert_eq!(prepared.files[0].contents, "print(1)");
    }

    #[test]
    fn test_cpp_plan_compiles_with_hardened_flags() {
        let script = ExecutionPlan::Cpp.script("5");
        assert!(script.starts_with("g++ -std=c++17"));
        assert!(script.contains("-fstack-protector-strong"));
        assert!(script.ends_with("&& /tmp/main < /app/input.txt"));
    }

    #[test]
    fn test_stdin_is_mounted_not_inlined() {
        let stdin = "it's $HOME `ls`";
        let prepared = ExecutionPlan::Python.prepare("print(input())", stdin);
        assert_eq!(
            prepared.command[2],
            "python3 /app/main.py < /app/input.txt"
        );
        assert!(!prepared.command[2].contains("HOME"));
        assert_eq!(prepared.files.len(), 2);
        assert_eq!(prepared.files[1].name, INPUT_FILE);
        assert_eq!(prepared.files[1].contents, "it's $HOME `ls`\n");
    }

    #[test]
    fn test_large_stdin_keeps_command_short() {
        let stdin = "1 ".repeat(100_000);
        let prepared = ExecutionPlan::Java {
            class_name: "Main".to_string(),
        }
        .prepare("public class Main {}", &stdin);
        assert!(prepared.command[2].len() < 256);
        assert!(prepared.command[2].ends_with("java -cp /tmp Main < /app/input.txt"));
        assert_eq!(prepared.files[1].contents.len(), stdin.len() + 1);
    }

    #[test]
    fn test_stdin_contents_keeps_newlines() {
        assert_eq!(stdin_contents("1\n2"), "1\n2\n");
        assert_eq!(stdin_contents("1\n2\n"), "1\n2\n");
    }
}
