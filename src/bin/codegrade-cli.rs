//! codegrade CLI client
//!
//! Submits source files to the codegrade service over HTTP and prints the
//! results. Task files describe test cases and structural constraints in TOML.

#[path = "../language.rs"]
#[allow(dead_code)]
mod language;

use clap::{Parser, Subcommand};
use language::Language;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "codegrade-cli")]
#[command(about = "codegrade execution service CLI client")]
struct Args {
    /// Service base URL
    #[arg(short, long, default_value = "http://127.0.0.1:5001")]
    server: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "120")]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a file once and print its output
    Run {
        file: PathBuf,
        /// Language id, inferred from the extension when omitted
        #[arg(short, long)]
        language: Option<Language>,
        /// Text fed to stdin
        #[arg(short, long, conflicts_with = "input_file")]
        input: Option<String>,
        /// File whose contents are fed to stdin
        #[arg(long)]
        input_file: Option<PathBuf>,
    },
    /// Grade a file against a task definition
    Eval {
        file: PathBuf,
        /// TOML task file with [[test_cases]] and [[constraints]]
        #[arg(short, long)]
        task: PathBuf,
        #[arg(short, long)]
        language: Option<Language>,
        /// Print the raw JSON response instead of the report
        #[arg(long)]
        json: bool,
    },
    /// List supported languages
    Languages,
    /// Check service health
    Health,
}

/// Task file layout
#[derive(Debug, Default, Deserialize)]
struct TaskFile {
    #[serde(default)]
    test_cases: Vec<TaskTestCase>,
    #[serde(default)]
    constraints: Vec<TaskConstraint>,
}

#[derive(Debug, Deserialize)]
struct TaskTestCase {
    #[serde(default)]
    input: String,
    expected_output: String,
    #[serde(default = "default_mode")]
    comparison_mode: String,
    #[serde(default)]
    is_hidden: bool,
}

fn default_mode() -> String {
    "Exact".to_string()
}

#[derive(Debug, Deserialize)]
struct TaskConstraint {
    #[serde(rename = "type")]
    kind: String,
    construct: String,
    #[serde(default)]
    min_depth: u32,
    #[serde(default)]
    max_depth: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TestCasePayload<'a> {
    input: &'a str,
    expected_output: &'a str,
    comparison_mode: &'a str,
    is_hidden: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Specifics {
    min_depth: u32,
    max_depth: u32,
}

#[derive(Debug, Serialize)]
struct ConstraintPayload<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    construct: &'a str,
    specifics: Specifics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecutePayload<'a> {
    code: &'a str,
    language: Language,
    test_cases: Vec<TestCasePayload<'a>>,
    structural_constraints: Vec<ConstraintPayload<'a>>,
}

impl<'a> ExecutePayload<'a> {
    fn new(code: &'a str, language: Language, task: &'a TaskFile) -> Self {
        Self {
            code,
            language,
            test_cases: task
                .test_cases
                .iter()
                .map(|tc| TestCasePayload {
                    input: &tc.input,
                    expected_output: &tc.expected_output,
                    comparison_mode: &tc.comparison_mode,
                    is_hidden: tc.is_hidden,
                })
                .collect(),
            structural_constraints: task
                .constraints
                .iter()
                .map(|c| ConstraintPayload {
                    kind: &c.kind,
                    construct: &c.construct,
                    specifics: Specifics {
                        min_depth: c.min_depth,
                        max_depth: c.max_depth,
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct QuickPayload<'a> {
    code: &'a str,
    language: Language,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuickReply {
    success: bool,
    #[serde(default)]
    output: String,
    error: Option<String>,
    exit_code: i64,
    execution_time: u64,
}

#[derive(Debug, Deserialize)]
struct EvalReply {
    #[serde(default)]
    terminal: String,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    id: String,
    name: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct LanguagesReply {
    languages: Vec<LanguageEntry>,
}

/// HTTP client bound to one service
struct Client {
    http: reqwest::Client,
    base: String,
}

impl Client {
    fn new(server: &str, timeout_secs: u64) -> io::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(io::Error::other)?;
        Ok(Self {
            http,
            base: server.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str) -> io::Result<serde_json::Value> {
        let response = self
            .http
            .get(format!("{}{}", self.base, path))
            .send()
            .await
            .map_err(io::Error::other)?;
        response.json().await.map_err(io::Error::other)
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> io::Result<serde_json::Value> {
        let response = self
            .http
            .post(format!("{}{}", self.base, path))
            .json(body)
            .send()
            .await
            .map_err(io::Error::other)?;
        response.json().await.map_err(io::Error::other)
    }
}

/// Error bodies are `{success: false, error}`
fn into_reply<T: for<'de> Deserialize<'de>>(value: serde_json::Value) -> io::Result<T> {
    if value.get("success") == Some(&serde_json::Value::Bool(false))
        && value.get("terminal").is_none()
        && value.get("exitCode").is_none()
    {
        let message = value
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("request failed");
        return Err(io::Error::other(message.to_string()));
    }
    serde_json::from_value(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn resolve_language(file: &Path, given: Option<Language>) -> io::Result<Language> {
    if let Some(language) = given {
        return Ok(language);
    }
    file.extension()
        .and_then(|e| e.to_str())
        .and_then(Language::from_extension)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "cannot infer language of {}, pass --language",
                    file.display()
                ),
            )
        })
}

fn load_task(path: &Path) -> io::Result<TaskFile> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn main() -> io::Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Build runtime for async network operations
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async { run_client(args).await })
}

async fn run_client(args: Args) -> io::Result<()> {
    let client = Client::new(&args.server, args.timeout)?;

    match args.command {
        Command::Run {
            file,
            language,
            input,
            input_file,
        } => {
            let language = resolve_language(&file, language)?;
            let code = std::fs::read_to_string(&file)?;
            let input = match (input, input_file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => String::new(),
            };

            let payload = QuickPayload {
                code: &code,
                language,
                input: &input,
            };
            let reply: QuickReply =
                into_reply(client.post("/api/execute/quick", &payload).await?)?;

            if !reply.output.is_empty() {
                println!("{}", reply.output);
            }
            if let Some(error) = reply.error.filter(|e| !e.is_empty()) {
                eprintln!("[stderr] {}", error);
            }
            println!(
                "[{}] exit code {} in {}ms",
                if reply.success { "ok" } else { "failed" },
                reply.exit_code,
                reply.execution_time
            );
        }
        Command::Eval {
            file,
            task,
            language,
            json,
        } => {
            let language = resolve_language(&file, language)?;
            let code = std::fs::read_to_string(&file)?;
            let task = load_task(&task)?;

            let payload = ExecutePayload::new(&code, language, &task);
            let value = client.post("/api/execute", &payload).await?;
            if json {
                let pretty = serde_json::to_string_pretty(&value).map_err(io::Error::other)?;
                println!("{}", pretty);
            } else {
                let reply: EvalReply = into_reply(value)?;
                if reply.terminal.is_empty() {
                    println!("[error] {}", reply.error.unwrap_or_default());
                } else {
                    println!("{}", reply.terminal);
                }
            }
        }
        Command::Languages => {
            let reply: LanguagesReply = into_reply(client.get("/api/languages").await?)?;
            for entry in reply.languages {
                println!("{:<8} {} {}", entry.id, entry.name, entry.version);
            }
        }
        Command::Health => {
            let value = client.get("/health").await?;
            let status = value
                .get("status")
                .and_then(|s| s.as_str())
                .unwrap_or("unknown");
            let timestamp = value
                .get("timestamp")
                .and_then(|s| s.as_str())
                .unwrap_or("");
            println!("{} {} ({})", args.server, status, timestamp);
        }
    }

    Ok(())
}
