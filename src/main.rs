//! curlmin
//!
//! Finds the smallest curl command that still gets the same answer.
//!
//! # Architecture Overview
//!
//! ```text
//!     command text ──▶ ┌────────────┐    ┌──────────────┐    ┌──────────────┐
//!     (args / stdin)   │ invocation │───▶│  reduction   │───▶│    oracle    │──▶ curl ──▶ server
//!                      │   parser   │    │    engine    │◀───│ compare/exec │◀──
//!                      └────────────┘    └──────┬───────┘    └──────────────┘
//!                                               │
//!                                               ▼
//!                                  reduced command (stdout)
//!                                  trace + logs (stderr)
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use curlmin::config::{load_config, validation::validate_config, MinimizerConfig, TraceFormat};
use curlmin::lifecycle::{signals::forward_ctrl_c, Shutdown};
use curlmin::observability::logging::init_logging;
use curlmin::oracle::{CurlExecutor, Predicate, RetryPolicy, Retrying};
use curlmin::reduction::{render_trace, Minimizer};

#[derive(Parser)]
#[command(name = "curlmin")]
#[command(about = "Reduce a curl command to the headers, cookies and parameters it needs", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not reduce headers
    #[arg(long)]
    skip_headers: bool,

    /// Do not reduce cookies
    #[arg(long)]
    skip_cookies: bool,

    /// Do not reduce query parameters
    #[arg(long)]
    skip_params: bool,

    /// Print every decision and debug logs to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Compare status codes
    #[arg(long)]
    status: bool,

    /// Compare body content
    #[arg(long)]
    body: bool,

    /// Compare body word counts
    #[arg(long)]
    words: bool,

    /// Compare body line counts
    #[arg(long)]
    lines: bool,

    /// Compare body byte lengths
    #[arg(long)]
    bytes: bool,

    /// Header name never removed (repeatable)
    #[arg(long = "protect-header", value_name = "NAME")]
    protect_headers: Vec<String>,

    /// Cookie name never removed (repeatable)
    #[arg(long = "protect-cookie", value_name = "NAME")]
    protect_cookies: Vec<String>,

    /// Query key never removed (repeatable)
    #[arg(long = "protect-param", value_name = "KEY")]
    protect_params: Vec<String>,

    /// Clear the built-in protected query key
    #[arg(long)]
    no_default_protect: bool,

    /// Curl binary to execute
    #[arg(long, value_name = "PATH")]
    curl: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Stop reducing after this many seconds
    #[arg(long, value_name = "SECS")]
    deadline: Option<u64>,

    /// Extra attempts for a failed curl call
    #[arg(long)]
    retries: Option<u32>,

    /// Trace output format
    #[arg(long, value_enum)]
    trace_format: Option<TraceFormatArg>,

    /// The curl command; read from stdin when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TraceFormatArg {
    Text,
    Json,
}

impl From<TraceFormatArg> for TraceFormat {
    fn from(arg: TraceFormatArg) -> Self {
        match arg {
            TraceFormatArg::Text => TraceFormat::Text,
            TraceFormatArg::Json => TraceFormat::Json,
        }
    }
}

impl Cli {
    /// Layer command-line overrides onto the loaded configuration.
    fn apply(&self, config: &mut MinimizerConfig) {
        if self.skip_headers {
            config.reduce.headers = false;
        }
        if self.skip_cookies {
            config.reduce.cookies = false;
        }
        if self.skip_params {
            config.reduce.params = false;
        }
        if self.verbose {
            config.reduce.trace = true;
        }

        let selected: Vec<Predicate> = [
            (self.status, Predicate::StatusCode),
            (self.body, Predicate::BodyContent),
            (self.words, Predicate::WordCount),
            (self.lines, Predicate::LineCount),
            (self.bytes, Predicate::ByteLength),
        ]
        .into_iter()
        .filter_map(|(on, predicate)| on.then_some(predicate))
        .collect();
        if !selected.is_empty() {
            config.compare.predicates = selected;
        }

        if self.no_default_protect {
            config.protect.params.clear();
        }
        config.protect.headers.extend(self.protect_headers.iter().cloned());
        config.protect.cookies.extend(self.protect_cookies.iter().cloned());
        config.protect.params.extend(self.protect_params.iter().cloned());

        if let Some(curl) = &self.curl {
            config.executor.curl_binary = Some(curl.clone());
        }
        if let Some(timeout) = self.timeout {
            config.executor.timeout_secs = timeout;
        }
        if let Some(retries) = self.retries {
            config.executor.retries = retries;
        }
        if let Some(deadline) = self.deadline {
            config.limits.deadline_secs = deadline;
        }
        if let Some(format) = self.trace_format {
            config.observability.trace_format = format.into();
        }
    }

    /// A single word is taken as the full command text; several words are re-quoted.
    fn command_text(&self) -> Result<String, Box<dyn std::error::Error>> {
        match self.command.as_slice() {
            [] => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
            [single] => Ok(single.clone()),
            words => Ok(shlex::try_join(words.iter().map(String::as_str))?),
        }
    }
}

/// Print an error and every cause beneath it.
fn report(error: &dyn std::error::Error) {
    eprintln!("Error: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                report(&e);
                return ExitCode::FAILURE;
            }
        },
        None => MinimizerConfig::default(),
    };
    cli.apply(&mut config);

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            eprintln!("Error: {error}");
        }
        return ExitCode::FAILURE;
    }

    init_logging(&config.observability, cli.verbose);

    let text = match cli.command_text() {
        Ok(text) => text,
        Err(e) => {
            report(e.as_ref());
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        headers = config.reduce.headers,
        cookies = config.reduce.cookies,
        params = config.reduce.params,
        timeout_secs = config.executor.timeout_secs,
        retries = config.executor.retries,
        "Configuration loaded"
    );

    let oracle = Retrying::new(
        CurlExecutor::new(&config.executor),
        RetryPolicy::from_config(&config.executor),
    );

    let shutdown = Arc::new(Shutdown::new());
    let deadline = (config.limits.deadline_secs > 0)
        .then(|| Duration::from_secs(config.limits.deadline_secs));
    let listener = shutdown.listener(deadline);
    forward_ctrl_c(Arc::clone(&shutdown));

    let mut minimizer = Minimizer::new(oracle, &config).with_stop(listener);
    let reduction = match minimizer.minimize(&text).await {
        Ok(reduction) => reduction,
        Err(e) => {
            report(&e);
            return ExitCode::FAILURE;
        }
    };

    if config.reduce.trace {
        match render_trace(&reduction.trace, config.observability.trace_format) {
            Ok(trace) if !trace.is_empty() => eprintln!("{trace}"),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to render trace"),
        }
    }
    if let Some(error) = &reduction.query_error {
        eprintln!("Warning: query parameters not reduced: {error}");
    }
    if let Some(reason) = reduction.stopped {
        eprintln!("Warning: reduction interrupted ({reason:?}); result may not be minimal");
    }

    println!("{}", reduction.text());
    ExitCode::SUCCESS
}
