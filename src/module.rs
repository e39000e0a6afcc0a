//! Binary module driver: read the argument file, validate it, run dracut
//! once and turn the outcome into the response document.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::command::build_command;
use crate::config::Config;
use crate::params::ModuleArgs;
use crate::process::Cmd;
use crate::result::{ExecutionResult, ModuleResponse};
use crate::timing::Timer;

/// Envelope key used when arguments arrive the new-style way on stdin.
const ARGS_ENVELOPE_KEY: &str = "ANSIBLE_MODULE_ARGS";

/// Read raw module arguments from `path`, or from stdin when `None`.
pub fn read_module_args(path: Option<&Path>) -> Result<Value> {
    let raw = match path {
        Some(path) => fs::read_to_string(path).with_context(|| {
            format!("Failed to read module arguments from {}", path.display())
        })?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read module arguments from stdin")?;
            buf
        }
    };
    parse_module_args(&raw)
}

/// Parse an argument document, unwrapping the stdin envelope if present.
pub fn parse_module_args(raw: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(raw).context("Failed to parse module arguments as JSON")?;

    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(ARGS_ENVELOPE_KEY) => {
            Ok(map.remove(ARGS_ENVELOPE_KEY).unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}

/// Run a built dracut command line and wait for it.
///
/// Errors only when the program could not be started.
pub fn run_dracut(argv: &[String]) -> Result<ExecutionResult> {
    let Some((program, args)) = argv.split_first() else {
        anyhow::bail!("empty dracut command line");
    };

    tracing::info!(cmd = ?argv, "running dracut");
    let timer = Timer::start("dracut");
    let output = Cmd::new(program).args(args).run()?;
    timer.finish();

    tracing::debug!(stdout = %output.stdout, stderr = %output.stderr, "dracut output");
    if output.success() {
        tracing::info!("dracut succeeded");
    } else {
        tracing::warn!(
            rc = output.code(),
            stderr = output.stderr_trimmed(),
            "dracut failed"
        );
    }

    Ok(ExecutionResult::from_output(&output))
}

/// Execute validated arguments.
pub fn execute(args: &ModuleArgs, config: &Config) -> ModuleResponse {
    if args.check_mode {
        tracing::info!("check mode requested, skipping dracut");
        return ModuleResponse::check_mode_skipped().with_invocation(&args.params);
    }

    let argv = build_command(&config.dracut_bin, &args.params);
    let response = match run_dracut(&argv) {
        Ok(result) => ModuleResponse::from_execution(result, argv),
        Err(err) => {
            tracing::warn!("{:#}", err);
            ModuleResponse {
                cmd: Some(argv),
                ..ModuleResponse::failure(format!("{:#}", err))
            }
        }
    };

    response.with_invocation(&args.params)
}

/// Validate a raw argument document and execute it.
pub fn run_with_args(value: &Value, config: &Config) -> ModuleResponse {
    match ModuleArgs::from_json(value) {
        Ok(args) => execute(&args, config),
        Err(err) => {
            tracing::warn!("invalid module arguments: {:#}", err);
            ModuleResponse::failure(format!("{:#}", err))
        }
    }
}

/// Full module run: read arguments from `path` (or stdin) and execute them.
pub fn run_module(path: Option<&Path>, config: &Config) -> ModuleResponse {
    match read_module_args(path) {
        Ok(value) => run_with_args(&value, config),
        Err(err) => {
            tracing::warn!("{:#}", err);
            ModuleResponse::failure(format!("{:#}", err))
        }
    }
}

/// Validate arguments and return the command line that would run.
pub fn render_command(value: &Value, config: &Config) -> Result<Vec<String>> {
    let args = ModuleArgs::from_json(value)?;
    Ok(build_command(&config.dracut_bin, &args.params))
}
