//! Module arguments: validation, type coercion and the canonical
//! invocation parameters handed to the command builder.
//!
//! The host passes a flat JSON object. Keys prefixed with `_ansible_` carry
//! framework state (check mode, verbosity, ...) and are not parameters.

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Name the host knows this module by.
pub const MODULE_NAME: &str = "dracut";

/// Output path of the initramfs image.
pub const PARAM_NAME: &str = "name";
/// Kernel version the image is built for.
pub const PARAM_KERNEL: &str = "kernel";
/// Extra dracut modules, one `--add` per entry.
pub const PARAM_ADD_MODULES: &str = "add_dracut_modules";
/// Rebuild even if the image already exists.
pub const PARAM_FORCE: &str = "force";

/// Supported parameters, sorted.
pub const SUPPORTED_PARAMS: &[&str] = &[PARAM_ADD_MODULES, PARAM_FORCE, PARAM_KERNEL, PARAM_NAME];

const INTERNAL_PREFIX: &str = "_ansible_";
const CHECK_MODE_KEY: &str = "_ansible_check_mode";

const BOOL_TRUE: &[&str] = &["y", "yes", "on", "1", "true", "t"];
const BOOL_FALSE: &[&str] = &["n", "no", "off", "0", "false", "f"];

/// Dracut module names as they arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleList {
    /// A proper list, one name per element.
    Sequence(Vec<String>),
    /// A single string holding several names joined by commas.
    CommaJoined(String),
}

impl Default for ModuleList {
    fn default() -> Self {
        ModuleList::Sequence(Vec::new())
    }
}

impl ModuleList {
    /// Resolve into one name per entry, in input order.
    ///
    /// Comma-joined names are split on `,` and kept verbatim: no trimming,
    /// empty segments included.
    pub fn into_names(self) -> Vec<String> {
        match self {
            ModuleList::Sequence(names) => names,
            ModuleList::CommaJoined(joined) => joined.split(',').map(str::to_string).collect(),
        }
    }
}

/// Everything needed to build one dracut command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationParams {
    /// Where the initramfs image is written.
    #[serde(rename = "name")]
    pub destination: String,
    /// Kernel version the image targets.
    #[serde(rename = "kernel")]
    pub kernel_version: String,
    /// Dracut modules to add, in order.
    #[serde(rename = "add_dracut_modules")]
    pub modules: Vec<String>,
    pub force: bool,
}

impl InvocationParams {
    pub fn new(
        destination: impl Into<String>,
        kernel_version: impl Into<String>,
        modules: ModuleList,
        force: bool,
    ) -> Self {
        Self {
            destination: destination.into(),
            kernel_version: kernel_version.into(),
            modules: modules.into_names(),
            force,
        }
    }
}

/// Validated module arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleArgs {
    pub params: InvocationParams,
    /// The host asked for a dry run.
    pub check_mode: bool,
}

impl ModuleArgs {
    /// Validate a raw argument object against the argument spec.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Some(args) = value.as_object() else {
            bail!(
                "module arguments must be a JSON object, got {}",
                type_name(value)
            );
        };

        check_unsupported(args)?;
        check_required(args)?;

        let destination = coerce_str(PARAM_NAME, args.get(PARAM_NAME).unwrap_or(&Value::Null))?;
        let kernel_version =
            coerce_str(PARAM_KERNEL, args.get(PARAM_KERNEL).unwrap_or(&Value::Null))?;
        let modules = match args.get(PARAM_ADD_MODULES) {
            None | Some(Value::Null) => ModuleList::default(),
            Some(value) => coerce_list(PARAM_ADD_MODULES, value)?,
        };
        let force = match args.get(PARAM_FORCE) {
            None | Some(Value::Null) => false,
            Some(value) => coerce_bool(PARAM_FORCE, value)?,
        };

        let check_mode = match args.get(CHECK_MODE_KEY) {
            None | Some(Value::Null) => false,
            Some(value) => coerce_bool(CHECK_MODE_KEY, value)?,
        };

        Ok(Self {
            params: InvocationParams::new(destination, kernel_version, modules, force),
            check_mode,
        })
    }
}

fn check_unsupported(args: &Map<String, Value>) -> Result<()> {
    let mut unsupported: Vec<&str> = args
        .keys()
        .map(String::as_str)
        .filter(|key| !key.starts_with(INTERNAL_PREFIX) && !SUPPORTED_PARAMS.contains(key))
        .collect();

    if unsupported.is_empty() {
        return Ok(());
    }

    unsupported.sort_unstable();
    bail!(
        "Unsupported parameters for ({}) module: {}. Supported parameters include: {}.",
        MODULE_NAME,
        unsupported.join(", "),
        SUPPORTED_PARAMS.join(", ")
    );
}

fn check_required(args: &Map<String, Value>) -> Result<()> {
    let missing: Vec<&str> = [PARAM_KERNEL, PARAM_NAME]
        .into_iter()
        .filter(|key| matches!(args.get(*key), None | Some(Value::Null)))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    bail!("missing required arguments: {}", missing.join(", "));
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn conversion_error(key: &str, value: &Value, target: &str, reason: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "argument '{}' is of type {} and we were unable to convert to {}: {}",
        key,
        type_name(value),
        target,
        reason
    )
}

fn coerce_str(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(true) => Ok("True".to_string()),
        Value::Bool(false) => Ok("False".to_string()),
        other => Err(conversion_error(
            key,
            other,
            "str",
            &format!("'{}' cannot be converted to a string", other),
        )),
    }
}

fn coerce_list(key: &str, value: &Value) -> Result<ModuleList> {
    match value {
        Value::Array(items) => {
            let names = items
                .iter()
                .enumerate()
                .map(|(index, item)| coerce_element(key, index, item))
                .collect::<Result<Vec<_>>>()?;
            Ok(ModuleList::Sequence(names))
        }
        Value::String(joined) => Ok(ModuleList::CommaJoined(joined.clone())),
        Value::Number(n) => Ok(ModuleList::Sequence(vec![n.to_string()])),
        other => Err(conversion_error(
            key,
            other,
            "list",
            &format!("'{}' cannot be converted to a list", other),
        )),
    }
}

fn coerce_element(key: &str, index: usize, item: &Value) -> Result<String> {
    match item {
        Value::Array(_) | Value::Object(_) | Value::Null => bail!(
            "elements of argument '{}' must be str: element {} is of type {} ({})",
            key,
            index,
            type_name(item),
            item
        ),
        _ => coerce_str(key, item),
    }
}

fn coerce_bool(key: &str, value: &Value) -> Result<bool> {
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let lowered = s.to_lowercase();
            if BOOL_TRUE.contains(&lowered.as_str()) {
                Some(true)
            } else if BOOL_FALSE.contains(&lowered.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    };

    parsed.ok_or_else(|| {
        conversion_error(
            key,
            value,
            "bool",
            &format!("the value {} is not a valid boolean", value),
        )
    })
}
