//! Standard native functions for BacVM
//!
//! Natives are plain functions registered by name in a `NativeRegistry`.
//! This crate provides the console output natives and a helper that
//! registers all of them.

pub use bac_core::vm::{ExecutionState, Variable};
pub use bac_core::{NativeFn, NativeRegistry};

use std::io::{self, Write};

use bac_core::vm::value::variable_bounded;
use tracing::warn;

/// Name of the native printing its arguments without a newline
pub const STDOUT: &str = "stdout";

/// Name of the native printing its arguments followed by a newline
pub const STDOUT_LN: &str = "stdoutln";

/// Register every standard native
pub fn register_all(registry: &mut NativeRegistry) {
    registry.register(STDOUT, stdout);
    registry.register(STDOUT_LN, stdoutln);
}

/// Registry holding every standard native
pub fn standard_registry() -> NativeRegistry {
    let mut registry = NativeRegistry::new();
    register_all(&mut registry);
    registry
}

/// Print the arguments, no newline. Returns the bytes written.
pub fn stdout(_vm: &mut ExecutionState, args: &[Variable]) -> Variable {
    let out = io::stdout();
    let mut lock = out.lock();
    written(write_plain(&mut lock, args))
}

/// Print the arguments space-separated with a newline. Returns the bytes
/// written.
pub fn stdoutln(_vm: &mut ExecutionState, args: &[Variable]) -> Variable {
    let out = io::stdout();
    let mut lock = out.lock();
    written(write_line(&mut lock, args))
}

/// Write rendered arguments; a space separates two neighbours when neither
/// is a string.
pub fn write_plain<W: Write>(out: &mut W, args: &[Variable]) -> io::Result<usize> {
    let mut text = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && !is_string(&args[i - 1]) && !is_string(arg) {
            text.push(' ');
        }
        text.push_str(&arg.render());
    }
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(text.len())
}

/// Write rendered arguments separated by spaces, then a newline
pub fn write_line<W: Write>(out: &mut W, args: &[Variable]) -> io::Result<usize> {
    let mut text = args
        .iter()
        .map(Variable::render)
        .collect::<Vec<_>>()
        .join(" ");
    text.push('\n');
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(text.len())
}

fn is_string(value: &Variable) -> bool {
    matches!(value, Variable::String(_))
}

/// Byte count as a number; zero on failure or when it does not fit 53 bits
fn written(result: io::Result<usize>) -> Variable {
    let count = match result {
        Ok(count) => i64::try_from(count).unwrap_or(i64::MAX),
        Err(err) => {
            warn!(error = %err, "native output failed");
            0
        }
    };
    if variable_bounded(count) {
        Variable::Number(count as f64)
    } else {
        Variable::Number(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_spaces_non_string_neighbours() {
        let mut out = Vec::new();
        let args = [
            Variable::Number(1.0),
            Variable::Boolean(true),
            Variable::String("x".into()),
            Variable::Number(2.0),
        ];
        let n = write_plain(&mut out, &args).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1.000000 truex2.000000");
        assert_eq!(n, 22);
    }

    #[test]
    fn line_output_always_spaces() {
        let mut out = Vec::new();
        let args = [Variable::String("a".into()), Variable::String("b".into())];
        let n = write_line(&mut out, &args).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a b\n");
        assert_eq!(n, 4);
    }

    #[test]
    fn failed_write_counts_zero() {
        let err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        assert_eq!(written(Err(err)), Variable::Number(0.0));
        assert_eq!(written(Ok(12)), Variable::Number(12.0));
    }

    #[test]
    fn registry_contains_console_natives() {
        let registry = standard_registry();
        assert_eq!(registry.names(), vec![STDOUT, STDOUT_LN]);
    }
}
