//! Output formatting helpers.

use serde::Serialize;

use crate::OutputFormat;

/// Print a serializable result in the requested format.
///
/// JSON output always prints (it is the scripting contract); text output
/// respects `quiet`.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, _quiet: bool) {
    if let OutputFormat::Json = format {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to serialize output: {}", e),
        }
    }
}
