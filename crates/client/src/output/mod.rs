//! Output formatting for the `cellar` commands.

pub mod json;
pub mod pretty;

use serde::Serialize;

use crate::cli::OutputFormat;

/// Renders `value` as one line of JSON, or through `pretty` for reading.
pub fn format_output<T, F>(value: &T, format: OutputFormat, pretty: F) -> String
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Pretty => pretty(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_core::location::parse_location;

    #[test]
    fn test_json_format_skips_pretty_renderer() {
        let parsed = parse_location("rack 2 row 3 col 5");

        let output = format_output(&parsed, OutputFormat::Json, |_| unreachable!());

        assert_eq!(
            output,
            r#"{"rack":"2","row":3,"column":5,"text":"rack 2 row 3 col 5"}"#
        );
    }

    #[test]
    fn test_pretty_format_uses_renderer() {
        let output = format_output("4", OutputFormat::Pretty, |rack| format!("Rack {}", rack));

        assert_eq!(output, "Rack 4");
    }
}
