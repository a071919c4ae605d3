//! Location CLI commands. Both run offline.

use clap::Parser;

/// Show how a location text is understood.
#[derive(Debug, Parser)]
pub struct ParseLocationCommand {
    /// Free-text location, e.g. "Rack 2, row 3, col 5".
    pub text: String,
}

/// Read the rack label from a scanned rack code.
#[derive(Debug, Parser)]
pub struct RackCodeCommand {
    /// Code payload: `RACK=<label>` or a URL with a `prefill_Rack` parameter.
    pub code: String,
}
