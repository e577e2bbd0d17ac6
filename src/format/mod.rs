//! Output formatting for `demand_tracker`.
//!
//! Human-readable text for the terminal, pretty JSON for scripts, and the
//! RFC 4180 CSV codec shared by the CSV store and export.

mod context;
pub mod csv;
mod text;

pub use context::{OutputContext, OutputMode};
pub use text::{
    format_client_list, format_demand_details, format_demand_table, format_team_member_list, pad,
    terminal_width, truncate,
};
