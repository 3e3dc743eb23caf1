//! Command-line interface.

mod args;

pub use args::{
    Cli, Command, ConfigAction, EvalArgs, EventsArgs, GlobalArgs, GroundTruthArgs, MapArgs,
    TablesArgs,
};
