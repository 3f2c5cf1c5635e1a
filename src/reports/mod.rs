// Reports module - fund return simulation, FX bracket and CSV export

pub mod export;
pub mod fx;
pub mod returns;

pub use export::{export_csv, write_csv};
pub use fx::{fetch_fx_bracket, FxBracket};
pub use returns::{
    compute, compute_with_progress, select_interval, InstrumentOutcome, InstrumentResult,
    InstrumentReturn, RunProgress, RunResult,
};
