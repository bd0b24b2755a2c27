//! Time-series side of the DESTEST validation: loading the exports,
//! reducing them to annual totals, picking the extremum apartments and
//! persisting the annual table.

mod aggregate;
mod extremum;
mod load;
mod persist;

pub use aggregate::{aggregate_annual_demand, compare_annual_tables};
pub use extremum::select_extremes;
pub use load::{load_holidays, load_raw_series, load_temperature};
pub use persist::{read_annual_demand, write_annual_demand, APARTMENT_COLUMN, DEMAND_COLUMN};
