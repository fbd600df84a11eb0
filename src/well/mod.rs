//! Well input documents and loading

pub mod de;
mod input;
pub mod loader;

pub use input::{
    BoeConversion, CapexItem, DateDict, EconModel, ExpenseItem, GeneralOptionModel, Pricing, Production,
    ProductionTaxes, StreamProperties, WellInput,
};
pub use loader::{
    daily_production_from_reader, load_daily_production, load_monthly_production, load_well_input,
    monthly_production_from_reader, well_files, well_input_from_reader,
};
