pub mod intake_record;
pub mod settings;
pub mod unit;

