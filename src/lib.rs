pub mod collaborators;
pub mod constants;
pub mod error_models;
pub mod gama;
pub mod levelnet;
pub mod levelnet_errors;
pub mod levelnet_params;
pub mod observations;
pub mod phase;
pub mod time;
pub mod workbook;
pub mod working_set;
