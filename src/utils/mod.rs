pub mod fields;
pub mod mapper;
pub mod round_trip;
pub mod serialization;
pub mod validation;
