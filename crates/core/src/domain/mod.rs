pub mod customer;
pub mod draft;
pub mod opening;
pub mod quotation;
pub mod surcharge;
