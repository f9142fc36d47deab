pub mod driver;
pub mod idle;
pub mod options;
pub mod page;
pub mod session;
