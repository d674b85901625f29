pub mod code;
pub mod employee;
pub mod pricing;
pub mod redeem;
pub mod send_code;
pub mod unique_code;
