pub mod otp;
pub mod token;
