#[allow(non_snake_case)]
pub mod EOS;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod ScalarTensorStar;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod star_config;
pub mod star_error;
