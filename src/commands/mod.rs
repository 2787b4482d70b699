pub mod check;
pub mod context;
pub mod init;
pub mod inspect;

pub use check::{resolve_expected_names, run_check, run_check_impl};
pub use init::{generate_config_template, run_init, run_init_impl};
pub use inspect::{run_inspect, run_inspect_impl};
