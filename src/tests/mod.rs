pub mod stubs;

mod config_tests;
mod contract_extractor_tests;
mod model_reader_tests;
mod result_interpreter_tests;
mod splicer_tests;
