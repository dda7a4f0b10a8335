pub mod compile;
pub mod names;

pub use compile::handle_compile;
pub use names::handle_names;
