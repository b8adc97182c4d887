mod token_counter;

pub use token_counter::TokenCounter;
