use crate::Log;
use std::fmt::{Display, Formatter};

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Returns the relative ordering of this level.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<TL: Display> Log<TL> {
    /// Reports that a literal or structure was interned under `placeholder`.
    pub fn log_intern(&self, placeholder: &str, body: &str) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Success(()).order() {
            println!("[{}; Intern]: {} -> {}", self, placeholder, body);
        }
    }

    /// Reports that `placeholder` was promoted to dictionary entry `$n`.
    pub fn log_promote(&self, placeholder: &str, dictionary_index: usize) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Default(()).order() {
            println!("[{}; Promote]: {} -> ${}", self, placeholder, dictionary_index);
        }
    }

    /// Reports a token read by the decoder at a given cursor position.
    pub fn log_token(&self, pointer: usize, token: &str) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Verbose(()).order() {
            println!("[{}; Token]: at {}: {}", self, pointer, token);
        }
    }

    /// Reports a decode failure at a given cursor position.
    pub fn log_failure(&self, pointer: usize, message: &str) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Result(()).order() {
            println!("[{}; Failure]: at {}: {}", self, pointer, message);
        }
    }
}
