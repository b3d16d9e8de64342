// Access log line definitions: matching and typed field extraction.

// Core engine
pub mod parser;

// Driver
pub mod conf;
pub mod runtime;
