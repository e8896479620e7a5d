// Event-script parser

pub mod event;
pub mod lexer;

pub use event::{parse_event, parse_event_line};
