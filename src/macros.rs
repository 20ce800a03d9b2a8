// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression: literals, consts, vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! fields {
    // Field list shorthand for tests and fixtures:
    // fields![ "tx_bytes" => FieldValue::UInt(1), ... ]
    ($($key:expr => $val:expr),* $(,)?) => {
        vec![ $( ($crate::s!($key), $val) ),* ]
    };
}
